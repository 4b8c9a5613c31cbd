//! Change notification.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

/// Receives notifications from the analyzer's serialization task.
///
/// `problems_changed` fires after every cache or graph mutation that may
/// change what is displayed for `element`. It runs on the serialization task,
/// so it should return quickly; reading the analyzer from it is fine.
pub trait AnalyzerListener<E>: Send + Sync {
    fn problems_changed(&self, element: &E);
}

impl<E, F> AnalyzerListener<E> for F
where
    F: Fn(&E) + Send + Sync,
{
    fn problems_changed(&self, element: &E) {
        self(element)
    }
}

/// Handle returned by `add_listener`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Registered listeners, notified in subscription order.
pub(crate) struct ListenerRegistry<E> {
    next_id: AtomicU64,
    listeners: RwLock<Vec<(ListenerId, Arc<dyn AnalyzerListener<E>>)>>,
}

impl<E> Default for ListenerRegistry<E> {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            listeners: RwLock::new(Vec::new()),
        }
    }
}

impl<E> ListenerRegistry<E> {
    pub fn subscribe(&self, listener: Arc<dyn AnalyzerListener<E>>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push((id, listener));
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Notify every listener about `element`.
    ///
    /// The list is copied first so listeners may (un)subscribe while being notified.
    pub fn emit(&self, element: &E) {
        let listeners: Vec<Arc<dyn AnalyzerListener<E>>> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener.problems_changed(element);
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }
}
