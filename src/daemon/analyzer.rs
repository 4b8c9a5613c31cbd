//! The analyzer handle.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::sync::oneshot;
use tracing::debug;

use crate::base::{SnapshotSource, StructuralElement, UsageEdge};
use crate::problems::{ProblemSeverity, ProblemsHolder};

use super::dispatcher::{Command, Dispatcher, Shared};
use super::{AnalyzerConfig, AnalyzerError, AnalyzerListener, ListenerId, ValidatorChain};

/// Counters describing what the analyzer currently holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyzerStats {
    /// Elements whose usage collection has not completed yet
    pub pending_usages: usize,
    /// Elements with an installed problems holder
    pub holders: usize,
    /// Edges in the usage graph
    pub edges: usize,
    /// Installed UNUSED warnings
    pub unused_warnings: usize,
    /// Requests waiting out the debounce window
    pub buffered: usize,
    /// Dispatched requests whose result has not been applied
    pub in_flight: usize,
}

/// Incremental consistency checker for a model of [`StructuralElement`]s.
///
/// The handle is cheap to clone; all clones drive the same serialization
/// task. Mutating calls are fire-and-forget and take effect in the order
/// they were made. Read calls see the state as of the last applied result.
///
/// # Example
///
/// ```ignore
/// let analyzer = Analyzer::new(AnalyzerConfig::default(), model.clone())?;
/// analyzer.add_listener(Arc::new(|element: &Node| println!("{element:?} changed")));
/// analyzer.queue_update(node.clone());
/// analyzer.flush().await?;
/// assert!(analyzer.problems(&node).is_some());
/// ```
pub struct Analyzer<E: StructuralElement> {
    shared: Arc<Shared<E>>,
    commands: UnboundedSender<Command<E>>,
}

impl<E: StructuralElement> Clone for Analyzer<E> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            commands: self.commands.clone(),
        }
    }
}

impl<E: StructuralElement> Analyzer<E> {
    /// Start an analyzer on the current tokio runtime.
    pub fn new(
        config: AnalyzerConfig,
        source: Arc<dyn SnapshotSource<E::Model>>,
    ) -> Result<Self, AnalyzerError> {
        Self::with_validators(config, source, ValidatorChain::new())
    }

    /// Start an analyzer whose validators are consulted before each element's own behaviour.
    pub fn with_validators(
        config: AnalyzerConfig,
        source: Arc<dyn SnapshotSource<E::Model>>,
        validators: ValidatorChain<E>,
    ) -> Result<Self, AnalyzerError> {
        let runtime = Handle::try_current()?;
        let shared = Arc::new(Shared::new());
        let (commands, receiver) = mpsc::unbounded_channel();

        let dispatcher = Dispatcher::new(
            &config,
            Arc::clone(&shared),
            source,
            Arc::new(validators),
            receiver,
        );
        runtime.spawn(dispatcher.run());

        Ok(Self { shared, commands })
    }

    // ========================================================================
    // UPDATES
    // ========================================================================

    /// Re-check `element` and re-collect its usages.
    pub fn queue_update(&self, element: E) {
        self.queue_update_with(element, true, true);
    }

    /// Queue an update asking only for the given computations.
    pub fn queue_update_with(&self, element: E, check: bool, collect_usages: bool) {
        self.send(Command::Queue {
            element,
            check,
            collect_usages,
        });
    }

    pub fn queue_updates(&self, elements: impl IntoIterator<Item = E>) {
        for element in elements {
            self.queue_update(element);
        }
    }

    /// Forget everything known about `element`.
    pub fn remove_element(&self, element: E) {
        self.send(Command::Remove(element));
    }

    pub fn remove_elements(&self, elements: impl IntoIterator<Item = E>) {
        for element in elements {
            self.remove_element(element);
        }
    }

    /// Clear the problems of every element that has some and re-check them.
    ///
    /// Call after anything that changes which problems are reported, such as
    /// the ignored-problems settings.
    pub fn queue_update_for_all_elements_with_errors(&self) {
        self.send(Command::RecheckElementsWithErrors);
    }

    /// Drop all problems, usages and buffered requests. The analyzer stays active.
    pub fn clear_caches(&self) {
        self.send(Command::ClearCaches);
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Cancel all work and drop every cache until [`reset`](Self::reset).
    ///
    /// In-flight strategies see the cancellation immediately; their results
    /// are discarded.
    pub fn stop(&self) {
        self.shared.session.lock().cancel();
        self.send(Command::Stop);
    }

    /// Reactivate a stopped analyzer.
    ///
    /// Takes effect on the serialization task, after every command sent
    /// before it. Updates queued after `reset` run normally; work cancelled
    /// by `stop` is not waited for.
    pub fn reset(&self) {
        self.send(Command::Reset);
    }

    /// Stop for good and end the serialization task.
    pub fn dispose(&self) {
        self.shared.session.lock().cancel();
        self.send(Command::Dispose);
    }

    pub fn is_stopped(&self) -> bool {
        self.shared.session.lock().is_cancelled()
    }

    /// Dispatch buffered requests now and wait until every result is applied.
    pub async fn flush(&self) -> Result<(), AnalyzerError> {
        self.wait(true).await
    }

    /// Wait until nothing is buffered or in flight, honouring the debounce window.
    pub async fn wait_for_idle(&self) -> Result<(), AnalyzerError> {
        self.wait(false).await
    }

    async fn wait(&self, flush: bool) -> Result<(), AnalyzerError> {
        let (reply, idle) = oneshot::channel();
        self.commands
            .send(Command::WaitIdle { flush, reply })
            .map_err(|_| AnalyzerError::Disposed)?;
        idle.await.map_err(|_| AnalyzerError::Disposed)
    }

    fn send(&self, command: Command<E>) {
        if self.commands.send(command).is_err() {
            debug!("[ANALYZER] command ignored: analyzer disposed");
        }
    }

    // ========================================================================
    // LISTENERS
    // ========================================================================

    pub fn add_listener(&self, listener: Arc<dyn AnalyzerListener<E>>) -> ListenerId {
        self.shared.listeners.subscribe(listener)
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.shared.listeners.unsubscribe(id)
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Current problems of `element`, UNUSED warning included.
    pub fn problems(&self, element: &E) -> Option<ProblemsHolder<E>> {
        self.shared.state.read().cache.get(element).cloned()
    }

    pub fn severity(&self, element: &E) -> Option<ProblemSeverity> {
        self.shared
            .state
            .read()
            .cache
            .get(element)
            .and_then(|holder| holder.severity())
    }

    /// Edges pointing at `element`, for "used by" navigation.
    pub fn usages(&self, element: &E) -> Vec<UsageEdge<E>> {
        self.shared
            .state
            .read()
            .graph
            .edges_referencing(element)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Whether an UNUSED warning is installed for `element`.
    pub fn is_unused(&self, element: &E) -> bool {
        self.shared
            .state
            .read()
            .unused
            .installed_warning(element)
            .is_some()
    }

    pub fn elements_with_problems(&self) -> Vec<E> {
        self.shared.state.read().cache.all_with_problems()
    }

    pub fn stats(&self) -> AnalyzerStats {
        let state = self.shared.state.read();
        AnalyzerStats {
            pending_usages: state.pending_count(),
            holders: state.cache.len(),
            edges: state.graph.edge_count(),
            unused_warnings: state.unused.installed_count(),
            buffered: self.shared.buffered.load(Ordering::Relaxed),
            in_flight: self.shared.in_flight.load(Ordering::Relaxed),
        }
    }
}
