//! Read-consistent model views.
//!
//! Strategies run off the serialization task while the host keeps editing its
//! model. Each worker takes one snapshot before running a strategy and uses it
//! for the whole callback, so it never observes a half-applied edit.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

/// Source of point-in-time views of the host model.
pub trait SnapshotSource<M>: Send + Sync {
    /// Take a snapshot. Must not block on unrelated long-running work.
    fn snapshot(&self) -> Arc<M>;
}

impl<M, F> SnapshotSource<M> for F
where
    F: Fn() -> Arc<M> + Send + Sync,
{
    fn snapshot(&self) -> Arc<M> {
        self()
    }
}

/// Copy-on-write model store.
///
/// Writers publish a whole new version; readers hold on to the `Arc` they
/// were given, which stays valid and unchanged for as long as they need it.
#[derive(Debug)]
pub struct VersionedModel<M> {
    current: RwLock<Arc<M>>,
    version: AtomicU64,
}

impl<M> VersionedModel<M> {
    pub fn new(model: M) -> Self {
        Self {
            current: RwLock::new(Arc::new(model)),
            version: AtomicU64::new(0),
        }
    }

    /// Number of versions published since creation.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Replace the model wholesale.
    pub fn publish(&self, model: M) -> u64 {
        let mut current = self.current.write();
        *current = Arc::new(model);
        self.version.fetch_add(1, Ordering::AcqRel) + 1
    }
}

impl<M: Clone> VersionedModel<M> {
    /// Apply an edit and publish the result as a new version.
    ///
    /// Snapshots taken before the call keep seeing the old version.
    pub fn update<R>(&self, edit: impl FnOnce(&mut M) -> R) -> R {
        let mut current = self.current.write();
        let result = edit(Arc::make_mut(&mut *current));
        self.version.fetch_add(1, Ordering::AcqRel);
        result
    }
}

impl<M: Send + Sync> SnapshotSource<M> for VersionedModel<M> {
    fn snapshot(&self) -> Arc<M> {
        let current = self.current.read();
        Arc::clone(&*current)
    }
}
