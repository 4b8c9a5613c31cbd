//! Analyzer state owned by the serialization task.
//!
//! All mutation goes through the methods below, which the dispatcher calls
//! while holding the write lock. Every method records the elements whose
//! displayed state may have changed in a [`Notifications`] set; the
//! dispatcher emits them after releasing the lock.

use indexmap::IndexSet;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::base::{StructuralElement, UsageEdge};
use crate::graph::{UnusedTracker, UsageGraph};
use crate::problems::{DiagnosticsCache, ProblemsHolder};

use super::ValidatorChain;

/// Elements to notify listeners about, deduplicated, in first-touch order.
pub(crate) type Notifications<E> = IndexSet<E>;

/// Newest sequence number applied per computation kind.
///
/// Results at or below the ticket are stale: a newer result was applied, or
/// the element was removed after the result's request.
#[derive(Debug, Default, Clone, Copy)]
struct Tickets {
    check: u64,
    usages: u64,
}

#[derive(Debug)]
pub(crate) struct AnalyzerState<E> {
    pub cache: DiagnosticsCache<E>,
    pub graph: UsageGraph<E>,
    pub unused: UnusedTracker<E>,
    /// Elements awaiting usage collection → newest usage request.
    pending_usages: FxHashMap<E, u64>,
    tickets: FxHashMap<E, Tickets>,
}

impl<E> Default for AnalyzerState<E> {
    fn default() -> Self {
        Self {
            cache: DiagnosticsCache::default(),
            graph: UsageGraph::default(),
            unused: UnusedTracker::default(),
            pending_usages: FxHashMap::default(),
            tickets: FxHashMap::default(),
        }
    }
}

impl<E: StructuralElement> AnalyzerState<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bookkeeping for a freshly queued request.
    ///
    /// Refreshes the unused-warning registry from the element's current
    /// opt-in flag and marks the element pending if usages were asked for.
    pub fn note_request(
        &mut self,
        element: &E,
        collect_usages: bool,
        seq: u64,
        notify: &mut Notifications<E>,
    ) {
        if element.should_show_warning_if_unused() {
            self.unused.opt_in(element.clone());
        } else if let Some(retracted) = self.unused.opt_out(element) {
            if let Some(holder) = self.cache.get_mut(element) {
                holder.remove_problem(&retracted);
            }
            notify.insert(element.clone());
        }

        if collect_usages {
            self.pending_usages.insert(element.clone(), seq);
        }
    }

    /// Install a fresh holder for `element` unless a newer one was applied.
    pub fn apply_check(
        &mut self,
        element: &E,
        mut holder: ProblemsHolder<E>,
        seq: u64,
        notify: &mut Notifications<E>,
    ) -> bool {
        let tickets = self.tickets.entry(element.clone()).or_default();
        if seq <= tickets.check {
            trace!("[STATE] stale check for {:?}: seq={} applied={}", element, seq, tickets.check);
            return false;
        }
        tickets.check = seq;

        // The unused pass runs separately; keep its warning across re-checks.
        if let Some(warning) = self.unused.installed_warning(element) {
            holder.register_problem(warning.clone());
        }
        trace!(
            "[STATE] check of {:?} applied: {} problems, severity={}",
            element,
            holder.len(),
            holder.severity().map_or("none", |severity| severity.display())
        );
        self.cache.install(element.clone(), holder);
        notify.insert(element.clone());
        true
    }

    /// Install the fresh outgoing edges of `element` unless newer ones were applied.
    pub fn apply_usages(
        &mut self,
        element: &E,
        edges: Vec<UsageEdge<E>>,
        seq: u64,
        chain: &ValidatorChain<E>,
        notify: &mut Notifications<E>,
    ) -> bool {
        let tickets = self.tickets.entry(element.clone()).or_default();
        if seq <= tickets.usages {
            trace!("[STATE] stale usages for {:?}: seq={} applied={}", element, seq, tickets.usages);
            return false;
        }
        tickets.usages = seq;

        let touched = self.graph.replace_edges_from(element, edges);
        notify.extend(touched);
        self.settle_usages(element, seq, chain, notify);
        true
    }

    /// Usage collection for `element` failed: keep the old edges, but stop
    /// waiting for it so the unused pass is not blocked forever.
    pub fn abandon_usages(
        &mut self,
        element: &E,
        seq: u64,
        chain: &ValidatorChain<E>,
        notify: &mut Notifications<E>,
    ) {
        let removed_later = self
            .tickets
            .get(element)
            .is_some_and(|tickets| seq <= tickets.usages);
        if !removed_later {
            self.settle_usages(element, seq, chain, notify);
        }
    }

    /// Deregister `element` everywhere. `seq` is the newest sequence number
    /// handed out so far; in-flight results for older requests are dropped.
    pub fn remove_element(
        &mut self,
        element: &E,
        seq: u64,
        chain: &ValidatorChain<E>,
        notify: &mut Notifications<E>,
    ) {
        self.pending_usages.remove(element);
        self.unused.opt_out(element);
        self.cache.remove(element);
        let touched = self.graph.remove_element(element);
        self.tickets.insert(
            element.clone(),
            Tickets {
                check: seq,
                usages: seq,
            },
        );

        notify.insert(element.clone());
        notify.extend(touched);
        self.run_unused_pass(chain, notify);
    }

    /// Clear the cache, returning the elements that had problems.
    ///
    /// Installed UNUSED warnings are put back into fresh holders: they do
    /// not depend on a check, so a failed re-check must not lose them.
    pub fn take_elements_with_problems(&mut self, notify: &mut Notifications<E>) -> Vec<E> {
        let elements = self.cache.all_with_problems();
        self.cache.clear();
        for element in &elements {
            if let Some(warning) = self.unused.installed_warning(element) {
                self.cache
                    .get_or_create(element)
                    .register_problem(warning.clone());
            }
        }
        notify.extend(elements.iter().cloned());
        elements
    }

    /// Refresh UNUSED warnings, but only once no usage collection is pending.
    pub fn run_unused_pass(&mut self, chain: &ValidatorChain<E>, notify: &mut Notifications<E>) {
        if !self.pending_usages.is_empty() {
            trace!(
                "[STATE] unused pass deferred: {} pending",
                self.pending_usages.len()
            );
            return;
        }

        let changes = self
            .unused
            .reconcile(&self.graph, |element| chain.create_unused_element_warning(element));

        for change in changes {
            let holder = self.cache.get_or_create(&change.element);
            if let Some(old) = &change.old {
                holder.remove_problem(old);
            }
            if let Some(new) = change.new {
                holder.register_problem(new);
            }
            notify.insert(change.element);
        }
    }

    #[cfg(test)]
    pub fn is_pending(&self, element: &E) -> bool {
        self.pending_usages.contains_key(element)
    }

    pub fn pending_count(&self) -> usize {
        self.pending_usages.len()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
        self.graph.clear();
        self.unused.clear();
        self.pending_usages.clear();
        self.tickets.clear();
    }

    fn settle_usages(
        &mut self,
        element: &E,
        seq: u64,
        chain: &ValidatorChain<E>,
        notify: &mut Notifications<E>,
    ) {
        if self
            .pending_usages
            .get(element)
            .is_some_and(|latest| *latest <= seq)
        {
            self.pending_usages.remove(element);
        }
        self.run_unused_pass(chain, notify);
    }
}
