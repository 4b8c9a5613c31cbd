//! Unused-element tracking.
//!
//! Elements opt in through
//! [`should_show_warning_if_unused`](crate::base::StructuralElement::should_show_warning_if_unused).
//! Once the usage graph is settled, [`UnusedTracker::reconcile`] decides for
//! every registered element whether its UNUSED warning should be present,
//! and reports the transitions so the caller can patch problem holders.

use indexmap::IndexSet;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::base::StructuralElement;
use crate::problems::ProblemDescription;

use super::UsageGraph;

/// A change in the UNUSED warning of one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnusedChange<E> {
    pub element: E,
    /// Warning that was installed before, to be removed from the holder.
    pub old: Option<ProblemDescription<E>>,
    /// Warning that is installed now, to be added to the holder.
    pub new: Option<ProblemDescription<E>>,
}

/// Registry of elements that want a warning when nothing references them.
#[derive(Debug)]
pub struct UnusedTracker<E> {
    registry: IndexSet<E>,
    installed: FxHashMap<E, ProblemDescription<E>>,
}

impl<E> Default for UnusedTracker<E> {
    fn default() -> Self {
        Self {
            registry: IndexSet::new(),
            installed: FxHashMap::default(),
        }
    }
}

impl<E: StructuralElement> UnusedTracker<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `element`. Returns false if it was already registered.
    ///
    /// The stored value is refreshed, so later warnings are built from the
    /// newest copy of the element.
    pub fn opt_in(&mut self, element: E) -> bool {
        self.registry.replace(element).is_none()
    }

    /// Unregister `element`, returning the warning it had installed.
    pub fn opt_out(&mut self, element: &E) -> Option<ProblemDescription<E>> {
        self.registry.shift_remove(element);
        self.installed.remove(element)
    }

    pub fn is_registered(&self, element: &E) -> bool {
        self.registry.contains(element)
    }

    /// The UNUSED warning currently installed for `element`.
    pub fn installed_warning(&self, element: &E) -> Option<&ProblemDescription<E>> {
        self.installed.get(element)
    }

    pub fn installed_count(&self) -> usize {
        self.installed.len()
    }

    pub fn registered_count(&self) -> usize {
        self.registry.len()
    }

    pub fn clear(&mut self) {
        self.registry.clear();
        self.installed.clear();
    }

    /// Bring every registered element's warning in line with `graph`.
    ///
    /// Walks the registry only. `create_warning` is asked for a warning when
    /// an element has no incoming edge; returning `None` means "do not warn".
    /// Only elements whose warning appeared, disappeared or changed are
    /// returned.
    pub fn reconcile<F>(&mut self, graph: &UsageGraph<E>, mut create_warning: F) -> Vec<UnusedChange<E>>
    where
        F: FnMut(&E) -> Option<ProblemDescription<E>>,
    {
        let mut changes = Vec::new();

        for element in &self.registry {
            let warning = if graph.has_usages(element) {
                None
            } else {
                create_warning(element)
            };

            let old = match &warning {
                Some(warning) => {
                    if self.installed.get(element) == Some(warning) {
                        continue;
                    }
                    self.installed.insert(element.clone(), warning.clone())
                }
                None => self.installed.remove(element),
            };

            if old.is_none() && warning.is_none() {
                continue;
            }

            trace!(
                "[UNUSED] {:?}: installed={} replaced={}",
                element,
                warning.is_some(),
                old.is_some()
            );
            changes.push(UnusedChange {
                element: element.clone(),
                old,
                new: warning,
            });
        }

        changes
    }
}
