//! Element → problems holder cache.

use rustc_hash::FxHashMap;

use crate::base::StructuralElement;

use super::ProblemsHolder;

/// The current problems of every analyzed element.
///
/// Owned by the analyzer and mutated only on its serialization task.
#[derive(Debug)]
pub struct DiagnosticsCache<E> {
    holders: FxHashMap<E, ProblemsHolder<E>>,
}

impl<E> Default for DiagnosticsCache<E> {
    fn default() -> Self {
        Self {
            holders: FxHashMap::default(),
        }
    }
}

impl<E: StructuralElement> DiagnosticsCache<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the holder of `element`. Returns the previous one.
    pub fn install(&mut self, element: E, holder: ProblemsHolder<E>) -> Option<ProblemsHolder<E>> {
        self.holders.insert(element, holder)
    }

    pub fn get(&self, element: &E) -> Option<&ProblemsHolder<E>> {
        self.holders.get(element)
    }

    pub fn get_mut(&mut self, element: &E) -> Option<&mut ProblemsHolder<E>> {
        self.holders.get_mut(element)
    }

    /// Holder of `element`, created empty if missing.
    pub fn get_or_create(&mut self, element: &E) -> &mut ProblemsHolder<E> {
        self.holders.entry(element.clone()).or_default()
    }

    pub fn remove(&mut self, element: &E) -> Option<ProblemsHolder<E>> {
        self.holders.remove(element)
    }

    /// Elements whose holder currently contains at least one problem.
    pub fn all_with_problems(&self) -> Vec<E> {
        self.holders
            .iter()
            .filter(|(_, holder)| holder.contains_problems())
            .map(|(element, _)| element.clone())
            .collect()
    }

    pub fn clear(&mut self) {
        self.holders.clear();
    }

    pub fn len(&self) -> usize {
        self.holders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holders.is_empty()
    }
}
