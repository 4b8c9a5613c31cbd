//! Bidirectional index of usage edges.
//!
//! Stores every edge twice:
//! - `by_source`: "who uses me" lookups for navigation and the unused pass
//! - `by_containing`: bulk removal of everything an element contributed
//!   before its fresh edge set is installed
//!
//! Both maps always hold exactly the same edges. The index makes no
//! freshness decisions; the analyzer decides when to replace what.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{trace, warn};

use crate::base::{StructuralElement, UsageEdge};

/// Bidirectional index for usage edges.
#[derive(Debug)]
pub struct UsageGraph<E> {
    /// Reverse index: source → edges referencing it
    by_source: FxHashMap<E, FxHashSet<UsageEdge<E>>>,

    /// Forward index: containing → edges it contributed
    by_containing: FxHashMap<E, FxHashSet<UsageEdge<E>>>,
}

impl<E> Default for UsageGraph<E> {
    fn default() -> Self {
        Self {
            by_source: FxHashMap::default(),
            by_containing: FxHashMap::default(),
        }
    }
}

impl<E: StructuralElement> UsageGraph<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every edge contributed by `containing` with `edges`.
    ///
    /// Passing an empty set removes the element's outgoing edges. Edges whose
    /// `containing` is not `containing` are skipped: they could never be
    /// removed by a later replacement.
    ///
    /// Returns the sources whose incoming edges changed.
    pub fn replace_edges_from(
        &mut self,
        containing: &E,
        edges: impl IntoIterator<Item = UsageEdge<E>>,
    ) -> Vec<E> {
        let previous = self.remove_edges_from(containing);

        let mut fresh: FxHashSet<UsageEdge<E>> = FxHashSet::default();
        for edge in edges {
            if &edge.containing != containing {
                warn!(
                    "[USAGE_GRAPH] dropping edge {:?} -> {:?} reported by {:?}",
                    edge.containing, edge.source, containing
                );
                continue;
            }
            fresh.insert(edge);
        }

        let touched: FxHashSet<E> = previous
            .symmetric_difference(&fresh)
            .map(|edge| edge.source.clone())
            .collect();

        trace!(
            "[USAGE_GRAPH] replace_edges_from: containing={:?} edges={} touched={}",
            containing,
            fresh.len(),
            touched.len()
        );

        for edge in fresh {
            self.insert(edge);
        }
        touched.into_iter().collect()
    }

    /// Remove `element` both as a key and as an endpoint of any edge.
    ///
    /// Returns the other elements that lost an incoming edge.
    pub fn remove_element(&mut self, element: &E) -> Vec<E> {
        let outgoing = self.remove_edges_from(element);

        if let Some(incoming) = self.by_source.remove(element) {
            for edge in incoming {
                let removed = Self::detach(&mut self.by_containing, &edge.containing, &edge);
                debug_assert!(removed, "edge {edge:?} missing from by_containing");
            }
        }

        let touched: FxHashSet<E> = outgoing
            .into_iter()
            .map(|edge| edge.source)
            .filter(|source| source != element)
            .collect();
        touched.into_iter().collect()
    }

    /// Edges whose `source` is `element`.
    pub fn edges_referencing(&self, element: &E) -> Vec<&UsageEdge<E>> {
        self.by_source
            .get(element)
            .map(|edges| edges.iter().collect())
            .unwrap_or_default()
    }

    /// Edges contributed by `element`.
    pub fn edges_from(&self, element: &E) -> Vec<&UsageEdge<E>> {
        self.by_containing
            .get(element)
            .map(|edges| edges.iter().collect())
            .unwrap_or_default()
    }

    /// Check if anything references `element`.
    pub fn has_usages(&self, element: &E) -> bool {
        self.by_source
            .get(element)
            .is_some_and(|edges| !edges.is_empty())
    }

    /// Get the total number of edges.
    pub fn edge_count(&self) -> usize {
        self.by_source.values().map(FxHashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_source.is_empty() && self.by_containing.is_empty()
    }

    /// Clear all entries.
    pub fn clear(&mut self) {
        self.by_source.clear();
        self.by_containing.clear();
    }

    /// Whether both maps hold exactly the same edges.
    pub fn is_consistent(&self) -> bool {
        let forward = self.by_source.iter().all(|(source, edges)| {
            !edges.is_empty()
                && edges.iter().all(|edge| {
                    &edge.source == source
                        && self
                            .by_containing
                            .get(&edge.containing)
                            .is_some_and(|set| set.contains(edge))
                })
        });
        let backward = self.by_containing.iter().all(|(containing, edges)| {
            !edges.is_empty()
                && edges.iter().all(|edge| {
                    &edge.containing == containing
                        && self
                            .by_source
                            .get(&edge.source)
                            .is_some_and(|set| set.contains(edge))
                })
        });
        forward && backward
    }

    fn insert(&mut self, edge: UsageEdge<E>) {
        self.by_source
            .entry(edge.source.clone())
            .or_default()
            .insert(edge.clone());
        self.by_containing
            .entry(edge.containing.clone())
            .or_default()
            .insert(edge);
    }

    fn remove_edges_from(&mut self, containing: &E) -> FxHashSet<UsageEdge<E>> {
        let outgoing = self.by_containing.remove(containing).unwrap_or_default();
        for edge in &outgoing {
            let removed = Self::detach(&mut self.by_source, &edge.source, edge);
            debug_assert!(removed, "edge {edge:?} missing from by_source");
        }
        outgoing
    }

    /// Remove `edge` from `map[key]`, dropping the entry once empty.
    fn detach(
        map: &mut FxHashMap<E, FxHashSet<UsageEdge<E>>>,
        key: &E,
        edge: &UsageEdge<E>,
    ) -> bool {
        let Some(edges) = map.get_mut(key) else {
            return false;
        };
        let removed = edges.remove(edge);
        if edges.is_empty() {
            map.remove(key);
        }
        removed
    }
}
