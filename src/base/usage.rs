//! Usage edges between structural elements.

use super::PlaceInStructure;

/// A directed reference: `containing` uses `source`.
///
/// Edges are produced by the usage-collection strategy of `containing` and
/// compared by value, so an element that reports the same reference twice
/// contributes a single edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UsageEdge<E> {
    /// The element being referenced
    pub source: E,
    /// The element doing the referencing
    pub containing: E,
    /// How the reference is presented in a "used by" list
    pub presentable_name: String,
    /// Where inside `containing` the reference lives
    pub location_hint: Option<String>,
}

impl<E: Clone> UsageEdge<E> {
    pub fn new(source: E, containing: E, presentable_name: impl Into<String>) -> Self {
        Self {
            source,
            containing,
            presentable_name: presentable_name.into(),
            location_hint: None,
        }
    }

    pub fn with_location(mut self, hint: impl Into<String>) -> Self {
        self.location_hint = Some(hint.into());
        self
    }

    /// Navigation target for this usage: the spot inside the containing element.
    pub fn place(&self) -> PlaceInStructure<E> {
        PlaceInStructure {
            element: self.containing.clone(),
            path: self.location_hint.clone(),
        }
    }

    /// Ask the model owner to drop the reference this edge describes.
    pub fn remove_source_element(&self, editor: &dyn UsageEditor<E>) {
        editor.remove_source_element(self);
    }

    /// Ask the model owner to point the reference at `replacement` instead.
    pub fn replace_element(&self, editor: &dyn UsageEditor<E>, replacement: &E) {
        editor.replace_element(self, replacement);
    }
}

/// Owner of the concrete model, able to act on usage edges.
///
/// The analyzer only reads edges; edits go through the host, which then
/// queues the affected elements for re-analysis.
pub trait UsageEditor<E>: Send + Sync {
    fn navigate(&self, place: &PlaceInStructure<E>);

    fn remove_source_element(&self, usage: &UsageEdge<E>);

    fn replace_element(&self, usage: &UsageEdge<E>, replacement: &E);
}
