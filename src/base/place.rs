/// A location inside the structure of an element.
///
/// `path` narrows the place down (e.g. a dependency entry inside a module's
/// classpath); it participates in problem identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaceInStructure<E> {
    pub element: E,
    pub path: Option<String>,
}

impl<E> PlaceInStructure<E> {
    pub fn new(element: E) -> Self {
        Self {
            element,
            path: None,
        }
    }

    /// Create a place pointing at a sub-location of `element`
    pub fn with_path(element: E, path: impl Into<String>) -> Self {
        Self {
            element,
            path: Some(path.into()),
        }
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}
