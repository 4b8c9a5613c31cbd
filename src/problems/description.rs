//! Problem descriptions and their identity.

use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::{PlaceInStructure, StructuralElement};

// ============================================================================
// SEVERITY AND TYPE
// ============================================================================

/// Severity level of a problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProblemSeverity {
    Error,
    Warning,
    /// Nothing references the element.
    Unused,
}

impl ProblemSeverity {
    pub fn display(&self) -> &'static str {
        match self {
            ProblemSeverity::Error => "error",
            ProblemSeverity::Warning => "warning",
            ProblemSeverity::Unused => "unused",
        }
    }
}

/// A kind of problem: stable id plus severity.
///
/// The id is part of the ignore key, so it must not change between sessions.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProblemType {
    pub id: SmolStr,
    pub severity: ProblemSeverity,
}

impl ProblemType {
    pub fn new(id: impl Into<SmolStr>, severity: ProblemSeverity) -> Self {
        Self {
            id: id.into(),
            severity,
        }
    }

    pub fn error(id: impl Into<SmolStr>) -> Self {
        Self::new(id, ProblemSeverity::Error)
    }

    pub fn warning(id: impl Into<SmolStr>) -> Self {
        Self::new(id, ProblemSeverity::Warning)
    }

    pub fn unused(id: impl Into<SmolStr>) -> Self {
        Self::new(id, ProblemSeverity::Unused)
    }
}

/// Stock problem type ids.
pub mod types {
    /// Generic error reported by a check.
    pub const ERROR: &str = "error";
    /// Generic warning reported by a check.
    pub const WARNING: &str = "warning";
    /// Element is not referenced by anything.
    pub const UNUSED_ELEMENT: &str = "unused-element";
    /// Element references something that no longer exists.
    pub const INVALID_REFERENCE: &str = "invalid-reference";
    /// Element references something of the wrong kind.
    pub const INCOMPATIBLE_REFERENCE: &str = "incompatible-reference";
}

// ============================================================================
// QUICK FIXES
// ============================================================================

/// An action offered to resolve a problem.
///
/// Fixes run on the host's side; the analyzer only carries them along.
pub trait QuickFix: Send + Sync {
    fn action_name(&self) -> String;

    fn perform(&self);
}

// ============================================================================
// PROBLEM DESCRIPTION
// ============================================================================

/// One problem found in an element.
#[derive(Clone)]
pub struct ProblemDescription<E> {
    /// Short message.
    pub message: String,
    /// Optional longer explanation.
    pub description: Option<String>,
    /// Where the problem is, for navigation and identity.
    pub place: PlaceInStructure<E>,
    pub problem_type: ProblemType,
    pub fixes: Vec<Arc<dyn QuickFix>>,
    /// Whether the place is worth showing next to the message.
    pub can_show_place: bool,
}

impl<E: StructuralElement> ProblemDescription<E> {
    pub fn new(
        message: impl Into<String>,
        place: PlaceInStructure<E>,
        problem_type: ProblemType,
    ) -> Self {
        Self {
            message: message.into(),
            description: None,
            place,
            problem_type,
            fixes: Vec::new(),
            can_show_place: true,
        }
    }

    /// Create an error with the generic error type.
    pub fn error(message: impl Into<String>, place: PlaceInStructure<E>) -> Self {
        Self::new(message, place, ProblemType::error(types::ERROR))
    }

    /// Create a warning with the generic warning type.
    pub fn warning(message: impl Into<String>, place: PlaceInStructure<E>) -> Self {
        Self::new(message, place, ProblemType::warning(types::WARNING))
    }

    /// Create the standard "not used" problem for `element`.
    pub fn unused(element: &E) -> Self {
        Self::new(
            format!(
                "{} '{}' is not used",
                element.type_name(),
                element.presentable_name()
            ),
            PlaceInStructure::new(element.clone()),
            ProblemType::unused(types::UNUSED_ELEMENT),
        )
        .with_can_show_place(false)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_fix(mut self, fix: Arc<dyn QuickFix>) -> Self {
        self.fixes.push(fix);
        self
    }

    pub fn with_can_show_place(mut self, can_show_place: bool) -> Self {
        self.can_show_place = can_show_place;
        self
    }

    pub fn severity(&self) -> ProblemSeverity {
        self.problem_type.severity
    }

    /// Stable id used to remember that the user ignored this problem.
    ///
    /// Built from the problem type, the element holding the place and the
    /// place path, so it is deterministic across sessions.
    pub fn id(&self) -> String {
        match self.place.path() {
            Some(path) => format!(
                "{}({}, {})",
                self.problem_type.id,
                self.place.element.id(),
                path
            ),
            None => format!("{}({})", self.problem_type.id, self.place.element.id()),
        }
    }
}

impl<E: PartialEq> PartialEq for ProblemDescription<E> {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
            && self.description == other.description
            && self.place == other.place
            && self.problem_type == other.problem_type
            && self.can_show_place == other.can_show_place
            && self.fixes.len() == other.fixes.len()
            && self
                .fixes
                .iter()
                .zip(&other.fixes)
                .all(|(a, b)| a.action_name() == b.action_name())
    }
}

impl<E: Eq> Eq for ProblemDescription<E> {}

impl<E: fmt::Debug> fmt::Debug for ProblemDescription<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fixes: Vec<String> = self.fixes.iter().map(|fix| fix.action_name()).collect();
        f.debug_struct("ProblemDescription")
            .field("message", &self.message)
            .field("description", &self.description)
            .field("place", &self.place)
            .field("problem_type", &self.problem_type)
            .field("fixes", &fixes)
            .field("can_show_place", &self.can_show_place)
            .finish()
    }
}
