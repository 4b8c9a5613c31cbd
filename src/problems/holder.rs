//! Per-element problem collection.

use crate::base::{PlaceInStructure, StructuralElement};

use super::{ProblemDescription, ProblemSeverity, ProblemsSettings};

/// Collects the problems of one element.
///
/// A fresh holder is filled by every completed check and replaces the
/// previous one in the [`DiagnosticsCache`](super::DiagnosticsCache).
#[derive(Clone, Debug)]
pub struct ProblemsHolder<E> {
    problems: Vec<ProblemDescription<E>>,
}

impl<E> Default for ProblemsHolder<E> {
    fn default() -> Self {
        Self {
            problems: Vec::new(),
        }
    }
}

impl<E: StructuralElement> ProblemsHolder<E> {
    /// Create a new empty holder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a problem.
    pub fn register_problem(&mut self, problem: ProblemDescription<E>) {
        self.problems.push(problem);
    }

    /// Add an error of the generic error type.
    pub fn register_error(&mut self, place: PlaceInStructure<E>, message: impl Into<String>) {
        self.register_problem(ProblemDescription::error(message, place));
    }

    /// Add a warning of the generic warning type.
    pub fn register_warning(&mut self, place: PlaceInStructure<E>, message: impl Into<String>) {
        self.register_problem(ProblemDescription::warning(message, place));
    }

    /// Remove the first problem equal to `problem`. Returns whether one was found.
    pub fn remove_problem(&mut self, problem: &ProblemDescription<E>) -> bool {
        match self.problems.iter().position(|p| p == problem) {
            Some(index) => {
                self.problems.remove(index);
                true
            }
            None => false,
        }
    }

    /// Get all problems, in registration order.
    pub fn problems(&self) -> &[ProblemDescription<E>] {
        &self.problems
    }

    /// Problems the user has not chosen to ignore.
    pub fn visible_problems<'a>(
        &'a self,
        settings: &'a dyn ProblemsSettings,
    ) -> impl Iterator<Item = &'a ProblemDescription<E>> + 'a {
        self.problems
            .iter()
            .filter(move |p| !settings.is_ignored(&p.id()))
    }

    pub fn contains_problems(&self) -> bool {
        !self.problems.is_empty()
    }

    pub fn contains_problems_of(&self, severity: ProblemSeverity) -> bool {
        self.problems.iter().any(|p| p.severity() == severity)
    }

    /// Rolled-up severity.
    ///
    /// `Error` if any problem is an error, `Warning` if there is any other
    /// problem (UNUSED included), `None` for an empty holder.
    pub fn severity(&self) -> Option<ProblemSeverity> {
        if self.contains_problems_of(ProblemSeverity::Error) {
            Some(ProblemSeverity::Error)
        } else if self.contains_problems() {
            Some(ProblemSeverity::Warning)
        } else {
            None
        }
    }

    /// One line per problem, errors first.
    pub fn compose_tooltip_message(&self) -> String {
        let mut ordered: Vec<&ProblemDescription<E>> = self.problems.iter().collect();
        ordered.sort_by_key(|p| p.severity());
        ordered
            .iter()
            .map(|p| p.message.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}
