//! Problems - per-element diagnostics.
//!
//! ## Key Types
//!
//! - [`ProblemDescription`] - one problem found in an element
//! - [`ProblemType`], [`ProblemSeverity`] - stable problem identity and level
//! - [`ProblemsHolder`] - the problems of one element, with severity rollup
//! - [`DiagnosticsCache`] - element → holder map owned by the analyzer
//! - [`ProblemsSettings`] - which problems the user chose to ignore

mod cache;
mod description;
mod holder;
mod settings;

pub use cache::DiagnosticsCache;
pub use description::{ProblemDescription, ProblemSeverity, ProblemType, QuickFix, types};
pub use holder::ProblemsHolder;
pub use settings::{IgnoredProblems, ProblemsSettings};
