//! Foundation types for the structure analyzer.
//!
//! This module provides the vocabulary every other layer is written in:
//! - [`StrategyError`] - Failure reported by a check or usage strategy
//! - [`StructuralElement`] - Opaque, hashable identity of one configurable unit
//! - [`UsageEdge`], [`UsageEditor`] - Directed references between elements
//! - [`PlaceInStructure`] - Navigation target inside an element
//! - [`SnapshotSource`], [`VersionedModel`] - Read-consistent model views
//!
//! This module has NO dependencies on other strata modules except the
//! problem types used in element signatures.

mod element;
mod error;
mod place;
mod snapshot;
mod usage;

pub use element::StructuralElement;
pub use error::StrategyError;
pub use place::PlaceInStructure;
pub use snapshot::{SnapshotSource, VersionedModel};
pub use usage::{UsageEdge, UsageEditor};
