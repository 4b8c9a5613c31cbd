//! Usage graph - who references whom, and who is referenced by nobody.
//!
//! - [`UsageGraph`] - bidirectional edge index keyed by element identity
//! - [`UnusedTracker`] - opt-in registry of elements reported when unused

mod unused;
mod usage_index;

pub use unused::{UnusedChange, UnusedTracker};
pub use usage_index::UsageGraph;
