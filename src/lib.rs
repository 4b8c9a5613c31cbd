//! # strata-analyzer
//!
//! Incremental, asynchronous consistency checking for hierarchical
//! configuration models: per-element problems, a usage graph between
//! elements, and "unused" warnings for elements nothing references.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! daemon    → Analyzer handle, coalescing queue, workers, listeners
//!   ↓
//! graph     → Usage graph index, unused-element tracker
//!   ↓
//! problems  → Problem descriptions, holders, diagnostics cache
//!   ↓
//! base      → Element trait, usage edges, model snapshots
//! ```

// ============================================================================
// MODULES (dependency order: base → problems → graph → daemon)
// ============================================================================

/// Foundation types: elements, usage edges, model snapshots
pub mod base;

/// Problems: descriptions, per-element holders, ignore settings
pub mod problems;

/// Usage graph: edge index and unused tracking
pub mod graph;

/// The asynchronous analyzer
pub mod daemon;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export foundation types
pub use base::{
    PlaceInStructure, SnapshotSource, StrategyError, StructuralElement, UsageEdge, UsageEditor,
    VersionedModel,
};

// Re-export problem types
pub use problems::{
    IgnoredProblems, ProblemDescription, ProblemSeverity, ProblemType, ProblemsHolder,
    ProblemsSettings, QuickFix,
};

// Re-export the analyzer
pub use daemon::{
    Analyzer, AnalyzerConfig, AnalyzerError, AnalyzerListener, AnalyzerStats, ElementValidator,
    ListenerId, ValidatorChain,
};
