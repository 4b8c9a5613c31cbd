//! Daemon - the asynchronous analyzer.
//!
//! ## Architecture
//!
//! ```text
//! Analyzer (handle) ──commands──▶ serialization task ──jobs──▶ blocking workers
//!        ▲                          │  owns UpdateQueue               │
//!        └──── reads (RwLock) ──────┤  sole writer of AnalyzerState   │
//!                                   ◀────────── outcomes ─────────────┘
//! ```
//!
//! ## Key Types
//!
//! - [`Analyzer`] - handle used to queue updates and read results
//! - [`AnalyzerConfig`] - debounce window and naming
//! - [`UpdateQueue`] - debounced, coalescing request buffer
//! - [`ElementValidator`], [`ValidatorChain`] - host overrides for strategies
//! - [`AnalyzerListener`] - notified when an element's problems may have changed

mod analyzer;
mod config;
mod dispatcher;
mod error;
mod listener;
mod queue;
mod state;
mod strategy;
mod worker;

pub use analyzer::{Analyzer, AnalyzerStats};
pub use config::AnalyzerConfig;
pub use error::AnalyzerError;
pub use listener::{AnalyzerListener, ListenerId};
pub use queue::{Coalesced, UpdateQueue, UpdateRequest};
pub use strategy::{ElementValidator, ValidatorChain};
