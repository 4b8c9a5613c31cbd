//! Analyzer configuration

use std::time::Duration;

/// Settings for one analyzer session
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct AnalyzerConfig {
    /// Name used in log lines
    pub name: String,
    /// How long requests are buffered before dispatch, in milliseconds
    pub debounce_ms: u64,
    /// Push the flush deadline back on every new request (false = measure
    /// the window from the first buffered request)
    pub restart_timer_on_add: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            name: String::from("structure-analyzer"),
            debounce_ms: 300,
            restart_timer_on_add: false,
        }
    }
}

impl AnalyzerConfig {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    pub fn with_restart_timer_on_add(mut self, restart: bool) -> Self {
        self.restart_timer_on_add = restart;
        self
    }

    /// The debounce window
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
