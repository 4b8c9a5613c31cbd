//! Ignored-problem settings.

use parking_lot::RwLock;
use rustc_hash::FxHashSet;

/// Decides whether a problem is hidden from the user.
///
/// Keyed by [`ProblemDescription::id`](super::ProblemDescription::id). The
/// analyzer itself never filters; presentation code does, and calls
/// `queue_update_for_all_elements_with_errors` after the set changes.
pub trait ProblemsSettings: Send + Sync {
    fn is_ignored(&self, problem_id: &str) -> bool;

    fn set_ignored(&self, problem_id: &str, ignored: bool);
}

/// In-memory ignore list for one session.
#[derive(Debug, Default)]
pub struct IgnoredProblems {
    ids: RwLock<FxHashSet<String>>,
}

impl IgnoredProblems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of ignored ids, sorted.
    pub fn ignored_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.ids.read().iter().cloned().collect();
        ids.sort();
        ids
    }
}

impl ProblemsSettings for IgnoredProblems {
    fn is_ignored(&self, problem_id: &str) -> bool {
        self.ids.read().contains(problem_id)
    }

    fn set_ignored(&self, problem_id: &str, ignored: bool) {
        let mut ids = self.ids.write();
        if ignored {
            ids.insert(problem_id.to_string());
        } else {
            ids.remove(problem_id);
        }
    }
}
