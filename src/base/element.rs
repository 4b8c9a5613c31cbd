//! The structural element abstraction.

use std::fmt::Debug;
use std::hash::Hash;

use crate::problems::{ProblemDescription, ProblemsHolder};

use super::{StrategyError, UsageEdge};

/// One configurable unit of the host model (a module, a library, an SDK...).
///
/// The analyzer never interprets an element's payload. It relies on `Eq` and
/// `Hash` for identity, so two values describing the same unit must compare
/// equal even when they were built from different model versions.
///
/// `check` and `usages_in_element` are the element's own default behaviour;
/// registered [`ElementValidator`](crate::daemon::ElementValidator)s are
/// consulted first. Both run on worker threads against a snapshot of
/// [`Self::Model`] and must not mutate the model.
pub trait StructuralElement: Clone + Eq + Hash + Debug + Send + Sync + 'static {
    /// Read-consistent view of the host model handed to strategies.
    type Model: Send + Sync + 'static;

    /// Stable identifier, used in problem ids.
    fn id(&self) -> String;

    /// Human-readable name.
    fn presentable_name(&self) -> String;

    /// Human-readable kind ("Module", "Library", ...).
    fn type_name(&self) -> String;

    /// Fill `problems` with everything currently wrong with this element.
    fn check(
        &self,
        model: &Self::Model,
        problems: &mut ProblemsHolder<Self>,
    ) -> Result<(), StrategyError>;

    /// Collect the outgoing usage edges of this element.
    ///
    /// Every returned edge must have `containing == self`.
    fn usages_in_element(&self, model: &Self::Model) -> Result<Vec<UsageEdge<Self>>, StrategyError>;

    /// Whether an UNUSED problem should be reported when nothing references this element.
    fn should_show_warning_if_unused(&self) -> bool {
        false
    }

    /// Build the UNUSED problem reported for this element.
    fn create_unused_element_warning(&self) -> Option<ProblemDescription<Self>> {
        None
    }
}
