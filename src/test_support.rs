//! Minimal element type for unit tests.

use std::hash::{Hash, Hasher};

use crate::base::{StrategyError, StructuralElement, UsageEdge};
use crate::problems::{ProblemDescription, ProblemsHolder};

/// Element identified by name; `warn` is payload and does not affect identity.
#[derive(Debug, Clone)]
pub(crate) struct Unit {
    name: String,
    warn: bool,
}

impl Unit {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            warn: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn warn_if_unused(mut self) -> Self {
        self.warn = true;
        self
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Unit {}

impl Hash for Unit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl StructuralElement for Unit {
    type Model = ();

    fn id(&self) -> String {
        self.name.clone()
    }

    fn presentable_name(&self) -> String {
        self.name.clone()
    }

    fn type_name(&self) -> String {
        String::from("Unit")
    }

    fn check(&self, _model: &(), _problems: &mut ProblemsHolder<Self>) -> Result<(), StrategyError> {
        Ok(())
    }

    fn usages_in_element(&self, _model: &()) -> Result<Vec<UsageEdge<Self>>, StrategyError> {
        Ok(Vec::new())
    }

    fn should_show_warning_if_unused(&self) -> bool {
        self.warn
    }

    fn create_unused_element_warning(&self) -> Option<ProblemDescription<Self>> {
        self.warn.then(|| ProblemDescription::unused(self))
    }
}
