//! Validator chain consulted before an element's own behaviour.

use std::sync::Arc;

use crate::base::{StrategyError, StructuralElement, UsageEdge};
use crate::problems::{ProblemDescription, ProblemsHolder};

/// Host-supplied override for checking elements and collecting their usages.
///
/// Every method has a "not handled" default, so a validator only implements
/// the parts it cares about.
pub trait ElementValidator<E: StructuralElement>: Send + Sync {
    /// Check `element`. Return `Ok(true)` when handled; later validators and
    /// the element's own check are then skipped.
    fn check(
        &self,
        _element: &E,
        _model: &E::Model,
        _problems: &mut ProblemsHolder<E>,
    ) -> Result<bool, StrategyError> {
        Ok(false)
    }

    /// Collect outgoing usages of `element`, or `None` to defer.
    fn collect_usages(
        &self,
        _element: &E,
        _model: &E::Model,
    ) -> Result<Option<Vec<UsageEdge<E>>>, StrategyError> {
        Ok(None)
    }

    /// Build the UNUSED warning for `element`, or `None` to defer.
    fn create_unused_element_warning(&self, _element: &E) -> Option<ProblemDescription<E>> {
        None
    }
}

/// Validators in registration order; the first one that answers wins.
pub struct ValidatorChain<E: StructuralElement> {
    validators: Vec<Arc<dyn ElementValidator<E>>>,
}

impl<E: StructuralElement> Default for ValidatorChain<E> {
    fn default() -> Self {
        Self {
            validators: Vec::new(),
        }
    }
}

impl<E: StructuralElement> ValidatorChain<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, validator: Arc<dyn ElementValidator<E>>) {
        self.validators.push(validator);
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn check(
        &self,
        element: &E,
        model: &E::Model,
        problems: &mut ProblemsHolder<E>,
    ) -> Result<(), StrategyError> {
        for validator in &self.validators {
            if validator.check(element, model, problems)? {
                return Ok(());
            }
        }
        element.check(model, problems)
    }

    pub fn collect_usages(
        &self,
        element: &E,
        model: &E::Model,
    ) -> Result<Vec<UsageEdge<E>>, StrategyError> {
        for validator in &self.validators {
            if let Some(usages) = validator.collect_usages(element, model)? {
                return Ok(usages);
            }
        }
        element.usages_in_element(model)
    }

    pub fn create_unused_element_warning(&self, element: &E) -> Option<ProblemDescription<E>> {
        self.validators
            .iter()
            .find_map(|validator| validator.create_unused_element_warning(element))
            .or_else(|| element.create_unused_element_warning())
    }
}
