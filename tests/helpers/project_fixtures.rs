//! A small module/library model for analyzer tests.

use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};
use strata::{PlaceInStructure, ProblemDescription, ProblemsHolder, StrategyError, StructuralElement, UsageEdge};
use tokio::sync::Notify;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Module,
    Library,
}

/// Element identified by name. Kind and opt-in flag are payload.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub warn_if_unused: bool,
}

impl Node {
    pub fn module(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: NodeKind::Module,
            warn_if_unused: false,
        }
    }

    /// A library, reported when nothing depends on it.
    pub fn library(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: NodeKind::Library,
            warn_if_unused: true,
        }
    }

    pub fn without_unused_warning(mut self) -> Self {
        self.warn_if_unused = false;
        self
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl StructuralElement for Node {
    type Model = Project;

    fn id(&self) -> String {
        self.name.clone()
    }

    fn presentable_name(&self) -> String {
        self.name.clone()
    }

    fn type_name(&self) -> String {
        match self.kind {
            NodeKind::Module => String::from("Module"),
            NodeKind::Library => String::from("Library"),
        }
    }

    fn check(&self, model: &Project, problems: &mut ProblemsHolder<Self>) -> Result<(), StrategyError> {
        model.enter(&self.name)?;
        for message in model.errors.get(&self.name).into_iter().flatten() {
            problems.register_error(PlaceInStructure::new(self.clone()), message.clone());
        }
        for dep in model.deps.get(&self.name).into_iter().flatten() {
            if model.missing.contains(dep) {
                problems.register_problem(ProblemDescription::new(
                    format!("'{dep}' does not exist"),
                    PlaceInStructure::with_path(self.clone(), dep.clone()),
                    strata::ProblemType::error(strata::problems::types::INVALID_REFERENCE),
                ));
            }
        }
        Ok(())
    }

    fn usages_in_element(&self, model: &Project) -> Result<Vec<UsageEdge<Self>>, StrategyError> {
        if model.failing.contains(&self.name) {
            return Err(StrategyError::failed(format!("cannot read {}", self.name)));
        }
        Ok(model
            .deps
            .get(&self.name)
            .into_iter()
            .flatten()
            .map(|dep| {
                UsageEdge::new(Node::library(dep), self.clone(), dep.clone())
                    .with_location("dependencies")
            })
            .collect())
    }

    fn should_show_warning_if_unused(&self) -> bool {
        self.warn_if_unused
    }

    fn create_unused_element_warning(&self) -> Option<ProblemDescription<Self>> {
        self.warn_if_unused.then(|| ProblemDescription::unused(self))
    }
}

/// Blocks a strategy until the test opens it.
#[derive(Debug, Default)]
pub struct Gate {
    open: Mutex<bool>,
    opened: Condvar,
    /// Signalled when a strategy reaches the gate.
    pub entered: Notify,
}

impl Gate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn open(&self) {
        *self.open.lock() = true;
        self.opened.notify_all();
    }

    fn pass(&self) {
        self.entered.notify_one();
        let mut open = self.open.lock();
        while !*open {
            self.opened.wait(&mut open);
        }
    }
}

/// Host model: dependencies between nodes plus injected misbehaviour.
#[derive(Debug, Clone, Default)]
pub struct Project {
    pub deps: BTreeMap<String, Vec<String>>,
    pub errors: BTreeMap<String, Vec<String>>,
    /// Dependencies that point at nothing.
    pub missing: BTreeSet<String>,
    /// Nodes whose strategies return an error.
    pub failing: BTreeSet<String>,
    /// Nodes whose check panics.
    pub panicking: BTreeSet<String>,
    pub gates: BTreeMap<String, Arc<Gate>>,
}

impl Project {
    pub fn depend(&mut self, from: &str, on: &str) {
        self.deps.entry(from.to_string()).or_default().push(on.to_string());
    }

    pub fn error(&mut self, node: &str, message: &str) {
        self.errors.entry(node.to_string()).or_default().push(message.to_string());
    }

    fn enter(&self, node: &str) -> Result<(), StrategyError> {
        if let Some(gate) = self.gates.get(node) {
            gate.pass();
        }
        if self.panicking.contains(node) {
            panic!("check of {node} panicked");
        }
        if self.failing.contains(node) {
            return Err(StrategyError::failed(format!("cannot check {node}")));
        }
        Ok(())
    }
}
