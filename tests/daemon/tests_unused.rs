//! The unused-element fix-point.

use strata::ProblemSeverity;

use crate::helpers::analyzer_helpers::*;
use crate::helpers::project_fixtures::{Node, Project};

fn app_uses_lib() -> Project {
    let mut project = Project::default();
    project.depend("app", "lib");
    project
}

#[tokio::test]
async fn test_referenced_element_is_not_unused() {
    let f = fixture(app_uses_lib());
    let (app, lib) = (Node::module("app"), Node::library("lib"));

    f.analyzer.queue_updates([app, lib.clone()]);
    f.analyzer.flush().await.unwrap();

    assert!(!f.analyzer.is_unused(&lib));
    assert_eq!(unused_warnings(&f.analyzer, &lib), 0);
    assert_eq!(f.analyzer.usages(&lib).len(), 1);
}

#[tokio::test]
async fn test_dropping_last_reference_installs_one_warning() {
    let f = fixture(app_uses_lib());
    let (app, lib) = (Node::module("app"), Node::library("lib"));
    f.analyzer.queue_updates([app.clone(), lib.clone()]);
    f.analyzer.flush().await.unwrap();

    f.model.update(|project| project.deps.clear());
    f.analyzer.queue_update(app);
    f.analyzer.flush().await.unwrap();

    assert!(f.analyzer.is_unused(&lib));
    assert_eq!(unused_warnings(&f.analyzer, &lib), 1);
    assert_eq!(messages(&f.analyzer, &lib), vec!["Library 'lib' is not used"]);
    assert_eq!(f.analyzer.severity(&lib), Some(ProblemSeverity::Warning));

    f.analyzer.queue_update(Node::module("app"));
    f.analyzer.flush().await.unwrap();
    assert_eq!(unused_warnings(&f.analyzer, &lib), 1, "warning is never duplicated");
}

#[tokio::test]
async fn test_new_reference_retracts_warning() {
    let f = fixture(Project::default());
    let lib = Node::library("lib");
    f.analyzer.queue_update(lib.clone());
    f.analyzer.flush().await.unwrap();
    assert!(f.analyzer.is_unused(&lib));

    f.model.update(|project| project.depend("app", "lib"));
    f.analyzer.queue_update(Node::module("app"));
    f.analyzer.flush().await.unwrap();

    assert!(!f.analyzer.is_unused(&lib));
    assert_eq!(f.analyzer.severity(&lib), None);
}

#[tokio::test]
async fn test_opting_out_removes_warning() {
    let f = fixture(Project::default());
    let lib = Node::library("lib");
    f.analyzer.queue_update(lib.clone());
    f.analyzer.flush().await.unwrap();
    assert_eq!(f.analyzer.stats().unused_warnings, 1);

    f.analyzer.queue_update(lib.clone().without_unused_warning());
    f.analyzer.flush().await.unwrap();

    assert!(!f.analyzer.is_unused(&lib));
    assert_eq!(unused_warnings(&f.analyzer, &lib), 0);
    assert_eq!(f.analyzer.stats().unused_warnings, 0);
}

#[tokio::test]
async fn test_check_keeps_unused_warning() {
    let f = fixture(Project::default());
    let lib = Node::library("lib");
    f.analyzer.queue_update(lib.clone());
    f.analyzer.flush().await.unwrap();

    f.model.update(|project| project.error("lib", "bad jar"));
    f.analyzer.queue_update_with(lib.clone(), true, false);
    f.analyzer.flush().await.unwrap();

    assert_eq!(unused_warnings(&f.analyzer, &lib), 1);
    assert_eq!(f.analyzer.severity(&lib), Some(ProblemSeverity::Error));
    let tooltip = f.analyzer.problems(&lib).unwrap().compose_tooltip_message();
    assert_eq!(tooltip, "bad jar\nLibrary 'lib' is not used");
}

#[tokio::test]
async fn test_unused_pass_waits_for_every_collection() {
    let f = fixture(app_uses_lib());
    let (app, lib) = (Node::module("app"), Node::library("lib"));

    // lib alone looks unused, but app's collection is still buffered.
    f.analyzer.queue_update(lib.clone());
    f.analyzer.queue_update(app);
    f.analyzer.flush().await.unwrap();

    assert!(!f.analyzer.is_unused(&lib));
}

#[tokio::test]
async fn test_failed_collection_does_not_block_unused_pass() {
    let mut project = Project::default();
    project.failing.insert(String::from("app"));
    let f = fixture(project);
    let lib = Node::library("lib");

    f.analyzer.queue_updates([Node::module("app"), lib.clone()]);
    f.analyzer.flush().await.unwrap();

    assert_eq!(f.analyzer.stats().pending_usages, 0);
    assert!(f.analyzer.is_unused(&lib));
}
