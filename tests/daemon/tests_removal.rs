//! Element removal.

use crate::helpers::analyzer_helpers::*;
use crate::helpers::project_fixtures::{Node, Project};

#[tokio::test]
async fn test_removal_forgets_element() {
    let mut project = Project::default();
    project.error("app", "broken");
    project.depend("app", "lib");
    let f = fixture(project);
    let app = Node::module("app");
    f.analyzer.queue_update(app.clone());
    f.analyzer.flush().await.unwrap();

    f.analyzer.remove_element(app.clone());
    f.analyzer.flush().await.unwrap();

    assert!(f.analyzer.problems(&app).is_none());
    assert!(f.analyzer.usages(&Node::library("lib")).is_empty());
    assert_eq!(f.analyzer.stats().edges, 0);
}

#[tokio::test]
async fn test_removing_last_user_makes_library_unused() {
    let mut project = Project::default();
    project.depend("app", "lib");
    let f = fixture(project);
    let (app, lib) = (Node::module("app"), Node::library("lib"));
    f.analyzer.queue_updates([app.clone(), lib.clone()]);
    f.analyzer.flush().await.unwrap();
    assert!(!f.analyzer.is_unused(&lib));

    let events = recording_listener(&f.analyzer);
    f.analyzer.remove_element(app);
    f.analyzer.flush().await.unwrap();

    assert!(f.analyzer.is_unused(&lib));
    assert!(events.lock().contains(&String::from("lib")));
}

#[tokio::test]
async fn test_removal_drops_buffered_request() {
    let mut project = Project::default();
    project.error("app", "broken");
    let f = fixture(project);
    let app = Node::module("app");

    f.analyzer.queue_update(app.clone());
    f.analyzer.remove_element(app.clone());
    f.analyzer.flush().await.unwrap();

    assert!(f.calls.calls().is_empty());
    assert!(f.analyzer.problems(&app).is_none());
    assert_eq!(f.analyzer.stats().pending_usages, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_removal_discards_in_flight_result() {
    let gate = crate::helpers::project_fixtures::Gate::new();
    let mut project = Project::default();
    project.error("app", "broken");
    project.gates.insert(String::from("app"), gate.clone());
    let f = fixture_with(project, strata::AnalyzerConfig::default().with_debounce_ms(1));
    let app = Node::module("app");

    f.analyzer.queue_update(app.clone());
    gate.entered.notified().await;
    f.analyzer.remove_element(app.clone());
    gate.open();
    f.analyzer.flush().await.unwrap();

    assert!(f.analyzer.problems(&app).is_none());
}

#[tokio::test]
async fn test_removed_element_can_come_back() {
    let mut project = Project::default();
    project.error("app", "broken");
    let f = fixture(project);
    let app = Node::module("app");

    f.analyzer.remove_elements([app.clone()]);
    f.analyzer.queue_update(app.clone());
    f.analyzer.flush().await.unwrap();

    assert_eq!(messages(&f.analyzer, &app), vec!["broken"]);
}
