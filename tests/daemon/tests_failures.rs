//! A failing strategy only affects its own element.

use crate::helpers::analyzer_helpers::*;
use crate::helpers::project_fixtures::{Node, Project};

#[tokio::test]
async fn test_error_in_one_element_does_not_block_others() {
    let mut project = Project::default();
    project.failing.insert(String::from("bad"));
    project.error("good", "broken");
    let f = fixture(project);
    let (bad, good) = (Node::module("bad"), Node::module("good"));

    f.analyzer.queue_updates([bad.clone(), good.clone()]);
    f.analyzer.flush().await.unwrap();

    assert!(f.analyzer.problems(&bad).is_none());
    assert_eq!(messages(&f.analyzer, &good), vec!["broken"]);
}

#[tokio::test]
async fn test_panic_in_one_element_does_not_block_others() {
    let mut project = Project::default();
    project.panicking.insert(String::from("bad"));
    project.error("good", "broken");
    let f = fixture(project);
    let (bad, good) = (Node::module("bad"), Node::module("good"));

    f.analyzer.queue_updates([bad.clone(), good.clone()]);
    f.analyzer.flush().await.unwrap();

    assert!(f.analyzer.problems(&bad).is_none());
    assert_eq!(messages(&f.analyzer, &good), vec!["broken"]);
    assert_eq!(f.analyzer.stats().pending_usages, 0);
}

#[tokio::test]
async fn test_failure_keeps_previous_state() {
    let mut project = Project::default();
    project.error("app", "old problem");
    project.depend("app", "lib");
    let f = fixture(project);
    let app = Node::module("app");
    f.analyzer.queue_update(app.clone());
    f.analyzer.flush().await.unwrap();

    f.model.update(|project| {
        project.errors.clear();
        project.deps.clear();
        project.failing.insert(String::from("app"));
    });
    f.analyzer.queue_update(app.clone());
    f.analyzer.flush().await.unwrap();

    assert_eq!(messages(&f.analyzer, &app), vec!["old problem"]);
    assert_eq!(f.analyzer.usages(&Node::library("lib")).len(), 1);
}

#[tokio::test]
async fn test_analyzer_recovers_after_failure() {
    let mut project = Project::default();
    project.failing.insert(String::from("app"));
    let f = fixture(project);
    let app = Node::module("app");
    f.analyzer.queue_update(app.clone());
    f.analyzer.flush().await.unwrap();

    f.model.update(|project| {
        project.failing.clear();
        project.error("app", "now visible");
    });
    f.analyzer.queue_update(app.clone());
    f.analyzer.flush().await.unwrap();

    assert_eq!(messages(&f.analyzer, &app), vec!["now visible"]);
}
