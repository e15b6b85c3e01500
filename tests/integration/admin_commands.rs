#![allow(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};

use coati::admin::{self, AdminError, AdminOpenOptions};
use coati::storage::CollectionKind;
use coati::validate::{CancelToken, ValidateError, ValidateOptions};
use serde_json::json;
use tempfile::TempDir;

fn write_json(dir: &Path, name: &str, value: serde_json::Value) {
    fs::write(dir.join(name), serde_json::to_string(&value).unwrap()).unwrap();
}

fn setup_snapshot(broken: bool) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("export");
    fs::create_dir(&path).unwrap();
    write_json(&path, "docs.json", json!([{"_key": "d1"}]));
    write_json(&path, "sections.json", json!([{"_key": "s1", "title": "Login"}]));
    write_json(
        &path,
        "atoms.json",
        json!([
            {"_key": "a1", "status": "active", "content": "shall authenticate"},
            {"_key": "a2", "status": "active", "content": "shall log"}
        ]),
    );
    let mut structure = vec![
        json!({"_key": "e1", "_from": "docs/d1", "_to": "sections/s1", "type": "contains"}),
        json!({"_key": "e2", "_from": "sections/s1", "_to": "atoms/a1", "type": "contains"}),
        json!({"_key": "e3", "_from": "sections/s1", "_to": "atoms/a2", "type": "contains"}),
    ];
    if broken {
        structure.push(json!({"_key": "e4", "_from": "docs/d1", "_to": "atoms/a2", "type": "contains"}));
    }
    write_json(&path, "structure_links.json", json!(structure));
    write_json(&path, "revision_links.json", json!([]));
    write_json(&path, "proposal_links.json", json!([]));
    (dir, path)
}

#[test]
fn validate_clean_snapshot() {
    let (_dir, path) = setup_snapshot(false);
    let report = admin::validate(&path, &AdminOpenOptions::default(), &ValidateOptions::default())
        .expect("validate");
    assert!(report.ok);
    assert_eq!(report.total_issues, 0);
}

#[test]
fn validate_broken_snapshot_reports_layering_and_parents() {
    let (_dir, path) = setup_snapshot(true);
    let report = admin::validate(&path, &AdminOpenOptions::default(), &ValidateOptions::parallel())
        .expect("validate");
    assert!(!report.ok);
    let categories: Vec<&str> = report.issues.iter().map(|r| r.category.as_str()).collect();
    assert_eq!(categories, vec!["Single Parent Invariant", "Illegal Links"]);
    assert_eq!(report.total_issues, 2);
}

#[test]
fn stats_counts_collections() {
    let (_dir, path) = setup_snapshot(false);
    let report = admin::stats(&path, &AdminOpenOptions::default()).expect("stats");
    assert_eq!(report.total_collections, 6);
    assert_eq!(report.document_collections, 3);
    assert_eq!(report.edge_collections, 3);
    assert_eq!(report.total_documents, 7);
    let revision = report
        .collections
        .iter()
        .find(|c| c.name == "revision_links")
        .expect("revision_links listed");
    assert_eq!(revision.kind, CollectionKind::Edge);
    assert_eq!(revision.count, 0);
}

#[test]
fn collections_are_sorted_by_name() {
    let (_dir, path) = setup_snapshot(false);
    let names: Vec<String> = admin::collections(&path, &AdminOpenOptions::default())
        .expect("collections")
        .into_iter()
        .map(|c| c.name)
        .collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert_eq!(names.first().map(String::as_str), Some("atoms"));
}

#[test]
fn missing_snapshot_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nowhere");
    let err = admin::stats(&path, &AdminOpenOptions::default()).unwrap_err();
    assert!(matches!(err, AdminError::MissingSnapshot(_)));

    let opts = AdminOpenOptions {
        empty_if_missing: true,
        ..AdminOpenOptions::default()
    };
    let report = admin::validate(&path, &opts, &ValidateOptions::default()).expect("validate");
    assert!(report.ok);
}

#[test]
fn cancelled_validation_returns_no_report() {
    let (_dir, path) = setup_snapshot(true);
    let cancel = CancelToken::new();
    cancel.cancel();
    let err = admin::validate_with_cancel(
        &path,
        &AdminOpenOptions::default(),
        &ValidateOptions::default(),
        &cancel,
    )
    .unwrap_err();
    assert!(matches!(err, AdminError::Validate(ValidateError::Cancelled)));
}
