#![allow(missing_docs)]

use std::fs;
use std::path::Path;

use coati::storage::{
    snapshot, CollectionKind, CollectionLayout, Dir, EdgeFilter, GraphQuery, NodeFilter,
};
use coati::types::{DocId, GraphError};
use serde_json::json;
use tempfile::TempDir;

fn write_json(dir: &Path, name: &str, value: serde_json::Value) {
    fs::write(dir.join(name), serde_json::to_string_pretty(&value).unwrap()).unwrap();
}

fn export_dir() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    write_json(
        dir.path(),
        "docs.json",
        json!([{"_key": "d1", "_id": "docs/d1", "_rev": "_a", "title": "Auth"}]),
    );
    write_json(
        dir.path(),
        "sections.json",
        json!([{"_key": "s1", "title": "Login"}]),
    );
    fs::write(
        dir.path().join("atoms.jsonl"),
        concat!(
            "{\"_key\":\"a1\",\"status\":\"active\",\"content\":\"shall authenticate\"}\n",
            "\n",
            "{\"_key\":\"a2\",\"status\":\"proposal\",\"content\":\"shall authenticate twice\"}\n",
        ),
    )
    .unwrap();
    write_json(
        dir.path(),
        "structure_links.json",
        json!([
            {"_key": "e1", "_from": "docs/d1", "_to": "sections/s1", "type": "contains"},
            {"_key": "e2", "_from": "sections/s1", "_to": "atoms/a1", "type": "contains"}
        ]),
    );
    write_json(dir.path(), "revision_links.json", json!([]));
    write_json(
        dir.path(),
        "proposal_links.json",
        json!([{"_key": "p1", "_from": "atoms/a2", "_to": "atoms/a1"}]),
    );
    fs::write(dir.path().join("README.txt"), "not a collection").unwrap();
    dir
}

#[test]
fn loads_directory_of_json_and_jsonl_files() {
    let dir = export_dir();
    let graph = snapshot::load(dir.path(), &CollectionLayout::default()).expect("load");

    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_count(), 3);
    let kinds: Vec<(String, CollectionKind, usize)> = graph
        .collections()
        .into_iter()
        .map(|c| (c.name, c.kind, c.count))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("atoms".to_string(), CollectionKind::Document, 2),
            ("docs".to_string(), CollectionKind::Document, 1),
            ("proposal_links".to_string(), CollectionKind::Edge, 1),
            ("revision_links".to_string(), CollectionKind::Edge, 0),
            ("sections".to_string(), CollectionKind::Document, 1),
            ("structure_links".to_string(), CollectionKind::Edge, 2),
        ]
    );

    let a1 = DocId::new("atoms", "a1");
    let node = graph.node(&a1).unwrap().expect("a1 present");
    assert_eq!(node.status(), Some("active"));
    let parents = graph
        .adjacent(
            &a1,
            Dir::In,
            &EdgeFilter::collection("structure_links").of_type("contains"),
        )
        .unwrap();
    assert_eq!(parents.len(), 1);
    assert_eq!(parents[0].from, DocId::new("sections", "s1"));
    let proposals = graph
        .nodes(&NodeFilter::in_collection("atoms").with_status("proposal"))
        .unwrap();
    assert_eq!(proposals.len(), 1);
}

#[test]
fn loads_single_file_export() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("export.json");
    write_json(
        dir.path(),
        "export.json",
        json!({
            "atoms": [{"_key": "a1", "status": "active"}],
            "structure_links": [],
            "custom_links": []
        }),
    );
    let graph = snapshot::load(&path, &CollectionLayout::default()).expect("load");
    let kinds: Vec<(String, CollectionKind)> = graph
        .collections()
        .into_iter()
        .map(|c| (c.name, c.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("atoms".to_string(), CollectionKind::Document),
            ("custom_links".to_string(), CollectionKind::Document),
            ("structure_links".to_string(), CollectionKind::Edge),
        ]
    );
}

#[test]
fn empty_collections_follow_a_custom_layout() {
    let dir = TempDir::new().unwrap();
    write_json(dir.path(), "history.json", json!([]));
    let layout: CollectionLayout = toml::from_str("revisions = \"history\"").unwrap();
    let graph = snapshot::load(dir.path(), &layout).unwrap();
    assert_eq!(graph.collections()[0].kind, CollectionKind::Edge);
}

#[test]
fn malformed_document_names_file_and_position() {
    let dir = TempDir::new().unwrap();
    write_json(
        dir.path(),
        "structure_links.json",
        json!([
            {"_key": "e1", "_from": "sections/s1", "_to": "atoms/a1"},
            {"_key": "e2", "_from": "sections/s1", "_to": "not-an-id"}
        ]),
    );
    let err = snapshot::load(dir.path(), &CollectionLayout::default()).unwrap_err();
    match err {
        GraphError::Snapshot { path, message } => {
            assert!(path.ends_with("structure_links.json"));
            assert!(message.starts_with("structure_links[1]"), "{message}");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn invalid_json_line_is_reported() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("atoms.jsonl"), "{\"_key\":\"a1\"}\n{broken\n").unwrap();
    let err = snapshot::load(dir.path(), &CollectionLayout::default()).unwrap_err();
    assert!(
        matches!(&err, GraphError::Snapshot { message, .. } if message.starts_with("line 2")),
        "{err}"
    );
}

#[test]
fn duplicate_keys_are_rejected() {
    let dir = TempDir::new().unwrap();
    write_json(
        dir.path(),
        "atoms.json",
        json!([{"_key": "a1"}, {"_id": "atoms/a1"}]),
    );
    let err = snapshot::load(dir.path(), &CollectionLayout::default()).unwrap_err();
    assert!(err.to_string().contains("duplicate document atoms/a1"), "{err}");
}

#[test]
fn collection_exported_twice_is_rejected() {
    let dir = TempDir::new().unwrap();
    write_json(dir.path(), "atoms.json", json!([]));
    fs::write(dir.path().join("atoms.jsonl"), "").unwrap();
    let err = snapshot::load(dir.path(), &CollectionLayout::default()).unwrap_err();
    assert!(err.to_string().contains("more than once"), "{err}");
}

#[test]
fn single_file_must_be_an_object() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("export.json");
    fs::write(&path, "[1, 2, 3]").unwrap();
    let err = snapshot::load(&path, &CollectionLayout::default()).unwrap_err();
    assert!(matches!(err, GraphError::Snapshot { .. }));
}
