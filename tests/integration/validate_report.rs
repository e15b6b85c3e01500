#![allow(missing_docs)]

use coati::storage::{Edge, MemoryGraph, Node};
use coati::types::DocId;
use coati::validate::{validate, Report, Severity, ValidateOptions};
use proptest::prelude::*;
use serde_json::{json, Value};

fn id(raw: &str) -> DocId {
    DocId::parse(raw).expect("valid id")
}

fn atom(key: &str, status: &str, content: &str) -> Node {
    Node::new(id(&format!("atoms/{key}")))
        .with_status(status)
        .with_field("content", content)
}

fn edge(collection: &str, key: &str, from: &str, to: &str) -> Edge {
    Edge::new(id(&format!("{collection}/{key}")), id(from), id(to))
}

fn contains(key: &str, from: &str, to: &str) -> Edge {
    edge("structure_links", key, from, to).with_type("contains")
}

fn healthy_graph() -> MemoryGraph {
    MemoryGraph::builder()
        .node(Node::new(id("docs/d1")).with_field("title", "Auth"))
        .node(Node::new(id("sections/s1")).with_field("title", "Login"))
        .node(atom("a1", "active", "The system shall lock accounts after 5 failures"))
        .node(atom("a0", "archived", "The system shall lock accounts after 3 failures"))
        .node(atom("p1", "proposal", "The system shall lock accounts after 10 failures"))
        .edge(contains("e1", "docs/d1", "sections/s1"))
        .edge(contains("e2", "sections/s1", "atoms/a1"))
        .edge(edge("revision_links", "r1", "atoms/a0", "atoms/a1"))
        .edge(edge("proposal_links", "pl1", "atoms/p1", "atoms/a1"))
        .build()
}

fn broken_graph() -> MemoryGraph {
    MemoryGraph::builder()
        .node(Node::new(id("docs/d1")))
        .node(
            Node::new(id("sections/s1"))
                .with_field("title", "Login")
                .with_field("parent_doc_id", "docs/d1"),
        )
        .node(Node::new(id("sections/s2")).with_field("title", "Logout"))
        .node(atom("a1", "active", "The system shall authenticate users"))
        .node(atom("a2", "active", "The system shall log every failed attempt"))
        .node(atom("a3", "archived", "old"))
        .node(atom("a4", "archived", "older"))
        .edge(contains("e1", "sections/s1", "atoms/a1"))
        .edge(contains("e2", "sections/s2", "atoms/a1"))
        .edge(contains("e3", "docs/d1", "atoms/a3"))
        .edge(edge("revision_links", "r1", "atoms/a3", "atoms/a4"))
        .edge(edge("revision_links", "r2", "atoms/a4", "atoms/a3"))
        .edge(edge("proposal_links", "pl1", "atoms/a3", "atoms/a1"))
        .build()
}

fn report_json(report: &Report) -> Value {
    let mut value = serde_json::to_value(report).expect("serialize report");
    value
        .as_object_mut()
        .expect("report object")
        .remove("timestamp");
    value
}

#[test]
fn healthy_graph_is_ok() {
    let report = validate(&healthy_graph(), &ValidateOptions::default()).expect("validate");
    assert!(report.ok);
    assert_eq!(
        report_json(&report),
        json!({"ok": true, "totalIssues": 0, "categoriesWithIssues": 0, "issues": []})
    );
}

#[test]
fn broken_graph_report_matches_golden_json() {
    let report = validate(&broken_graph(), &ValidateOptions::default()).expect("validate");
    assert_eq!(
        report_json(&report),
        json!({
            "ok": false,
            "totalIssues": 8,
            "categoriesWithIssues": 6,
            "issues": [
                {
                    "category": "Single Parent Invariant",
                    "count": 1,
                    "severity": "critical",
                    "items": [{
                        "atom_id": "a1",
                        "atom_content_preview": "The system shall authenticate users",
                        "parents_count": 2,
                        "issue": "Multiple parents detected - violates Single Parent Invariant"
                    }]
                },
                {
                    "category": "Orphaned Nodes",
                    "count": 1,
                    "severity": "warning",
                    "items": [{
                        "atom_id": "a2",
                        "atom_content_preview": "The system shall log every failed attempt",
                        "status": "active",
                        "issue": "Orphaned active atom - no incoming structure links"
                    }]
                },
                {
                    "category": "Illegal Links",
                    "count": 1,
                    "severity": "critical",
                    "items": [{
                        "edge_id": "e3",
                        "from": "docs/d1",
                        "to": "atoms/a3",
                        "issue": "Illegal direct link from docs to atoms - must go through sections"
                    }]
                },
                {
                    "category": "Revision Cycles",
                    "count": 2,
                    "severity": "critical",
                    "items": [
                        {"atom_id": "a3", "cycle_length": 2, "issue": "Cycle detected in revision_links"},
                        {"atom_id": "a4", "cycle_length": 2, "issue": "Cycle detected in revision_links"}
                    ]
                },
                {
                    "category": "Proposal Links",
                    "count": 1,
                    "severity": "warning",
                    "items": [{
                        "edge_id": "pl1",
                        "from": "atoms/a3",
                        "from_status": "archived",
                        "to": "atoms/a1",
                        "to_status": "active",
                        "issue": "Invalid proposal_link - source must be 'proposal', target must be 'active'"
                    }]
                },
                {
                    "category": "Schema v2.1 Compliance",
                    "count": 1,
                    "severity": "warning",
                    "items": [{
                        "section_id": "s1",
                        "section_title": "Login",
                        "parent_doc_id": "docs/d1",
                        "issue": "parent_doc_id field found - should be removed in v2.1"
                    }]
                }
            ]
        })
    );
    assert_eq!(report.category("Illegal Links").map(|r| r.severity), Some(Severity::Critical));
}

#[test]
fn timestamp_is_rfc3339() {
    let report = validate(&healthy_graph(), &ValidateOptions::default()).expect("validate");
    let value = serde_json::to_value(&report).expect("serialize");
    let raw = value["timestamp"].as_str().expect("timestamp string");
    time::OffsetDateTime::parse(raw, &time::format_description::well_known::Rfc3339)
        .expect("rfc3339 timestamp");
}

#[derive(Debug, Clone)]
enum Fact {
    Atom { key: u8, status: u8 },
    Contains { from: u8, to: u8, from_doc: bool },
    Revision { from: u8, to: u8 },
    Proposal { from: u8, to: u8 },
    LegacySection { key: u8 },
}

fn arb_fact() -> impl Strategy<Value = Fact> {
    prop_oneof![
        (0u8..12, 0u8..3).prop_map(|(key, status)| Fact::Atom { key, status }),
        (0u8..4, 0u8..12, any::<bool>())
            .prop_map(|(from, to, from_doc)| Fact::Contains { from, to, from_doc }),
        (0u8..12, 0u8..12).prop_map(|(from, to)| Fact::Revision { from, to }),
        (0u8..12, 0u8..12).prop_map(|(from, to)| Fact::Proposal { from, to }),
        (0u8..4).prop_map(|key| Fact::LegacySection { key }),
    ]
}

fn build(facts: &[Fact]) -> MemoryGraph {
    const STATUSES: [&str; 3] = ["active", "proposal", "archived"];
    let mut builder = MemoryGraph::builder();
    for (n, fact) in facts.iter().enumerate() {
        builder = match fact {
            Fact::Atom { key, status } => {
                builder.node(atom(&format!("a{key}"), STATUSES[*status as usize], "text"))
            }
            Fact::Contains { from, to, from_doc } => {
                let parent = if *from_doc {
                    format!("docs/d{from}")
                } else {
                    format!("sections/s{from}")
                };
                builder.edge(contains(&format!("e{n}"), &parent, &format!("atoms/a{to}")))
            }
            Fact::Revision { from, to } => builder.edge(edge(
                "revision_links",
                &format!("r{n}"),
                &format!("atoms/a{from}"),
                &format!("atoms/a{to}"),
            )),
            Fact::Proposal { from, to } => builder.edge(edge(
                "proposal_links",
                &format!("p{n}"),
                &format!("atoms/a{from}"),
                &format!("atoms/a{to}"),
            )),
            Fact::LegacySection { key } => builder.node(
                Node::new(id(&format!("sections/s{key}"))).with_field("parent_doc_id", "docs/d0"),
            ),
        };
    }
    builder.build()
}

proptest! {
    #[test]
    fn prop_validation_is_idempotent(facts in prop::collection::vec(arb_fact(), 0..60)) {
        let graph = build(&facts);
        let first = validate(&graph, &ValidateOptions::default()).unwrap();
        let second = validate(&graph, &ValidateOptions::default()).unwrap();
        prop_assert_eq!(report_json(&first), report_json(&second));
    }

    #[test]
    fn prop_parallel_matches_sequential(facts in prop::collection::vec(arb_fact(), 0..60)) {
        let graph = build(&facts);
        let sequential = validate(&graph, &ValidateOptions::default()).unwrap();
        let parallel = validate(&graph, &ValidateOptions::parallel()).unwrap();
        prop_assert_eq!(&sequential.issues, &parallel.issues);
    }

    #[test]
    fn prop_report_aggregates_are_consistent(facts in prop::collection::vec(arb_fact(), 0..60)) {
        let report = validate(&build(&facts), &ValidateOptions::default()).unwrap();
        prop_assert_eq!(report.ok, report.issues.is_empty());
        prop_assert_eq!(report.categories_with_issues, report.issues.len());
        prop_assert_eq!(report.total_issues, report.issues.iter().map(|r| r.count).sum::<usize>());
        for result in &report.issues {
            prop_assert!(result.count > 0);
            prop_assert_eq!(result.count, result.items.len());
        }
    }
}
