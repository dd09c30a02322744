// End-to-end propagation scenarios over JSON project facts.

use throwtrace::domain::config::AnalysisConfig;
use throwtrace::domain::database::ProjectDatabase;
use throwtrace::domain::method::MethodSignature;
use throwtrace::infrastructure::{ClassDoc, ProjectLoader};

fn load(json: &str) -> ProjectDatabase<(), ClassDoc> {
    load_with(json, AnalysisConfig::default())
}

fn load_with(json: &str, config: AnalysisConfig) -> ProjectDatabase<(), ClassDoc> {
    let doc = serde_json::from_str(json).expect("scenario JSON");
    ProjectLoader::from_doc(doc, config)
}

fn sig(class: &str, name: &str) -> MethodSignature {
    MethodSignature::new(class, name, &[])
}

#[test]
fn leaf_throw_with_no_callers() {
    let db = load(
        r#"{
            "methods": [
                {"signature": {"class": "A", "name": "f"}, "throws_in_body": ["E"]}
            ]
        }"#,
    );
    let chains = db.chains_from_source(&sig("A", "f"));
    assert_eq!(chains.len(), 1);
    assert_eq!(chains[0].throw_from, sig("A", "f"));
    assert!(chains[0].chain.is_empty());
    assert_eq!(chains[0].exception, "E");
}

#[test]
fn one_caller_without_handlers_is_unhandled() {
    let db = load(
        r#"{
            "methods": [
                {"signature": {"class": "A", "name": "f"}, "throws_in_body": ["E"]},
                {"signature": {"class": "B", "name": "g"},
                 "calls": [{"class": "A", "name": "f"}]}
            ]
        }"#,
    );
    let chains = db.chains_from_source(&sig("A", "f"));
    assert_eq!(chains.len(), 1);
    assert_eq!(chains[0].chain.len(), 1);
    assert_eq!(chains[0].chain[0].method, sig("B", "g"));
    assert!(!chains[0].chain[0].handled);
}

#[test]
fn exact_catch_marks_the_step_handled() {
    let db = load(
        r#"{
            "methods": [
                {"signature": {"class": "A", "name": "f"}, "throws_in_body": ["E"]},
                {"signature": {"class": "B", "name": "g"},
                 "calls": [{"class": "A", "name": "f"}],
                 "handlers": [{"callee": {"class": "A", "name": "f"}, "catches": ["E"]}]}
            ],
            "classes": [{"name": "E"}]
        }"#,
    );
    let chains = db.chains_from_source(&sig("A", "f"));
    assert_eq!(chains.len(), 1);
    assert!(chains[0].chain[0].handled);
}

#[test]
fn supertype_catch_covers_derived_exception() {
    let db = load(
        r#"{
            "methods": [
                {"signature": {"class": "A", "name": "f"}, "throws_in_body": ["E1"]},
                {"signature": {"class": "B", "name": "g"},
                 "calls": [{"class": "A", "name": "f"}],
                 "handlers": [{"callee": {"class": "A", "name": "f"}, "catches": ["E0"]}]}
            ],
            "classes": [
                {"name": "E0"},
                {"name": "E1", "extends": "E0"}
            ]
        }"#,
    );
    let chains = db.chains_from_source(&sig("A", "f"));
    assert_eq!(chains.len(), 1);
    assert_eq!(chains[0].exception, "E1");
    assert!(chains[0].chain[0].handled);
}

#[test]
fn subtype_throw_is_not_covered_by_derived_catch() {
    // Catching E1 does not cover a thrown E0.
    let db = load(
        r#"{
            "methods": [
                {"signature": {"class": "A", "name": "f"}, "throws_in_body": ["E0"]},
                {"signature": {"class": "B", "name": "g"},
                 "calls": [{"class": "A", "name": "f"}],
                 "handlers": [{"callee": {"class": "A", "name": "f"}, "catches": ["E1"]}]}
            ],
            "classes": [
                {"name": "E0"},
                {"name": "E1", "extends": "E0"}
            ]
        }"#,
    );
    let chains = db.chains_from_source(&sig("A", "f"));
    assert!(!chains[0].chain[0].handled);
}

#[test]
fn override_dispatch_produces_chains_from_both_targets() {
    let doc = r#"{
        "methods": [
            {"signature": {"class": "A", "name": "f"}, "throws_in_body": ["E"]},
            {"signature": {"class": "C", "name": "f"}, "throws_in_body": ["E"]},
            {"signature": {"class": "D", "name": "call"},
             "calls": [{"class": "A", "name": "f"}],
             "handlers": [{"callee": {"class": "A", "name": "f"}, "catches": ["E"]}]}
        ],
        "classes": [
            {"name": "A", "methods": [{"class": "A", "name": "f"}]},
            {"name": "C", "extends": "A", "methods": [{"class": "C", "name": "f"}]},
            {"name": "E"}
        ]
    }"#;
    let db = load(doc);

    for source in [sig("A", "f"), sig("C", "f")] {
        let chains = db.chains_from_source(&source);
        assert_eq!(chains.len(), 1, "source {}", source);
        assert_eq!(chains[0].chain.len(), 1);
        assert_eq!(chains[0].chain[0].method, sig("D", "call"));
        // The catch around the written call site covers both runtime targets.
        assert!(chains[0].chain[0].handled, "source {}", source);
    }
}

#[test]
fn unknown_catch_class_defaults_to_handled() {
    let doc = r#"{
        "methods": [
            {"signature": {"class": "A", "name": "f"}, "throws_in_body": ["E"]},
            {"signature": {"class": "B", "name": "g"},
             "calls": [{"class": "A", "name": "f"}],
             "handlers": [{"callee": {"class": "A", "name": "f"}, "catches": ["X"]}]}
        ],
        "classes": [{"name": "E"}]
    }"#;

    let db = load(doc);
    assert!(db.chains_from_source(&sig("A", "f"))[0].chain[0].handled);

    // The opposite bias keeps the exception propagating.
    let strict = AnalysisConfig {
        unknown_class_handled: false,
        ..AnalysisConfig::default()
    };
    let db = load_with(doc, strict);
    assert!(!db.chains_from_source(&sig("A", "f"))[0].chain[0].handled);
}

#[test]
fn declared_and_body_exceptions_each_get_a_chain() {
    let db = load(
        r#"{
            "methods": [
                {"signature": {"class": "A", "name": "f", "throws": ["E1"]},
                 "throws_in_body": ["E2", "E1"]}
            ]
        }"#,
    );
    let chains = db.chains_from_source(&sig("A", "f").with_throws(&["E1"]));
    // Deduplicated union of declared and body exceptions, sorted.
    assert_eq!(chains.len(), 2);
    assert_eq!(chains[0].exception, "E1");
    assert_eq!(chains[1].exception, "E2");
}

#[test]
fn handler_on_a_different_callsite_does_not_apply() {
    // B.g catches around its call to A.h, not around A.f.
    let db = load(
        r#"{
            "methods": [
                {"signature": {"class": "A", "name": "f"}, "throws_in_body": ["E"]},
                {"signature": {"class": "A", "name": "h"}},
                {"signature": {"class": "B", "name": "g"},
                 "calls": [{"class": "A", "name": "f"}, {"class": "A", "name": "h"}],
                 "handlers": [{"callee": {"class": "A", "name": "h"}, "catches": ["E"]}]}
            ],
            "classes": [{"name": "E"}]
        }"#,
    );
    let chains = db.chains_from_source(&sig("A", "f"));
    assert!(!chains[0].chain[0].handled);
}

#[test]
fn multi_level_chain_reports_each_step() {
    let db = load(
        r#"{
            "methods": [
                {"signature": {"class": "A", "name": "f"}, "throws_in_body": ["E"]},
                {"signature": {"class": "B", "name": "g"},
                 "calls": [{"class": "A", "name": "f"}]},
                {"signature": {"class": "C", "name": "h"},
                 "calls": [{"class": "B", "name": "g"}],
                 "handlers": [{"callee": {"class": "B", "name": "g"}, "catches": ["E"]}]}
            ],
            "classes": [{"name": "E"}]
        }"#,
    );
    let chains = db.chains_from_source(&sig("A", "f"));
    assert_eq!(chains.len(), 1);
    let steps: Vec<(MethodSignature, bool)> = chains[0]
        .chain
        .iter()
        .map(|entry| (entry.method.clone(), entry.handled))
        .collect();
    assert_eq!(
        steps,
        vec![(sig("B", "g"), false), (sig("C", "h"), true)]
    );
}
