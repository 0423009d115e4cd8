//! End-to-end fuzzy query scenarios over a loaded store.

use std::sync::Arc;

use symdex::{
    AggregatedLoader, Element, FieldRecord, FuzzyQuery, MethodRecord, Parameter, QualifiedName,
    ResultKind, StoreId, TantivyStore, TypeKind, TypeRecord,
};
use tempfile::TempDir;

fn type_record(name: &str, kind: TypeKind, members: &[&str]) -> Element {
    Element::Type(TypeRecord {
        name: QualifiedName::new(name),
        modifiers: vec!["public".into()],
        kind,
        members: members.iter().map(|it| QualifiedName::new(*it)).collect(),
        super_class: None,
        super_interfaces: Vec::new(),
        doc: None,
    })
}

fn method(name: &str, parameters: &[(&str, &str)], return_type: &str) -> Element {
    Element::Method(MethodRecord {
        name: QualifiedName::new(name),
        modifiers: vec!["public".into()],
        return_type: QualifiedName::new(return_type),
        parameters: parameters
            .iter()
            .map(|(ty, param)| Parameter::new(QualifiedName::new(*ty), *param))
            .collect(),
        thrown_types: Vec::new(),
        doc: None,
    })
}

fn corpus() -> Vec<Element> {
    vec![
        type_record(
            "java.lang.String",
            TypeKind::Class,
            &[
                "java.lang.String#<init>(char[])",
                "java.lang.String#length()",
                "java.lang.String#charAt(int)",
                "java.lang.String#codePointCount(int,int)",
                "java.lang.String#contains(java.lang.CharSequence)",
                "java.lang.String#CASE_INSENSITIVE_ORDER",
            ],
        ),
        type_record("java.util.List", TypeKind::Interface, &[]),
        type_record("java.awt.List", TypeKind::Class, &[]),
        method("java.lang.String#<init>(char[])", &[("char[]", "value")], "void"),
        method("java.lang.String#length()", &[], "int"),
        method("java.lang.String#charAt(int)", &[("int", "index")], "char"),
        method(
            "java.lang.String#codePointCount(int,int)",
            &[("int", "beginIndex"), ("int", "endIndex")],
            "int",
        ),
        method(
            "java.lang.String#contains(java.lang.CharSequence)",
            &[("java.lang.CharSequence", "s")],
            "boolean",
        ),
        Element::Field(FieldRecord {
            name: QualifiedName::new("java.lang.String#CASE_INSENSITIVE_ORDER"),
            modifiers: vec!["public".into(), "static".into(), "final".into()],
            ty: QualifiedName::new("java.util.Comparator"),
            doc: None,
        }),
    ]
}

fn loaded() -> (TempDir, AggregatedLoader) {
    let dir = TempDir::new().unwrap();
    let store = TantivyStore::open(dir.path(), StoreId::new(1).unwrap()).unwrap();
    store.add_all(&corpus()).unwrap();
    (dir, AggregatedLoader::single(Arc::new(store)))
}

#[test]
fn round_trip_query_hits_the_native_tier() {
    let (_dir, loader) = loaded();
    let results = FuzzyQuery::new()
        .query(&loader, "String#codePointCount(int,int)")
        .unwrap();

    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert_eq!(result.name.as_str(), "java.lang.String#codePointCount(int,int)");
    assert_eq!(result.kind, ResultKind::Method);
    assert!(result.exact);
    assert!(result.exact_case_sensitive);
}

#[test]
fn case_folded_query_hits_only_the_normalized_tier() {
    let (_dir, loader) = loaded();
    let results = FuzzyQuery::new()
        .query(&loader, "string#codepointcount(int,int)")
        .unwrap();

    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert_eq!(result.name.as_str(), "java.lang.String#codePointCount(int,int)");
    assert!(result.exact);
    assert!(!result.exact_case_sensitive);
}

#[test]
fn member_only_query_matches_any_owner() {
    let (_dir, loader) = loaded();
    let results = FuzzyQuery::new().query(&loader, "#charAt").unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name.as_str(), "java.lang.String#charAt(int)");
    assert_eq!(results[0].kind, ResultKind::Method);
}

#[test]
fn member_only_field_query() {
    let (_dir, loader) = loaded();
    let results = FuzzyQuery::new()
        .query(&loader, "#CASE_INSENSITIVE_ORDER")
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].kind, ResultKind::Field);
}

#[test]
fn member_only_query_with_parens_restricts_to_methods() {
    let (_dir, loader) = loaded();
    let results = FuzzyQuery::new().query(&loader, "#length()").unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name.as_str(), "java.lang.String#length()");
    assert_eq!(results[0].kind, ResultKind::Method);
    assert!(results[0].exact);
}

#[test]
fn parameter_prefix_matches_but_is_not_exact() {
    let (_dir, loader) = loaded();
    let results = FuzzyQuery::new()
        .query(&loader, "String#codePointCount(int)")
        .unwrap();

    assert_eq!(results.len(), 1);
    assert!(!results[0].exact);
    assert!(!results[0].exact_case_sensitive);
}

#[test]
fn too_many_parameters_match_nothing() {
    let (_dir, loader) = loaded();
    let results = FuzzyQuery::new()
        .query(&loader, "String#charAt(int,int)")
        .unwrap();
    assert!(results.is_empty());
}

#[test]
fn parameter_type_tail_fragment_is_exact() {
    let (_dir, loader) = loaded();
    let results = FuzzyQuery::new()
        .query(&loader, "String#contains(CharSequence)")
        .unwrap();

    assert_eq!(results.len(), 1);
    assert!(results[0].exact);
    assert!(results[0].exact_case_sensitive);
}

#[test]
fn constructor_shorthand_finds_the_stored_constructor() {
    let (_dir, loader) = loaded();
    let results = FuzzyQuery::new().query(&loader, "String(char[])").unwrap();

    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert_eq!(result.name.as_str(), "java.lang.String#<init>(char[])");
    assert_eq!(result.kind, ResultKind::Method);
    // `<INIT>` meets the stored `<init>` only in the case-folded space.
    assert!(result.exact);
    assert!(!result.exact_case_sensitive);
}

#[test]
fn type_only_query_ranks_by_its_own_kind() {
    let (_dir, loader) = loaded();
    let results = FuzzyQuery::new().query(&loader, "java.util.List").unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].kind, ResultKind::Interface);
    assert!(results[0].exact);
    assert!(results[0].exact_case_sensitive);
}

#[test]
fn ambiguous_type_query_returns_all_candidates_as_exact() {
    let (_dir, loader) = loaded();
    let results = FuzzyQuery::new().query(&loader, "List").unwrap();

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|it| it.exact && it.exact_case_sensitive));
    let mut kinds: Vec<ResultKind> = results.iter().map(|it| it.kind).collect();
    kinds.sort_by_key(|it| format!("{it:?}"));
    assert_eq!(kinds, [ResultKind::Class, ResultKind::Interface]);
}

#[test]
fn a_field_query_with_parameters_matches_nothing() {
    let (_dir, loader) = loaded();
    let results = FuzzyQuery::new()
        .query(&loader, "String#CASE_INSENSITIVE_ORDER()")
        .unwrap();
    assert!(results.is_empty());
}

#[test]
fn unparseable_input_degrades_to_empty_results() {
    let (_dir, loader) = loaded();
    assert!(FuzzyQuery::new().query(&loader, "not a query!").unwrap().is_empty());
    assert!(FuzzyQuery::new().query(&loader, "").unwrap().is_empty());
}

#[test]
fn results_from_multiple_stores_keep_their_origin() {
    let dir_a = TempDir::new().unwrap();
    let dir_b = TempDir::new().unwrap();
    let store_a = TantivyStore::open(dir_a.path(), StoreId::new(1).unwrap()).unwrap();
    let store_b = TantivyStore::open(dir_b.path(), StoreId::new(2).unwrap()).unwrap();
    store_a.add_all(&corpus()).unwrap();
    store_b.add_all(&corpus()).unwrap();

    let loader = AggregatedLoader::new(vec![Arc::new(store_a), Arc::new(store_b)]);
    let results = FuzzyQuery::new().query(&loader, "String#charAt(int)").unwrap();

    assert_eq!(results.len(), 2);
    let mut origins: Vec<u32> = results.iter().map(|it| it.store.value()).collect();
    origins.sort();
    assert_eq!(origins, [1, 2]);
}

#[test]
fn autocomplete_passes_through_the_loader() {
    let (_dir, loader) = loaded();
    let completions = FuzzyQuery::new().autocomplete(&loader, "String").unwrap();
    assert!(completions.iter().any(|it| it == "java.lang.String"));
}
