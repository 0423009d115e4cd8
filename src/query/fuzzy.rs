//! The fuzzy matcher: from a parsed query to ranked candidate elements.

use tracing::debug;

use crate::query::parse::ParsedQuery;
use crate::query::result::{FuzzyResult, ResultKind};
use crate::storage::{AggregatedLoader, FetchResult, LoadResult};
use crate::types::QualifiedName;

/// Matches terse queries against an [`AggregatedLoader`].
///
/// Stateless; one instance can serve any number of concurrent callers.
#[derive(Debug, Default)]
pub struct FuzzyQuery;

impl FuzzyQuery {
    pub fn new() -> Self {
        Self
    }

    /// Ranked completions for `prompt`, straight from the stores.
    pub fn autocomplete(
        &self,
        loader: &AggregatedLoader,
        prompt: &str,
    ) -> FetchResult<Vec<String>> {
        loader.autocomplete(prompt)
    }

    /// All elements matching `input`. Unparseable input yields an empty
    /// result, never an error.
    pub fn query(&self, loader: &AggregatedLoader, input: &str) -> FetchResult<Vec<FuzzyResult>> {
        let Some(query) = ParsedQuery::parse(input) else {
            debug!(input, "query did not parse");
            return Ok(Vec::new());
        };

        let results = if query.class_name().is_none() {
            self.find_non_class_elements(loader, &query)?
        } else {
            self.find_elements_from_class(loader, &query)?
        };
        debug!(input, results = results.len(), "fuzzy query finished");
        Ok(results)
    }

    /// Member-only queries (`#name`, `#name(params)`): suffix match over all
    /// non-type simple names, then the optional parameter filter.
    fn find_non_class_elements(
        &self,
        loader: &AggregatedLoader,
        query: &ParsedQuery,
    ) -> FetchResult<Vec<FuzzyResult>> {
        let normalized = query.normalized();
        let Some(member_fragment) = normalized.member_name() else {
            return Ok(Vec::new());
        };

        let candidates: Vec<LoadResult<QualifiedName>> = loader
            .find_element_by_name(member_fragment)?
            .into_iter()
            .map(|it| it.map(|element| element.qualified_name().clone()))
            .collect();

        let Some(parameters) = normalized.parameters() else {
            return Ok(candidates
                .into_iter()
                .map(|it| {
                    let kind = if it.value.is_method() {
                        ResultKind::Method
                    } else {
                        ResultKind::Field
                    };
                    to_result(query, it, kind)
                })
                .collect());
        };

        Ok(candidates
            .into_iter()
            .filter(|it| fuzzy_match_parameters(parameters, &it.value))
            .map(|it| to_result(query, it, ResultKind::Method))
            .collect())
    }

    /// Type-anchored queries: candidate types by suffix, then (optionally)
    /// a scan over each candidate's flattened member list.
    fn find_elements_from_class(
        &self,
        loader: &AggregatedLoader,
        query: &ParsedQuery,
    ) -> FetchResult<Vec<FuzzyResult>> {
        let normalized = query.normalized();
        let Some(class_fragment) = normalized.class_name() else {
            return Ok(Vec::new());
        };

        let potential_classes = loader.find_type_by_name(class_fragment)?;

        let Some(member_fragment) = normalized.member_name() else {
            return Ok(potential_classes
                .into_iter()
                .map(|it| {
                    let kind = ResultKind::from_type_kind(it.value.kind);
                    to_result(query, it.map(|record| record.name), kind)
                })
                .collect());
        };

        let mut matches: Vec<LoadResult<QualifiedName>> = Vec::new();
        for potential_class in potential_classes {
            let store = potential_class.store;
            let enclosed = potential_class
                .value
                .members
                .iter()
                .filter(|member| {
                    member
                        .simple_name()
                        .to_uppercase()
                        .ends_with(member_fragment)
                })
                // A parameter list restricts the scan to methods; without
                // one, fields stay in.
                .filter(|member| normalized.parameters().is_none() || member.is_method())
                .map(|member| LoadResult::new(member.clone(), store));

            match normalized.parameters() {
                None => matches.extend(enclosed),
                Some(parameters) => matches.extend(
                    enclosed.filter(|it| fuzzy_match_parameters(parameters, &it.value)),
                ),
            }
        }

        Ok(matches
            .into_iter()
            .map(|it| {
                let kind = if it.value.is_method() {
                    ResultKind::Method
                } else {
                    ResultKind::Field
                };
                to_result(query, it, kind)
            })
            .collect())
    }
}

/// Permissive positionwise parameter match: the query may name a strict
/// prefix of the actual parameters, and each query parameter may be a tail
/// fragment of the actual type. Not a type-correctness check.
fn fuzzy_match_parameters(query_parameters: &[String], actual: &QualifiedName) -> bool {
    let Some(actual_query) = ParsedQuery::parse(&actual.as_str().to_uppercase()) else {
        return false;
    };
    let Some(actual_parameters) = actual_query.parameters() else {
        return false;
    };
    if query_parameters.len() > actual_parameters.len() {
        return false;
    }
    query_parameters
        .iter()
        .zip(actual_parameters)
        .all(|(query_parameter, actual_parameter)| actual_parameter.ends_with(query_parameter))
}

/// Computes both exactness tiers by re-parsing the candidate's own name as a
/// query and comparing it against the user's query.
fn to_result(query: &ParsedQuery, element: LoadResult<QualifiedName>, kind: ResultKind) -> FuzzyResult {
    let (exact, exact_case_sensitive) = match ParsedQuery::parse(element.value.as_str()) {
        Some(element_query) => (
            query
                .normalized()
                .exact_to_reference(&element_query.normalized()),
            query.exact_to_reference(&element_query),
        ),
        None => (false, false),
    };

    FuzzyResult {
        name: element.value,
        kind,
        exact,
        exact_case_sensitive,
        store: element.store,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(text: &str) -> QualifiedName {
        QualifiedName::new(text)
    }

    fn upper(values: &[&str]) -> Vec<String> {
        values.iter().map(|it| it.to_uppercase()).collect()
    }

    #[test]
    fn parameter_prefix_is_allowed() {
        let actual = name("java.lang.String#codePointCount(int,int)");
        assert!(fuzzy_match_parameters(&upper(&["int"]), &actual));
        assert!(fuzzy_match_parameters(&upper(&["int", "int"]), &actual));
    }

    #[test]
    fn too_many_query_parameters_fail() {
        let actual = name("java.lang.String#codePointAt(int)");
        assert!(!fuzzy_match_parameters(&upper(&["int", "int"]), &actual));
    }

    #[test]
    fn parameter_types_match_by_tail_fragment() {
        let actual = name("java.lang.String#contains(java.lang.CharSequence)");
        assert!(fuzzy_match_parameters(&upper(&["CharSequence"]), &actual));
        assert!(fuzzy_match_parameters(&upper(&["lang.CharSequence"]), &actual));
        assert!(!fuzzy_match_parameters(&upper(&["Sequence2"]), &actual));
    }

    #[test]
    fn fields_never_match_a_parameter_list() {
        let actual = name("java.lang.String#CASE_INSENSITIVE_ORDER");
        assert!(!fuzzy_match_parameters(&upper(&[]), &actual));
    }

    #[test]
    fn empty_query_list_is_a_trivial_prefix() {
        // `#foo()` restricts the match to methods; arity only affects the
        // exactness tier, where the counts must agree.
        assert!(fuzzy_match_parameters(&[], &name("java.lang.String#length()")));
        assert!(fuzzy_match_parameters(&[], &name("java.lang.String#charAt(int)")));
    }
}
