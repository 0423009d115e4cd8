//! Shortest-unambiguous display forms for sets of qualified names.
//!
//! Strips leading qualification from every name as long as no two distinct
//! base types in the set would collide; members of the same base type share
//! its shortening. Parameter types inside method signatures are shortened
//! by the same algorithm over their own, independent set.

use std::collections::{HashMap, HashSet};

use crate::types::QualifiedName;

#[derive(Debug, Default)]
pub struct NameShortener;

impl NameShortener {
    pub fn new() -> Self {
        Self
    }

    /// Shortens the qualified names as much as possible while keeping them
    /// unique within the set.
    ///
    /// Returns a map from original to shortened name: every input key is
    /// present exactly once, no two inputs share an output, and every output
    /// is a suffix of its input (with shortened parameter lists rebuilt in
    /// place).
    pub fn shorten_matches(&self, names: &HashSet<QualifiedName>) -> HashMap<String, String> {
        let type_fixpoint = find_fixpoint(
            names
                .iter()
                .map(|name| name.as_str().to_string())
                .collect(),
        );

        let parameter_types: HashSet<String> = type_fixpoint
            .values()
            .flat_map(|name| all_parameter_types(name))
            .collect();
        let parameter_fixpoint = find_fixpoint(parameter_types);

        type_fixpoint
            .into_iter()
            .map(|(original, shortened)| {
                let replaced = map_parameters(&shortened, &parameter_fixpoint);
                (original, replaced)
            })
            .collect()
    }
}

fn find_fixpoint(input: HashSet<String>) -> HashMap<String, String> {
    let mut current: HashMap<String, String> =
        input.into_iter().map(|name| (name.clone(), name)).collect();

    loop {
        let next = shorten_iteration(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// One round: group by the one-segment-shorter base type, shorten a group
/// only when a single distinct original base type feeds it.
fn shorten_iteration(names: &HashMap<String, String>) -> HashMap<String, String> {
    let mut groups: HashMap<String, Vec<(&String, &String)>> = HashMap::new();
    for (original, current) in names {
        groups
            .entry(strip_first_segment(base_type(current)).to_string())
            .or_default()
            .push((original, current));
    }

    let mut old_to_new = HashMap::new();
    for entries in groups.into_values() {
        // "java.lang.String#foo()" and "java.lang.String#bar()" may still
        // shorten together: only *distinct* base types count as a collision.
        let distinct_bases: HashSet<&str> = entries
            .iter()
            .map(|(original, _)| base_type(original))
            .collect();

        if distinct_bases.len() == 1 {
            for (original, current) in entries {
                old_to_new.insert(original.clone(), strip_first_segment(current).to_string());
            }
        } else {
            for (original, current) in entries {
                old_to_new.insert(original.clone(), current.clone());
            }
        }
    }

    old_to_new
}

/// Drops the first dotted segment of the type prefix, keeping any
/// `#member(...)` suffix unchanged.
fn strip_first_segment(input: &str) -> &str {
    // Once the only dots left sit behind the '#', the prefix is a simple
    // name and there is nothing more to strip.
    if let (Some(hash), Some(dot)) = (input.find('#'), input.find('.')) {
        if dot > hash {
            return input;
        }
    }
    match input.find('.') {
        Some(dot) => &input[dot + 1..],
        None => input,
    }
}

fn base_type(name: &str) -> &str {
    match name.find('#') {
        Some(hash) => &name[..hash],
        None => name,
    }
}

fn all_parameter_types(input: &str) -> Vec<String> {
    let (Some(open), Some(close)) = (input.find('('), input.find(')')) else {
        return Vec::new();
    };
    let section = &input[open + 1..close];
    if section.trim().is_empty() {
        return Vec::new();
    }
    section.split(',').map(|it| it.trim().to_string()).collect()
}

fn map_parameters(name: &str, replacements: &HashMap<String, String>) -> String {
    let Some(open) = name.find('(') else {
        return name.to_string();
    };
    let base = &name[..open];
    let parameters: Vec<String> = all_parameter_types(name)
        .into_iter()
        .map(|parameter| replacements.get(&parameter).cloned().unwrap_or(parameter))
        .collect();
    format!("{base}({})", parameters.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shorten(names: &[&str]) -> HashMap<String, String> {
        let input: HashSet<QualifiedName> =
            names.iter().map(|name| QualifiedName::new(*name)).collect();
        NameShortener::new().shorten_matches(&input)
    }

    fn expected(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect()
    }

    #[test]
    fn shortens_types() {
        assert_eq!(
            shorten(&[
                "java.lang.String#foo()",
                "java.lang.String#foo(int)",
                "java.lang.StringBuilder#FOO",
                "java.lang.StringBuffer",
                "foo.conflicting.Bar#method(int)",
                "bar.conflicting.Bar#method(String)",
            ]),
            expected(&[
                ("java.lang.String#foo()", "String#foo()"),
                ("java.lang.String#foo(int)", "String#foo(int)"),
                ("java.lang.StringBuilder#FOO", "StringBuilder#FOO"),
                ("java.lang.StringBuffer", "StringBuffer"),
                ("foo.conflicting.Bar#method(int)", "foo.conflicting.Bar#method(int)"),
                ("bar.conflicting.Bar#method(String)", "bar.conflicting.Bar#method(String)"),
            ])
        );
    }

    #[test]
    fn colliding_types_stop_at_their_last_safe_form() {
        assert_eq!(
            shorten(&["java.util.List", "java.awt.List"]),
            expected(&[("java.util.List", "util.List"), ("java.awt.List", "awt.List")])
        );
    }

    #[test]
    fn shortens_parameter_types_independently() {
        assert_eq!(
            shorten(&[
                "java.lang.String#foo()",
                "java.lang.String#foo(int)",
                "java.lang.String#foo(int, int)",
                "java.lang.String#foo(java.lang.String, java.lang.String)",
                "java.lang.String#foo(java.lang.String, bar.conflict.List)",
                "java.lang.String#foo(java.lang.String, foo.conflict.List)",
            ]),
            expected(&[
                ("java.lang.String#foo()", "String#foo()"),
                ("java.lang.String#foo(int)", "String#foo(int)"),
                ("java.lang.String#foo(int, int)", "String#foo(int,int)"),
                (
                    "java.lang.String#foo(java.lang.String, java.lang.String)",
                    "String#foo(String,String)"
                ),
                (
                    "java.lang.String#foo(java.lang.String, bar.conflict.List)",
                    "String#foo(String,bar.conflict.List)"
                ),
                (
                    "java.lang.String#foo(java.lang.String, foo.conflict.List)",
                    "String#foo(String,foo.conflict.List)"
                ),
            ])
        );
    }

    #[test]
    fn outputs_never_collide() {
        let shortened = shorten(&[
            "java.util.List",
            "java.awt.List",
            "java.lang.String#foo()",
            "java.lang.StringBuilder#FOO",
            "a.b.c.Deep",
        ]);
        let outputs: HashSet<&String> = shortened.values().collect();
        assert_eq!(outputs.len(), shortened.len());
    }

    #[test]
    fn idempotent_on_already_unique_forms() {
        let first = shorten(&["java.util.List", "java.awt.List"]);
        let again = shorten(&["util.List", "awt.List"]);
        assert_eq!(again.get("util.List"), Some(&"util.List".to_string()));
        assert_eq!(again.get("awt.List"), Some(&"awt.List".to_string()));
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn lone_name_shortens_to_simple_name() {
        assert_eq!(
            shorten(&["java.lang.String"]),
            expected(&[("java.lang.String", "String")])
        );
    }
}
