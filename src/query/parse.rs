//! Parsing of terse search strings into structured queries.
//!
//! Grammar: a query is a dotted type name, a `#member` fragment, a
//! `Type#member` pair, optionally followed by a parenthesized parameter
//! list, or the constructor shorthand `Type(params)`. Input that matches no
//! production parses to `None`; terse user input is expected to be malformed
//! often, so that is not an error.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::QualifiedName;

/// Reserved member name marking a constructor. Distinct from any legal
/// identifier and already upper-cased for the normalized comparison space.
pub const CONSTRUCTOR_MARKER: &str = "<INIT>";

static TYPE_ONLY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.$]+$").unwrap());
static CONSTRUCTOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([\w.$]+)(\(.*\)?)$").unwrap());
static FIELD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([\w.$]+)#([\w$]+|<INIT>)$").unwrap());
static METHOD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([\w.$]+)#([\w$]+|<INIT>)\((.*)\)?$").unwrap());
static PARAMETER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([\w.$\[\]]+)( [\w$]+)?(, *)?").unwrap());
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// A structured search query.
///
/// `parameters` distinguishes absent from empty: `None` means the parameter
/// list was not specified (match any arity), `Some` of an empty list means
/// match zero-parameter members only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    class_name: Option<String>,
    member_name: Option<String>,
    parameters: Option<Vec<String>>,
}

impl ParsedQuery {
    /// Parses a search string; `None` when no grammar production matches.
    pub fn parse(input: &str) -> Option<ParsedQuery> {
        let query = WHITESPACE_RUN.replace_all(input.trim(), " ").into_owned();

        if let Some(rest) = query.strip_prefix('#') {
            let Some(open) = rest.find('(') else {
                return Some(ParsedQuery {
                    class_name: None,
                    member_name: Some(rest.to_string()),
                    parameters: None,
                });
            };
            let member_name = rest[..open].to_string();
            let parameter_string = rest[open..].replace('(', "").replace(')', "");
            return Some(ParsedQuery {
                class_name: None,
                member_name: Some(member_name),
                parameters: Some(extract_parameters(&parameter_string)),
            });
        }

        if TYPE_ONLY_PATTERN.is_match(&query) {
            return Some(ParsedQuery {
                class_name: Some(query),
                member_name: None,
                parameters: None,
            });
        }

        if let Some(captures) = FIELD_PATTERN.captures(&query) {
            let class_name = captures[1].trim().to_string();
            let member_name = adjust_for_constructor(captures[2].trim(), &class_name);
            return Some(ParsedQuery {
                class_name: Some(class_name),
                member_name: Some(member_name),
                parameters: None,
            });
        }

        // Shorthand: String(String other) for String#String(String other)
        let query = match CONSTRUCTOR_PATTERN.captures(&query) {
            Some(captures) => {
                let class_name = &captures[1];
                let rest = &captures[2];
                let simple = match class_name.rfind('.') {
                    Some(dot) => &class_name[dot + 1..],
                    None => class_name,
                };
                format!("{class_name}#{simple}{rest}")
            }
            None => query,
        };

        let captures = METHOD_PATTERN.captures(&query)?;
        let class_name = captures[1].trim().to_string();
        let member_name = adjust_for_constructor(captures[2].trim(), &class_name);
        let parameter_string = captures[3].trim().to_string();

        Some(ParsedQuery {
            class_name: Some(class_name),
            member_name: Some(member_name),
            parameters: Some(extract_parameters(&parameter_string)),
        })
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    pub fn member_name(&self) -> Option<&str> {
        self.member_name.as_deref()
    }

    pub fn parameters(&self) -> Option<&[String]> {
        self.parameters.as_deref()
    }

    /// The case-folded view used for case-insensitive comparisons.
    pub fn normalized(&self) -> ParsedQuery {
        ParsedQuery {
            class_name: self.class_name.as_ref().map(|it| it.to_uppercase()),
            member_name: self.member_name.as_ref().map(|it| it.to_uppercase()),
            parameters: self
                .parameters
                .as_ref()
                .map(|params| params.iter().map(|it| it.to_uppercase()).collect()),
        }
    }

    /// Whether this query matches `reference` exactly, where `reference` is
    /// the re-parsed qualified name of a candidate element.
    ///
    /// Both must agree on having a member name and on having a parameter
    /// list; the type fragment and each parameter may be a dot-suffix of the
    /// reference instead of equal; the member name must be fully equal.
    pub fn exact_to_reference(&self, reference: &ParsedQuery) -> bool {
        if self.parameters.is_some() != reference.parameters.is_some() {
            return false;
        }
        if self.member_name.is_some() != reference.member_name.is_some() {
            return false;
        }
        if let Some(class_name) = &self.class_name {
            let Some(reference_class) = &reference.class_name else {
                return false;
            };
            if !class_match_with_reference(class_name, reference_class) {
                return false;
            }
        }

        let Some(member_name) = &self.member_name else {
            return true;
        };
        if reference.member_name.as_deref() != Some(member_name.as_str()) {
            return false;
        }

        let Some(parameters) = &self.parameters else {
            return true;
        };
        let Some(reference_parameters) = &reference.parameters else {
            return false;
        };
        if parameters.len() != reference_parameters.len() {
            return false;
        }
        parameters
            .iter()
            .zip(reference_parameters)
            .all(|(parameter, reference_parameter)| {
                class_match_with_reference(parameter, reference_parameter)
            })
    }
}

fn class_match_with_reference(name: &str, reference: &str) -> bool {
    name == reference || reference.ends_with(&format!(".{name}"))
}

fn adjust_for_constructor(member_name: &str, class_name: &str) -> String {
    let simple = QualifiedName::new(class_name).simple_name().to_lowercase();
    if member_name.to_lowercase() == simple {
        CONSTRUCTOR_MARKER.to_string()
    } else {
        member_name.to_string()
    }
}

// Parameter names are dropped: the first whitespace-delimited token of each
// comma-separated fragment is the type, the rest is ignored. The split is a
// naive top-level comma split; generic argument lists containing commas
// mis-split (documented limitation, kept for match-compatibility with
// existing corpora).
fn extract_parameters(parameter_string: &str) -> Vec<String> {
    if parameter_string.is_empty() {
        return Vec::new();
    }
    PARAMETER_PATTERN
        .captures_iter(parameter_string)
        .map(|captures| captures[1].trim().to_string())
        .collect()
}
