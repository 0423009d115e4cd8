//! Core value types shared across the crate.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The qualified name of an indexed element.
///
/// Grammar: `Type`, `Type#member` or `Type#member(p1,p2,...)`, where `Type`
/// is dot-separated. An optional module tag qualifies the name at the storage
/// boundary (`module/Type`); it never participates in in-memory identity
/// beyond structural equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    module: Option<String>,
}

impl QualifiedName {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            module: None,
        }
    }

    pub fn with_module(text: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            module: Some(module.into()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    /// The module-prefixed form used as the storage key for completions.
    pub fn as_string_with_module(&self) -> String {
        match &self.module {
            Some(module) => format!("{module}/{}", self.text),
            None => self.text.clone(),
        }
    }

    /// The *lexical* parent: the enclosing type for a member, the enclosing
    /// package for a top-level type.
    pub fn lexical_parent(&self) -> Option<QualifiedName> {
        if let Some(hash) = self.text.find('#') {
            return Some(QualifiedName {
                text: self.text[..hash].to_string(),
                module: self.module.clone(),
            });
        }
        self.index_of_last_separator().map(|dot| QualifiedName {
            text: self.text[..dot].to_string(),
            module: self.module.clone(),
        })
    }

    /// The simple name: `java.lang.String` yields `String`, `String#length()`
    /// yields `length` (any parameter list is stripped).
    pub fn simple_name(&self) -> &str {
        if let Some(hash) = self.text.find('#') {
            let member = &self.text[hash + 1..];
            return match member.find('(') {
                Some(open) if member[open..].contains(')') => &member[..open],
                _ => member,
            };
        }
        match self.index_of_last_separator() {
            Some(dot) => &self.text[dot + 1..],
            None => &self.text,
        }
    }

    // A trailing varargs ellipsis is not a segment separator.
    fn index_of_last_separator(&self) -> Option<usize> {
        if let Some(stem) = self.text.strip_suffix("...") {
            return stem.rfind('.');
        }
        self.text.rfind('.')
    }

    /// Whether this name denotes a method, detected by a `(` in the name.
    pub fn is_method(&self) -> bool {
        self.text.contains('(')
    }

    /// Formats the name in the given declaration style.
    pub fn formatted(&self, style: DeclarationStyle) -> String {
        match style {
            DeclarationStyle::Short => self.simple_name().to_string(),
            DeclarationStyle::Qualified => self.text.clone(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// How a declaration header is rendered: simple names or fully qualified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationStyle {
    Short,
    Qualified,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_name_of_type_is_last_segment() {
        assert_eq!(QualifiedName::new("java.lang.String").simple_name(), "String");
        assert_eq!(QualifiedName::new("String").simple_name(), "String");
    }

    #[test]
    fn simple_name_of_member_strips_parameters() {
        assert_eq!(QualifiedName::new("String#length").simple_name(), "length");
        assert_eq!(
            QualifiedName::new("java.lang.String#charAt(int)").simple_name(),
            "charAt"
        );
        assert_eq!(
            QualifiedName::new("java.lang.String#format(java.lang.String,java.lang.Object[])")
                .simple_name(),
            "format"
        );
    }

    #[test]
    fn simple_name_of_varargs_type_keeps_ellipsis() {
        assert_eq!(QualifiedName::new("java.lang.Object...").simple_name(), "Object...");
        assert_eq!(QualifiedName::new("int...").simple_name(), "int...");
    }

    #[test]
    fn lexical_parent_walks_members_then_packages() {
        let name = QualifiedName::new("java.lang.String#charAt(int)");
        let parent = name.lexical_parent().unwrap();
        assert_eq!(parent.as_str(), "java.lang.String");

        let grandparent = parent.lexical_parent().unwrap();
        assert_eq!(grandparent.as_str(), "java.lang");

        assert!(QualifiedName::new("String").lexical_parent().is_none());
    }

    #[test]
    fn lexical_parent_keeps_module() {
        let name = QualifiedName::with_module("java.lang.String#length()", "java.base");
        assert_eq!(name.lexical_parent().unwrap().module(), Some("java.base"));
    }

    #[test]
    fn method_detection() {
        assert!(QualifiedName::new("String#charAt(int)").is_method());
        assert!(!QualifiedName::new("String#CASE_INSENSITIVE_ORDER").is_method());
        assert!(!QualifiedName::new("java.lang.String").is_method());
    }

    #[test]
    fn module_prefix_only_at_storage_boundary() {
        let name = QualifiedName::with_module("java.lang.String", "java.base");
        assert_eq!(name.as_str(), "java.lang.String");
        assert_eq!(name.as_string_with_module(), "java.base/java.lang.String");
        assert_eq!(
            QualifiedName::new("java.lang.String").as_string_with_module(),
            "java.lang.String"
        );
    }

    #[test]
    fn equality_is_structural_over_text_and_module() {
        assert_eq!(
            QualifiedName::new("java.lang.String"),
            QualifiedName::new("java.lang.String")
        );
        assert_ne!(
            QualifiedName::new("java.lang.String"),
            QualifiedName::with_module("java.lang.String", "java.base")
        );
    }
}
