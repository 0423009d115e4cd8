//! The symbol records the index stores: types, methods and fields.
//!
//! Records are produced once by an external extractor, inserted in bulk and
//! never mutated. The documentation blob is opaque to this crate; rendering
//! it is a presentation concern.

use serde::{Deserialize, Serialize};

use crate::types::{DeclarationStyle, QualifiedName};

/// What flavor of type a [`TypeRecord`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

impl TypeKind {
    pub fn keyword(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Annotation => "@interface",
        }
    }
}

/// A named method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub ty: QualifiedName,
    pub name: String,
}

impl Parameter {
    pub fn new(ty: QualifiedName, name: impl Into<String>) -> Self {
        Self {
            ty,
            name: name.into(),
        }
    }
}

/// A documented type, with its flattened member list (including inherited
/// visible members) and super-type references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRecord {
    pub name: QualifiedName,
    pub modifiers: Vec<String>,
    pub kind: TypeKind,
    pub members: Vec<QualifiedName>,
    pub super_class: Option<QualifiedName>,
    pub super_interfaces: Vec<QualifiedName>,
    pub doc: Option<String>,
}

impl TypeRecord {
    pub fn declaration(&self, style: DeclarationStyle) -> String {
        let mut result = String::new();
        if !self.modifiers.is_empty() {
            result.push_str(&self.modifiers.join(" "));
            result.push(' ');
        }
        result.push_str(self.kind.keyword());
        result.push(' ');
        result.push_str(&self.name.formatted(style));
        if let Some(super_class) = &self.super_class {
            result.push_str(" extends ");
            result.push_str(&super_class.formatted(style));
        }
        if !self.super_interfaces.is_empty() {
            result.push_str(" implements ");
            let interfaces: Vec<String> = self
                .super_interfaces
                .iter()
                .map(|it| it.formatted(style))
                .collect();
            result.push_str(&interfaces.join(", "));
        }
        result
    }
}

/// A documented method or constructor. Constructors arrive from the producer
/// with `<init>` as the member name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodRecord {
    pub name: QualifiedName,
    pub modifiers: Vec<String>,
    pub return_type: QualifiedName,
    pub parameters: Vec<Parameter>,
    pub thrown_types: Vec<QualifiedName>,
    pub doc: Option<String>,
}

impl MethodRecord {
    pub fn declaration(&self, style: DeclarationStyle) -> String {
        let mut result = String::new();
        if !self.modifiers.is_empty() {
            result.push_str(&self.modifiers.join(" "));
            result.push(' ');
        }
        result.push_str(&self.return_type.formatted(style));
        result.push(' ');
        result.push_str(self.name.simple_name());
        result.push('(');
        let parameters: Vec<String> = self
            .parameters
            .iter()
            .map(|it| format!("{} {}", it.ty.formatted(style), it.name))
            .collect();
        result.push_str(&parameters.join(", "));
        result.push(')');
        if !self.thrown_types.is_empty() {
            result.push_str(" throws ");
            let thrown: Vec<String> = self
                .thrown_types
                .iter()
                .map(|it| it.formatted(style))
                .collect();
            result.push_str(&thrown.join(", "));
        }
        result
    }
}

/// A documented field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRecord {
    pub name: QualifiedName,
    pub modifiers: Vec<String>,
    pub ty: QualifiedName,
    pub doc: Option<String>,
}

impl FieldRecord {
    pub fn declaration(&self, style: DeclarationStyle) -> String {
        format!("{} {}", self.ty.formatted(style), self.name.simple_name())
    }
}

/// Discriminator for the persisted record variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Type,
    Method,
    Field,
}

impl ElementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Type => "type",
            ElementKind::Method => "method",
            ElementKind::Field => "field",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "type" => Some(ElementKind::Type),
            "method" => Some(ElementKind::Method),
            "field" => Some(ElementKind::Field),
            _ => None,
        }
    }
}

/// One indexed element. Closed sum over the three record variants; callers
/// pattern-match to filter by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Element {
    Type(TypeRecord),
    Method(MethodRecord),
    Field(FieldRecord),
}

impl Element {
    pub fn qualified_name(&self) -> &QualifiedName {
        match self {
            Element::Type(record) => &record.name,
            Element::Method(record) => &record.name,
            Element::Field(record) => &record.name,
        }
    }

    pub fn modifiers(&self) -> &[String] {
        match self {
            Element::Type(record) => &record.modifiers,
            Element::Method(record) => &record.modifiers,
            Element::Field(record) => &record.modifiers,
        }
    }

    pub fn doc(&self) -> Option<&str> {
        match self {
            Element::Type(record) => record.doc.as_deref(),
            Element::Method(record) => record.doc.as_deref(),
            Element::Field(record) => record.doc.as_deref(),
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Type(_) => ElementKind::Type,
            Element::Method(_) => ElementKind::Method,
            Element::Field(_) => ElementKind::Field,
        }
    }

    pub fn declaration(&self, style: DeclarationStyle) -> String {
        match self {
            Element::Type(record) => record.declaration(style),
            Element::Method(record) => record.declaration(style),
            Element::Field(record) => record.declaration(style),
        }
    }
}
