//! Result types of the fuzzy matcher.

use crate::model::TypeKind;
use crate::storage::StoreId;
use crate::types::QualifiedName;

/// The kind of element a result points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultKind {
    Method,
    Field,
    Annotation,
    Enum,
    Interface,
    Class,
}

impl ResultKind {
    pub fn from_type_kind(kind: TypeKind) -> Self {
        match kind {
            TypeKind::Class => ResultKind::Class,
            TypeKind::Interface => ResultKind::Interface,
            TypeKind::Enum => ResultKind::Enum,
            TypeKind::Annotation => ResultKind::Annotation,
        }
    }
}

/// One ranked match.
///
/// `exact` is the normalized (case-folded) exactness tier;
/// `exact_case_sensitive` the native-case tier, strictly stronger. Results
/// with equal tiers keep the underlying store scan order; no further
/// sorting happens here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyResult {
    pub name: QualifiedName,
    pub kind: ResultKind,
    pub exact: bool,
    pub exact_case_sensitive: bool,
    pub store: StoreId,
}
