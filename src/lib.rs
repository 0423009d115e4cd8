//! Fuzzy lookup and autocompletion over indexed API documentation symbols.
//!
//! A producer (out of scope here) extracts documented symbols as
//! [`Element`] records keyed by [`QualifiedName`]s and bulk-loads them into
//! a [`TantivyStore`]. Lookups go through an [`AggregatedLoader`] composing
//! one store per corpus; [`FuzzyQuery`] turns terse search strings such as
//! `str#sub(int)` into ranked candidates, and [`NameShortener`] computes the
//! shortest unambiguous display form for a result set.

pub mod config;
pub mod logging;
pub mod model;
pub mod query;
pub mod shorten;
pub mod storage;
pub mod types;

pub use config::{SearchConfig, Settings};
pub use model::{Element, ElementKind, FieldRecord, MethodRecord, Parameter, TypeKind, TypeRecord};
pub use query::{FuzzyQuery, FuzzyResult, ParsedQuery, ResultKind};
pub use shorten::NameShortener;
pub use storage::{
    AggregatedLoader, ElementStore, FetchError, FetchResult, LoadResult, StoreId, TantivyStore,
};
pub use types::{DeclarationStyle, QualifiedName};
