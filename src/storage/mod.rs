//! Durable, queryable element stores and their aggregation.
//!
//! The [`ElementStore`] trait is the read contract a store must satisfy;
//! [`TantivyStore`] is the on-disk implementation and the only component
//! with a write path ([`TantivyStore::add_all`]). An [`AggregatedLoader`]
//! fans lookups out over several stores and tags every result with the
//! [`StoreId`] of its origin so callers can re-query that store later.

pub mod aggregate;
pub mod error;
pub mod tantivy;

pub use aggregate::AggregatedLoader;
pub use error::{FetchError, FetchResult};
pub use tantivy::TantivyStore;

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::model::{Element, TypeRecord};
use crate::types::QualifiedName;

/// Opaque handle identifying one element store within a loader's registry.
///
/// A handle instead of a live reference: stores hold caches, and results
/// embedding the store itself would create ownership cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreId(NonZeroU32);

impl StoreId {
    pub fn new(value: u32) -> Option<Self> {
        NonZeroU32::new(value).map(Self)
    }

    pub fn value(&self) -> u32 {
        self.0.get()
    }
}

/// A returned value paired with the store that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadResult<T> {
    pub value: T,
    pub store: StoreId,
}

impl<T> LoadResult<T> {
    pub fn new(value: T, store: StoreId) -> Self {
        Self { value, store }
    }

    pub fn map<R>(self, mapper: impl FnOnce(T) -> R) -> LoadResult<R> {
        LoadResult {
            value: mapper(self.value),
            store: self.store,
        }
    }
}

/// Read contract over one corpus of indexed elements.
///
/// All operations are read-only; bulk insertion lives on the concrete store.
/// Every operation may fail with [`FetchError`] wrapping the underlying
/// index error.
pub trait ElementStore: Send + Sync {
    /// The opaque handle results from this store are tagged with.
    fn id(&self) -> StoreId;

    /// Every element in this store.
    fn find_all(&self) -> FetchResult<Vec<Element>>;

    /// Types whose qualified name, read as dot-separated segments, ends with
    /// `fragment` read the same way. `String`, `.String`, `lang.String` and
    /// `java.lang.String` all match `java.lang.String`; a non-segment-aligned
    /// suffix like `ame` does not. Case-insensitive.
    fn find_type_by_name(&self, fragment: &str) -> FetchResult<Vec<TypeRecord>>;

    /// Methods and fields whose simple name ends with `fragment`,
    /// case-insensitively.
    fn find_element_by_name(&self, fragment: &str) -> FetchResult<Vec<Element>>;

    /// Exact, case-sensitive lookup by qualified name text.
    fn find_by_qualified_name(&self, name: &QualifiedName) -> FetchResult<Vec<Element>>;

    /// Ranked completions for `prompt`: full module-prefixed qualified-name
    /// strings, type rows weighted above member rows, then text relevance.
    fn autocomplete(&self, prompt: &str) -> FetchResult<Vec<String>>;

    /// Base URL for rendering documentation links of this store's corpus,
    /// when one was configured. Consumed by presentation layers.
    fn link_base(&self) -> Option<&str> {
        None
    }
}
