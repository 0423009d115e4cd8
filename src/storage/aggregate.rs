//! Aggregation of several element stores behind one lookup surface.

use std::sync::Arc;

use crate::model::{Element, TypeRecord};
use crate::storage::{ElementStore, FetchResult, LoadResult, StoreId};
use crate::types::QualifiedName;

/// Fans every lookup out to its registered stores and tags each result with
/// the origin store's handle.
///
/// Typical composition: one store for the project under inspection, one per
/// dependency corpus. Result order across stores follows registration order;
/// callers must not rely on any finer ordering.
pub struct AggregatedLoader {
    stores: Vec<Arc<dyn ElementStore>>,
}

impl AggregatedLoader {
    pub fn new(stores: Vec<Arc<dyn ElementStore>>) -> Self {
        Self { stores }
    }

    /// Convenience for the common single-corpus setup.
    pub fn single(store: Arc<dyn ElementStore>) -> Self {
        Self::new(vec![store])
    }

    /// Resolves a result's origin handle back to its store, e.g. to re-query
    /// it with that store's own link base.
    pub fn store(&self, id: StoreId) -> Option<&Arc<dyn ElementStore>> {
        self.stores.iter().find(|store| store.id() == id)
    }

    pub fn stores(&self) -> &[Arc<dyn ElementStore>] {
        &self.stores
    }

    pub fn find_all(&self) -> FetchResult<Vec<LoadResult<Element>>> {
        self.collect(|store| store.find_all())
    }

    pub fn find_type_by_name(&self, fragment: &str) -> FetchResult<Vec<LoadResult<TypeRecord>>> {
        self.collect(|store| store.find_type_by_name(fragment))
    }

    pub fn find_element_by_name(&self, fragment: &str) -> FetchResult<Vec<LoadResult<Element>>> {
        self.collect(|store| store.find_element_by_name(fragment))
    }

    pub fn find_by_qualified_name(
        &self,
        name: &QualifiedName,
    ) -> FetchResult<Vec<LoadResult<Element>>> {
        self.collect(|store| store.find_by_qualified_name(name))
    }

    pub fn autocomplete(&self, prompt: &str) -> FetchResult<Vec<String>> {
        let mut results = Vec::new();
        for store in &self.stores {
            results.extend(store.autocomplete(prompt)?);
        }
        Ok(results)
    }

    fn collect<T>(
        &self,
        mut query: impl FnMut(&dyn ElementStore) -> FetchResult<Vec<T>>,
    ) -> FetchResult<Vec<LoadResult<T>>> {
        let mut results = Vec::new();
        for store in &self.stores {
            let id = store.id();
            results.extend(
                query(store.as_ref())?
                    .into_iter()
                    .map(|value| LoadResult::new(value, id)),
            );
        }
        Ok(results)
    }
}
