use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use mercado_core::Entity;

use crate::catalog_store::StoreError;

/// Per-collection record storage.
///
/// Writes are atomic per record: `modify` runs its closure under the
/// collection's write lock, so a read-check-replace cannot interleave with
/// another writer of the same collection.
pub trait RecordStore<V: Entity>: Send + Sync {
    fn get(&self, id: &V::Id) -> Result<Option<V>, StoreError>;

    /// Insert a new record. Fails with `Conflict` if the id is taken.
    fn insert(&self, record: V) -> Result<V, StoreError>;

    /// Replace a record with the value computed from the stored one.
    ///
    /// Fails with `NotFound` if the id is absent. Nothing is written when the
    /// closure returns an error.
    fn modify(
        &self,
        id: &V::Id,
        f: &mut dyn FnMut(&V) -> Result<V, StoreError>,
    ) -> Result<V, StoreError>;

    /// All records, ordered by id.
    fn list(&self) -> Result<Vec<V>, StoreError>;
}

impl<V, S> RecordStore<V> for Arc<S>
where
    V: Entity,
    S: RecordStore<V> + ?Sized,
{
    fn get(&self, id: &V::Id) -> Result<Option<V>, StoreError> {
        (**self).get(id)
    }

    fn insert(&self, record: V) -> Result<V, StoreError> {
        (**self).insert(record)
    }

    fn modify(
        &self,
        id: &V::Id,
        f: &mut dyn FnMut(&V) -> Result<V, StoreError>,
    ) -> Result<V, StoreError> {
        (**self).modify(id, f)
    }

    fn list(&self) -> Result<Vec<V>, StoreError> {
        (**self).list()
    }
}

/// In-memory record store for tests/dev and the seed loader.
#[derive(Debug)]
pub struct InMemoryRecordStore<V: Entity> {
    inner: RwLock<BTreeMap<V::Id, V>>,
}

impl<V: Entity> InMemoryRecordStore<V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<V: Entity> Default for InMemoryRecordStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned(kind: &str) -> StoreError {
    StoreError::Backend(format!("{kind} collection lock poisoned"))
}

impl<V> RecordStore<V> for InMemoryRecordStore<V>
where
    V: Entity + Clone + Send + Sync + 'static,
    V::Id: Send + Sync,
{
    fn get(&self, id: &V::Id) -> Result<Option<V>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned(V::KIND))?;
        Ok(map.get(id).cloned())
    }

    fn insert(&self, record: V) -> Result<V, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned(V::KIND))?;
        let id = record.id().clone();
        if map.contains_key(&id) {
            return Err(StoreError::Conflict(format!("{} '{id}' already exists", V::KIND)));
        }
        map.insert(id, record.clone());
        Ok(record)
    }

    fn modify(
        &self,
        id: &V::Id,
        f: &mut dyn FnMut(&V) -> Result<V, StoreError>,
    ) -> Result<V, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned(V::KIND))?;
        let current = map.get(id).ok_or_else(|| StoreError::NotFound {
            entity: V::KIND,
            id: id.to_string(),
        })?;

        let next = f(current)?;
        if next.id() != id {
            return Err(StoreError::Conflict(format!(
                "{} '{id}' cannot change its id",
                V::KIND
            )));
        }
        map.insert(id.clone(), next.clone());
        Ok(next)
    }

    fn list(&self) -> Result<Vec<V>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned(V::KIND))?;
        Ok(map.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mercado_catalog::{Category, HexColor, NewCategory};
    use mercado_core::CategoryId;

    fn category(id: &str) -> Category {
        Category::create(
            NewCategory::new("Decoración", HexColor::parse("#9C27B0").unwrap())
                .with_id(CategoryId::parse(id).unwrap()),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn insert_rejects_duplicate_ids() {
        let store = InMemoryRecordStore::new();
        store.insert(category("cat4")).unwrap();
        let err = store.insert(category("cat4")).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn modify_missing_record_is_not_found() {
        let store: InMemoryRecordStore<Category> = InMemoryRecordStore::new();
        let id = CategoryId::parse("cat9").unwrap();
        let err = store.modify(&id, &mut |c| Ok(c.clone())).unwrap_err();
        assert_eq!(
            err,
            StoreError::NotFound {
                entity: "category",
                id: "cat9".to_string()
            }
        );
    }

    #[test]
    fn failed_modify_leaves_record_untouched() {
        let store = InMemoryRecordStore::new();
        let original = store.insert(category("cat4")).unwrap();
        let id = original.id.clone();

        let err = store
            .modify(&id, &mut |_| Err(StoreError::Validation("nope".to_string())))
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.get(&id).unwrap(), Some(original));
    }

    #[test]
    fn list_is_ordered_by_id() {
        let store = InMemoryRecordStore::new();
        for id in ["cat3", "cat1", "cat2"] {
            store.insert(category(id)).unwrap();
        }
        let ids: Vec<_> = store.list().unwrap().into_iter().map(|c| c.id.to_string()).collect();
        assert_eq!(ids, ["cat1", "cat2", "cat3"]);
    }
}
