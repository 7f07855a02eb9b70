use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use tower_sessions::Session;

use crate::models::{RepositoryError, RepositoryResult};

/// Key-value storage scoped to one visitor's session
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read the raw value stored under `key`
    async fn get_value(&self, key: &str) -> RepositoryResult<Option<Value>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set_value(&self, key: &str, value: Value) -> RepositoryResult<()>;

    /// Remove `key`; returns whether it was present
    async fn delete(&self, key: &str) -> RepositoryResult<bool>;
}

/// Read a typed value, falling back to `T::default()` when the key is absent
pub async fn get_or_default<T>(store: &dyn SessionStore, key: &str) -> RepositoryResult<T>
where
    T: DeserializeOwned + Default,
{
    match store.get_value(key).await? {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(T::default()),
    }
}

/// Serialize and store a typed value
pub async fn set<T>(store: &dyn SessionStore, key: &str, value: &T) -> RepositoryResult<()>
where
    T: Serialize + ?Sized + Sync,
{
    store.set_value(key, serde_json::to_value(value)?).await
}

#[async_trait]
impl SessionStore for Session {
    async fn get_value(&self, key: &str) -> RepositoryResult<Option<Value>> {
        Ok(Session::get_value(self, key).await?)
    }

    async fn set_value(&self, key: &str, value: Value) -> RepositoryResult<()> {
        Ok(self.insert_value(key, value).await.map(|_| ())?)
    }

    async fn delete(&self, key: &str) -> RepositoryResult<bool> {
        Ok(self.remove_value(key).await?.is_some())
    }
}

/// Process-local session used by tests and benches
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    values: Mutex<HashMap<String, Value>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values
            .lock()
            .map(|values| values.contains_key(key))
            .unwrap_or(false)
    }

    fn lock(&self) -> RepositoryResult<std::sync::MutexGuard<'_, HashMap<String, Value>>> {
        self.values
            .lock()
            .map_err(|e| RepositoryError::SessionBackend {
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_value(&self, key: &str) -> RepositoryResult<Option<Value>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set_value(&self, key: &str, value: Value) -> RepositoryResult<()> {
        self.lock()?.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> RepositoryResult<bool> {
        Ok(self.lock()?.remove(key).is_some())
    }
}
