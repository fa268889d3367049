//! Checkout Intent Storage
//!
//! A pending checkout is staged in durable client storage before the user is
//! sent to the payment provider, and read back when they return.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{CheckoutError, Result};

/// Storage key used when none is configured
pub const DEFAULT_INTENT_KEY: &str = "diy.pending_checkout";

/// A checkout staged before leaving for the payment provider
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutIntent {
    /// Correlation token echoed back by the provider as `ba_token`
    pub authorization_token: String,

    /// Plan display name
    pub plan_name: String,

    /// Display-formatted price, e.g. "$9.99"
    pub price: String,
}

impl CheckoutIntent {
    pub fn new(
        authorization_token: impl Into<String>,
        plan_name: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            authorization_token: authorization_token.into(),
            plan_name: plan_name.into(),
            price: price.into(),
        }
    }
}

/// String key-value storage backend.
///
/// Browser storage handles are not `Send`, so implementations are not
/// required to be either.
pub trait KeyValueStorage {
    /// Get the value stored under `key`
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing an absent key is not an error
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// In-memory storage. Clones share the same entries.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> CheckoutError {
    CheckoutError::Storage("memory storage lock poisoned".into())
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.items.read().map_err(poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.write().map_err(poisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self.items.write().map_err(poisoned)?;
        items.remove(key);
        Ok(())
    }
}

/// Holds at most one pending [`CheckoutIntent`] on top of a [`KeyValueStorage`].
#[derive(Clone, Debug)]
pub struct IntentStore<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> IntentStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_INTENT_KEY)
    }

    /// Use a custom storage key
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the underlying storage
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Stage an intent. Last write wins.
    pub fn write(&self, intent: &CheckoutIntent) -> Result<()> {
        let encoded = serde_json::to_string(intent)
            .map_err(|e| CheckoutError::Storage(e.to_string()))?;
        self.storage.set_item(&self.key, &encoded)?;

        tracing::debug!(
            key = %self.key,
            plan = %intent.plan_name,
            "Staged checkout intent"
        );
        Ok(())
    }

    /// Read the staged intent.
    ///
    /// Unreadable or malformed entries are reported as absent.
    pub fn read(&self) -> Option<CheckoutIntent> {
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Checkout intent unreadable");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(intent) => Some(intent),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Discarding malformed checkout intent");
                None
            }
        }
    }

    /// Remove the staged intent. No-op when nothing is staged.
    pub fn clear(&self) -> Result<()> {
        self.storage.remove_item(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pro_intent() -> CheckoutIntent {
        CheckoutIntent::new("ABC123", "Pro", "$9.99")
    }

    #[test]
    fn test_write_then_read() {
        let store = IntentStore::new(MemoryStorage::new());
        store.write(&pro_intent()).unwrap();
        assert_eq!(store.read(), Some(pro_intent()));
    }

    #[test]
    fn test_last_write_wins() {
        let store = IntentStore::new(MemoryStorage::new());
        store.write(&pro_intent()).unwrap();
        store
            .write(&CheckoutIntent::new("DEF456", "Team", "$24.99"))
            .unwrap();

        let intent = store.read().unwrap();
        assert_eq!(intent.authorization_token, "DEF456");
        assert_eq!(store.storage().len(), 1);
    }

    #[test]
    fn test_read_absent() {
        let store = IntentStore::new(MemoryStorage::new());
        assert!(store.read().is_none());
    }

    #[test]
    fn test_malformed_entry_reads_as_absent() {
        let storage = MemoryStorage::new();
        storage.set_item(DEFAULT_INTENT_KEY, "{not json").unwrap();

        let store = IntentStore::new(storage);
        assert!(store.read().is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = IntentStore::new(MemoryStorage::new());
        store.write(&pro_intent()).unwrap();

        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.read().is_none());
        assert!(store.storage().is_empty());
    }

    #[test]
    fn test_stored_as_camel_case_json() {
        let storage = MemoryStorage::new();
        let store = IntentStore::with_key(storage.clone(), "custom");
        store.write(&pro_intent()).unwrap();

        let raw = storage.get_item("custom").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["authorizationToken"], "ABC123");
        assert_eq!(value["planName"], "Pro");
        assert_eq!(value["price"], "$9.99");
    }
}
