//! Browser Storage

use diy_checkout::{CheckoutError, KeyValueStorage, Result};

/// `window.localStorage`, which survives the round trip to the payment provider
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

fn local_storage() -> Result<web_sys::Storage> {
    web_sys::window()
        .ok_or_else(|| CheckoutError::Storage("no window".into()))?
        .local_storage()
        .map_err(|e| CheckoutError::Storage(format!("{e:?}")))?
        .ok_or_else(|| CheckoutError::Storage("localStorage disabled".into()))
}

impl KeyValueStorage for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        local_storage()?
            .get_item(key)
            .map_err(|e| CheckoutError::Storage(format!("{e:?}")))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        local_storage()?
            .set_item(key, value)
            .map_err(|e| CheckoutError::Storage(format!("{e:?}")))
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        local_storage()?
            .remove_item(key)
            .map_err(|e| CheckoutError::Storage(format!("{e:?}")))
    }
}
