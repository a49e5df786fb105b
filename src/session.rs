use web_sys::Storage;

use initmusic_core::{SessionStore, StoreError};

use crate::dom::js_err;

/// `window.sessionStorage`, or nothing when the browser denies it
/// (private mode, sandboxed iframes). Reads then see an empty store.
pub(crate) struct BrowserSessionStore {
    storage: Option<Storage>,
}

impl BrowserSessionStore {
    pub(crate) fn open() -> Self {
        let storage = web_sys::window().and_then(|window| window.session_storage().ok().flatten());
        if storage.is_none() {
            gloo::console::warn!("session storage: unavailable");
        }
        Self { storage }
    }
}

impl SessionStore for BrowserSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let storage = self.storage.as_ref().ok_or(StoreError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|err| StoreError::WriteRejected {
                key: key.to_string(),
                reason: js_err(err),
            })
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = self.storage.as_ref() {
            if let Err(err) = storage.remove_item(key) {
                gloo::console::warn!("session storage: remove failed", key, js_err(err));
            }
        }
    }
}
