// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! JSON values in browser `localStorage`.
//!
//! When storage is unavailable (private browsing, no window) reads find
//! nothing and writes are dropped, so reviews still work for the session.

use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use web_sys::Storage as WebStorage;

pub struct Storage {
    inner: Option<WebStorage>,
}

impl Storage {
    pub fn new() -> Self {
        let inner = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        Self { inner }
    }

    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, JsValue> {
        let Some(storage) = &self.inner else {
            return Ok(None);
        };
        match storage.get_item(key)? {
            Some(data) => serde_json::from_str(&data)
                .map(Some)
                .map_err(|e| JsValue::from_str(&format!("Failed to load '{key}': {e}"))),
            None => Ok(None),
        }
    }

    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), JsValue> {
        let Some(storage) = &self.inner else {
            return Ok(());
        };
        let data = serde_json::to_string(value)
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize '{key}': {e}")))?;
        storage.set_item(key, &data)
    }

    pub fn remove(&self, key: &str) -> Result<(), JsValue> {
        match &self.inner {
            Some(storage) => storage.remove_item(key),
            None => Ok(()),
        }
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}
