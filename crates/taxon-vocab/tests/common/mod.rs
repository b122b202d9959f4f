// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs, dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use taxon_app_core::config::{ConfigError, ConfigStore};
use taxon_vocab::TagEntry;

/// In-memory blob store for exercising the vocabulary store.
#[derive(Default)]
pub struct MemStore {
    blobs: RefCell<HashMap<String, Vec<u8>>>,
}

impl MemStore {
    pub fn with_blob(key: &str, data: &[u8]) -> Self {
        let store = Self::default();
        store
            .blobs
            .borrow_mut()
            .insert(key.to_owned(), data.to_vec());
        store
    }

    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.blobs.borrow().get(key).cloned()
    }
}

impl ConfigStore for MemStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        self.blobs
            .borrow()
            .get(key)
            .cloned()
            .ok_or(ConfigError::NotFound)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        self.blobs.borrow_mut().insert(key.to_owned(), data.to_vec());
        Ok(())
    }
}

pub fn entry(tag: &str, facet: &str) -> TagEntry {
    TagEntry::new(tag, facet, "test", "", false)
}
