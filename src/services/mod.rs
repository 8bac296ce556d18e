// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Side-effecting collaborators: REST API and persistent key-value store.

pub mod api;
pub mod storage;

use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::Config;
use api::ApiClient;
use storage::KeyValueStore;

/// Handles shared by the command workers.
#[derive(Clone)]
pub struct Services {
    pub api: ApiClient,
    store: Arc<Mutex<KeyValueStore>>,
}

impl Services {
    pub fn new(api: ApiClient, store: KeyValueStore) -> Self {
        Self {
            api,
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Build the API client and open the store described by `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api = ApiClient::new(config)?;
        let store = KeyValueStore::open(&config.store_path())?;
        Ok(Self::new(api, store))
    }

    /// Lock the store; a poisoned lock still yields the data.
    pub fn store(&self) -> MutexGuard<'_, KeyValueStore> {
        self.store
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
