//! Nullable key resolver.

use std::collections::HashMap;
use std::sync::Mutex;

use registrar_types::{ChainAddress, PrivateKey};
use registrar_wallet::KeyResolver;

/// A key resolver over a plain address → key map.
#[derive(Default)]
pub struct NullKeyResolver {
    keys: Mutex<HashMap<String, [u8; 32]>>,
}

impl NullKeyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, address: &ChainAddress, key: &PrivateKey) {
        self.keys
            .lock()
            .unwrap()
            .insert(address.as_str().to_string(), key.0);
    }
}

impl KeyResolver for NullKeyResolver {
    fn resolve_key(&self, address: &ChainAddress) -> Option<PrivateKey> {
        self.keys
            .lock()
            .unwrap()
            .get(address.as_str())
            .map(|bytes| PrivateKey(*bytes))
    }
}
