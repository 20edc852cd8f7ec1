//! Shared mock adapters for unit tests (no browser environment needed).

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;

use crate::env::{Clock, Latency};
use crate::store::CredentialStore;

/// In-memory stand-in for LocalStorage.
pub struct MemoryStore {
    map: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            map: RefCell::new(HashMap::new()),
        }
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.map.borrow_mut().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.map.borrow_mut().remove(key);
    }
}

pub fn new_memory_store() -> Rc<MemoryStore> {
    Rc::new(MemoryStore::new())
}

/// Clock pinned to a known instant, so minted demo tokens are predictable.
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_millis(&self) -> u64 {
        self.0
    }
}

/// Latency adapter that resolves immediately.
pub struct NoLatency;

#[async_trait(?Send)]
impl Latency for NoLatency {
    async fn sleep(&self, _millis: u32) {}
}
