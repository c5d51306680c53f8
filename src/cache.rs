//! In-memory memo of generated images.
//!
//! Entries are keyed by (prompt, aspect ratio) and live as long as the cache
//! does: there is no eviction and no expiry. Only successful generations are
//! ever stored.

use crate::models::ImageRequest;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cloning shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct ImageCache {
    entries: Arc<Mutex<HashMap<ImageRequest, String>>>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<ImageRequest, String>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &ImageRequest) -> Option<String> {
        self.entries().get(key).cloned()
    }

    /// Stores `data_uri` under `key`, replacing any earlier value.
    pub fn insert(&self, key: ImageRequest, data_uri: String) {
        self.entries().insert(key, data_uri);
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}
