// src/store/memory.rs

//! In-memory seen-store backend for development and tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::store::SeenStore;

/// Expiring in-memory map keyed by listing id.
///
/// Expiry is enforced lazily on read; nothing sweeps in the background.
#[derive(Default)]
pub struct MemorySeenStore {
    deadlines: Mutex<HashMap<String, Instant>>,
}

impl MemorySeenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        let mut deadlines = self.deadlines.lock().expect("seen-store lock");
        deadlines.retain(|_, deadline| *deadline > now);
        deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SeenStore for MemorySeenStore {
    async fn exists(&self, id: &str) -> Result<bool> {
        let mut deadlines = self
            .deadlines
            .lock()
            .map_err(|_| AppError::store("seen-store lock poisoned"))?;

        match deadlines.get(id) {
            Some(deadline) if *deadline > Instant::now() => Ok(true),
            Some(_) => {
                deadlines.remove(id);
                Ok(false)
            }
            None => Ok(false),
        }
    }

    async fn set_with_expiry(&self, id: &str, ttl: Duration, _value: &str) -> Result<()> {
        let mut deadlines = self
            .deadlines
            .lock()
            .map_err(|_| AppError::store("seen-store lock poisoned"))?;

        deadlines.insert(id.to_string(), Instant::now() + ttl);
        Ok(())
    }
}
