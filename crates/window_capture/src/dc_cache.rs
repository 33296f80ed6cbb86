//! Per-thread device context cache

use capture_gdi::DeviceContext;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread::{self, ThreadId};

static SHARED: Lazy<Arc<DcCache>> = Lazy::new(|| Arc::new(DcCache::new()));

/// Process-wide cache
///
/// The first thread to touch it becomes the primary thread. Entries are never
/// released.
pub fn shared() -> Arc<DcCache> {
    SHARED.clone()
}

/// Device contexts keyed by the thread that acquired them
///
/// Lookups fall back to the primary thread's entry when the current thread
/// has none of its own. Each key has a single writer, its own thread.
#[derive(Debug)]
pub struct DcCache {
    primary: ThreadId,
    entries: Mutex<HashMap<ThreadId, DeviceContext>>,
}

impl DcCache {
    /// Cache whose primary thread is the calling thread
    pub fn new() -> Self {
        Self::with_primary(thread::current().id())
    }

    pub fn with_primary(primary: ThreadId) -> Self {
        Self {
            primary,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn primary(&self) -> ThreadId {
        self.primary
    }

    /// Entry for the current thread, else the primary thread's
    pub fn lookup(&self) -> Option<DeviceContext> {
        let entries = self.entries.lock();
        entries
            .get(&thread::current().id())
            .or_else(|| entries.get(&self.primary))
            .copied()
    }

    /// Cached context, or `acquire` one and store it for the current thread
    pub fn get_or_acquire<E, F>(&self, acquire: F) -> Result<DeviceContext, E>
    where
        F: FnOnce() -> Result<DeviceContext, E>,
    {
        if let Some(dc) = self.lookup() {
            return Ok(dc);
        }

        let dc = acquire()?;
        self.entries.lock().insert(thread::current().id(), dc);
        Ok(dc)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for DcCache {
    fn default() -> Self {
        Self::new()
    }
}
