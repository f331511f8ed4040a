//! Bounded in-memory activity registry
//!
//! Keeps a most-recent-first log of metadata lookups for inspection by the
//! UI. The registry is strictly bounded: inserting beyond capacity evicts the
//! oldest entry, so memory stays constant regardless of call volume. Entries
//! live for the process lifetime only and are not keyed, so repeated lookups
//! of the same document appear multiple times.
//!
//! The registry is constructed once at startup and injected into the router
//! through shared state; there is no process-global instance.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::resolver::DocRef;

/// Default maximum number of records retained.
pub const DEFAULT_CAPACITY: usize = 10;

/// A single metadata lookup result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Resolved document identifier.
    pub id: String,
    /// Best-effort document title.
    pub title: String,
    /// When the lookup completed.
    pub timestamp: DateTime<Utc>,
}

impl MetadataRecord {
    /// Create a record for a just-completed lookup, stamped with the
    /// current time.
    pub fn new(doc: &DocRef, title: impl Into<String>) -> Self {
        Self {
            id: doc.id.clone(),
            title: title.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Counters describing registry usage since startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryStats {
    /// Current number of retained records.
    pub count: usize,
    /// Maximum number of retained records.
    pub capacity: usize,
    /// Records appended since startup.
    pub total_recorded: u64,
    /// Records evicted to keep the registry within capacity.
    pub evictions: u64,
}

/// Bounded, newest-first log of [`MetadataRecord`]s.
pub struct ActivityRegistry {
    records: RwLock<VecDeque<MetadataRecord>>,
    capacity: usize,
    total_recorded: AtomicU64,
    evictions: AtomicU64,
}

impl ActivityRegistry {
    /// Create a registry with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a registry retaining at most `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
            total_recorded: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Append a record at the front, evicting the oldest entry if the
    /// registry is at capacity.
    ///
    /// The prepend and truncate happen under a single write guard with no
    /// intervening await, so the mutation is atomic with respect to every
    /// other request.
    pub async fn record(&self, record: MetadataRecord) {
        let mut records = self.records.write().await;
        records.push_front(record);
        while records.len() > self.capacity {
            if let Some(evicted) = records.pop_back() {
                debug!(id = %evicted.id, "evicting oldest registry entry");
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }
        self.total_recorded.fetch_add(1, Ordering::Relaxed);
    }

    /// Return up to `limit` most-recent records, newest first, without
    /// mutating the registry.
    pub async fn recent(&self, limit: usize) -> Vec<MetadataRecord> {
        let records = self.records.read().await;
        records.iter().take(limit).cloned().collect()
    }

    /// Current number of retained records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the registry holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Usage counters since startup.
    pub async fn stats(&self) -> RegistryStats {
        RegistryStats {
            count: self.records.read().await.len(),
            capacity: self.capacity,
            total_recorded: self.total_recorded.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    /// The configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ActivityRegistry {
    fn default() -> Self {
        Self::new()
    }
}
