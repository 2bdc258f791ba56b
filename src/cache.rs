//! Caller-owned merge caching keyed by raw-table content.
//!
//! The merge pipeline itself is pure and cache-free; embedding applications
//! that re-analyze the same tables (a dashboard reloading on every
//! interaction, say) can hold a [`MergeCache`] and skip identical merges.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::debug;

use analytics_core::{RawTables, Result};

use crate::session::AnalysisSession;

/// Content fingerprint of a set of raw tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// SHA-256 over every table's name, header, and cells, with length framing
/// so distinct layouts can never collide by concatenation.
pub fn table_fingerprint(raw: &RawTables) -> Fingerprint {
    fn update_framed(hasher: &mut Sha256, value: &str) {
        hasher.update((value.len() as u64).to_le_bytes());
        hasher.update(value.as_bytes());
    }

    let mut hasher = Sha256::new();
    for table in raw.all() {
        update_framed(&mut hasher, table.name());
        for column in table.columns() {
            update_framed(&mut hasher, column);
        }
        for row in table.rows() {
            for cell in row {
                update_framed(&mut hasher, cell);
            }
        }
    }
    Fingerprint(hasher.finalize().into())
}

/// A bounded cache of built analysis sessions, keyed by table fingerprint.
pub struct MergeCache {
    inner: moka::sync::Cache<Fingerprint, Arc<AnalysisSession>>,
}

impl MergeCache {
    /// A cache holding up to `capacity` merged sessions.
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: moka::sync::Cache::builder().max_capacity(capacity).build(),
        }
    }

    /// Return the cached session for these tables, building and caching it
    /// on a miss. Load errors are returned, not cached.
    pub fn get_or_build(&self, raw: &RawTables) -> Result<Arc<AnalysisSession>> {
        let key = table_fingerprint(raw);
        if let Some(session) = self.inner.get(&key) {
            debug!(fingerprint = %key.to_hex(), "merge cache hit");
            return Ok(session);
        }
        debug!(fingerprint = %key.to_hex(), "merge cache miss");
        let session = Arc::new(AnalysisSession::build(raw)?);
        self.inner.insert(key, Arc::clone(&session));
        Ok(session)
    }

    pub fn len(&self) -> u64 {
        self.inner.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
