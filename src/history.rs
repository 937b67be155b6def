//! Recent-query history: bounded, deduplicated, most-recent-first.
//!
//! The log update is a pure computation on [`HistoryLog`]; persistence is a
//! separate write-through step performed by [`SearchHistory`]. Store failures
//! never reach the caller: the in-memory log stays authoritative for the session.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::storage::BlobStore;

/// Maximum number of remembered queries.
pub const HISTORY_CAP: usize = 5;

/// Store key holding the serialized log.
pub const HISTORY_KEY: &str = "searchHistory";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryLog {
    entries: Vec<String>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a log from arbitrary strings, enforcing the log invariants.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::with_capacity(HISTORY_CAP);
        for entry in entries {
            let entry = entry.as_ref().trim();
            if entry.is_empty() || out.iter().any(|e| e == entry) {
                continue;
            }
            out.push(entry.to_string());
            if out.len() == HISTORY_CAP {
                break;
            }
        }
        Self { entries: out }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The log after recording `query`, or `None` when the query is blank.
    pub fn recorded(&self, query: &str) -> Option<HistoryLog> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        let entries = std::iter::once(query.to_string())
            .chain(self.entries.iter().filter(|e| e.as_str() != query).cloned())
            .take(HISTORY_CAP)
            .collect();
        Some(Self { entries })
    }

    pub fn encode(&self) -> String {
        serde_json::to_string(&self.entries).unwrap_or_else(|_| "[]".to_string())
    }

    /// Parse a persisted blob. Malformed input decodes to an empty log.
    pub fn decode(blob: &str) -> Self {
        match serde_json::from_str::<Vec<String>>(blob) {
            Ok(entries) => Self::from_entries(entries),
            Err(err) => {
                warn!(error = %err, "discarding malformed search history");
                Self::default()
            }
        }
    }
}

/// A [`HistoryLog`] bound to the store it is persisted in.
pub struct SearchHistory {
    log: HistoryLog,
    store: Arc<dyn BlobStore>,
}

impl std::fmt::Debug for SearchHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchHistory")
            .field("log", &self.log)
            .finish_non_exhaustive()
    }
}

impl SearchHistory {
    /// Reload the persisted log; absent, unreadable or malformed data yields an empty log.
    pub fn load(store: Arc<dyn BlobStore>) -> Self {
        let log = match store.get(HISTORY_KEY) {
            Ok(Some(blob)) => HistoryLog::decode(&blob),
            Ok(None) => HistoryLog::default(),
            Err(err) => {
                warn!(error = %err, "search history unavailable; starting empty");
                HistoryLog::default()
            }
        };
        debug!(entries = log.len(), "search history loaded");
        Self { log, store }
    }

    pub fn entries(&self) -> &[String] {
        self.log.entries()
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.log.entries().get(idx).map(String::as_str)
    }

    /// Move `query` to the front and persist. Blank queries change nothing.
    pub fn record(&mut self, query: &str) -> &[String] {
        if let Some(next) = self.log.recorded(query) {
            self.log = next;
            self.persist();
        }
        self.log.entries()
    }

    /// Forget every entry.
    pub fn clear(&mut self) {
        self.log = HistoryLog::default();
        self.persist();
    }

    fn persist(&self) {
        if let Err(err) = self.store.set(HISTORY_KEY, &self.log.encode()) {
            warn!(error = %err, "failed to persist search history");
        }
    }
}
