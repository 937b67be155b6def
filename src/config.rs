//! Runtime configuration: defaults, then environment, then CLI flags.

use std::path::PathBuf;

use tracing::warn;

use crate::session::Latency;

/// Simulated index latency used when nothing else is configured.
pub const DEFAULT_LATENCY_MS: u64 = 500;

#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Directory holding persisted state (history blob).
    pub data_dir: PathBuf,
    /// Delay between submit and results.
    pub latency: Latency,
    /// Optional JSON corpus replacing the built-in sample.
    pub corpus_path: Option<PathBuf>,
    /// Keep history in memory only.
    pub ephemeral: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            data_dir: crate::default_data_dir(),
            latency: Latency::from_millis(DEFAULT_LATENCY_MS),
            corpus_path: None,
            ephemeral: false,
        }
    }
}

impl SearchConfig {
    /// Load config from environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(dir) = dotenvy::var("FSEARCH_DATA_DIR") {
            cfg.data_dir = PathBuf::from(dir);
        }

        if let Ok(val) = dotenvy::var("FSEARCH_LATENCY_MS") {
            match val.trim().parse::<u64>() {
                Ok(ms) => cfg.latency = Latency::from_millis(ms),
                Err(_) => warn!(value = %val, "ignoring unparseable FSEARCH_LATENCY_MS"),
            }
        }

        if let Ok(path) = dotenvy::var("FSEARCH_CORPUS") {
            cfg.corpus_path = Some(PathBuf::from(path));
        }

        cfg
    }

    /// Apply command-line overrides on top of the current values.
    pub fn with_overrides(
        mut self,
        data_dir: Option<PathBuf>,
        latency_ms: Option<u64>,
        corpus_path: Option<PathBuf>,
        ephemeral: bool,
    ) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        if let Some(ms) = latency_ms {
            self.latency = Latency::from_millis(ms);
        }
        if corpus_path.is_some() {
            self.corpus_path = corpus_path;
        }
        self.ephemeral |= ephemeral;
        self
    }
}
