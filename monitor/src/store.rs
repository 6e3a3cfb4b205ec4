//! Settings and state persistence.
//!
//! The core only ever reads configuration and replaces state; editing the
//! configuration belongs to an external settings surface, which goes through
//! [`JsonSettingsStore::replace_config`] or its own storage entirely.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};

use crate::config::MonitorConfig;
use crate::error::{MonitorError, Result};
use crate::state::ScanState;

/// Collaborator contract for settings and state persistence.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Current configuration.
    async fn config(&self) -> Result<MonitorConfig>;

    /// State snapshot from the last successful cycle.
    async fn state(&self) -> Result<ScanState>;

    /// Replace the persisted state wholesale.
    async fn replace_state(&self, state: &ScanState) -> Result<()>;

    /// First-activation hook: seed an empty baseline (watermark 0) if no
    /// state is stored yet. Idempotent.
    async fn mark_activated(&self) -> Result<()>;
}

/// File-backed store keeping config and state as JSON documents.
pub struct JsonSettingsStore {
    /// Directory holding `config.json` and `state.json`.
    root: PathBuf,
}

impl JsonSettingsStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(&root)
            .await
            .map_err(|e| MonitorError::Store(format!("create {}: {e}", root.display())))?;

        Ok(Self { root })
    }

    /// Persist a new configuration, for settings editors and tests.
    pub async fn replace_config(&self, config: &MonitorConfig) -> Result<()> {
        self.save_json(&self.config_path(), config).await?;
        debug!("Saved configuration for {}", config.root.display());
        Ok(())
    }

    fn config_path(&self) -> PathBuf {
        self.root.join("config.json")
    }

    fn state_path(&self) -> PathBuf {
        self.root.join("state.json")
    }

    /// Write `value` as pretty JSON, atomically (temp file + rename).
    async fn save_json<T: serde::Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let content = serde_json::to_string_pretty(value)?;

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, &content)
            .await
            .map_err(|e| MonitorError::Store(format!("write {}: {e}", temp_path.display())))?;

        fs::rename(&temp_path, path)
            .await
            .map_err(|e| MonitorError::Store(format!("rename to {}: {e}", path.display())))?;

        Ok(())
    }

    /// Read a JSON document, or `None` when the file does not exist yet.
    async fn load_json<T: serde::de::DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        match fs::read_to_string(path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(MonitorError::Store(format!("read {}: {e}", path.display()))),
        }
    }
}

#[async_trait]
impl SettingsStore for JsonSettingsStore {
    async fn config(&self) -> Result<MonitorConfig> {
        self.load_json(&self.config_path())
            .await?
            .ok_or_else(|| MonitorError::Config("no configuration stored".to_string()))
    }

    async fn state(&self) -> Result<ScanState> {
        Ok(self
            .load_json(&self.state_path())
            .await?
            .unwrap_or_else(ScanState::empty))
    }

    async fn replace_state(&self, state: &ScanState) -> Result<()> {
        self.save_json(&self.state_path(), state).await?;
        debug!("Saved state ({} known files)", state.known_files.len());
        Ok(())
    }

    async fn mark_activated(&self) -> Result<()> {
        if self.load_json::<ScanState>(&self.state_path()).await?.is_none() {
            self.replace_state(&ScanState::empty()).await?;
            info!("Activated: seeded empty baseline");
        }
        Ok(())
    }
}
