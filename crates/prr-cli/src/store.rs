//! # Snapshot Store
//!
//! Persists a [`Network`] as a pretty-printed JSON [`NetworkSnapshot`].
//! A missing file loads as an empty network, so the first command against
//! a fresh path starts from scratch.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use prr_core::NetworkConfig;
use prr_network::{Network, NetworkSnapshot};

/// A snapshot file bound to a path.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
    config: NetworkConfig,
}

impl Store {
    /// Bind to `path`; `config` applies to every network loaded from it.
    pub fn new(path: impl Into<PathBuf>, config: NetworkConfig) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }

    /// The bound path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the network, or an empty one if the file does not exist.
    pub fn load(&self) -> Result<Network> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no snapshot; starting empty");
            return Ok(Network::new(self.config));
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read snapshot: {}", self.path.display()))?;
        let snapshot: NetworkSnapshot = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse snapshot: {}", self.path.display()))?;
        let network = Network::restore(snapshot, self.config)
            .with_context(|| format!("inconsistent snapshot: {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "snapshot loaded");
        Ok(network)
    }

    /// Write the network if it changed since it was loaded or last saved.
    /// Returns whether anything was written.
    pub fn save(&self, network: &mut Network) -> Result<bool> {
        if !network.is_dirty() {
            return Ok(false);
        }
        write_snapshot(&self.path, network)?;
        network.mark_saved();
        Ok(true)
    }

    /// Write the network to `path` unconditionally and rebind to it.
    pub fn save_as(&mut self, network: &mut Network, path: impl Into<PathBuf>) -> Result<()> {
        self.path = path.into();
        write_snapshot(&self.path, network)?;
        network.mark_saved();
        Ok(())
    }
}

fn write_snapshot(path: &Path, network: &Network) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(&network.snapshot())?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write snapshot: {}", path.display()))?;
    tracing::debug!(path = %path.display(), "snapshot saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use prr_core::TaxId;

    fn populated() -> Network {
        let mut net = Network::default();
        net.register_client("ana", "Ana", TaxId(1)).unwrap();
        net.register_terminal("BASIC", "111111", "ana").unwrap();
        net
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("network.json"), NetworkConfig::default());
        let net = store.load().unwrap();
        assert_eq!(net.clients().count(), 0);
        assert!(!net.is_dirty());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("network.json"), NetworkConfig::default());
        let mut net = populated();
        assert!(store.save(&mut net).unwrap());
        assert!(!net.is_dirty());

        let loaded = store.load().unwrap();
        assert_eq!(loaded.snapshot(), net.snapshot());
    }

    #[test]
    fn clean_network_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("network.json"), NetworkConfig::default());
        let mut net = Network::default();
        assert!(!store.save(&mut net).unwrap());
        assert!(!store.path().exists());
    }

    #[test]
    fn save_as_rebinds_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::new(dir.path().join("a.json"), NetworkConfig::default());
        let mut net = populated();
        let target = dir.path().join("nested").join("b.json");
        store.save_as(&mut net, &target).unwrap();
        assert_eq!(store.path(), target.as_path());
        assert!(target.exists());
        assert!(!dir.path().join("a.json").exists());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("network.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = Store::new(&path, NetworkConfig::default());
        let err = store.load().unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse snapshot"));
    }
}
