//! Storage locations, resolved from the environment.

use std::path::PathBuf;

use anyhow::Context;

pub const DATA_DIR_ENV: &str = "STOCKROOM_DATA_DIR";
pub const INVENTORY_FILE_ENV: &str = "STOCKROOM_INVENTORY_FILE";
pub const LOG_FILE_ENV: &str = "STOCKROOM_LOG_FILE";
pub const EXPORT_DIR_ENV: &str = "STOCKROOM_EXPORT_DIR";

/// Where the inventory snapshot, transaction log and exports are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub inventory_file: PathBuf,
    pub log_file: PathBuf,
    pub export_dir: PathBuf,
}

impl StorageConfig {
    /// Default file names under `base`.
    pub fn in_dir(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            inventory_file: base.join("inventory.csv"),
            log_file: base.join("log.csv"),
            export_dir: base.join("exports"),
        }
    }

    /// Resolve from `STOCKROOM_*` environment variables.
    ///
    /// Unset (or empty) variables fall back to `{data_dir}/stockroom`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`StorageConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base = match var(DATA_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };
        let mut config = Self::in_dir(base);

        if let Some(path) = var(INVENTORY_FILE_ENV) {
            config.inventory_file = PathBuf::from(path);
        }
        if let Some(path) = var(LOG_FILE_ENV) {
            config.log_file = PathBuf::from(path);
        }
        if let Some(path) = var(EXPORT_DIR_ENV) {
            config.export_dir = PathBuf::from(path);
        }
        Ok(config)
    }

    /// Create the parent directories of the inventory and log files.
    pub fn ensure_dirs(&self) -> anyhow::Result<()> {
        for file in [&self.inventory_file, &self.log_file] {
            if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory at {parent:?}"))?;
            }
        }
        Ok(())
    }
}

/// `{app_data_dir}/stockroom`.
fn default_data_dir() -> anyhow::Result<PathBuf> {
    let mut dir = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;
    dir.push("stockroom");
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn data_dir_sets_all_defaults() {
        let config = StorageConfig::from_lookup(lookup(&[(DATA_DIR_ENV, "/srv/stock")])).unwrap();
        assert_eq!(config, StorageConfig::in_dir("/srv/stock"));
        assert_eq!(config.log_file, PathBuf::from("/srv/stock/log.csv"));
    }

    #[test]
    fn explicit_files_override_data_dir() {
        let config = StorageConfig::from_lookup(lookup(&[
            (DATA_DIR_ENV, "/srv/stock"),
            (INVENTORY_FILE_ENV, "/tmp/inv.csv"),
            (EXPORT_DIR_ENV, ""),
        ]))
        .unwrap();
        assert_eq!(config.inventory_file, PathBuf::from("/tmp/inv.csv"));
        assert_eq!(config.export_dir, PathBuf::from("/srv/stock/exports"));
    }

    #[test]
    fn ensure_dirs_creates_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let config = StorageConfig::in_dir(tmp.path().join("nested").join("data"));
        config.ensure_dirs().unwrap();
        assert!(tmp.path().join("nested").join("data").is_dir());
    }
}
