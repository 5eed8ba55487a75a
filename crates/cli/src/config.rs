//! Layered run configuration.
//!
//! Values come from, in increasing priority: an optional TOML file,
//! `POOLAUDIT_`-prefixed environment variables, then command-line flags.

use anyhow::{Context, Result};
use config::{Config, Environment, File as ConfigFile};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Everything a run needs: which pool to audit, the block range to scan,
/// and the fixture files standing in for the ledger.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AuditConfig {
    pub pool: Option<String>,
    pub from_block: Option<u64>,
    pub to_block: Option<u64>,
    pub events: Option<PathBuf>,
    pub balances: Option<PathBuf>,
}

impl AuditConfig {
    /// Load from the optional config file plus environment overrides.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = config_path {
            builder = builder.add_source(ConfigFile::from(path.to_path_buf()));
        }
        builder = builder.add_source(Environment::with_prefix("POOLAUDIT"));

        let settings = builder
            .build()
            .context("failed to read audit configuration")?;

        settings
            .try_deserialize()
            .context("invalid audit configuration")
    }

    /// Apply command-line overrides on top of file/env values.
    pub fn with_overrides(
        mut self,
        pool: Option<String>,
        from_block: Option<u64>,
        to_block: Option<u64>,
        events: Option<PathBuf>,
        balances: Option<PathBuf>,
    ) -> Self {
        if pool.is_some() {
            self.pool = pool;
        }
        if from_block.is_some() {
            self.from_block = from_block;
        }
        if to_block.is_some() {
            self.to_block = to_block;
        }
        if events.is_some() {
            self.events = events;
        }
        if balances.is_some() {
            self.balances = balances;
        }
        self
    }

    pub fn pool(&self) -> Result<&str> {
        self.pool
            .as_deref()
            .context("pool address not configured (use --pool, POOLAUDIT_POOL, or the config file)")
    }

    pub fn block_range(&self) -> Result<(u64, u64)> {
        let from_block = self.from_block.context("from_block not configured")?;
        let to_block = self.to_block.context("to_block not configured")?;
        anyhow::ensure!(
            from_block <= to_block,
            "from_block {from_block} is past to_block {to_block}"
        );
        Ok((from_block, to_block))
    }

    pub fn events_path(&self) -> Result<&Path> {
        self.events
            .as_deref()
            .context("events fixture path not configured")
    }

    pub fn balances_path(&self) -> Result<&Path> {
        self.balances
            .as_deref()
            .context("balances fixture path not configured")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_values_load_and_flags_override() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            "pool = \"0x{}\"\nfrom_block = 100\nto_block = 200",
            "ab".repeat(20)
        )
        .unwrap();

        let cfg = AuditConfig::load(Some(file.path())).unwrap().with_overrides(
            None,
            None,
            Some(300),
            None,
            None,
        );

        assert_eq!(cfg.block_range().unwrap(), (100, 300));
        assert!(cfg.pool().unwrap().starts_with("0xab"));
    }

    #[test]
    fn inverted_range_rejected() {
        let cfg = AuditConfig {
            from_block: Some(50),
            to_block: Some(10),
            ..Default::default()
        };

        assert!(cfg.block_range().is_err());
    }

    #[test]
    fn missing_values_surface_as_errors() {
        let cfg = AuditConfig::default();
        assert!(cfg.pool().is_err());
        assert!(cfg.events_path().is_err());
    }
}
