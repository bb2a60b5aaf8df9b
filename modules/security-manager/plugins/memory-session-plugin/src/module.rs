//! In-memory session store plugin module.

use std::sync::{Arc, OnceLock};

use chrono::TimeDelta;
use tracing::info;

use crate::config::MemorySessionPluginConfig;
use crate::domain::MemorySessionStore;

/// In-memory session store plugin module.
#[derive(Default)]
pub struct MemorySessionPlugin {
    store: OnceLock<Arc<MemorySessionStore>>,
}

impl MemorySessionPlugin {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Fails for a zero or out-of-range idle timeout or tombstone retention, or
    /// when the plugin was already initialized.
    pub fn init(&self, cfg: &MemorySessionPluginConfig) -> anyhow::Result<Arc<MemorySessionStore>> {
        info!("Initializing memory_session_plugin");

        let idle_timeout = positive_seconds("idle_timeout_secs", cfg.idle_timeout_secs)?;
        let retention = cfg
            .tombstone_retention_secs
            .map(|secs| positive_seconds("tombstone_retention_secs", secs))
            .transpose()?
            .unwrap_or(idle_timeout);

        info!(
            idle_timeout_secs = cfg.idle_timeout_secs,
            tombstone_retention_secs = retention.num_seconds(),
            bind_to_host = cfg.bind_to_host,
            "Loaded plugin configuration"
        );

        let store = Arc::new(
            MemorySessionStore::new(idle_timeout)
                .tombstone_retention(retention)
                .bind_to_host(cfg.bind_to_host),
        );
        self.store
            .set(Arc::clone(&store))
            .map_err(|_| anyhow::anyhow!("Session store already initialized"))?;

        Ok(store)
    }
}

fn positive_seconds(field: &str, secs: u64) -> anyhow::Result<TimeDelta> {
    i64::try_from(secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .filter(|delta| *delta > TimeDelta::zero())
        .ok_or_else(|| anyhow::anyhow!("{field} must be a positive number of seconds, got {secs}"))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn zero_idle_timeout_is_rejected() {
        let cfg = MemorySessionPluginConfig {
            idle_timeout_secs: 0,
            ..MemorySessionPluginConfig::default()
        };

        let err = MemorySessionPlugin::new().init(&cfg).err().unwrap();

        assert!(err.to_string().contains("idle_timeout_secs"));
    }

    #[test]
    fn zero_tombstone_retention_is_rejected() {
        let cfg = MemorySessionPluginConfig {
            tombstone_retention_secs: Some(0),
            ..MemorySessionPluginConfig::default()
        };

        let err = MemorySessionPlugin::new().init(&cfg).err().unwrap();

        assert!(err.to_string().contains("tombstone_retention_secs"));
    }

    #[test]
    fn second_init_fails() {
        let plugin = MemorySessionPlugin::new();
        let cfg = MemorySessionPluginConfig::default();

        plugin.init(&cfg).unwrap();

        assert!(plugin.init(&cfg).is_err());
    }
}
