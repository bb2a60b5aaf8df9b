//! Configuration for the in-memory session store.

use serde::{Deserialize, Serialize};

/// Plugin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MemorySessionPluginConfig {
    /// Seconds without access after which a session expires. Must be positive.
    pub idle_timeout_secs: u64,

    /// Seconds a stopped or expired id keeps reporting why it is invalid
    /// before a sweep forgets it. Defaults to the idle timeout.
    pub tombstone_retention_secs: Option<u64>,

    /// Deny lookups from caller scopes whose host differs from the session's.
    pub bind_to_host: bool,
}

impl Default for MemorySessionPluginConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 30 * 60,
            tombstone_retention_secs: None,
            bind_to_host: false,
        }
    }
}
