//! Application configuration: one section per module.

use std::path::Path;

use anyhow::{Context, bail};
use cookie_remember_me_plugin::config::CookieRememberMePluginConfig;
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use memory_session_plugin::config::MemorySessionPluginConfig;
use security_manager::SecurityManagerConfig;
use serde::{Deserialize, Serialize};
use static_authn_plugin::config::StaticAuthnPluginConfig;

/// Prefix of environment overrides, e.g.
/// `GATEKEEPER__MEMORY_SESSION__IDLE_TIMEOUT_SECS=60`.
pub const ENV_PREFIX: &str = "GATEKEEPER__";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub security_manager: SecurityManagerConfig,
    pub static_authn: StaticAuthnPluginConfig,
    pub memory_session: MemorySessionPluginConfig,

    /// Remember-me is disabled unless this section is present.
    pub cookie_remember_me: Option<CookieRememberMePluginConfig>,
}

impl AppConfig {
    /// Load the optional YAML file, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Fails when `path` does not exist or the merged document does not match
    /// the configuration schema.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            if !path.is_file() {
                bail!("configuration file '{}' not found", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid configuration")
    }
}
