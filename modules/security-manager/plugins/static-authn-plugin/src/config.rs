//! Configuration for the static authenticator plugin.

use secrecy::SecretString;
use serde::{Deserialize, Serialize, Serializer};

/// Plugin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticAuthnPluginConfig {
    /// Authentication mode.
    pub mode: AuthnMode,

    /// Realm name attached to every principal this plugin produces.
    pub realm: String,

    /// Static accounts for `static_accounts` mode.
    pub accounts: Vec<AccountConfig>,
}

impl Default for StaticAuthnPluginConfig {
    fn default() -> Self {
        Self {
            mode: AuthnMode::AcceptAll,
            realm: "static".to_owned(),
            accounts: Vec::new(),
        }
    }
}

/// Authentication mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthnMode {
    /// Accept any non-empty username and password.
    #[default]
    AcceptAll,
    /// Accept only the configured accounts.
    StaticAccounts,
}

/// One account of the static table.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AccountConfig {
    pub username: String,

    #[serde(serialize_with = "redacted")]
    pub password: SecretString,

    /// Locked accounts exist but always fail authentication.
    #[serde(default)]
    pub locked: bool,

    /// Principals added after the username, which is always the primary one.
    #[serde(default)]
    pub principals: Vec<String>,
}

fn redacted<S: Serializer>(_secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str("[REDACTED]")
}
