//! Cookie remember-me plugin module.

use std::sync::{Arc, OnceLock};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use secrecy::ExposeSecret;
use tracing::info;

use crate::config::CookieRememberMePluginConfig;
use crate::domain::CookieRememberMe;

/// Cookie remember-me plugin module.
#[derive(Default)]
pub struct CookieRememberMePlugin {
    provider: OnceLock<Arc<CookieRememberMe>>,
}

impl CookieRememberMePlugin {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Fails for a missing, malformed or short signing key, or when the plugin
    /// was already initialized.
    pub fn init(&self, cfg: &CookieRememberMePluginConfig) -> anyhow::Result<Arc<CookieRememberMe>> {
        info!("Initializing cookie_remember_me_plugin");

        let encoded = cfg.signing_key.expose_secret();
        if encoded.is_empty() {
            anyhow::bail!("signing_key is required for the cookie remember-me plugin");
        }
        let key = STANDARD
            .decode(encoded)
            .map_err(|e| anyhow::anyhow!("signing_key is not valid base64: {e}"))?;
        let provider = Arc::new(CookieRememberMe::new(key)?);

        self.provider
            .set(Arc::clone(&provider))
            .map_err(|_| anyhow::anyhow!("Remember-me provider already initialized"))?;

        info!("Cookie remember-me plugin initialized");
        Ok(provider)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn config(key: &str) -> CookieRememberMePluginConfig {
        CookieRememberMePluginConfig {
            signing_key: SecretString::from(key.to_owned()),
        }
    }

    #[test]
    fn missing_key_is_rejected() {
        let err = CookieRememberMePlugin::new()
            .init(&CookieRememberMePluginConfig::default())
            .unwrap_err();

        assert!(err.to_string().contains("signing_key is required"));
    }

    #[test]
    fn malformed_and_short_keys_are_rejected() {
        assert!(CookieRememberMePlugin::new().init(&config("%%%")).is_err());
        assert!(
            CookieRememberMePlugin::new()
                .init(&config(&STANDARD.encode([1_u8; 8])))
                .is_err()
        );
    }

    #[test]
    fn valid_key_initializes_once() {
        let plugin = CookieRememberMePlugin::new();
        let cfg = config(&STANDARD.encode([1_u8; 32]));

        assert!(plugin.init(&cfg).is_ok());
        assert!(plugin.init(&cfg).is_err());
    }
}
