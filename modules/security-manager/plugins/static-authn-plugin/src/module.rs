//! Static authenticator plugin module.

use std::sync::{Arc, OnceLock};

use tracing::{info, warn};

use crate::config::{AuthnMode, StaticAuthnPluginConfig};
use crate::domain::Service;

/// Static authenticator plugin module.
///
/// The same service instance serves as `Authenticator` and `LogoutNotifier`.
#[derive(Default)]
pub struct StaticAuthnPlugin {
    service: OnceLock<Arc<Service>>,
}

impl StaticAuthnPlugin {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Fails when the plugin was already initialized.
    pub fn init(&self, cfg: &StaticAuthnPluginConfig) -> anyhow::Result<Arc<Service>> {
        info!("Initializing static_authn_plugin");

        if cfg.mode == AuthnMode::AcceptAll {
            warn!(
                "Static authn plugin is running in `accept_all` mode, \
                 any non-empty username and password will be accepted. \
                 Do NOT use this mode in production."
            );
        }

        info!(
            mode = ?cfg.mode,
            realm = %cfg.realm,
            account_count = cfg.accounts.len(),
            "Loaded plugin configuration"
        );

        let service = Arc::new(Service::from_config(cfg));
        self.service
            .set(Arc::clone(&service))
            .map_err(|_| anyhow::anyhow!("Service already initialized"))?;

        info!("Static authn plugin initialized");
        Ok(service)
    }
}
