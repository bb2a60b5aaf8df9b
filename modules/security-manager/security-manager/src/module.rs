//! Security manager module wiring.

use std::sync::{Arc, OnceLock};

use security_manager_sdk::{
    Authenticator, LogoutNotifier, RememberMeProvider, SecurityManagerClient, SessionStore,
};
use tracing::info;

use crate::config::SecurityManagerConfig;
use crate::domain::{InvalidSessionListener, SecurityManagerLocalClient, Service};

/// Collaborators the security manager is assembled from.
///
/// The authenticator and session store are mandatory; everything else is optional.
pub struct Collaborators {
    pub authenticator: Arc<dyn Authenticator>,
    pub session_store: Arc<dyn SessionStore>,
    pub logout_notifier: Option<Arc<dyn LogoutNotifier>>,
    pub remember_me: Option<Arc<dyn RememberMeProvider>>,
    pub invalid_session_listener: Option<Arc<dyn InvalidSessionListener>>,
}

impl Collaborators {
    #[must_use]
    pub fn new(authenticator: Arc<dyn Authenticator>, session_store: Arc<dyn SessionStore>) -> Self {
        Self {
            authenticator,
            session_store,
            logout_notifier: None,
            remember_me: None,
            invalid_session_listener: None,
        }
    }
}

/// Security manager module.
///
/// Owns the single [`Service`] instance and hands out the public client.
#[derive(Default)]
pub struct SecurityManagerModule {
    service: OnceLock<Arc<Service>>,
}

impl SecurityManagerModule {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the service and return the client consumers should use.
    ///
    /// # Errors
    ///
    /// Fails when the module was already initialized.
    #[tracing::instrument(skip_all, fields(bind_principals_to_session = cfg.bind_principals_to_session))]
    pub fn init(
        &self,
        cfg: &SecurityManagerConfig,
        collaborators: Collaborators,
    ) -> anyhow::Result<Arc<dyn SecurityManagerClient>> {
        info!(
            remember_me = collaborators.remember_me.is_some(),
            logout_notifier = collaborators.logout_notifier.is_some(),
            "Initializing security_manager"
        );
        if !cfg.accepted_context_extensions.is_empty() {
            info!(
                extensions = ?cfg.accepted_context_extensions,
                "Subject factory accepts custom context extensions"
            );
        }

        let mut builder = Service::builder(collaborators.authenticator, collaborators.session_store)
            .config(cfg);
        if let Some(notifier) = collaborators.logout_notifier {
            builder = builder.logout_notifier(notifier);
        }
        if let Some(provider) = collaborators.remember_me {
            builder = builder.remember_me(provider);
        }
        if let Some(listener) = collaborators.invalid_session_listener {
            builder = builder.invalid_session_listener(listener);
        }
        let svc = Arc::new(builder.build());

        self.service
            .set(Arc::clone(&svc))
            .map_err(|_| anyhow::anyhow!("Service already initialized"))?;

        let api: Arc<dyn SecurityManagerClient> = Arc::new(SecurityManagerLocalClient::new(svc));
        Ok(api)
    }

    /// The initialized service, if [`init`](Self::init) has run.
    #[must_use]
    pub fn service(&self) -> Option<&Arc<Service>> {
        self.service.get()
    }
}
