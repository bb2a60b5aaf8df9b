//! Best-effort access to the optional remember-me provider.

use std::sync::Arc;

use gatekeeper_security::{AuthenticationInfo, AuthenticationToken, PrincipalCollection};
use security_manager_sdk::{AuthenticationError, RememberMeProvider};
use tracing::{trace, warn};

/// Wraps an optional [`RememberMeProvider`] so that its failures never reach callers.
#[derive(Clone, Default)]
pub struct RememberedIdentity {
    provider: Option<Arc<dyn RememberMeProvider>>,
}

impl RememberedIdentity {
    #[must_use]
    pub fn new(provider: Option<Arc<dyn RememberMeProvider>>) -> Self {
        Self { provider }
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Principals remembered for the current caller.
    ///
    /// `None` when no provider is configured, when nothing is remembered, or
    /// when the provider fails.
    pub async fn remembered_identity(&self) -> Option<PrincipalCollection> {
        let provider = self.provider.as_ref()?;
        match provider.remembered_principals().await {
            Ok(principals) => principals.and_then(PrincipalCollection::non_empty),
            Err(e) => {
                warn!(
                    error = %e,
                    "Remember-me provider failed to read remembered principals"
                );
                None
            }
        }
    }

    pub async fn on_successful_login(
        &self,
        token: &AuthenticationToken,
        info: &AuthenticationInfo,
    ) {
        let Some(provider) = &self.provider else {
            trace!(
                username = token.username(),
                "No remember-me provider configured, skipping"
            );
            return;
        };
        if let Err(e) = provider.on_successful_login(token, info).await {
            warn!(
                username = token.username(),
                error = %e,
                "Remember-me provider failed during successful login, identity will not be remembered"
            );
        }
    }

    pub async fn on_failed_login(&self, token: &AuthenticationToken, error: &AuthenticationError) {
        let Some(provider) = &self.provider else {
            return;
        };
        if let Err(e) = provider.on_failed_login(token, error).await {
            warn!(
                username = token.username(),
                error = %e,
                "Remember-me provider failed during failed login"
            );
        }
    }

    pub async fn on_logout(&self, principals: &PrincipalCollection) {
        let Some(provider) = &self.provider else {
            return;
        };
        if let Err(e) = provider.on_logout(principals).await {
            warn!(
                %principals,
                error = %e,
                "Remember-me provider failed during logout"
            );
        }
    }
}
