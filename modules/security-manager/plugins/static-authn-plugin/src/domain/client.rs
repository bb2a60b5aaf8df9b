//! Collaborator implementations for the static authenticator plugin.
//!
//! Implements `Authenticator` and `LogoutNotifier` using the domain service.

use async_trait::async_trait;
use gatekeeper_security::{AuthenticationInfo, AuthenticationToken, PrincipalCollection};
use security_manager_sdk::{AuthenticationError, Authenticator, LogoutNotifier, ProviderError};
use tracing::{debug, info};

use super::service::Service;

#[async_trait]
impl Authenticator for Service {
    async fn authenticate(
        &self,
        token: &AuthenticationToken,
    ) -> Result<AuthenticationInfo, AuthenticationError> {
        let result = Service::authenticate(self, token);
        if let Err(e) = &result {
            debug!(username = token.username(), error = %e, "Static authentication rejected");
        }
        result
    }
}

#[async_trait]
impl LogoutNotifier for Service {
    async fn on_logout(&self, principals: &PrincipalCollection) -> Result<(), ProviderError> {
        info!(%principals, "Subject logged out");
        self.record_logout(principals);
        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::config::StaticAuthnPluginConfig;

    #[tokio::test]
    async fn plugin_trait_accept_all_succeeds() {
        let service = Service::from_config(&StaticAuthnPluginConfig::default());
        let plugin: &dyn Authenticator = &service;

        let result = plugin
            .authenticate(&AuthenticationToken::new("jsmith", "pw".to_owned()))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn plugin_trait_empty_password_is_unsupported() {
        let service = Service::from_config(&StaticAuthnPluginConfig::default());
        let plugin: &dyn Authenticator = &service;

        let result = plugin
            .authenticate(&AuthenticationToken::new("jsmith", String::new()))
            .await;
        match result.unwrap_err() {
            AuthenticationError::UnsupportedToken(_) => {}
            other => panic!("Expected UnsupportedToken, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn logout_notifications_are_recorded() {
        let service = Service::from_config(&StaticAuthnPluginConfig::default());
        let notifier: &dyn LogoutNotifier = &service;
        let principals = PrincipalCollection::from_realm("static", ["jsmith"]);

        notifier.on_logout(&principals).await.unwrap();

        assert_eq!(service.logouts(), vec![principals]);
    }
}
