//! Wiring of the security manager and its plugins from [`AppConfig`].

use std::sync::Arc;

use cookie_remember_me_plugin::CookieRememberMePlugin;
use memory_session_plugin::{MemorySessionPlugin, MemorySessionStore};
use security_manager::{Collaborators, SecurityManagerModule};
use security_manager_sdk::{LogoutNotifier, RememberMeProvider, SecurityManagerClient};
use static_authn_plugin::StaticAuthnPlugin;

use crate::config::AppConfig;

pub struct Runtime {
    pub client: Arc<dyn SecurityManagerClient>,
    pub sessions: Arc<MemorySessionStore>,
}

impl Runtime {
    /// # Errors
    ///
    /// Fails when any plugin rejects its configuration section.
    pub fn init(cfg: &AppConfig) -> anyhow::Result<Self> {
        let authn = StaticAuthnPlugin::new().init(&cfg.static_authn)?;
        let sessions = MemorySessionPlugin::new().init(&cfg.memory_session)?;

        let notifier: Arc<dyn LogoutNotifier> = authn.clone();
        let mut collaborators = Collaborators::new(authn, sessions.clone());
        collaborators.logout_notifier = Some(notifier);
        if let Some(cookie_cfg) = &cfg.cookie_remember_me {
            let provider: Arc<dyn RememberMeProvider> = CookieRememberMePlugin::new().init(cookie_cfg)?;
            collaborators.remember_me = Some(provider);
        }

        let client = SecurityManagerModule::new().init(&cfg.security_manager, collaborators)?;
        Ok(Self { client, sessions })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use gatekeeper_security::{AuthenticationToken, CallerScope, Principal, RememberMeUpdate};

    use super::*;

    fn config_with_cookie() -> AppConfig {
        serde_json::from_value(serde_json::json!({
            "cookie_remember_me": {
                "signing_key": "MDEyMzQ1Njc4OWFiY2RlZjAxMjM0NTY3ODlhYmNkZWY="
            }
        }))
        .unwrap()
    }

    #[test]
    fn short_signing_key_is_rejected() {
        let cfg: AppConfig = serde_json::from_value(serde_json::json!({
            "cookie_remember_me": { "signing_key": "c2hvcnQ=" }
        }))
        .unwrap();

        assert!(Runtime::init(&cfg).is_err());
    }

    #[tokio::test]
    async fn remembered_login_is_restored_for_a_later_caller() {
        let runtime = Runtime::init(&config_with_cookie()).unwrap();
        let session = runtime.sessions.create(None);
        let client = Arc::clone(&runtime.client);

        let login = CallerScope::new()
            .session_id(session.id().clone())
            .run(client.login(AuthenticationToken::new("jsmith", "pw".to_owned()).remember_me(true)))
            .await;
        assert!(login.output.unwrap().is_authenticated());
        let RememberMeUpdate::Set(cookie) = login.remember_me else {
            panic!("expected a remember-me cookie to be set");
        };

        let later = CallerScope::new()
            .remember_me_cookie(cookie)
            .run(client.subject())
            .await;
        let subject = later.output.unwrap();

        assert!(subject.is_remembered());
        assert_eq!(
            subject.primary_principal().map(Principal::value),
            Some("jsmith")
        );
    }

    #[tokio::test]
    async fn logout_stops_the_session() {
        let runtime = Runtime::init(&AppConfig::default()).unwrap();
        let session = runtime.sessions.create(None);
        let client = Arc::clone(&runtime.client);

        let exit = CallerScope::new()
            .session_id(session.id().clone())
            .run(async {
                let subject = client
                    .login(AuthenticationToken::new("jsmith", "pw".to_owned()))
                    .await?;
                client.logout(Some(subject.as_ref())).await
            })
            .await;

        exit.output.unwrap();
        assert!(exit.subject.is_none());
        assert_eq!(runtime.sessions.active_count(), 0);
    }
}
