//! Service implementation for the static authenticator plugin.

use std::collections::HashMap;

use gatekeeper_security::{AuthenticationInfo, AuthenticationToken, Principal, PrincipalCollection};
use parking_lot::Mutex;
use secrecy::ExposeSecret;
use security_manager_sdk::AuthenticationError;

use crate::config::{AccountConfig, AuthnMode, StaticAuthnPluginConfig};

/// Static authenticator service.
///
/// Maps username/password tokens to principals based on configuration mode:
/// - `accept_all`: Any non-empty username and password authenticate as that username
/// - `static_accounts`: Only configured accounts authenticate
pub struct Service {
    mode: AuthnMode,
    realm: String,
    accounts: HashMap<String, AccountConfig>,
    logouts: Mutex<Vec<PrincipalCollection>>,
}

impl Service {
    /// Create a service from plugin configuration.
    #[must_use]
    pub fn from_config(cfg: &StaticAuthnPluginConfig) -> Self {
        let accounts = cfg
            .accounts
            .iter()
            .map(|a| (a.username.clone(), a.clone()))
            .collect();

        Self {
            mode: cfg.mode,
            realm: cfg.realm.clone(),
            accounts,
            logouts: Mutex::new(Vec::new()),
        }
    }

    /// Verify `token` and return the account's principals.
    ///
    /// # Errors
    ///
    /// - `UnsupportedToken` for an empty username or password
    /// - `UnknownAccount` for usernames missing from the table (`static_accounts`)
    /// - `LockedAccount` for locked accounts
    /// - `IncorrectCredentials` for a wrong password
    pub fn authenticate(
        &self,
        token: &AuthenticationToken,
    ) -> Result<AuthenticationInfo, AuthenticationError> {
        let username = token.username();
        if username.is_empty() || token.password().expose_secret().is_empty() {
            return Err(AuthenticationError::UnsupportedToken(
                "username and password must not be empty".to_owned(),
            ));
        }

        let extra: &[String] = match self.mode {
            AuthnMode::AcceptAll => &[],
            AuthnMode::StaticAccounts => {
                let account = self
                    .accounts
                    .get(username)
                    .ok_or_else(|| AuthenticationError::UnknownAccount(username.to_owned()))?;
                if account.locked {
                    return Err(AuthenticationError::LockedAccount(username.to_owned()));
                }
                if account.password.expose_secret() != token.password().expose_secret() {
                    return Err(AuthenticationError::IncorrectCredentials(username.to_owned()));
                }
                &account.principals
            }
        };

        let mut principals = PrincipalCollection::new();
        principals.add(Principal::new(&self.realm, username));
        for value in extra {
            principals.add(Principal::new(&self.realm, value));
        }
        Ok(AuthenticationInfo::new(principals))
    }

    pub(crate) fn record_logout(&self, principals: &PrincipalCollection) {
        self.logouts.lock().push(principals.clone());
    }

    /// Principals of every subject that logged out, oldest first.
    #[must_use]
    pub fn logouts(&self) -> Vec<PrincipalCollection> {
        self.logouts.lock().clone()
    }
}
