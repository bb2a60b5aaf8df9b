use secrecy::SecretString;

use crate::principal::PrincipalCollection;

/// Credentials submitted by a caller for a login attempt.
///
/// The password is wrapped in `SecretString` so `Debug` redacts it.
#[derive(Debug, Clone)]
pub struct AuthenticationToken {
    username: String,
    password: SecretString,
    remember_me: bool,
    host: Option<String>,
}

impl AuthenticationToken {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            remember_me: false,
            host: None,
        }
    }

    /// Ask the remember-me provider to persist the identity after a successful login.
    #[must_use]
    pub fn remember_me(mut self, remember_me: bool) -> Self {
        self.remember_me = remember_me;
        self
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &SecretString {
        &self.password
    }

    #[must_use]
    pub fn is_remember_me(&self) -> bool {
        self.remember_me
    }

    #[must_use]
    pub fn origin_host(&self) -> Option<&str> {
        self.host.as_deref()
    }
}

/// Account data returned by an authenticator after a successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationInfo {
    principals: PrincipalCollection,
}

impl AuthenticationInfo {
    #[must_use]
    pub fn new(principals: PrincipalCollection) -> Self {
        Self { principals }
    }

    #[must_use]
    pub fn principals(&self) -> &PrincipalCollection {
        &self.principals
    }
}
