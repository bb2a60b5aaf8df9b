//! `RememberMeProvider` implementation backed by the caller scope's cookie.

use async_trait::async_trait;
use gatekeeper_security::{
    AuthenticationInfo, AuthenticationToken, PrincipalCollection, ScopeError, scope,
};
use security_manager_sdk::{AuthenticationError, ProviderError, RememberMeProvider};
use tracing::{debug, trace};

use super::service::CookieRememberMe;

fn scope_error(e: ScopeError) -> ProviderError {
    ProviderError::new(format!("cannot write remember-me cookie: {e}"))
}

fn forget() -> Result<(), ProviderError> {
    scope::clear_remember_me_cookie().map_err(scope_error)
}

#[async_trait]
impl RememberMeProvider for CookieRememberMe {
    async fn remembered_principals(&self) -> Result<Option<PrincipalCollection>, ProviderError> {
        let Some(cookie) = scope::remember_me_cookie() else {
            trace!("No remember-me cookie presented");
            return Ok(None);
        };
        self.open(&cookie).map(Some)
    }

    async fn on_successful_login(
        &self,
        token: &AuthenticationToken,
        info: &AuthenticationInfo,
    ) -> Result<(), ProviderError> {
        // Any identity remembered before this login no longer applies.
        forget()?;
        if !token.is_remember_me() {
            trace!(username = token.username(), "Login did not ask to be remembered");
            return Ok(());
        }

        let cookie = self.seal(info.principals())?;
        scope::set_remember_me_cookie(cookie).map_err(scope_error)?;
        debug!(username = token.username(), "Identity remembered");
        Ok(())
    }

    async fn on_failed_login(
        &self,
        token: &AuthenticationToken,
        _error: &AuthenticationError,
    ) -> Result<(), ProviderError> {
        debug!(username = token.username(), "Forgetting identity after failed login");
        forget()
    }

    async fn on_logout(&self, principals: &PrincipalCollection) -> Result<(), ProviderError> {
        debug!(%principals, "Forgetting identity on logout");
        forget()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use gatekeeper_security::{CallerScope, RememberMeUpdate};

    use super::*;
    use crate::domain::service::MIN_KEY_LEN;

    fn provider() -> CookieRememberMe {
        CookieRememberMe::new(vec![3; MIN_KEY_LEN]).unwrap()
    }

    fn info() -> AuthenticationInfo {
        AuthenticationInfo::new(PrincipalCollection::from_realm("static", ["jsmith"]))
    }

    fn token(remember_me: bool) -> AuthenticationToken {
        AuthenticationToken::new("jsmith", "secret".to_owned()).remember_me(remember_me)
    }

    #[tokio::test]
    async fn remember_me_login_sets_cookie_that_is_read_back() {
        let provider = provider();

        let exit = CallerScope::new()
            .run(async {
                provider.on_successful_login(&token(true), &info()).await.unwrap();
                provider.remembered_principals().await.unwrap()
            })
            .await;

        assert_eq!(exit.output, Some(info().principals().clone()));
        let RememberMeUpdate::Set(cookie) = exit.remember_me else {
            panic!("expected a cookie to be set, got {:?}", exit.remember_me);
        };

        let next = CallerScope::new()
            .remember_me_cookie(cookie)
            .run(provider.remembered_principals())
            .await;
        assert_eq!(next.output.unwrap(), Some(info().principals().clone()));
    }

    #[tokio::test]
    async fn plain_login_forgets_previous_identity() {
        let provider = provider();
        let cookie = provider.seal(info().principals()).unwrap();

        let exit = CallerScope::new()
            .remember_me_cookie(cookie)
            .run(async {
                provider.on_successful_login(&token(false), &info()).await.unwrap();
                provider.remembered_principals().await.unwrap()
            })
            .await;

        assert_eq!(exit.output, None);
        assert_eq!(exit.remember_me, RememberMeUpdate::Cleared);
    }

    #[tokio::test]
    async fn failed_login_and_logout_clear_cookie() {
        let provider = provider();
        let cookie = provider.seal(info().principals()).unwrap();

        let failed = CallerScope::new()
            .remember_me_cookie(cookie.clone())
            .run(provider.on_failed_login(
                &token(true),
                &AuthenticationError::IncorrectCredentials("jsmith".to_owned()),
            ))
            .await;
        let logout = CallerScope::new()
            .remember_me_cookie(cookie)
            .run(provider.on_logout(info().principals()))
            .await;

        assert!(failed.output.is_ok());
        assert_eq!(failed.remember_me, RememberMeUpdate::Cleared);
        assert!(logout.output.is_ok());
        assert_eq!(logout.remember_me, RememberMeUpdate::Cleared);
    }

    #[tokio::test]
    async fn tampered_cookie_is_a_provider_error() {
        let exit = CallerScope::new()
            .remember_me_cookie("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA")
            .run(provider().remembered_principals())
            .await;

        assert!(exit.output.is_err());
    }

    #[tokio::test]
    async fn writes_outside_scope_fail_but_reads_do_not() {
        let provider = provider();

        assert_eq!(provider.remembered_principals().await.unwrap(), None);
        assert!(provider.on_logout(info().principals()).await.is_err());
    }
}
