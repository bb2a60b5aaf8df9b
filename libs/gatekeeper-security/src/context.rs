use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::principal::PrincipalCollection;
use crate::session::{Session, SessionId};
use crate::subject::Subject;
use crate::token::{AuthenticationInfo, AuthenticationToken};

/// Well-known slots of a [`SubjectContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKey {
    Session,
    SessionId,
    Principals,
    Authenticated,
    AuthenticationToken,
    AuthenticationInfo,
    Subject,
    Host,
}

impl ContextKey {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Session => "SESSION",
            Self::SessionId => "SESSION_ID",
            Self::Principals => "PRINCIPALS",
            Self::Authenticated => "AUTHENTICATED",
            Self::AuthenticationToken => "AUTHENTICATION_TOKEN",
            Self::AuthenticationInfo => "AUTHENTICATION_INFO",
            Self::Subject => "SUBJECT",
            Self::Host => "HOST",
        }
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `SubjectContext` is the per-call bag of clues a subject factory turns into a [`Subject`].
///
/// The value is immutable: every `with_*` method returns a new context and
/// leaves the receiver untouched, so a context handed to the security manager
/// can be inspected again by its owner afterwards.
#[derive(Debug, Clone, Default)]
pub struct SubjectContext {
    session: Option<Session>,
    session_id: Option<SessionId>,
    principals: Option<PrincipalCollection>,
    authenticated: Option<bool>,
    token: Option<AuthenticationToken>,
    info: Option<AuthenticationInfo>,
    subject: Option<Arc<Subject>>,
    host: Option<String>,
    extensions: BTreeMap<String, serde_json::Value>,
}

impl SubjectContext {
    #[must_use]
    pub fn builder() -> SubjectContextBuilder {
        SubjectContextBuilder::default()
    }

    /// Rebuild from this context, keeping every slot already set.
    #[must_use]
    pub fn to_builder(&self) -> SubjectContextBuilder {
        SubjectContextBuilder {
            inner: self.clone(),
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    #[must_use]
    pub fn principals(&self) -> Option<&PrincipalCollection> {
        self.principals.as_ref()
    }

    /// `None` when the context makes no claim about authentication.
    #[must_use]
    pub fn authenticated(&self) -> Option<bool> {
        self.authenticated
    }

    #[must_use]
    pub fn authentication_token(&self) -> Option<&AuthenticationToken> {
        self.token.as_ref()
    }

    #[must_use]
    pub fn authentication_info(&self) -> Option<&AuthenticationInfo> {
        self.info.as_ref()
    }

    /// Subject that was bound to the caller before this context was built.
    #[must_use]
    pub fn subject(&self) -> Option<&Arc<Subject>> {
        self.subject.as_ref()
    }

    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    #[must_use]
    pub fn extension(&self, key: &str) -> Option<&serde_json::Value> {
        self.extensions.get(key)
    }

    #[must_use]
    pub fn extensions(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.extensions
    }

    #[must_use]
    pub fn contains(&self, key: ContextKey) -> bool {
        match key {
            ContextKey::Session => self.session.is_some(),
            ContextKey::SessionId => self.session_id.is_some(),
            ContextKey::Principals => self.principals.is_some(),
            ContextKey::Authenticated => self.authenticated.is_some(),
            ContextKey::AuthenticationToken => self.token.is_some(),
            ContextKey::AuthenticationInfo => self.info.is_some(),
            ContextKey::Subject => self.subject.is_some(),
            ContextKey::Host => self.host.is_some(),
        }
    }

    /// Well-known keys present in this context.
    #[must_use]
    pub fn keys(&self) -> Vec<ContextKey> {
        [
            ContextKey::Session,
            ContextKey::SessionId,
            ContextKey::Principals,
            ContextKey::Authenticated,
            ContextKey::AuthenticationToken,
            ContextKey::AuthenticationInfo,
            ContextKey::Subject,
            ContextKey::Host,
        ]
        .into_iter()
        .filter(|key| self.contains(*key))
        .collect()
    }

    #[must_use]
    pub fn with_session(&self, session: Session) -> Self {
        let mut copy = self.clone();
        copy.session = Some(session);
        copy
    }

    /// Empty collections clear the slot, like the builder's `principals`.
    #[must_use]
    pub fn with_principals(&self, principals: PrincipalCollection) -> Self {
        let mut copy = self.clone();
        copy.principals = principals.non_empty();
        copy
    }
}

#[derive(Default)]
pub struct SubjectContextBuilder {
    inner: SubjectContext,
}

impl SubjectContextBuilder {
    #[must_use]
    pub fn session(mut self, session: Session) -> Self {
        self.inner.session = Some(session);
        self
    }

    #[must_use]
    pub fn session_id(mut self, session_id: SessionId) -> Self {
        self.inner.session_id = Some(session_id);
        self
    }

    /// Empty collections are dropped: they carry no identity.
    #[must_use]
    pub fn principals(mut self, principals: PrincipalCollection) -> Self {
        self.inner.principals = principals.non_empty();
        self
    }

    #[must_use]
    pub fn authenticated(mut self, authenticated: bool) -> Self {
        self.inner.authenticated = Some(authenticated);
        self
    }

    #[must_use]
    pub fn authentication_token(mut self, token: AuthenticationToken) -> Self {
        self.inner.token = Some(token);
        self
    }

    #[must_use]
    pub fn authentication_info(mut self, info: AuthenticationInfo) -> Self {
        self.inner.info = Some(info);
        self
    }

    #[must_use]
    pub fn subject(mut self, subject: Arc<Subject>) -> Self {
        self.inner.subject = Some(subject);
        self
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.inner.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn extension(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.inner.extensions.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn build(self) -> SubjectContext {
        self.inner
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_context_builder_minimal() {
        let ctx = SubjectContext::builder().build();

        assert!(ctx.keys().is_empty());
        assert!(ctx.authenticated().is_none());
        assert!(ctx.extensions().is_empty());
    }

    #[test]
    fn test_context_builder_login_slots() {
        let principals = PrincipalCollection::from_realm("ldap", ["jsmith"]);
        let ctx = SubjectContext::builder()
            .authenticated(true)
            .authentication_token(AuthenticationToken::new("jsmith", "pw".to_owned()))
            .authentication_info(AuthenticationInfo::new(principals.clone()))
            .host("10.0.0.1")
            .build();

        assert_eq!(
            ctx.keys(),
            [
                ContextKey::Authenticated,
                ContextKey::AuthenticationToken,
                ContextKey::AuthenticationInfo,
                ContextKey::Host,
            ]
        );
        assert_eq!(
            ctx.authentication_info().map(AuthenticationInfo::principals),
            Some(&principals)
        );
    }

    #[test]
    fn test_context_empty_principals_are_dropped() {
        let ctx = SubjectContext::builder()
            .principals(PrincipalCollection::new())
            .build();

        assert!(!ctx.contains(ContextKey::Principals));
    }

    #[test]
    fn test_context_with_empty_principals_matches_builder() {
        let seeded = SubjectContext::builder()
            .principals(PrincipalCollection::from_realm("cookie", ["jsmith"]))
            .build();

        let cleared = seeded.with_principals(PrincipalCollection::new());
        let fresh = SubjectContext::default().with_principals(PrincipalCollection::new());

        assert!(!cleared.contains(ContextKey::Principals));
        assert!(!fresh.contains(ContextKey::Principals));
        assert!(seeded.contains(ContextKey::Principals));
    }

    #[test]
    fn test_context_with_session_leaves_original_untouched() {
        let original = SubjectContext::builder()
            .session_id(SessionId::new("s-1"))
            .build();
        let session = Session::new(SessionId::new("s-1"), None, Utc::now());

        let resolved = original.with_session(session);

        assert!(original.session().is_none());
        assert!(resolved.session().is_some());
        assert_eq!(resolved.session_id(), original.session_id());
    }

    #[test]
    fn test_context_to_builder_keeps_slots() {
        let ctx = SubjectContext::builder()
            .session_id(SessionId::new("s-1"))
            .extension("x.tenant", serde_json::json!("acme"))
            .build();

        let extended = ctx.to_builder().host("10.0.0.2").build();

        assert_eq!(extended.session_id(), Some(&SessionId::new("s-1")));
        assert_eq!(
            extended.extension("x.tenant"),
            Some(&serde_json::json!("acme"))
        );
        assert_eq!(extended.host(), Some("10.0.0.2"));
        assert!(ctx.host().is_none());
    }

    #[test]
    fn test_context_key_names() {
        assert_eq!(ContextKey::SessionId.to_string(), "SESSION_ID");
        assert_eq!(ContextKey::AuthenticationInfo.as_str(), "AUTHENTICATION_INFO");
    }
}
