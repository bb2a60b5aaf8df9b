#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Public client behaviour: module wiring and per-caller isolation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use gatekeeper_security::{
    AuthenticationInfo, AuthenticationToken, CallerScope, PrincipalCollection, Session, SessionId,
};
use parking_lot::Mutex;
use security_manager::{Collaborators, SecurityManagerConfig, SecurityManagerModule};
use security_manager_sdk::{
    AuthenticationError, Authenticator, InvalidSessionReason, SecurityManagerClient,
    SecurityManagerError, SessionError, SessionStore,
};

/// Accepts any username whose password equals the username reversed.
struct MirrorAuthenticator;

#[async_trait]
impl Authenticator for MirrorAuthenticator {
    async fn authenticate(
        &self,
        token: &AuthenticationToken,
    ) -> Result<AuthenticationInfo, AuthenticationError> {
        use secrecy::ExposeSecret;

        let expected: String = token.username().chars().rev().collect();
        if token.password().expose_secret() != expected {
            return Err(AuthenticationError::IncorrectCredentials(
                token.username().to_owned(),
            ));
        }
        // Yield so that concurrent logins interleave.
        tokio::task::yield_now().await;
        Ok(AuthenticationInfo::new(PrincipalCollection::from_realm(
            "mirror",
            [token.username()],
        )))
    }
}

#[derive(Default)]
struct Sessions {
    live: Mutex<HashMap<SessionId, Session>>,
}

impl Sessions {
    fn open(&self, id: &str) -> SessionId {
        let id = SessionId::new(id);
        self.live
            .lock()
            .insert(id.clone(), Session::new(id.clone(), None, Utc::now()));
        id
    }
}

#[async_trait]
impl SessionStore for Sessions {
    async fn lookup(&self, id: &SessionId) -> Result<Session, SessionError> {
        self.live
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::invalid(id.clone(), InvalidSessionReason::Unknown))
    }

    async fn stop(&self, id: &SessionId) -> Result<(), SessionError> {
        self.live
            .lock()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| SessionError::invalid(id.clone(), InvalidSessionReason::Unknown))
    }

    async fn set_attribute(
        &self,
        id: &SessionId,
        key: &str,
        value: serde_json::Value,
    ) -> Result<(), SessionError> {
        self.live
            .lock()
            .get_mut(id)
            .map(|s| s.set_attribute(key, value))
            .ok_or_else(|| SessionError::invalid(id.clone(), InvalidSessionReason::Unknown))
    }

    async fn remove_attribute(&self, id: &SessionId, key: &str) -> Result<(), SessionError> {
        if let Some(session) = self.live.lock().get_mut(id) {
            session.remove_attribute(key);
        }
        Ok(())
    }
}

fn client(sessions: Arc<Sessions>) -> Arc<dyn SecurityManagerClient> {
    SecurityManagerModule::new()
        .init(
            &SecurityManagerConfig::default(),
            Collaborators::new(Arc::new(MirrorAuthenticator), sessions),
        )
        .unwrap()
}

fn token(username: &str) -> AuthenticationToken {
    AuthenticationToken::new(username, username.chars().rev().collect::<String>())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_callers_only_see_their_own_subject() {
    let sessions = Arc::new(Sessions::default());
    let manager = client(sessions.clone());

    let mut handles = Vec::new();
    for (user, session) in [("alice", "s-a"), ("bob", "s-b"), ("carol", "s-c")] {
        let manager = Arc::clone(&manager);
        let session_id = sessions.open(session);
        handles.push(tokio::spawn(async move {
            let exit = CallerScope::new()
                .session_id(session_id)
                .run(async {
                    manager.login(token(user)).await.unwrap();
                    for _ in 0..10 {
                        tokio::task::yield_now().await;
                        let current = manager.subject().await.unwrap();
                        assert_eq!(
                            current.primary_principal().map(ToString::to_string),
                            Some(user.to_owned())
                        );
                    }
                    manager.subject().await.unwrap()
                })
                .await;
            (user, exit.output)
        }));
    }

    for handle in handles {
        let (user, subject) = handle.await.unwrap();
        assert!(subject.is_authenticated());
        assert_eq!(
            subject.primary_principal().map(ToString::to_string),
            Some(user.to_owned())
        );
    }
}

#[tokio::test]
async fn spawned_task_does_not_inherit_callers_subject() {
    let sessions = Arc::new(Sessions::default());
    let manager = client(sessions.clone());
    let session_id = sessions.open("s-1");

    let exit = CallerScope::new()
        .session_id(session_id)
        .run(async {
            manager.login(token("alice")).await.unwrap();
            let inner = Arc::clone(&manager);
            tokio::spawn(async move { inner.subject().await })
                .await
                .unwrap()
        })
        .await;

    assert!(matches!(exit.output, Err(SecurityManagerError::Usage(_))));
}

#[tokio::test]
async fn client_maps_errors_to_public_taxonomy() {
    let sessions = Arc::new(Sessions::default());
    let manager = client(sessions.clone());

    let exit = CallerScope::new()
        .run(async {
            let login = manager
                .login(AuthenticationToken::new("alice", "alice".to_owned()))
                .await;
            let logout = manager.logout(None).await;
            (login, logout)
        })
        .await;
    let by_id = manager
        .subject_by_session_id(&SessionId::new("s-unknown"))
        .await;

    assert_eq!(
        exit.output.0.unwrap_err(),
        SecurityManagerError::Authentication(AuthenticationError::IncorrectCredentials(
            "alice".to_owned()
        ))
    );
    assert!(matches!(exit.output.1, Err(SecurityManagerError::Usage(_))));
    assert!(matches!(
        by_id,
        Err(SecurityManagerError::Session(SessionError::Invalid { .. }))
    ));
}

#[tokio::test]
async fn full_lifecycle_through_the_client() {
    let sessions = Arc::new(Sessions::default());
    let manager = client(sessions.clone());
    let session_id = sessions.open("s-1");

    let exit = CallerScope::new()
        .session_id(session_id.clone())
        .run(async {
            let before = manager.subject().await.unwrap();
            assert!(before.is_anonymous());

            let subject = manager.login(token("carol")).await.unwrap();
            let from_session = manager.subject_by_session_id(&session_id).await.unwrap();
            assert_eq!(from_session.principals(), subject.principals());

            manager.logout(Some(&subject)).await.unwrap();
            manager.subject().await.unwrap()
        })
        .await;

    assert!(exit.output.is_anonymous());
    assert!(sessions.live.lock().is_empty());
}

#[test]
fn module_initializes_once() {
    let module = SecurityManagerModule::new();
    let sessions: Arc<dyn SessionStore> = Arc::new(Sessions::default());

    module
        .init(
            &SecurityManagerConfig::default(),
            Collaborators::new(Arc::new(MirrorAuthenticator), Arc::clone(&sessions)),
        )
        .unwrap();
    let second = module.init(
        &SecurityManagerConfig::default(),
        Collaborators::new(Arc::new(MirrorAuthenticator), sessions),
    );

    assert!(second.is_err());
    assert!(module.service().is_some());
}
