//! Per-caller execution scope.
//!
//! Every logical caller (an HTTP request, an RPC call, a CLI command) runs its
//! security-sensitive work inside a [`CallerScope`]. The scope is a tokio
//! task-local slot carrying the caller's inbound clues (session id, host,
//! remember-me cookie) and the subject bound to it.
//!
//! Spawned tasks do not inherit the scope of their parent, so concurrent callers
//! never observe each other's subject.
//!
//! ```ignore
//! let exit = CallerScope::new()
//!     .session_id(session_id)
//!     .host("10.0.0.1")
//!     .run(async { manager.subject().await })
//!     .await;
//!
//! if let RememberMeUpdate::Set(cookie) = exit.remember_me {
//!     // write the cookie to the response
//! }
//! ```

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::session::SessionId;
use crate::subject::Subject;

tokio::task_local! {
    static CALLER: Arc<CallerState>;
}

/// Errors raised when a scope-only operation runs outside any caller scope.
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
pub enum ScopeError {
    #[error("no caller scope is active for the current task")]
    NotInScope,
}

/// Outcome of remember-me cookie handling during a scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RememberMeUpdate {
    /// Nothing wrote to the cookie; the client copy stays valid.
    #[default]
    Unchanged,
    /// A new cookie value must be sent to the client.
    Set(String),
    /// The client must drop its cookie.
    Cleared,
}

/// Result of running a future inside a [`CallerScope`].
#[derive(Debug)]
pub struct ScopeExit<T> {
    pub output: T,
    pub remember_me: RememberMeUpdate,
    /// Subject still bound when the scope ended.
    pub subject: Option<Arc<Subject>>,
}

struct CallerState {
    session_id: Option<SessionId>,
    host: Option<String>,
    inbound_cookie: Option<String>,
    remember_me: Mutex<RememberMeUpdate>,
    subject: Mutex<Option<Arc<Subject>>>,
}

/// Inbound clues for one logical caller.
#[derive(Debug, Clone, Default)]
pub struct CallerScope {
    session_id: Option<SessionId>,
    host: Option<String>,
    remember_me_cookie: Option<String>,
}

impl CallerScope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn session_id(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn remember_me_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.remember_me_cookie = Some(cookie.into());
        self
    }

    /// Run `fut` with this scope installed as the current caller.
    pub async fn run<F: Future>(self, fut: F) -> ScopeExit<F::Output> {
        let state = Arc::new(CallerState {
            session_id: self.session_id,
            host: self.host,
            inbound_cookie: self.remember_me_cookie,
            remember_me: Mutex::new(RememberMeUpdate::Unchanged),
            subject: Mutex::new(None),
        });

        let output = CALLER.scope(Arc::clone(&state), fut).await;

        let remember_me = std::mem::take(&mut *state.remember_me.lock());
        let subject = state.subject.lock().take();
        ScopeExit {
            output,
            remember_me,
            subject,
        }
    }
}

fn with_state<R>(f: impl FnOnce(&CallerState) -> R) -> Option<R> {
    CALLER.try_with(|state| f(state)).ok()
}

/// Whether the current task runs inside a caller scope.
#[must_use]
pub fn in_scope() -> bool {
    with_state(|_| ()).is_some()
}

#[must_use]
pub fn current_session_id() -> Option<SessionId> {
    with_state(|state| state.session_id.clone()).flatten()
}

#[must_use]
pub fn current_host() -> Option<String> {
    with_state(|state| state.host.clone()).flatten()
}

/// Effective remember-me cookie: the latest value written during this scope,
/// or the inbound one when nothing was written.
#[must_use]
pub fn remember_me_cookie() -> Option<String> {
    with_state(|state| match &*state.remember_me.lock() {
        RememberMeUpdate::Unchanged => state.inbound_cookie.clone(),
        RememberMeUpdate::Set(value) => Some(value.clone()),
        RememberMeUpdate::Cleared => None,
    })
    .flatten()
}

/// # Errors
///
/// Returns [`ScopeError::NotInScope`] outside a caller scope.
pub fn set_remember_me_cookie(value: String) -> Result<(), ScopeError> {
    with_state(|state| *state.remember_me.lock() = RememberMeUpdate::Set(value))
        .ok_or(ScopeError::NotInScope)
}

/// # Errors
///
/// Returns [`ScopeError::NotInScope`] outside a caller scope.
pub fn clear_remember_me_cookie() -> Result<(), ScopeError> {
    with_state(|state| *state.remember_me.lock() = RememberMeUpdate::Cleared)
        .ok_or(ScopeError::NotInScope)
}

#[must_use]
pub fn bound_subject() -> Option<Arc<Subject>> {
    with_state(|state| state.subject.lock().clone()).flatten()
}

/// Bind `subject` to the current caller, returning the previously bound one.
///
/// # Errors
///
/// Returns [`ScopeError::NotInScope`] outside a caller scope.
pub fn bind_subject(subject: Arc<Subject>) -> Result<Option<Arc<Subject>>, ScopeError> {
    with_state(|state| state.subject.lock().replace(subject)).ok_or(ScopeError::NotInScope)
}

/// Remove the bound subject. A no-op outside a scope or when nothing is bound.
pub fn unbind_subject() -> Option<Arc<Subject>> {
    with_state(|state| state.subject.lock().take()).flatten()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::principal::PrincipalCollection;

    fn subject(name: &str) -> Arc<Subject> {
        Arc::new(
            Subject::builder()
                .principals(PrincipalCollection::from_realm("test", [name]))
                .build(),
        )
    }

    #[tokio::test]
    async fn reads_outside_scope_are_empty() {
        assert!(!in_scope());
        assert!(current_session_id().is_none());
        assert!(bound_subject().is_none());
        assert!(unbind_subject().is_none());
        assert_eq!(bind_subject(subject("a")), Err(ScopeError::NotInScope));
        assert_eq!(clear_remember_me_cookie(), Err(ScopeError::NotInScope));
    }

    #[tokio::test]
    async fn scope_exposes_inbound_clues() {
        let exit = CallerScope::new()
            .session_id(SessionId::new("s-1"))
            .host("10.0.0.1")
            .remember_me_cookie("cookie")
            .run(async { (current_session_id(), current_host(), remember_me_cookie()) })
            .await;

        assert_eq!(
            exit.output,
            (
                Some(SessionId::new("s-1")),
                Some("10.0.0.1".to_owned()),
                Some("cookie".to_owned())
            )
        );
        assert_eq!(exit.remember_me, RememberMeUpdate::Unchanged);
    }

    #[tokio::test]
    async fn bound_subject_is_reported_on_exit() {
        let exit = CallerScope::new()
            .run(async {
                assert!(bind_subject(subject("a")).unwrap().is_none());
                let previous = bind_subject(subject("b")).unwrap();
                previous.map(|s| s.principals().to_string())
            })
            .await;

        assert_eq!(exit.output.as_deref(), Some("[a]"));
        assert_eq!(
            exit.subject.map(|s| s.principals().to_string()).as_deref(),
            Some("[b]")
        );
    }

    #[tokio::test]
    async fn cookie_updates_shadow_inbound_value() {
        let exit = CallerScope::new()
            .remember_me_cookie("old")
            .run(async {
                set_remember_me_cookie("new".to_owned()).unwrap();
                let after_set = remember_me_cookie();
                clear_remember_me_cookie().unwrap();
                (after_set, remember_me_cookie())
            })
            .await;

        assert_eq!(exit.output, (Some("new".to_owned()), None));
        assert_eq!(exit.remember_me, RememberMeUpdate::Cleared);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn spawned_tasks_do_not_inherit_scope() {
        let exit = CallerScope::new()
            .run(async {
                bind_subject(subject("parent")).unwrap();
                tokio::spawn(async { bound_subject().is_none() })
                    .await
                    .unwrap()
            })
            .await;

        assert!(exit.output);
    }
}
