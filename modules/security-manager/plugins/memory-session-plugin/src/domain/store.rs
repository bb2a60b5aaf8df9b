//! Concurrent in-memory [`SessionStore`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use gatekeeper_security::{Session, SessionId, scope};
use security_manager_sdk::{InvalidSessionReason, SessionError, SessionStore};
use tracing::{debug, info};

use super::clock::{Clock, SystemClock};

enum Entry {
    Live(Session),
    /// Tombstone left behind so later lookups can report why the id is invalid.
    /// Purged by [`MemorySessionStore::sweep_expired`] once older than the
    /// tombstone retention.
    Gone {
        reason: InvalidSessionReason,
        since: DateTime<Utc>,
    },
}

/// Sessions held in a [`DashMap`] keyed by id.
pub struct MemorySessionStore {
    entries: DashMap<SessionId, Entry>,
    idle_timeout: TimeDelta,
    tombstone_retention: TimeDelta,
    bind_to_host: bool,
    clock: Arc<dyn Clock>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new(idle_timeout: TimeDelta) -> Self {
        Self {
            entries: DashMap::new(),
            idle_timeout,
            tombstone_retention: idle_timeout,
            bind_to_host: false,
            clock: Arc::new(SystemClock),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// How long stopped or expired ids keep reporting their reason before
    /// they are forgotten and look unknown. Defaults to the idle timeout.
    #[must_use]
    pub fn tombstone_retention(mut self, retention: TimeDelta) -> Self {
        self.tombstone_retention = retention;
        self
    }

    #[must_use]
    pub fn bind_to_host(mut self, bind_to_host: bool) -> Self {
        self.bind_to_host = bind_to_host;
        self
    }

    /// Start a new session for `host`.
    #[must_use]
    pub fn create(&self, host: Option<String>) -> Session {
        let session = Session::new(SessionId::generate(), host, self.clock.now());
        debug!(session_id = %session.id(), host = ?session.host(), "Session created");
        self.entries
            .insert(session.id().clone(), Entry::Live(session.clone()));
        session
    }

    /// Mark every idle session as expired and drop tombstones older than the
    /// retention. Returns how many sessions expired.
    #[must_use]
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let mut expired = 0;
        for mut entry in self.entries.iter_mut() {
            if self.is_idle(entry.value(), now) {
                *entry.value_mut() = Entry::Gone {
                    reason: InvalidSessionReason::Expired,
                    since: now,
                };
                expired += 1;
            }
        }

        let before = self.entries.len();
        self.entries
            .retain(|_, entry| !self.is_stale_tombstone(entry, now));
        let purged = before.saturating_sub(self.entries.len());

        if expired > 0 || purged > 0 {
            info!(expired, purged, "Swept expired sessions");
        }
        expired
    }

    /// Number of live (not stopped, not yet swept) sessions.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.value(), Entry::Live(_)))
            .count()
    }

    /// Run `f` on the live session `id`, expiring it first when idle.
    fn with_live<R>(
        &self,
        id: &SessionId,
        f: impl FnOnce(&mut Session) -> R,
    ) -> Result<R, SessionError> {
        let mut entry = self
            .entries
            .get_mut(id)
            .ok_or_else(|| SessionError::invalid(id.clone(), InvalidSessionReason::Unknown))?;

        let now = self.clock.now();
        if self.is_idle(entry.value(), now) {
            debug!(session_id = %id, "Session expired on access");
            *entry.value_mut() = Entry::Gone {
                reason: InvalidSessionReason::Expired,
                since: now,
            };
        }

        match entry.value_mut() {
            Entry::Gone { reason, .. } => Err(SessionError::invalid(id.clone(), *reason)),
            Entry::Live(session) => Ok(f(session)),
        }
    }

    fn is_idle(&self, entry: &Entry, now: DateTime<Utc>) -> bool {
        matches!(
            entry,
            Entry::Live(session)
                if now.signed_duration_since(session.last_access_at()) > self.idle_timeout
        )
    }

    fn is_stale_tombstone(&self, entry: &Entry, now: DateTime<Utc>) -> bool {
        matches!(
            entry,
            Entry::Gone { since, .. }
                if now.signed_duration_since(*since) >= self.tombstone_retention
        )
    }

    fn check_host(&self, session: &Session) -> Result<(), SessionError> {
        if !self.bind_to_host {
            return Ok(());
        }
        let Some(owner) = session.host() else {
            return Ok(());
        };
        let caller = scope::current_host();
        if caller.as_deref() == Some(owner) {
            return Ok(());
        }
        Err(SessionError::access_denied(
            session.id().clone(),
            format!(
                "session belongs to host '{owner}', caller presented {}",
                caller.map_or_else(|| "no host".to_owned(), |h| format!("'{h}'"))
            ),
        ))
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn lookup(&self, id: &SessionId) -> Result<Session, SessionError> {
        let now = self.clock.now();
        let session = self.with_live(id, |session| session.clone())?;
        self.check_host(&session)?;
        self.with_live(id, |session| {
            session.touch(now);
            session.clone()
        })
    }

    async fn stop(&self, id: &SessionId) -> Result<(), SessionError> {
        self.with_live(id, |_| ())?;
        self.entries.insert(
            id.clone(),
            Entry::Gone {
                reason: InvalidSessionReason::Stopped,
                since: self.clock.now(),
            },
        );
        debug!(session_id = %id, "Session stopped");
        Ok(())
    }

    async fn set_attribute(
        &self,
        id: &SessionId,
        key: &str,
        value: serde_json::Value,
    ) -> Result<(), SessionError> {
        self.with_live(id, |session| session.set_attribute(key, value))
    }

    async fn remove_attribute(&self, id: &SessionId, key: &str) -> Result<(), SessionError> {
        self.with_live(id, |session| {
            session.remove_attribute(key);
        })
    }
}
