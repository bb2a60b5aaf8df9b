use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{AUTHENTICATED_SESSION_KEY, PRINCIPALS_SESSION_KEY};
use crate::principal::PrincipalCollection;

/// Opaque, serializable session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Snapshot of server-side session state as returned by a session store.
///
/// A `Session` is a value: changing it requires going through the store by id,
/// which keeps proxying or remote stores possible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    host: Option<String>,
    started_at: DateTime<Utc>,
    last_access_at: DateTime<Utc>,
    #[serde(default)]
    attributes: BTreeMap<String, serde_json::Value>,
}

impl Session {
    #[must_use]
    pub fn new(id: SessionId, host: Option<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            host,
            started_at,
            last_access_at: started_at,
            attributes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn last_access_at(&self) -> DateTime<Utc> {
        self.last_access_at
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_access_at = now;
    }

    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&serde_json::Value> {
        self.attributes.get(key)
    }

    #[must_use]
    pub fn attributes(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.attributes
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.attributes.insert(key.into(), value);
    }

    pub fn remove_attribute(&mut self, key: &str) -> Option<serde_json::Value> {
        self.attributes.remove(key)
    }

    /// Principals bound to this session by a session-aware subject binder.
    ///
    /// Returns `None` when the attribute is missing, empty or unreadable.
    #[must_use]
    pub fn bound_principals(&self) -> Option<PrincipalCollection> {
        let value = self.attributes.get(PRINCIPALS_SESSION_KEY)?;
        serde_json::from_value::<PrincipalCollection>(value.clone())
            .ok()
            .and_then(PrincipalCollection::non_empty)
    }

    /// Whether the binder marked this session as belonging to an authenticated subject.
    #[must_use]
    pub fn is_marked_authenticated(&self) -> bool {
        self.attributes
            .get(AUTHENTICATED_SESSION_KEY)
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false)
    }
}
