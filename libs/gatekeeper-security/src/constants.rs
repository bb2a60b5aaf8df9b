//! Well-known keys shared by the security manager and its plugins.

/// Session attribute holding the principals of the subject bound to the session.
pub const PRINCIPALS_SESSION_KEY: &str = "gatekeeper.subject.principals";

/// Session attribute marking that the bound subject authenticated in this session.
pub const AUTHENTICATED_SESSION_KEY: &str = "gatekeeper.subject.authenticated";

/// Realm name used for principals that did not come from a named realm.
pub const DEFAULT_REALM: &str = "default";
