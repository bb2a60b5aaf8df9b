//! Configuration for the security manager.

use serde::{Deserialize, Serialize};

/// Configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SecurityManagerConfig {
    /// Write a bound subject's principals into its session, so later callers
    /// presenting the same session id resolve the same identity.
    pub bind_principals_to_session: bool,

    /// Extension keys the subject factory accepts in a subject context.
    /// Any other extension key is treated as a malformed context.
    pub accepted_context_extensions: Vec<String>,
}

impl Default for SecurityManagerConfig {
    fn default() -> Self {
        Self {
            bind_principals_to_session: true,
            accepted_context_extensions: Vec::new(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg: SecurityManagerConfig = serde_json::from_value(serde_json::json!({})).unwrap();

        assert!(cfg.bind_principals_to_session);
        assert!(cfg.accepted_context_extensions.is_empty());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_value::<SecurityManagerConfig>(
            serde_json::json!({ "bind_principals_to_sesion": false }),
        );

        assert!(result.is_err());
    }
}
