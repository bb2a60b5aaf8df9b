//! Configuration for the cookie remember-me plugin.

use secrecy::SecretString;
use serde::{Deserialize, Serialize, Serializer};

/// Plugin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CookieRememberMePluginConfig {
    /// Standard base64 HMAC key. Decodes to at least 32 bytes.
    #[serde(serialize_with = "redacted")]
    pub signing_key: SecretString,
}

impl Default for CookieRememberMePluginConfig {
    fn default() -> Self {
        Self {
            signing_key: SecretString::from(String::new()),
        }
    }
}

fn redacted<S: Serializer>(_secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str("[REDACTED]")
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    const KEY: &str = "MDEyMzQ1Njc4OWFiY2RlZjAxMjM0NTY3ODlhYmNkZWY=";

    #[test]
    fn signing_key_deserializes_and_defaults_to_empty() {
        let cfg: CookieRememberMePluginConfig =
            serde_json::from_value(serde_json::json!({ "signing_key": KEY })).unwrap();
        let empty: CookieRememberMePluginConfig =
            serde_json::from_value(serde_json::json!({})).unwrap();

        assert_eq!(cfg.signing_key.expose_secret(), KEY);
        assert!(empty.signing_key.expose_secret().is_empty());
    }

    #[test]
    fn signing_key_is_redacted_when_serialized() {
        let cfg: CookieRememberMePluginConfig =
            serde_json::from_value(serde_json::json!({ "signing_key": KEY })).unwrap();

        let rendered = serde_json::to_string(&cfg).unwrap();

        assert!(!rendered.contains(KEY));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_value::<CookieRememberMePluginConfig>(
            serde_json::json!({ "signing_kye": KEY }),
        );

        assert!(result.is_err());
    }
}
