//! Signed cookie encoding of remembered principals.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use gatekeeper_security::{PrincipalCollection, decode_principals, encode_principals};
use hmac::{Hmac, Mac};
use security_manager_sdk::ProviderError;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const TAG_LEN: usize = 32;

/// Minimum signing key length in bytes.
pub const MIN_KEY_LEN: usize = 32;

/// Signs and verifies remember-me cookies.
pub struct CookieRememberMe {
    key: Vec<u8>,
}

impl std::fmt::Debug for CookieRememberMe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieRememberMe")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl CookieRememberMe {
    /// # Errors
    ///
    /// Returns an error when `key` is shorter than [`MIN_KEY_LEN`].
    pub fn new(key: Vec<u8>) -> Result<Self, ProviderError> {
        if key.len() < MIN_KEY_LEN {
            return Err(ProviderError::new(format!(
                "remember-me signing key must be at least {MIN_KEY_LEN} bytes, got {}",
                key.len()
            )));
        }
        Ok(Self { key })
    }

    fn mac(&self) -> Result<HmacSha256, ProviderError> {
        HmacSha256::new_from_slice(&self.key)
            .map_err(|e| ProviderError::new(format!("invalid remember-me signing key: {e}")))
    }

    /// Encode and sign `principals` into a cookie value.
    ///
    /// # Errors
    ///
    /// Returns an error for empty collections or encoding failures.
    pub fn seal(&self, principals: &PrincipalCollection) -> Result<String, ProviderError> {
        if principals.is_empty() {
            return Err(ProviderError::new("refusing to remember an empty identity"));
        }
        let mut payload = encode_principals(principals)
            .map_err(|e| ProviderError::new(format!("cannot encode remembered principals: {e}")))?;
        let mut mac = self.mac()?;
        mac.update(&payload);
        payload.extend_from_slice(&mac.finalize().into_bytes());
        Ok(URL_SAFE_NO_PAD.encode(payload))
    }

    /// Verify and decode a cookie value produced by [`seal`](Self::seal).
    ///
    /// # Errors
    ///
    /// Returns an error for malformed, tampered or unsupported cookies.
    pub fn open(&self, cookie: &str) -> Result<PrincipalCollection, ProviderError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(cookie)
            .map_err(|e| ProviderError::new(format!("malformed remember-me cookie: {e}")))?;
        if bytes.len() <= TAG_LEN {
            return Err(ProviderError::new("remember-me cookie is truncated"));
        }
        let (payload, tag) = bytes.split_at(bytes.len() - TAG_LEN);

        let mut mac = self.mac()?;
        mac.update(payload);
        mac.verify_slice(tag)
            .map_err(|_| ProviderError::new("remember-me cookie signature mismatch"))?;

        decode_principals(payload)
            .map_err(|e| ProviderError::new(format!("cannot decode remembered principals: {e}")))
    }
}
