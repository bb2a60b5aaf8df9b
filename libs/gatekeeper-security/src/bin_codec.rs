//! Versioned binary encoding of principal collections.
//!
//! Layout: one version byte followed by a postcard payload. Used by remember-me
//! providers that persist identities outside the process.

use crate::principal::PrincipalCollection;

pub const PRINCIPALS_BIN_VERSION: u8 = 1;

#[derive(Debug, thiserror::Error)]
pub enum PrincipalsEncodeError {
    #[error("failed to encode principals: {0}")]
    Postcard(#[from] postcard::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum PrincipalsDecodeError {
    #[error("principals payload is empty")]
    Empty,

    #[error("unsupported principals version {found} (expected {PRINCIPALS_BIN_VERSION})")]
    UnsupportedVersion { found: u8 },

    #[error("failed to decode principals: {0}")]
    Postcard(#[from] postcard::Error),
}

/// # Errors
///
/// Returns an error if postcard serialization fails.
pub fn encode_principals(principals: &PrincipalCollection) -> Result<Vec<u8>, PrincipalsEncodeError> {
    let payload = postcard::to_allocvec(principals)?;
    let mut out = Vec::with_capacity(payload.len() + 1);
    out.push(PRINCIPALS_BIN_VERSION);
    out.extend_from_slice(&payload);
    Ok(out)
}

/// # Errors
///
/// Returns an error for an empty buffer, an unknown version byte or a
/// malformed payload.
pub fn decode_principals(bytes: &[u8]) -> Result<PrincipalCollection, PrincipalsDecodeError> {
    let (&version, payload) = bytes.split_first().ok_or(PrincipalsDecodeError::Empty)?;
    if version != PRINCIPALS_BIN_VERSION {
        return Err(PrincipalsDecodeError::UnsupportedVersion { found: version });
    }
    Ok(postcard::from_bytes(payload)?)
}
