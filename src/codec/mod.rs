//! Authentication and encryption codecs for session payloads.
//!
//! A codec turns serialized session bytes into a transport-safe token bound
//! to a context `name`, and back. [`AuthenticatedSerializer`] holds an
//! ordered chain of them: the first one encodes, all of them are tried on
//! decode, which is how keys are rotated without rewriting stored records.
//!
//! [`AuthenticatedSerializer`]: crate::AuthenticatedSerializer

use std::fmt::Debug;

use rand::TryRngCore;
use rand::rngs::OsRng;

mod secure;
pub use secure::{DEFAULT_MAX_AGE, SecureCodec};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("hash key is not set")]
    HashKeyNotSet,

    #[error("block key must be 32 bytes, got {0}")]
    InvalidBlockKey(usize),

    #[error("the value is too long: {0} bytes")]
    TooLong(usize),

    #[error("the value is not valid base64: {0}")]
    Encoding(String),

    #[error("the value is not a valid token")]
    InvalidFormat,

    #[error("the value is not valid")]
    MacInvalid,

    #[error("invalid timestamp")]
    InvalidTimestamp,

    #[error("expired timestamp")]
    Expired,

    #[error("the value could not be encrypted: {0}")]
    Encryption(String),

    #[error("the value could not be decrypted")]
    Decryption,

    #[error("random key generation failed: {0}")]
    Random(String),
}

/// Protects serialized session values.
///
/// Implementations must bind `name` into the token so that a token produced
/// for one name is rejected under any other.
pub trait Codec: Debug + Send + Sync {
    /// Produces a transport-safe token for `payload`.
    fn encode(&self, name: &str, payload: &[u8]) -> Result<String, CodecError>;

    /// Verifies `token` against `name` and returns the original payload.
    fn decode(&self, name: &str, token: &str) -> Result<Vec<u8>, CodecError>;
}

/// Returns `len` bytes from the operating system's random number generator,
/// suitable as a hash or block key.
pub fn generate_random_key(len: usize) -> Result<Vec<u8>, CodecError> {
    let mut key = vec![0u8; len];
    OsRng
        .try_fill_bytes(&mut key)
        .map_err(|err| CodecError::Random(err.to_string()))?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_random_key() {
        let a = generate_random_key(32).unwrap();
        let b = generate_random_key(32).unwrap();

        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }
}
