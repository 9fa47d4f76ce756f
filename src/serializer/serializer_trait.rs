use serde::{Serialize, de::DeserializeOwned};

use crate::codec::CodecError;
use crate::record::Record;
use crate::session::{OptionsError, Session};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The record holds no attributes at all.
    #[error("session not found")]
    NotFound,

    /// A required field is missing or is not a string attribute.
    #[error("malformed session: field `{0}` is missing or not a string")]
    MalformedSession(&'static str),

    #[error("Encoding failed with: {0}")]
    EncodeFailed(String),

    #[error("Decoding failed with: {0}")]
    DecodeFailed(String),

    /// The options attribute could not be transcoded.
    #[error(transparent)]
    Options(#[from] OptionsError),

    #[error("at least one codec is required")]
    NoCodecs,

    #[error("invalid codec: {0}")]
    InvalidCodec(#[from] CodecError),
}

/// Converts sessions to store records and back.
///
/// `name` is the context label of the session store (typically the cookie
/// or table namespace). Implementations that authenticate payloads bind it
/// into the token; a record written under one name must then be read back
/// under the same name.
pub trait SessionSerializer: Clone + Send + Sync + 'static {
    /// Builds a fresh record for `session`.
    fn encode<V>(&self, name: &str, session: &Session<V>) -> Result<Record, Error>
    where
        V: Serialize;

    /// Reconstructs a session from `record`.
    ///
    /// The returned session always has `is_new` set to `false`.
    fn decode<V>(&self, name: &str, record: &Record) -> Result<Session<V>, Error>
    where
        V: DeserializeOwned;
}
