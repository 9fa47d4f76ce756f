use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use serde::{Serialize, de::DeserializeOwned};

use crate::record::{RawRecord, Record, new_record};
use crate::serializer::{Error, SessionSerializer, deserialize_value, serialize_value};
use crate::session::Session;

/// A serializer that stores session values as base64 of their structured
/// encoding.
///
/// Records are readable by anyone with table access and carry no tamper
/// protection. The `name` argument is accepted but ignored.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainSerializer;

impl PlainSerializer {
    pub fn new() -> Self {
        Self
    }
}

impl SessionSerializer for PlainSerializer {
    #[tracing::instrument(name = "encoding plain session record", skip(self, session))]
    fn encode<V>(&self, name: &str, session: &Session<V>) -> Result<Record, Error>
    where
        V: Serialize,
    {
        let payload = serialize_value(&session.values).map_err(|err| {
            tracing::error!(err = %err, "failed to serialize session values");
            err
        })?;

        Ok(new_record(
            &session.id,
            BASE64_STANDARD.encode(payload),
            session.options.as_ref(),
        ))
    }

    #[tracing::instrument(name = "decoding plain session record", skip(self, record))]
    fn decode<V>(&self, name: &str, record: &Record) -> Result<Session<V>, Error>
    where
        V: DeserializeOwned,
    {
        let raw = RawRecord::parse(record).map_err(|err| {
            tracing::debug!(err = %err, "session record rejected");
            err
        })?;

        let payload = BASE64_STANDARD.decode(raw.values).map_err(|err| {
            tracing::error!(err = %err, "session values are not valid base64");
            Error::DecodeFailed(err.to_string())
        })?;

        let values = deserialize_value(&payload).map_err(|err| {
            tracing::error!(err = %err, "failed to deserialize session values");
            err
        })?;

        raw.into_session(values)
    }
}
