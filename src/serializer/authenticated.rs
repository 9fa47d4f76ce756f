use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};

use crate::codec::{Codec, SecureCodec};
use crate::record::{RawRecord, Record, new_record};
use crate::serializer::{Error, SessionSerializer, deserialize_value, serialize_value};
use crate::session::Session;

/// A serializer that protects session values with a chain of codecs.
///
/// The first codec of the chain produces every new token. Decoding tries the
/// codecs in order and keeps the first one that both authenticates the token
/// and yields a value of the requested type, so retired keys can stay at the
/// end of the chain until the records they protect have been rewritten.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use dynastore::codec::SecureCodec;
/// use dynastore::{AuthenticatedSerializer, Session, SessionSerializer};
///
/// let current = SecureCodec::new(b"a fresh hash key of reasonable length!", None).unwrap();
/// let legacy = SecureCodec::new(b"the hash key we are rotating away from", None).unwrap();
///
/// let serializer = AuthenticatedSerializer::builder()
///     .codec(current)
///     .codec(legacy)
///     .build()
///     .unwrap();
///
/// let mut values = HashMap::new();
/// values.insert("theme".to_string(), "dark".to_string());
///
/// let record = serializer.encode("sessions", &Session::new("abc", values)).unwrap();
/// let session: Session<HashMap<String, String>> = serializer.decode("sessions", &record).unwrap();
/// assert_eq!(session.values["theme"], "dark");
/// ```
#[derive(Clone, Debug)]
pub struct AuthenticatedSerializer {
    codecs: Arc<[Arc<dyn Codec>]>,
}

impl AuthenticatedSerializer {
    pub fn builder() -> AuthenticatedSerializerBuilder {
        AuthenticatedSerializerBuilder::default()
    }

    /// Builds a serializer from alternating hash and block keys.
    ///
    /// See [`SecureCodec::from_pairs`].
    pub fn from_key_pairs(keys: &[&[u8]]) -> Result<Self, Error> {
        SecureCodec::from_pairs(keys)?
            .into_iter()
            .fold(Self::builder(), |builder, codec| builder.codec(codec))
            .build()
    }

    /// The codec chain, current codec first.
    pub fn codecs(&self) -> &[Arc<dyn Codec>] {
        &self.codecs
    }

    fn decode_values<V>(&self, name: &str, token: &str) -> Result<V, Error>
    where
        V: DeserializeOwned,
    {
        let mut errors = Vec::with_capacity(self.codecs.len());

        for (position, codec) in self.codecs.iter().enumerate() {
            let decoded = codec
                .decode(name, token)
                .map_err(|err| err.to_string())
                .and_then(|payload| deserialize_value::<V>(&payload).map_err(|err| err.to_string()));

            match decoded {
                Ok(values) => {
                    if position > 0 {
                        tracing::debug!(position, "session decoded with a legacy codec");
                    }
                    return Ok(values);
                }
                Err(err) => {
                    tracing::debug!(position, err = %err, "codec rejected session payload");
                    errors.push(err);
                }
            }
        }

        Err(Error::DecodeFailed(errors.join("; ")))
    }
}

impl SessionSerializer for AuthenticatedSerializer {
    #[tracing::instrument(name = "encoding authenticated session record", skip(self, session))]
    fn encode<V>(&self, name: &str, session: &Session<V>) -> Result<Record, Error>
    where
        V: Serialize,
    {
        let codec = self.codecs.first().ok_or(Error::NoCodecs)?;

        let payload = serialize_value(&session.values).map_err(|err| {
            tracing::error!(err = %err, "failed to serialize session values");
            err
        })?;

        let token = codec.encode(name, &payload).map_err(|err| {
            tracing::error!(err = %err, "failed to protect session values");
            Error::EncodeFailed(err.to_string())
        })?;

        Ok(new_record(&session.id, token, session.options.as_ref()))
    }

    #[tracing::instrument(name = "decoding authenticated session record", skip(self, record))]
    fn decode<V>(&self, name: &str, record: &Record) -> Result<Session<V>, Error>
    where
        V: DeserializeOwned,
    {
        let raw = RawRecord::parse(record).map_err(|err| {
            tracing::debug!(err = %err, "session record rejected");
            err
        })?;

        let values = self.decode_values(name, raw.values).map_err(|err| {
            tracing::error!(err = %err, "failed to decode session values");
            err
        })?;

        raw.into_session(values)
    }
}

/// Collects the codec chain of an [`AuthenticatedSerializer`].
#[derive(Debug, Default)]
pub struct AuthenticatedSerializerBuilder {
    codecs: Vec<Arc<dyn Codec>>,
}

impl AuthenticatedSerializerBuilder {
    /// Appends a codec. The first codec added encodes; later ones are only
    /// used for decoding.
    pub fn codec(mut self, codec: impl Codec + 'static) -> Self {
        self.codecs.push(Arc::new(codec));
        self
    }

    /// Appends an already shared codec.
    pub fn shared_codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codecs.push(codec);
        self
    }

    pub fn build(self) -> Result<AuthenticatedSerializer, Error> {
        if self.codecs.is_empty() {
            return Err(Error::NoCodecs);
        }

        Ok(AuthenticatedSerializer {
            codecs: self.codecs.into(),
        })
    }
}
