use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::Engine;
use base64::prelude::BASE64_URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use rand::TryRngCore;
use rand::rngs::OsRng;
use sha2::Sha256;

use super::{Codec, CodecError};

type HmacSha256 = Hmac<Sha256>;

const NONCE_LEN: usize = 12;

/// Tokens older than this many seconds are rejected unless configured otherwise.
pub const DEFAULT_MAX_AGE: i64 = 30 * 24 * 60 * 60;

/// A codec that signs payloads with HMAC-SHA256 and, when given a block
/// key, encrypts them with AES-256-GCM first.
///
/// The token is `base64url(timestamp "|" base64url(payload) "|" mac)` where
/// the MAC covers `name|timestamp|payload`. When encrypting, `name` is also
/// the associated data of the cipher.
///
/// # Example
///
/// ```rust
/// use dynastore::codec::{Codec, SecureCodec, generate_random_key};
///
/// let hash_key = generate_random_key(64).unwrap();
/// let block_key = generate_random_key(32).unwrap();
/// let codec = SecureCodec::new(&hash_key, Some(block_key.as_slice()))
///     .unwrap()
///     .max_age(24 * 60 * 60);
///
/// let token = codec.encode("sessions", b"payload").unwrap();
/// assert_eq!(codec.decode("sessions", &token).unwrap(), b"payload");
/// assert!(codec.decode("other", &token).is_err());
/// ```
#[derive(Clone)]
pub struct SecureCodec {
    hash_key: Vec<u8>,
    cipher: Option<Aes256Gcm>,
    max_age: i64,
    max_length: usize,
}

impl SecureCodec {
    /// Creates a codec from a hash key and an optional 32-byte block key.
    ///
    /// A hash key of 32 or 64 bytes is recommended.
    pub fn new(hash_key: &[u8], block_key: Option<&[u8]>) -> Result<Self, CodecError> {
        if hash_key.is_empty() {
            return Err(CodecError::HashKeyNotSet);
        }

        let cipher = block_key
            .map(|key| {
                <Aes256Gcm as KeyInit>::new_from_slice(key)
                    .map_err(|_| CodecError::InvalidBlockKey(key.len()))
            })
            .transpose()?;

        Ok(Self {
            hash_key: hash_key.to_vec(),
            cipher,
            max_age: DEFAULT_MAX_AGE,
            max_length: 0,
        })
    }

    /// Builds one codec per key pair.
    ///
    /// `keys` alternates hash and block keys. An empty block key, or a
    /// missing one at the end of an odd-length list, produces a sign-only
    /// codec.
    pub fn from_pairs(keys: &[&[u8]]) -> Result<Vec<Self>, CodecError> {
        keys.chunks(2)
            .map(|pair| {
                let block_key = pair.get(1).copied().filter(|key| !key.is_empty());
                Self::new(pair[0], block_key)
            })
            .collect()
    }

    /// Sets the maximum token age in seconds. `0` disables the check.
    pub fn max_age(mut self, seconds: i64) -> Self {
        self.max_age = seconds;
        self
    }

    /// Sets the maximum token length in bytes. `0` disables the check.
    pub fn max_length(mut self, len: usize) -> Self {
        self.max_length = len;
        self
    }

    /// Returns `true` if payloads are encrypted, not only signed.
    pub fn encrypts(&self) -> bool {
        self.cipher.is_some()
    }

    pub(crate) fn encode_at(
        &self,
        name: &str,
        payload: &[u8],
        timestamp: i64,
    ) -> Result<String, CodecError> {
        let value = match &self.cipher {
            Some(cipher) => BASE64_URL_SAFE_NO_PAD.encode(encrypt(cipher, name, payload)?),
            None => BASE64_URL_SAFE_NO_PAD.encode(payload),
        };

        let timestamp = timestamp.to_string();
        let mac = self
            .mac(name, timestamp.as_bytes(), value.as_bytes())?
            .finalize()
            .into_bytes();

        let mut token = Vec::with_capacity(timestamp.len() + value.len() + mac.len() + 2);
        token.extend_from_slice(timestamp.as_bytes());
        token.push(b'|');
        token.extend_from_slice(value.as_bytes());
        token.push(b'|');
        token.extend_from_slice(&mac);

        let token = BASE64_URL_SAFE_NO_PAD.encode(token);
        self.check_length(token.len())?;

        Ok(token)
    }

    pub(crate) fn decode_at(
        &self,
        name: &str,
        token: &str,
        now: i64,
    ) -> Result<Vec<u8>, CodecError> {
        self.check_length(token.len())?;

        let decoded = BASE64_URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|err| CodecError::Encoding(err.to_string()))?;

        let mut parts = decoded.splitn(3, |b| *b == b'|');
        let (Some(timestamp), Some(value), Some(mac)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(CodecError::InvalidFormat);
        };

        self.mac(name, timestamp, value)?
            .verify_slice(mac)
            .map_err(|_| CodecError::MacInvalid)?;

        let timestamp = std::str::from_utf8(timestamp)
            .ok()
            .and_then(|ts| ts.parse::<i64>().ok())
            .ok_or(CodecError::InvalidTimestamp)?;

        if self.max_age != 0 && timestamp < now - self.max_age {
            return Err(CodecError::Expired);
        }

        let payload = BASE64_URL_SAFE_NO_PAD
            .decode(value)
            .map_err(|err| CodecError::Encoding(err.to_string()))?;

        match &self.cipher {
            Some(cipher) => decrypt(cipher, name, &payload),
            None => Ok(payload),
        }
    }

    fn mac(&self, name: &str, timestamp: &[u8], value: &[u8]) -> Result<HmacSha256, CodecError> {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(&self.hash_key)
            .map_err(|_| CodecError::HashKeyNotSet)?;
        mac.update(name.as_bytes());
        mac.update(b"|");
        mac.update(timestamp);
        mac.update(b"|");
        mac.update(value);
        Ok(mac)
    }

    fn check_length(&self, len: usize) -> Result<(), CodecError> {
        if self.max_length != 0 && len > self.max_length {
            return Err(CodecError::TooLong(len));
        }
        Ok(())
    }
}

impl Codec for SecureCodec {
    fn encode(&self, name: &str, payload: &[u8]) -> Result<String, CodecError> {
        self.encode_at(name, payload, unix_now())
    }

    fn decode(&self, name: &str, token: &str) -> Result<Vec<u8>, CodecError> {
        self.decode_at(name, token, unix_now())
    }
}

impl fmt::Debug for SecureCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureCodec")
            .field("encrypts", &self.encrypts())
            .field("max_age", &self.max_age)
            .field("max_length", &self.max_length)
            .finish_non_exhaustive()
    }
}

fn encrypt(cipher: &Aes256Gcm, name: &str, payload: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut nonce = [0u8; NONCE_LEN];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|err| CodecError::Random(err.to_string()))?;

    let ciphertext = cipher
        .encrypt(
            Nonce::from_slice(&nonce),
            Payload {
                msg: payload,
                aad: name.as_bytes(),
            },
        )
        .map_err(|err| CodecError::Encryption(err.to_string()))?;

    let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    sealed.extend_from_slice(&nonce);
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

fn decrypt(cipher: &Aes256Gcm, name: &str, sealed: &[u8]) -> Result<Vec<u8>, CodecError> {
    if sealed.len() < NONCE_LEN {
        return Err(CodecError::Decryption);
    }

    let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
    cipher
        .decrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad: name.as_bytes(),
            },
        )
        .map_err(|_| CodecError::Decryption)
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or_default()
}
