//! # Dynastore: session records for DynamoDB-backed session stores
//!
//! `dynastore` converts a [`Session`] into a flat DynamoDB attribute map and back. It sits
//! between a session-management layer, which owns cookies and session lifecycle, and the
//! DynamoDB client, which owns network I/O. Everything here is synchronous, stateless and
//! safe to share between threads.
//!
//! # Quick Start
//!
//! ```rust
//! use std::collections::HashMap;
//! use dynastore::codec::{SecureCodec, generate_random_key};
//! use dynastore::{AuthenticatedSerializer, Options, Session, SessionSerializer};
//!
//! let hash_key = generate_random_key(64).unwrap();
//! let block_key = generate_random_key(32).unwrap();
//!
//! let serializer = AuthenticatedSerializer::builder()
//!     .codec(SecureCodec::new(&hash_key, Some(block_key.as_slice())).unwrap())
//!     .build()
//!     .unwrap();
//!
//! let mut values = HashMap::new();
//! values.insert("visits".to_string(), 1_u32);
//!
//! let session = Session::new("kTMdPGeDo4U", values).with_options(Options::build().max_age(3600));
//!
//! // Hand `record` to `put_item`.
//! let record = serializer.encode("sessions", &session).unwrap();
//!
//! // ...and later decode what `get_item` returned.
//! let restored: Session<HashMap<String, u32>> = serializer.decode("sessions", &record).unwrap();
//! assert_eq!(restored.values["visits"], 1);
//! assert!(!restored.is_new);
//! ```
//!
//! # Record Layout
//!
//! | attribute | type | contents |
//! |-----------|------|----------|
//! | `id`      | `S`  | the session ID |
//! | `values`  | `S`  | the encoded session values |
//! | `options` | `M`  | the session [`Options`], only when set |
//!
//! An empty record decodes to [`Error::NotFound`], which callers should treat as "start a
//! new session". A record with a missing or mistyped `id` or `values` attribute is
//! [`Error::MalformedSession`].
//!
//! # Serializers
//!
//! ## AuthenticatedSerializer
//!
//! Protects session values with an ordered chain of [`codec::Codec`]s. The first codec
//! encodes; decoding tries each codec in turn, so keys can be rotated by putting the new
//! codec first and keeping the old one behind it. The store `name` passed to
//! `encode`/`decode` is bound into every token, and a record written under one name will
//! not decode under another.
//!
//! ```rust
//! use dynastore::AuthenticatedSerializer;
//!
//! // hash key, block key, hash key, block key, ...
//! // An empty block key means the codec signs without encrypting.
//! let keys: [&[u8]; 4] = [
//!     b"new-hash-key-0123456789abcdef012",
//!     b"new-block-key-0123456789abcdef01",
//!     b"old-hash-key-0123456789abcdef012",
//!     b"",
//! ];
//! let serializer = AuthenticatedSerializer::from_key_pairs(&keys).unwrap();
//! assert_eq!(serializer.codecs().len(), 2);
//! ```
//!
//! ## PlainSerializer
//!
//! Stores the values as standard base64 of their structured encoding with no integrity
//! protection. Only use it when the table itself is trusted.
//!
//! ```rust
//! use dynastore::{PlainSerializer, Session, SessionSerializer};
//!
//! let record = PlainSerializer.encode("sessions", &Session::new("id", vec![1_u8, 2, 3])).unwrap();
//! let session: Session<Vec<u8>> = PlainSerializer.decode("sessions", &record).unwrap();
//! assert_eq!(session.values, vec![1, 2, 3]);
//! ```
//!
//! ## Serialization
//! Session values are encoded with one of two backends:
//!
//! - [`bincode`](https://crates.io/crates/bincode) (default) - Fast, compact binary serialization.
//! - [`rmp-serde`](https://crates.io/crates/rmp-serde) (MessagePack) - Cross-language compatible serialization.
//!
//! To use `MessagePack` instead of the default `bincode`, add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! dynastore = { version = "0.1.0", default-features = false, features = ["messagepack"] }
//! ```
//!
//! Records written with one backend cannot be read with the other.

pub use aws_sdk_dynamodb::types::AttributeValue;
pub use cookie;

pub mod codec;

pub mod record;
pub use record::Record;

mod serializer;
pub use serializer::*;

mod session;
pub use session::{Options, OptionsError, Session};
