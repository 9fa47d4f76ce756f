#![allow(dead_code)]

use dynastore::codec::SecureCodec;
use dynastore::cookie::SameSite;
use dynastore::{AttributeValue, Options, Record, Session};
use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;

pub const HASH_KEY: &[u8] = b"test-hash-key-0123456789abcdef-0123456789abcdef-0123456789abcdef";
pub const BLOCK_KEY: &[u8] = b"test-block-key-0123456789abcdef0";
pub const OLD_HASH_KEY: &[u8] = b"old-hash-key-0123456789abcdef-0123456789abcdef-0123456789abcdef0";

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct TestUser {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub enum TestValue {
    Count(i64),
    Text(String),
    User(TestUser),
    Flags(Vec<bool>),
}

pub type TestValues = HashMap<String, TestValue>;

pub fn create_test_values() -> TestValues {
    let mut values = HashMap::new();
    values.insert("visits".to_string(), TestValue::Count(42));
    values.insert("theme".to_string(), TestValue::Text("dark".to_string()));
    values.insert(
        "user".to_string(),
        TestValue::User(TestUser {
            id: 1,
            name: "Test User".to_string(),
        }),
    );
    values.insert("flags".to_string(), TestValue::Flags(vec![true, false]));
    values
}

pub fn create_test_session() -> Session<TestValues> {
    Session::new("kTMdPGeDo4UQ1aZ0sPmM0g", create_test_values())
}

pub fn build_options() -> Options {
    Options::build()
        .path("/")
        .domain("example.com")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(true)
        .max_age(15)
}

pub fn signed_codec() -> SecureCodec {
    SecureCodec::new(HASH_KEY, None).unwrap()
}

pub fn encrypted_codec() -> SecureCodec {
    SecureCodec::new(HASH_KEY, Some(BLOCK_KEY)).unwrap()
}

pub fn old_codec() -> SecureCodec {
    SecureCodec::new(OLD_HASH_KEY, None).unwrap()
}

pub fn values_text(record: &Record) -> String {
    record
        .get(dynastore::record::VALUES_FIELD)
        .and_then(|value| value.as_s().ok())
        .cloned()
        .expect("record has a string values field")
}

pub fn set_values_text(record: &mut Record, text: impl Into<String>) {
    record.insert(
        dynastore::record::VALUES_FIELD.to_string(),
        AttributeValue::S(text.into()),
    );
}

/// Swaps one character in the middle of `text` for a different one from the
/// base64url alphabet.
pub fn flip_one_char(text: &str) -> String {
    let mut chars: Vec<char> = text.chars().collect();
    let middle = chars.len() / 2;
    chars[middle] = if chars[middle] == 'A' { 'B' } else { 'A' };
    chars.into_iter().collect()
}

/// A value that every structured encoder rejects.
#[derive(Debug)]
pub struct Unserializable;

impl Serialize for Unserializable {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(S::Error::custom("unsupported session value"))
    }
}
