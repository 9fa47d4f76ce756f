//! The store record shared by every serializer.
//!
//! Both serializers agree on these field names so a table can be read by
//! whichever one wrote it, given the same payload format.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;

use crate::serializer::Error;
use crate::session::{Options, Session, kind};

/// A store-native session record: attribute name to DynamoDB attribute value.
pub type Record = HashMap<String, AttributeValue>;

/// Holds the session ID as an `S` attribute.
pub const ID_FIELD: &str = "id";

/// Holds the encoded session values as an `S` attribute.
pub const VALUES_FIELD: &str = "values";

/// Holds the transcoded [`Options`] as an `M` attribute, when present.
pub const OPTIONS_FIELD: &str = "options";

pub(crate) fn new_record(id: &str, values: String, options: Option<&Options>) -> Record {
    let mut record = HashMap::with_capacity(3);
    record.insert(ID_FIELD.to_string(), AttributeValue::S(id.to_string()));
    record.insert(VALUES_FIELD.to_string(), AttributeValue::S(values));

    if let Some(options) = options {
        record.insert(OPTIONS_FIELD.to_string(), AttributeValue::from(options));
    }

    record
}

/// The typed fields of a record that passed the structural checks.
#[derive(Debug)]
pub(crate) struct RawRecord<'a> {
    pub id: &'a str,
    pub values: &'a str,
    options: Option<&'a AttributeValue>,
}

impl<'a> RawRecord<'a> {
    /// Splits `record` into its fields.
    ///
    /// An empty record is [`Error::NotFound`]; a missing or non-string
    /// identity or values field is [`Error::MalformedSession`].
    pub fn parse(record: &'a Record) -> Result<Self, Error> {
        if record.is_empty() {
            return Err(Error::NotFound);
        }

        Ok(Self {
            id: string_field(record, ID_FIELD)?,
            values: string_field(record, VALUES_FIELD)?,
            options: record.get(OPTIONS_FIELD),
        })
    }

    /// Builds the decoded session. Options errors pass through as
    /// [`Error::Options`].
    pub fn into_session<V>(self, values: V) -> Result<Session<V>, Error> {
        let options = self.options.map(Options::try_from).transpose()?;

        Ok(Session {
            id: self.id.to_string(),
            values,
            options,
            is_new: false,
        })
    }
}

fn string_field<'a>(record: &'a Record, field: &'static str) -> Result<&'a str, Error> {
    let value = record
        .get(field)
        .ok_or(Error::MalformedSession(field))?;

    value.as_s().map(String::as_str).map_err(|other| {
        tracing::debug!(field, found = kind(other), "session field has the wrong type");
        Error::MalformedSession(field)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_without_options() {
        let record = new_record("abc", "payload".to_string(), None);

        assert_eq!(record.len(), 2);
        assert_eq!(record.get(ID_FIELD), Some(&AttributeValue::S("abc".into())));
        assert_eq!(
            record.get(VALUES_FIELD),
            Some(&AttributeValue::S("payload".into()))
        );
        assert!(!record.contains_key(OPTIONS_FIELD));
    }

    #[test]
    fn test_new_record_with_options() {
        let options = Options::build();
        let record = new_record("abc", "payload".to_string(), Some(&options));

        assert!(matches!(record.get(OPTIONS_FIELD), Some(AttributeValue::M(_))));
    }

    #[test]
    fn test_parse_empty_record() {
        let record = Record::new();
        assert!(matches!(RawRecord::parse(&record), Err(Error::NotFound)));
    }

    #[test]
    fn test_parse_missing_fields() {
        let mut record = new_record("abc", "payload".to_string(), None);
        record.remove(ID_FIELD);
        assert!(matches!(
            RawRecord::parse(&record),
            Err(Error::MalformedSession(ID_FIELD))
        ));

        let mut record = new_record("abc", "payload".to_string(), None);
        record.remove(VALUES_FIELD);
        assert!(matches!(
            RawRecord::parse(&record),
            Err(Error::MalformedSession(VALUES_FIELD))
        ));
    }

    #[test]
    fn test_parse_mistyped_fields() {
        let mut record = new_record("abc", "payload".to_string(), None);
        record.insert(ID_FIELD.to_string(), AttributeValue::N("7".into()));
        assert!(matches!(
            RawRecord::parse(&record),
            Err(Error::MalformedSession(ID_FIELD))
        ));

        let mut record = new_record("abc", "payload".to_string(), None);
        record.insert(VALUES_FIELD.to_string(), AttributeValue::Bool(true));
        assert!(matches!(
            RawRecord::parse(&record),
            Err(Error::MalformedSession(VALUES_FIELD))
        ));
    }

    #[test]
    fn test_into_session_marks_session_as_existing() {
        let options = Options::build().max_age(60);
        let record = new_record("abc", "payload".to_string(), Some(&options));

        let session = RawRecord::parse(&record).unwrap().into_session(7_u8).unwrap();

        assert_eq!(session.id, "abc");
        assert_eq!(session.values, 7);
        assert_eq!(session.options, Some(options));
        assert!(!session.is_new);
    }
}
