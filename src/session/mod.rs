//! The session value that serializers turn into store records.

mod options;
pub use options::{Options, OptionsError};
pub(crate) use options::kind;

/// A user session as seen by the session-management layer.
///
/// `V` is the session payload. Any `serde` type works; a map keyed by
/// field name is the common choice.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use dynastore::{Options, Session};
///
/// let mut values = HashMap::new();
/// values.insert("user_id".to_string(), 42_u64);
///
/// let session = Session::new("3kTMd", values).with_options(Options::build().max_age(3600));
/// assert!(session.is_new);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Session<V> {
    pub id: String,
    pub values: V,
    pub options: Option<Options>,
    /// `false` when the session was read back from a store record.
    pub is_new: bool,
}

impl<V> Session<V> {
    /// Creates a new session that has not been persisted yet.
    pub fn new(id: impl Into<String>, values: V) -> Self {
        Self {
            id: id.into(),
            values,
            options: None,
            is_new: true,
        }
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }
}
