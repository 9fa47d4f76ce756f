use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use cookie::SameSite;

const PATH: &str = "Path";
const DOMAIN: &str = "Domain";
const MAX_AGE: &str = "MaxAge";
const SECURE: &str = "Secure";
const HTTP_ONLY: &str = "HttpOnly";
const PARTITIONED: &str = "Partitioned";
const SAME_SITE: &str = "SameSite";

// Numeric SameSite modes as stored by the Go `net/http` cookie type.
const SAME_SITE_UNSET: i64 = 0;
const SAME_SITE_DEFAULT: i64 = 1;
const SAME_SITE_LAX: i64 = 2;
const SAME_SITE_STRICT: i64 = 3;
const SAME_SITE_NONE: i64 = 4;

/// Errors raised while transcoding [`Options`] from a store attribute.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    #[error("options attribute must be a map, found {0}")]
    NotAMap(&'static str),

    #[error("options field `{field}` must be {expected}, found {found}")]
    UnexpectedType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("options field `{field}` holds an invalid number: {value}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("options field `SameSite` holds an unknown mode: {0}")]
    UnknownSameSite(i64),
}

/// Cookie and session policy attributes persisted next to a session.
///
/// # Example
///
/// ```rust
/// use dynastore::Options;
/// use dynastore::cookie::SameSite;
///
/// let options = Options::build()
///     .path("/")
///     .http_only(true)
///     .same_site(SameSite::Lax)
///     .secure(true)
///     .max_age(60 * 60);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    pub path: Option<String>,
    pub domain: Option<String>,
    pub max_age: i64,
    pub secure: bool,
    pub http_only: bool,
    pub partitioned: bool,
    pub same_site: Option<SameSite>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            path: Some("/".to_string()),
            domain: None,
            max_age: 30 * 24 * 60 * 60,
            secure: true,
            http_only: true,
            partitioned: false,
            same_site: Some(SameSite::Lax),
        }
    }
}

impl Options {
    /// Creates a new `Options` with default values.
    pub fn build() -> Self {
        Self::default()
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Sets the cookie lifetime in seconds.
    ///
    /// `0` means no Max-Age attribute, a negative value deletes the cookie.
    pub fn max_age(mut self, seconds: i64) -> Self {
        self.max_age = seconds;
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn partitioned(mut self, partitioned: bool) -> Self {
        self.partitioned = partitioned;
        self
    }

    /// Sets the SameSite policy. `None` leaves the attribute off the cookie.
    pub fn same_site(mut self, same_site: impl Into<Option<SameSite>>) -> Self {
        self.same_site = same_site.into();
        self
    }
}

impl From<&Options> for AttributeValue {
    fn from(options: &Options) -> Self {
        let mut map = HashMap::with_capacity(7);

        if let Some(path) = &options.path {
            map.insert(PATH.to_string(), AttributeValue::S(path.clone()));
        }
        if let Some(domain) = &options.domain {
            map.insert(DOMAIN.to_string(), AttributeValue::S(domain.clone()));
        }
        map.insert(
            MAX_AGE.to_string(),
            AttributeValue::N(options.max_age.to_string()),
        );
        map.insert(SECURE.to_string(), AttributeValue::Bool(options.secure));
        map.insert(HTTP_ONLY.to_string(), AttributeValue::Bool(options.http_only));
        map.insert(
            PARTITIONED.to_string(),
            AttributeValue::Bool(options.partitioned),
        );
        map.insert(
            SAME_SITE.to_string(),
            AttributeValue::N(same_site_mode(options.same_site).to_string()),
        );

        AttributeValue::M(map)
    }
}

impl TryFrom<&AttributeValue> for Options {
    type Error = OptionsError;

    fn try_from(value: &AttributeValue) -> Result<Self, Self::Error> {
        let map = value
            .as_m()
            .map_err(|other| OptionsError::NotAMap(kind(other)))?;

        let same_site = match number(map, SAME_SITE)? {
            None | Some(SAME_SITE_UNSET) | Some(SAME_SITE_DEFAULT) => None,
            Some(SAME_SITE_LAX) => Some(SameSite::Lax),
            Some(SAME_SITE_STRICT) => Some(SameSite::Strict),
            Some(SAME_SITE_NONE) => Some(SameSite::None),
            Some(mode) => return Err(OptionsError::UnknownSameSite(mode)),
        };

        Ok(Self {
            path: string(map, PATH)?,
            domain: string(map, DOMAIN)?,
            max_age: number(map, MAX_AGE)?.unwrap_or_default(),
            secure: boolean(map, SECURE)?,
            http_only: boolean(map, HTTP_ONLY)?,
            partitioned: boolean(map, PARTITIONED)?,
            same_site,
        })
    }
}

fn same_site_mode(same_site: Option<SameSite>) -> i64 {
    match same_site {
        None => SAME_SITE_UNSET,
        Some(SameSite::Lax) => SAME_SITE_LAX,
        Some(SameSite::Strict) => SAME_SITE_STRICT,
        Some(SameSite::None) => SAME_SITE_NONE,
    }
}

/// Looks up `field`, treating a missing key and a `NULL` attribute alike.
fn present<'a>(
    map: &'a HashMap<String, AttributeValue>,
    field: &str,
) -> Option<&'a AttributeValue> {
    map.get(field).filter(|value| !value.is_null())
}

fn string(
    map: &HashMap<String, AttributeValue>,
    field: &'static str,
) -> Result<Option<String>, OptionsError> {
    let Some(value) = present(map, field) else {
        return Ok(None);
    };

    let s = value.as_s().map_err(|other| OptionsError::UnexpectedType {
        field,
        expected: "a string",
        found: kind(other),
    })?;

    Ok((!s.is_empty()).then(|| s.clone()))
}

fn number(
    map: &HashMap<String, AttributeValue>,
    field: &'static str,
) -> Result<Option<i64>, OptionsError> {
    let Some(value) = present(map, field) else {
        return Ok(None);
    };

    let n = value.as_n().map_err(|other| OptionsError::UnexpectedType {
        field,
        expected: "a number",
        found: kind(other),
    })?;

    n.parse::<i64>()
        .map(Some)
        .map_err(|_| OptionsError::InvalidNumber {
            field,
            value: n.clone(),
        })
}

fn boolean(
    map: &HashMap<String, AttributeValue>,
    field: &'static str,
) -> Result<bool, OptionsError> {
    let Some(value) = present(map, field) else {
        return Ok(false);
    };

    value
        .as_bool()
        .copied()
        .map_err(|other| OptionsError::UnexpectedType {
            field,
            expected: "a boolean",
            found: kind(other),
        })
}

/// Short name of an attribute's type, as used in the DynamoDB wire format.
pub(crate) fn kind(value: &AttributeValue) -> &'static str {
    match value {
        AttributeValue::B(_) => "B",
        AttributeValue::Bool(_) => "BOOL",
        AttributeValue::Bs(_) => "BS",
        AttributeValue::L(_) => "L",
        AttributeValue::M(_) => "M",
        AttributeValue::N(_) => "N",
        AttributeValue::Ns(_) => "NS",
        AttributeValue::Null(_) => "NULL",
        AttributeValue::S(_) => "S",
        AttributeValue::Ss(_) => "SS",
        _ => "unknown",
    }
}
