//! Typed attribute values
//!
//! Every value stored in an attribute graph carries an explicit type tag,
//! because the serialized form is typed rather than plain text.

use crate::error::GraphError;
use crate::url::ResourceUrl;
use crate::vocab::xsd;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Type tag of an attribute value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Plain string
    String,
    /// Calendar date
    Date,
    /// UTC timestamp
    DateTime,
    /// Signed integer
    Integer,
    /// Absolute URL
    Url,
}

impl ValueType {
    /// XSD datatype IRI for the serialized literal
    #[inline]
    #[must_use]
    pub const fn datatype_iri(self) -> &'static str {
        match self {
            Self::String => xsd::STRING,
            Self::Date => xsd::DATE,
            Self::DateTime => xsd::DATE_TIME,
            Self::Integer => xsd::INTEGER,
            Self::Url => xsd::ANY_URI,
        }
    }

    /// Parse raw text into a value of this type
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidValue`] (or [`GraphError::InvalidUrl`])
    /// if the text does not parse; values are never coerced
    pub fn parse(self, raw: &str) -> Result<TypedValue, GraphError> {
        let invalid = || GraphError::InvalidValue {
            expected: self,
            raw: raw.to_string(),
        };
        match self {
            Self::String => Ok(TypedValue::String(raw.to_string())),
            Self::Date => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map(TypedValue::Date)
                .map_err(|_| invalid()),
            Self::DateTime => DateTime::parse_from_rfc3339(raw.trim())
                .map(|dt| TypedValue::DateTime(dt.with_timezone(&Utc)))
                .map_err(|_| invalid()),
            Self::Integer => raw
                .trim()
                .parse::<i64>()
                .map(TypedValue::Integer)
                .map_err(|_| invalid()),
            Self::Url => ResourceUrl::parse(raw.trim()).map(TypedValue::Url),
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Integer => "integer",
            Self::Url => "url",
        };
        f.write_str(name)
    }
}

/// A single typed attribute value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum TypedValue {
    /// Plain string
    String(String),
    /// Calendar date
    Date(NaiveDate),
    /// UTC timestamp
    #[serde(rename = "datetime")]
    DateTime(DateTime<Utc>),
    /// Signed integer
    Integer(i64),
    /// Absolute URL
    Url(ResourceUrl),
}

impl TypedValue {
    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// Type tag of this value
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::String(_) => ValueType::String,
            Self::Date(_) => ValueType::Date,
            Self::DateTime(_) => ValueType::DateTime,
            Self::Integer(_) => ValueType::Integer,
            Self::Url(_) => ValueType::Url,
        }
    }

    /// Lexical form used in serialized literals
    #[must_use]
    pub fn lexical(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
            Self::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
            Self::Integer(i) => i.to_string(),
            Self::Url(u) => u.to_string(),
        }
    }

    /// Try to get as string
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as date
    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Try to get as timestamp
    #[must_use]
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Try to get as integer
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as URL
    #[must_use]
    pub fn as_url(&self) -> Option<&ResourceUrl> {
        match self {
            Self::Url(u) => Some(u),
            _ => None,
        }
    }
}

impl From<ResourceUrl> for TypedValue {
    fn from(value: ResourceUrl) -> Self {
        Self::Url(value)
    }
}

impl From<DateTime<Utc>> for TypedValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl From<NaiveDate> for TypedValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<i64> for TypedValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn integer_rejects_non_numeric() {
        let err = ValueType::Integer.parse("seventy").unwrap_err();
        assert_eq!(
            err,
            GraphError::InvalidValue {
                expected: ValueType::Integer,
                raw: "seventy".to_string()
            }
        );
    }

    #[test]
    fn date_and_datetime_parse() {
        let date = ValueType::Date.parse("2024-02-29").unwrap();
        assert_eq!(date.as_date(), NaiveDate::from_ymd_opt(2024, 2, 29));

        let ts = ValueType::DateTime.parse("2024-03-01T10:00:00+02:00").unwrap();
        assert_eq!(
            ts.as_datetime(),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap())
        );

        assert!(ValueType::Date.parse("02/29/2024").is_err());
        assert!(ValueType::DateTime.parse("yesterday").is_err());
    }

    #[test]
    fn url_rejects_relative() {
        assert!(matches!(
            ValueType::Url.parse("profile/card#me"),
            Err(GraphError::InvalidUrl(_))
        ));
    }

    #[test]
    fn lexical_forms_reparse() {
        let values = [
            TypedValue::string("hello"),
            TypedValue::Integer(-42),
            TypedValue::Date(NaiveDate::from_ymd_opt(2030, 1, 5).unwrap()),
            TypedValue::DateTime(Utc.with_ymd_and_hms(2023, 6, 1, 12, 30, 0).unwrap()),
        ];
        for value in values {
            let reparsed = value.value_type().parse(&value.lexical()).unwrap();
            assert_eq!(reparsed, value);
        }
    }

    #[test]
    fn serde_carries_type_tag() {
        let json = serde_json::to_string(&TypedValue::Integer(7)).unwrap();
        assert_eq!(json, r#"{"type":"integer","value":7}"#);
    }
}
