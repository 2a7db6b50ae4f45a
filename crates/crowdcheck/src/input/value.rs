//! Cell values held by a [`Dataset`](super::Dataset).

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single typed cell.
///
/// Values loaded from delimited files are always `Text` or `Null`; the other
/// variants exist for tables built in code.
///
/// Serialized as plain JSON `null`, numbers and strings, except `DateTime`,
/// which is wrapped as `{"datetime": "..."}` so it does not read back as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing value.
    Null,
    /// Numeric value.
    Number(f64),
    /// Text value, exactly as read.
    Text(String),
    /// Date and time value.
    DateTime(#[serde(with = "tagged_datetime")] NaiveDateTime),
}

mod tagged_datetime {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Tagged {
        datetime: NaiveDateTime,
    }

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Tagged { datetime: *value }.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        Tagged::deserialize(deserializer).map(|tagged| tagged.datetime)
    }
}

impl Value {
    /// Create a text value.
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    /// Returns true for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the text of a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Hashable identity used for distinctness; `None` for nulls.
    pub(crate) fn key(&self) -> Option<ValueKey<'_>> {
        match self {
            Value::Null => None,
            Value::Text(s) => Some(ValueKey::Text(s)),
            // -0.0 and 0.0 compare equal, so they must share a key
            Value::Number(n) if *n == 0.0 => Some(ValueKey::Number(0.0f64.to_bits())),
            Value::Number(n) => Some(ValueKey::Number(n.to_bits())),
            Value::DateTime(dt) => Some(ValueKey::DateTime(*dt)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Borrowed, hashable form of a non-null [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ValueKey<'a> {
    Text(&'a str),
    Number(u64),
    DateTime(NaiveDateTime),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<&str>), Value::Null);
        assert_eq!(Value::from(Some("US")), Value::text("US"));
    }

    #[test]
    fn test_signed_zero_shares_key() {
        assert_eq!(Value::Number(0.0).key(), Value::Number(-0.0).key());
        assert_ne!(Value::Number(1.0).key(), Value::text("1").key());
        assert!(Value::Null.key().is_none());
    }

    #[test]
    fn test_json_keeps_datetime_distinct_from_text() {
        let dt = chrono::NaiveDate::from_ymd_opt(2017, 3, 1)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .unwrap();
        let values = vec![
            Value::Null,
            Value::Number(2017.0),
            Value::text("2017-03-01T10:00:00"),
            Value::DateTime(dt),
        ];

        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(
            json,
            r#"[null,2017.0,"2017-03-01T10:00:00",{"datetime":"2017-03-01T10:00:00"}]"#
        );

        let back: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::text("art").to_string(), "art");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Null.to_string(), "");
    }
}
