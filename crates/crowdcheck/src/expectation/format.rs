//! strftime handling shared by the format expectation and the period filter.
//!
//! Matching is strict: whitespace in the format requires at least one
//! whitespace character in the value, and the parsed fields must resolve to
//! a real date and time. Fields the format leaves out default to
//! 1900-01-01 00:00:00.

use chrono::NaiveDateTime;
use chrono::format::{Item, Parsed, StrftimeItems};

use crate::error::{CrowdcheckError, Result};
use crate::input::Value;

/// A strftime format compiled once and reused across a column.
#[derive(Debug, Clone)]
pub struct CompiledFormat<'f> {
    source: &'f str,
    items: Vec<Item<'f>>,
}

/// Compile a strftime format, rejecting empty or malformed specifiers.
pub fn compile_strftime(format: &str) -> Result<CompiledFormat<'_>> {
    let items: Vec<Item<'_>> = StrftimeItems::new(format)
        .map(|item| match item {
            // chrono's `Space` also matches no whitespace at all
            Item::Space(ws) => Item::Literal(ws),
            other => other,
        })
        .collect();

    if format.is_empty() || items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(CrowdcheckError::InvalidFormat {
            format: format.to_string(),
        });
    }

    Ok(CompiledFormat {
        source: format,
        items,
    })
}

impl<'f> CompiledFormat<'f> {
    /// The format string this was compiled from.
    pub fn as_str(&self) -> &'f str {
        self.source
    }

    /// Whether the whole of `text` parses under the format into a valid
    /// timestamp.
    pub fn matches(&self, text: &str) -> bool {
        self.parse_datetime(text).is_some()
    }

    /// Whether a non-null cell matches. Non-text cells are checked by their
    /// display text.
    pub fn accepts(&self, value: &Value) -> bool {
        match value {
            Value::Text(text) => self.matches(text),
            other => self.matches(&other.to_string()),
        }
    }

    /// Parse `text` into a timestamp; date-only formats resolve to midnight.
    pub fn parse_datetime(&self, text: &str) -> Option<NaiveDateTime> {
        let mut parsed = Parsed::new();
        chrono::format::parse(&mut parsed, text, self.items.iter()).ok()?;
        resolve(parsed)
    }

    /// Timestamp of a cell. Cells that do not match the format give `None`.
    pub fn value_datetime(&self, value: &Value) -> Option<NaiveDateTime> {
        match value {
            Value::Null => None,
            Value::Text(text) => self.parse_datetime(text),
            other => self.parse_datetime(&other.to_string()),
        }
    }
}

fn resolve(mut parsed: Parsed) -> Option<NaiveDateTime> {
    if parsed.timestamp().is_none() {
        let week_based = parsed.isoyear().is_some()
            || parsed.isoweek().is_some()
            || parsed.week_from_sun().is_some()
            || parsed.week_from_mon().is_some()
            || parsed.ordinal().is_some();
        if !week_based {
            if parsed.year().is_none()
                && parsed.year_div_100().is_none()
                && parsed.year_mod_100().is_none()
            {
                parsed.set_year(1900).ok()?;
            }
            if parsed.month().is_none() {
                parsed.set_month(1).ok()?;
            }
            if parsed.day().is_none() {
                parsed.set_day(1).ok()?;
            }
        }
        if parsed.hour_mod_12().is_none() {
            parsed.set_hour12(12).ok()?;
        }
        if parsed.hour_div_12().is_none() {
            parsed.set_ampm(false).ok()?;
        }
        if parsed.minute().is_none() {
            parsed.set_minute(0).ok()?;
        }
    }
    parsed.to_naive_datetime_with_offset(0).ok()
}
