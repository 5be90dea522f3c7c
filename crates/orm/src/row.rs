use anyhow::{anyhow, bail};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use quarry_sql::{Record, Value};

use crate::column::Column;
use crate::error::{Error, Result};

/// One returned tuple, keyed by `table_column`.
///
/// Keys come from the select's projection aliases, so identically named
/// columns of joined tables never collide. Lookups go through a [`Column`]
/// rather than a string key.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    fields: Vec<(String, Value)>,
}

impl ResultRow {
    /// Zip a record against the aliases it was selected under.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncorrectArguments`] if the record does not have
    /// exactly one value per alias.
    pub(crate) fn from_record(aliases: &[String], record: Record) -> Result<Self> {
        if aliases.len() != record.len() {
            return Err(Error::IncorrectArguments(format!(
                "record has {} values for {} selected columns",
                record.len(),
                aliases.len()
            )));
        }
        Ok(Self {
            fields: aliases.iter().cloned().zip(record).collect(),
        })
    }

    /// Raw value of `column`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncorrectArguments`] if `column` was not selected.
    pub fn get(&self, column: &Column) -> Result<&Value> {
        let key = column.alias();
        self.fields.iter().find(|(name, _)| *name == key).map(|(_, value)| value).ok_or_else(
            || Error::IncorrectArguments(format!("`{key}` is not part of this row")),
        )
    }

    /// Value of `column` converted to `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncorrectArguments`] if `column` was not selected, or
    /// [`Error::UnexpectedType`] if the value cannot be converted.
    pub fn fetch<T: FromValue>(&self, column: &Column) -> Result<T> {
        let value = self.get(column)?;
        T::from_value(value).map_err(|e| Error::UnexpectedType {
            column: column.alias(),
            expected: e.to_string(),
            found: value.kind(),
        })
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the row has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in projection order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// Conversion from a stored [`Value`].
///
/// Implemented for the standard scalar types plus `chrono` dates and
/// timestamps and `serde_json` documents.
pub trait FromValue: Sized {
    /// Convert a stored value.
    ///
    /// # Errors
    ///
    /// Returns an error naming the expected type when `value` does not fit.
    fn from_value(value: &Value) -> anyhow::Result<Self>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> anyhow::Result<Self> {
        Ok(value.clone())
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> anyhow::Result<Self> {
        match value {
            Value::Integer(v) => Ok(*v),
            _ => bail!("integer"),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> anyhow::Result<Self> {
        match value {
            Value::Integer(v) => Ok(Self::try_from(*v)?),
            _ => bail!("32-bit integer"),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> anyhow::Result<Self> {
        match value {
            Value::Integer(v) => Ok(*v != 0),
            _ => bail!("boolean"),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> anyhow::Result<Self> {
        match value {
            Value::Real(v) => Ok(*v),
            #[allow(clippy::cast_precision_loss)]
            Value::Integer(v) => Ok(*v as Self),
            _ => bail!("real"),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> anyhow::Result<Self> {
        match value {
            Value::Text(v) => Ok(v.clone()),
            _ => bail!("text"),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: &Value) -> anyhow::Result<Self> {
        match value {
            Value::Blob(v) => Ok(v.clone()),
            _ => bail!("blob"),
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: &Value) -> anyhow::Result<Self> {
        let Value::Text(raw) = value else {
            bail!("timestamp text");
        };
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Ok(parsed.with_timezone(&Utc));
        }
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
            return Ok(Self::from_naive_utc_and_offset(parsed, Utc));
        }
        bail!("RFC3339 or \"%Y-%m-%d %H:%M:%S%.f\" timestamp, got {raw}")
    }
}

impl FromValue for NaiveDate {
    fn from_value(value: &Value) -> anyhow::Result<Self> {
        let Value::Text(raw) = value else {
            bail!("date text");
        };
        Self::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_e| anyhow!("\"%Y-%m-%d\" date, got {raw}"))
    }
}

impl FromValue for serde_json::Value {
    fn from_value(value: &Value) -> anyhow::Result<Self> {
        match value {
            Value::Text(raw) => Ok(serde_json::from_str(raw)?),
            Value::Blob(bytes) => Ok(serde_json::from_slice(bytes)?),
            _ => bail!("json text or blob"),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> anyhow::Result<Self> {
        if value.is_null() { Ok(None) } else { T::from_value(value).map(Some) }
    }
}
