//! Session values and the types that can be read back out of them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::types::{CalendarDate, NationalId, ValidationFailure};

/// A value held in a session variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SessionValue {
    Text(String),
    NationalId(NationalId),
    Date(CalendarDate),
}

impl fmt::Display for SessionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::NationalId(id) => write!(f, "{id}"),
            Self::Date(d) => write!(f, "{d}"),
        }
    }
}

impl From<String> for SessionValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for SessionValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<NationalId> for SessionValue {
    fn from(id: NationalId) -> Self {
        Self::NationalId(id)
    }
}

impl From<CalendarDate> for SessionValue {
    fn from(d: CalendarDate) -> Self {
        Self::Date(d)
    }
}

/// Declared type of a prompt's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    #[default]
    Text,
    NationalId,
    Date,
}

impl ValueType {
    /// Parse raw input into a typed session value.
    pub fn parse(&self, input: &str) -> Result<SessionValue, ValidationFailure> {
        match self {
            Self::Text => Ok(SessionValue::Text(input.to_string())),
            Self::NationalId => NationalId::parse(input).map(SessionValue::NationalId),
            Self::Date => CalendarDate::parse(input).map(SessionValue::Date),
        }
    }
}

/// A Rust type that can be stored in and read from a session variable.
///
/// Reads accept the typed variant or its text form, because values that
/// went through an external session store come back as plain text.
pub trait SessionType: Sized {
    const TYPE_NAME: &'static str;

    fn from_value(name: &str, value: &SessionValue) -> Result<Self, SessionError>;

    fn into_value(self) -> SessionValue;
}

impl SessionType for String {
    const TYPE_NAME: &'static str = "text";

    fn from_value(_name: &str, value: &SessionValue) -> Result<Self, SessionError> {
        Ok(value.to_string())
    }

    fn into_value(self) -> SessionValue {
        SessionValue::Text(self)
    }
}

impl SessionType for NationalId {
    const TYPE_NAME: &'static str = "national_id";

    fn from_value(name: &str, value: &SessionValue) -> Result<Self, SessionError> {
        match value {
            SessionValue::NationalId(id) => Ok(id.clone()),
            other => NationalId::parse(&other.to_string()).map_err(|source| {
                SessionError::Invalid {
                    name: name.to_string(),
                    expected: Self::TYPE_NAME,
                    source,
                }
            }),
        }
    }

    fn into_value(self) -> SessionValue {
        SessionValue::NationalId(self)
    }
}

impl SessionType for CalendarDate {
    const TYPE_NAME: &'static str = "date";

    fn from_value(name: &str, value: &SessionValue) -> Result<Self, SessionError> {
        match value {
            SessionValue::Date(d) => Ok(*d),
            other => CalendarDate::parse(&other.to_string()).map_err(|source| {
                SessionError::Invalid {
                    name: name.to_string(),
                    expected: Self::TYPE_NAME,
                    source,
                }
            }),
        }
    }

    fn into_value(self) -> SessionValue {
        SessionValue::Date(self)
    }
}
