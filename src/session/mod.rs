//! Session state: typed access to named, session-scoped variables.
//!
//! Variables are addressed through `VarKey<T>`, which pairs a name with
//! the type the caller expects. Reading a value that cannot be
//! reinterpreted as `T` is a `SessionError`, never a silent cast.

pub mod value;

use std::collections::{BTreeMap, HashMap};
use std::marker::PhantomData;

use uuid::Uuid;

use crate::error::SessionError;

pub use value::{SessionType, SessionValue, ValueType};

/// Name of a session variable together with its expected type.
pub struct VarKey<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> VarKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for VarKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for VarKey<T> {}

impl<T> std::fmt::Debug for VarKey<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("VarKey").field(&self.name).finish()
    }
}

/// Well-known session variables.
pub mod vars {
    use super::VarKey;
    use crate::types::{CalendarDate, NationalId};

    /// Caller's phone number, set when the session starts.
    pub const MSISDN: VarKey<String> = VarKey::new("msisdn");

    // Collected while creating a new profile.
    pub const PROFILE_NEW_NATID: VarKey<NationalId> = VarKey::new("profile_new_natid");
    pub const PROFILE_NEW_SURNAME: VarKey<String> = VarKey::new("profile_new_surname");
    pub const PROFILE_NEW_NAME: VarKey<String> = VarKey::new("profile_new_name");
    pub const PROFILE_NEW_DOB: VarKey<CalendarDate> = VarKey::new("profile_new_dob");
    pub const PROFILE_NEW_GENDER: VarKey<String> = VarKey::new("profile_new_gender");

    // The profile selected from the family menu.
    pub const PROFILE_NATID: VarKey<NationalId> = VarKey::new("profile_natid");
    pub const PROFILE_SURNAME: VarKey<String> = VarKey::new("profile_surname");
    pub const PROFILE_NAME: VarKey<String> = VarKey::new("profile_name");
    pub const PROFILE_DOB: VarKey<CalendarDate> = VarKey::new("profile_dob");
    pub const PROFILE_GENDER: VarKey<String> = VarKey::new("profile_gender");
}

/// Variables of one user session.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    values: HashMap<String, SessionValue>,
}

impl Session {
    /// Start a session for the caller identified by `msisdn`.
    pub fn new(msisdn: impl Into<String>) -> Self {
        let mut session = Self {
            id: Uuid::new_v4().to_string(),
            values: HashMap::new(),
        };
        session.set(vars::MSISDN, msisdn.into());
        session
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Caller's phone number.
    pub fn msisdn(&self) -> Result<String, SessionError> {
        self.get(vars::MSISDN)
    }

    /// Read a variable as `T`.
    pub fn get<T: SessionType>(&self, key: VarKey<T>) -> Result<T, SessionError> {
        let value = self.values.get(key.name).ok_or_else(|| SessionError::Missing {
            name: key.name.to_string(),
        })?;
        T::from_value(key.name, value)
    }

    /// Store a typed variable.
    pub fn set<T: SessionType>(&mut self, key: VarKey<T>, value: T) {
        self.values.insert(key.name.to_string(), value.into_value());
    }

    /// Text form of a variable, whatever type it was stored as.
    pub fn text(&self, name: &str) -> Result<String, SessionError> {
        self.values
            .get(name)
            .map(|v| v.to_string())
            .ok_or_else(|| SessionError::Missing {
                name: name.to_string(),
            })
    }

    /// Raw access by name, used by menu actions and caption templates.
    pub fn value(&self, name: &str) -> Option<&SessionValue> {
        self.values.get(name)
    }

    pub fn set_value(&mut self, name: impl Into<String>, value: SessionValue) {
        self.values.insert(name.into(), value);
    }

    /// Flatten to plain strings, the form an external key/value session
    /// store keeps. Type tags are lost.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }

    /// Rebuild a session from a snapshot. Every value comes back as text
    /// and regains its type on the next typed read.
    pub fn restore(id: impl Into<String>, snapshot: BTreeMap<String, String>) -> Self {
        Self {
            id: id.into(),
            values: snapshot
                .into_iter()
                .map(|(k, v)| (k, SessionValue::Text(v)))
                .collect(),
        }
    }

    /// Snapshot encoded as JSON.
    pub fn snapshot_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    pub fn restore_json(id: impl Into<String>, json: &str) -> Result<Self, SessionError> {
        Ok(Self::restore(id, serde_json::from_str(json)?))
    }
}
