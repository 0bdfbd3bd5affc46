//! Profile record model.

use serde::{Deserialize, Serialize};

use crate::types::{CalendarDate, NationalId};

/// One person (the caller or a family member).
///
/// Stored in the profile file under `profiles.<national_id>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// Phone numbers entitled to manage this record.
    #[serde(rename = "owner_msisdn_list")]
    pub owner_msisdns: Vec<String>,
    pub national_id: NationalId,
    pub surname: String,
    #[serde(rename = "name")]
    pub given_name: String,
    #[serde(rename = "date")]
    pub date_of_birth: CalendarDate,
    pub gender: String,
}

impl ProfileRecord {
    /// Create a record owned by a single phone number.
    pub fn new(
        owner_msisdn: impl Into<String>,
        national_id: NationalId,
        surname: impl Into<String>,
        given_name: impl Into<String>,
        date_of_birth: CalendarDate,
        gender: impl Into<String>,
    ) -> Self {
        Self {
            owner_msisdns: vec![owner_msisdn.into()],
            national_id,
            surname: surname.into(),
            given_name: given_name.into(),
            date_of_birth,
            gender: gender.into(),
        }
    }

    /// Whether `msisdn` may manage this record.
    pub fn owned_by(&self, msisdn: &str) -> bool {
        self.owner_msisdns.iter().any(|owner| owner == msisdn)
    }

    /// Label shown in the family menu: `Surname, Name (id)`.
    pub fn display_label(&self) -> String {
        format!(
            "{}, {} ({})",
            self.surname, self.given_name, self.national_id
        )
    }
}
