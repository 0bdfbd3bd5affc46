//! User-facing validation failures.

use std::collections::BTreeMap;

/// Machine-readable failure codes.
pub mod codes {
    pub const NAT_ID_NOT_13_DIGITS: &str = "nat_id_not_13_digits";
    pub const INVALID_DATE: &str = "invalid_date";
}

/// A structured validation failure, meant to be templated into a message
/// for the person who typed the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}: {:?}{}", .code, .value, .detail.as_deref().map(|d| format!(" ({d})")).unwrap_or_default())]
pub struct ValidationFailure {
    /// Failure code, e.g. `nat_id_not_13_digits`.
    pub code: &'static str,
    /// The offending input.
    pub value: String,
    /// Underlying parser diagnostic, if any.
    pub detail: Option<String>,
}

impl ValidationFailure {
    pub fn new(code: &'static str, value: impl Into<String>) -> Self {
        Self {
            code,
            value: value.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Template parameters: `value` always, `error` when a diagnostic exists.
    pub fn params(&self) -> BTreeMap<&'static str, String> {
        let mut params = BTreeMap::new();
        params.insert("value", self.value.clone());
        if let Some(ref detail) = self.detail {
            params.insert("error", detail.clone());
        }
        params
    }
}
