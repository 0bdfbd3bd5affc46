//! Self-validating scalar types shared by profile records and session
//! variables.
//!
//! Every type here has exactly one text parser. User input, session
//! snapshots and the persisted profile file all go through it, so the
//! three formats cannot drift apart.

pub mod date;
pub mod failure;
pub mod national_id;

pub use date::CalendarDate;
pub use failure::{ValidationFailure, codes};
pub use national_id::NationalId;
