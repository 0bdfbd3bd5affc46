//! Family profiles: USSD-style registry of family member profiles keyed
//! by national id.

pub mod config;
pub mod console;
pub mod engine;
pub mod error;
pub mod flows;
pub mod menu;
pub mod profiles;
pub mod routes;
pub mod session;
pub mod types;
