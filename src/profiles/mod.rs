//! Family profiles: records keyed by national id and the file-backed
//! registry that owns them.

pub mod model;
pub mod registry;

pub use model::ProfileRecord;
pub use registry::ProfileRegistry;
