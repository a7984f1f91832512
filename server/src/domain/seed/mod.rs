//! Seed data import for `frenzy db populate`
//!
//! - `transform` - JSON record types, opening-hours and date parsing
//! - `import` - download, raw copy on disk, transactional load

pub mod error;
pub mod import;
pub mod transform;

pub use error::ImportError;
pub use import::{PopulateSummary, populate, populate_from_remote};
