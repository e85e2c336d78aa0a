//! Core module - incident storage, querying and aggregation

pub mod config;
pub mod error;
pub mod export;
pub mod identity;
pub mod query;
pub mod shortid;
pub mod stats;
pub mod store;

pub use config::Config;
pub use error::{Result, TrackerError};
pub use export::{to_csv, write_csv, CSV_COLUMNS};
pub use identity::{IdParseError, IncidentId};
pub use query::{filter, FilterCriteria, IncidentFilter, SortKey};
pub use shortid::{resolve_reference, ShortIdIndex};
pub use stats::{summarize, Summary};
pub use store::{InitOutcome, Store};
