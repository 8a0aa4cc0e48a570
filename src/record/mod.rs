// Sun Oct 18 2026 - Alex

pub mod error;
pub mod set;
pub mod store;

pub use error::{RecordError, RecordResult};
pub use set::RecordSet;
pub use store::{RecordStore, RunLayout};
