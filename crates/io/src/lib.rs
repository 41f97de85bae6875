// File I/O: records CSV in, filtered CSV and summary rows out

pub mod cache;
pub mod csv;
pub mod error;
pub mod export;
pub mod logo;

pub use cache::RecordCache;
pub use crate::csv::{load_records, TextEncoding};
pub use error::IoError;
