//! `liftboard-records` - normalized powerlifting records and the query engine.
//!
//! Pure crate: receives raw rows, returns typed records, filtered subsets and
//! the best record per (weight class, lift). No file or CLI dependencies.

pub mod best;
pub mod error;
pub mod filter;
pub mod model;
pub mod normalize;
pub mod options;

pub use best::best_per_class_and_lift;
pub use error::SelectionError;
pub use filter::{
    apply_filter, division_group, Discipline, DivisionGrouping, SearchMode, Selection, NONE_LABEL,
};
pub use model::{RawRow, Record, TestingStatus};
pub use normalize::normalize;
pub use options::{selection_options, SelectionOptions};
