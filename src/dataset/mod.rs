//! Annotation inputs: roster, paper assignments, review files and PDFs
//!
//! Everything is read once at startup. Column headers of the CSV inputs
//! are normalized so `User`, ` user ` and `USER` all resolve to `user`.

pub mod loader;

pub use loader::{normalize_column, Dataset, DatasetError, ReviewEntry, NOT_AVAILABLE};
