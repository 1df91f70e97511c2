pub mod results;

pub use results::{AppendOutcome, ResultsStore, StoreError, StoreResult};
