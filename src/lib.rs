// revieweval - Human Evaluation Interface for Peer Reviews
// Annotators rate the sections of ground-truth and generated reviews side by side with the paper

pub mod cli;
pub mod dataset;
pub mod form;
pub mod models;
pub mod parser;
pub mod server;
pub mod store;
pub mod validator;

pub use anyhow::{Context, Result};
pub use colored::Colorize;

// Re-export commonly used types
pub use dataset::Dataset;
pub use models::{EvalConfig, ParsedReview, Rating, RatingRecord, ReviewSource, Section};
pub use parser::{parse_review, ReviewParser};
pub use store::ResultsStore;
