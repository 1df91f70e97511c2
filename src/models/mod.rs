pub mod config;
pub mod rating;
pub mod review;

pub use config::{EvalConfig, ReviewFiles, CONFIG_FILE_NAME};
pub use rating::{Rating, RatingRecord, ScoredPoint};
pub use review::{ParsedReview, ReviewSource, Section};
