pub mod review;

pub use review::{parse_review, parse_review_file, ReviewParser};
