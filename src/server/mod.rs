pub mod http_server;

pub use http_server::{build_router, AppState, PaperReviews, PaperStatus};
