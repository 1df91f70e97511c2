//! Annotation HTTP server
//!
//! Routes:
//! - `/` annotator selection
//! - `/annotate/:user` paper selection
//! - `/annotate/:user/:paper` rating form (GET) and submission (POST)
//! - `/pdf/:paper` paper PDF
//! - `/api/...` JSON views of users, assignments and parsed reviews
//! - `/health`

use crate::dataset::Dataset;
use crate::form::{self, FormLayout, FormView};
use crate::models::{EvalConfig, ParsedReview, ReviewSource};
use crate::parser::ReviewParser;
use crate::store::{AppendOutcome, ResultsStore};
use crate::validator::validate_submission;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Json, Router,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// Application State
// =============================================================================

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub parser: Arc<ReviewParser>,
    /// Appends go through the lock so one submission is written at a time
    pub store: Arc<Mutex<ResultsStore>>,
    pub shuffle_salt: Arc<str>,
}

impl AppState {
    pub fn new(config: &EvalConfig, dataset: Dataset, parser: ReviewParser) -> Self {
        Self {
            dataset: Arc::new(dataset),
            parser: Arc::new(parser),
            store: Arc::new(Mutex::new(ResultsStore::new(config.results_path.clone()))),
            shuffle_salt: Arc::from(config.shuffle_salt.as_str()),
        }
    }

    fn layout(&self, user: &str, paper_id: &str) -> FormLayout {
        FormLayout::build(user, paper_id, &self.dataset, &self.parser, &self.shuffle_salt)
    }
}

// =============================================================================
// API Models
// =============================================================================

#[derive(Debug, Serialize)]
pub struct PaperStatus {
    pub paper_id: String,
    pub rated: bool,
}

#[derive(Debug, Serialize)]
pub struct SourceReview {
    pub source: ReviewSource,
    pub label: &'static str,
    pub sections: ParsedReview,
}

#[derive(Debug, Serialize)]
pub struct PaperReviews {
    pub paper_id: String,
    pub reviews: Vec<SourceReview>,
}

// =============================================================================
// Router
// =============================================================================

/// Build the router with all annotation routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_user_selection))
        .route("/annotate/:user", get(handle_paper_selection))
        .route(
            "/annotate/:user/:paper",
            get(handle_form).post(handle_submit),
        )
        .route("/pdf/:paper", get(serve_pdf))
        .route("/api/users", get(api_users))
        .route("/api/users/:user/papers", get(api_user_papers))
        .route("/api/papers/:paper/reviews", get(api_paper_reviews))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// =============================================================================
// Helpers
// =============================================================================

fn html_error(status: StatusCode, title: &str, message: &str) -> Response {
    (status, Html(form::render_error_page(title, message))).into_response()
}

fn json_error(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// Check the user is on the roster and the paper is assigned to them
fn check_access(state: &AppState, user: &str, paper_id: &str) -> std::result::Result<(), Response> {
    if !state.dataset.has_user(user) {
        return Err(html_error(
            StatusCode::NOT_FOUND,
            "Unknown user",
            &format!("User '{}' is not on the annotator roster", user),
        ));
    }
    if !state.dataset.is_assigned(user, paper_id) {
        return Err(html_error(
            StatusCode::FORBIDDEN,
            "Paper not assigned",
            &format!("Paper '{}' is not assigned to user '{}'", paper_id, user),
        ));
    }
    Ok(())
}

fn pdf_available(state: &AppState, paper_id: &str) -> bool {
    state
        .dataset
        .pdf_path(paper_id)
        .map(|p| p.is_file())
        .unwrap_or(false)
}

async fn is_rated(state: &AppState, user: &str, paper_id: &str) -> std::result::Result<bool, Response> {
    let store = state.store.lock().await;
    store.is_rated(user, paper_id).map_err(|e| {
        tracing::error!(error = %e, user, paper_id, "Failed to read results");
        html_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Results unavailable",
            &e.to_string(),
        )
    })
}

// =============================================================================
// Page Handlers
// =============================================================================

async fn handle_user_selection(State(state): State<AppState>) -> Html<String> {
    Html(form::render_user_selection(state.dataset.users()))
}

async fn handle_paper_selection(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Response {
    if !state.dataset.has_user(&user) {
        return html_error(
            StatusCode::NOT_FOUND,
            "Unknown user",
            &format!("User '{}' is not on the annotator roster", user),
        );
    }

    let rated = {
        let store = state.store.lock().await;
        match store.rated_papers(&user) {
            Ok(rated) => rated,
            Err(e) => {
                return html_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Results unavailable",
                    &e.to_string(),
                )
            }
        }
    };

    let papers: Vec<(String, bool)> = state
        .dataset
        .papers_for(&user)
        .into_iter()
        .map(|p| {
            let done = rated.contains(&p);
            (p, done)
        })
        .collect();

    Html(form::render_paper_selection(&user, &papers)).into_response()
}

async fn handle_form(
    State(state): State<AppState>,
    Path((user, paper_id)): Path<(String, String)>,
) -> Response {
    if let Err(response) = check_access(&state, &user, &paper_id) {
        return response;
    }

    let already_rated = match is_rated(&state, &user, &paper_id).await {
        Ok(rated) => rated,
        Err(response) => return response,
    };

    let layout = state.layout(&user, &paper_id);
    let view = FormView {
        already_rated,
        pdf_available: pdf_available(&state, &paper_id),
        ..FormView::default()
    };

    Html(form::render_form_page(&layout, &view)).into_response()
}

async fn handle_submit(
    State(state): State<AppState>,
    Path((user, paper_id)): Path<(String, String)>,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    if let Err(response) = check_access(&state, &user, &paper_id) {
        return response;
    }

    let layout = state.layout(&user, &paper_id);

    let points = match validate_submission(&layout, &fields) {
        Ok(points) => points,
        Err(errors) => {
            tracing::info!(
                user = %user,
                paper_id = %paper_id,
                issues = errors.issues.len(),
                "Submission rejected"
            );
            let already_rated = match is_rated(&state, &user, &paper_id).await {
                Ok(rated) => rated,
                Err(response) => return response,
            };
            let messages = errors.messages();
            let flagged = errors.fields();
            let view = FormView {
                values: Some(&fields),
                errors: &messages,
                flagged: &flagged,
                already_rated,
                pdf_available: pdf_available(&state, &paper_id),
            };
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(form::render_form_page(&layout, &view)),
            )
                .into_response();
        }
    };

    let outcome = {
        let store = state.store.lock().await;
        store.append_submission(&user, &paper_id, &points)
    };

    match outcome {
        Ok(AppendOutcome::Written { records, .. }) => {
            Html(form::render_confirmation(&user, &paper_id, Some(records))).into_response()
        }
        Ok(AppendOutcome::AlreadyRated) => {
            Html(form::render_confirmation(&user, &paper_id, None)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, user = %user, paper_id = %paper_id, "Failed to store ratings");
            html_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save ratings",
                &e.to_string(),
            )
        }
    }
}

async fn serve_pdf(State(state): State<AppState>, Path(paper_id): Path<String>) -> Response {
    let path = match state.dataset.pdf_path(&paper_id) {
        Ok(path) => path,
        Err(e) => return html_error(StatusCode::BAD_REQUEST, "Invalid paper", &e.to_string()),
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "application/pdf")], bytes).into_response(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => html_error(
            StatusCode::NOT_FOUND,
            "PDF not found",
            &format!("PDF not found at path: {}", path.display()),
        ),
        Err(e) => {
            tracing::error!(error = %e, path = %path.display(), "Failed to read PDF");
            html_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to display PDF",
                &e.to_string(),
            )
        }
    }
}

// =============================================================================
// JSON API Handlers
// =============================================================================

async fn api_users(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.dataset.users().to_vec())
}

async fn api_user_papers(State(state): State<AppState>, Path(user): Path<String>) -> Response {
    if !state.dataset.has_user(&user) {
        return json_error(StatusCode::NOT_FOUND, format!("User '{}' not found", user));
    }

    let rated = {
        let store = state.store.lock().await;
        match store.rated_papers(&user) {
            Ok(rated) => rated,
            Err(e) => return json_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        }
    };

    let papers: Vec<PaperStatus> = state
        .dataset
        .papers_for(&user)
        .into_iter()
        .map(|paper_id| PaperStatus {
            rated: rated.contains(&paper_id),
            paper_id,
        })
        .collect();

    Json(papers).into_response()
}

async fn api_paper_reviews(
    State(state): State<AppState>,
    Path(paper_id): Path<String>,
) -> Response {
    if !state.dataset.all_papers().contains(&paper_id) {
        return json_error(
            StatusCode::NOT_FOUND,
            format!("Paper '{}' not found", paper_id),
        );
    }

    let reviews = state
        .dataset
        .reviews_for(&paper_id)
        .into_iter()
        .map(|(source, text)| SourceReview {
            source,
            label: source.name(),
            sections: state.parser.parse(&text),
        })
        .collect();

    Json(PaperReviews { paper_id, reviews }).into_response()
}
