//! HTTP request handlers for the read API.
//!
//! Thin axum layer over [`query::get_all`](crate::query::get_all).

use crate::query::{self, QueryError};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router as AxumRouter,
};
use serde::{Deserialize, Serialize};
use tagwatch_domain::StoredEntry;
use tagwatch_store::SharedStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Store shared with the poller
    pub store: SharedStore,
}

/// Welcome payload for `GET /`
#[derive(Debug, Serialize, Deserialize)]
pub struct WelcomeResponse {
    /// Greeting text
    pub message: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub detail: String,
}

/// Application error type
#[derive(Debug)]
pub struct AppError(QueryError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            QueryError::NotFound => StatusCode::NOT_FOUND,
            QueryError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse {
            detail: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        AppError(e)
    }
}

/// GET / - Welcome route
async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the Page Monitor API!".to_string(),
    })
}

/// GET /content - Every stored entry, 404 when there are none
async fn get_saved_content(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredEntry>>, AppError> {
    let entries = query::get_all(&state.store)?;
    Ok(Json(entries))
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/", get(root))
        .route("/content", get(get_saved_content))
        .with_state(state)
}
