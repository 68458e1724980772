//! Frontend entry page

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde_json::json;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::Json;

/// GET / - the bundled `index.html`, or a JSON 404 when it is absent
pub async fn index(State(state): State<AppState>) -> Response {
    let path = state.static_dir.join("index.html");

    match tokio::fs::read_to_string(&path).await {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Frontend not available");
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Frontend not found" })),
            )
                .into_response()
        }
    }
}
