//! JSON API endpoints.
//!
//! Returns the same page model as the HTML views, with plain-text step
//! annotations.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::Response;

use crate::error::ServerError;
use crate::handlers::{DisplayQuery, cached_response, load_page, resolve};
use crate::page::Markup;
use crate::state::AppState;

const JSON: &str = "application/json";

/// Handle GET /api/cookbook/ (root folder).
pub(crate) async fn get_root(
    State(state): State<Arc<AppState>>,
    Query(display): Query<DisplayQuery>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    get_page_impl(&state, "", &display, &headers)
}

/// Handle GET /api/cookbook/{path}.
pub(crate) async fn get_page(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(display): Query<DisplayQuery>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    get_page_impl(&state, &path, &display, &headers)
}

fn get_page_impl(
    state: &AppState,
    path: &str,
    display: &DisplayQuery,
    headers: &HeaderMap,
) -> Result<Response, ServerError> {
    let resolved = resolve(state, path)?;
    let loaded = load_page(state, path, &resolved, Markup::Text, display)?;
    let body = serde_json::to_string(&loaded.page)?;

    Ok(cached_response(state, headers, JSON, body, loaded.modified))
}
