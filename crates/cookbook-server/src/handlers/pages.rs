//! HTML page endpoints.
//!
//! Serves folder listings, recipe pages and recipe photos under `/cookbook`.

use std::sync::Arc;

use axum::extract::{Path, Query, RawQuery, State};
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Redirect, Response};
use cookbook_storage::{LogicalPath, ResolvedPath, StorageError, is_image_name};

use crate::error::ServerError;
use crate::handlers::{DisplayQuery, cached_response, load_page, resolve};
use crate::page::{MOUNT, Markup, folder_href};
use crate::state::AppState;
use crate::templates;

const HTML: &str = "text/html; charset=utf-8";

/// Handle GET / and GET /cookbook.
pub(crate) async fn index() -> Redirect {
    Redirect::to(&format!("{MOUNT}/"))
}

/// Handle GET /cookbook/ (root folder).
pub(crate) async fn get_root_page(
    State(state): State<Arc<AppState>>,
    Query(display): Query<DisplayQuery>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let resolved = resolve(&state, "")?;
    render_page(&state, "", &resolved, &display, &headers)
}

/// Handle GET /cookbook/{path}.
pub(crate) async fn get_page(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(display): Query<DisplayQuery>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let last = path.rsplit('/').next().unwrap_or_default();
    if is_image_name(last) {
        return serve_image(&state, &path).await;
    }

    let resolved = resolve(&state, &path)?;
    if !resolved.is_document() && !path.ends_with('/') {
        let mut location = folder_href(resolved.segments());
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            location = format!("{location}?{query}");
        }
        return Ok(Redirect::to(&location).into_response());
    }

    render_page(&state, &path, &resolved, &display, &headers)
}

fn render_page(
    state: &AppState,
    path: &str,
    resolved: &ResolvedPath,
    display: &DisplayQuery,
    headers: &HeaderMap,
) -> Result<Response, ServerError> {
    let loaded = load_page(state, path, resolved, Markup::Html, display)?;
    let html = templates::render(&state.templates, &loaded.page)?;

    Ok(cached_response(state, headers, HTML, html, loaded.modified))
}

async fn serve_image(state: &AppState, path: &str) -> Result<Response, ServerError> {
    let file = state
        .tree
        .resolve_image(&LogicalPath::parse(path))
        .map_err(|e| ServerError::from_storage(e, path))?;
    let bytes = tokio::fs::read(&file)
        .await
        .map_err(|e| ServerError::from_storage(StorageError::io(e, &file), path))?;
    let mime = mime_guess::from_path(&file).first_or_octet_stream();

    Ok((
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (header::CACHE_CONTROL, "private, max-age=60".to_owned()),
        ],
        bytes,
    )
        .into_response())
}
