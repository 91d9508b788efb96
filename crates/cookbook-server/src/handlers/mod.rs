//! HTTP request handlers.

pub(crate) mod api;
pub(crate) mod pages;

use std::time::SystemTime;

use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use cookbook_storage::{LogicalPath, ResolvedPath};
use md5::{Digest, Md5};
use serde::Deserialize;

use crate::error::ServerError;
use crate::page::{FolderPage, Markup, Page, RecipePage};
use crate::state::AppState;

/// Display flags passed through the query string.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct DisplayQuery {
    /// `?print=true` renders a recipe for printing.
    #[serde(default)]
    pub(crate) print: bool,
}

/// A page ready to render, with the modification time of its source.
pub(crate) struct LoadedPage {
    pub(crate) page: Page,
    pub(crate) modified: Option<SystemTime>,
}

/// Resolve a request path against the content tree.
pub(crate) fn resolve(state: &AppState, path: &str) -> Result<ResolvedPath, ServerError> {
    state
        .tree
        .resolve(&LogicalPath::parse(path))
        .map_err(|e| ServerError::from_storage(e, path))
}

/// Build the folder or recipe page for a resolved path.
pub(crate) fn load_page(
    state: &AppState,
    path: &str,
    resolved: &ResolvedPath,
    markup: Markup,
    display: &DisplayQuery,
) -> Result<LoadedPage, ServerError> {
    if !resolved.is_document() {
        let listing = state
            .tree
            .list_folder(resolved)
            .map_err(|e| ServerError::from_storage(e, path))?;
        return Ok(LoadedPage {
            page: Page::Folder(FolderPage::new(resolved, listing)),
            modified: None,
        });
    }

    let source = state
        .tree
        .read_document(resolved)
        .map_err(|e| ServerError::from_storage(e, path))?;
    let recipe = state.parser.parse(&source).inspect_err(|e| {
        tracing::warn!(path = %path, error = %e, "Failed to parse recipe");
    })?;
    let image = state.tree.locate_image(resolved);

    Ok(LoadedPage {
        page: Page::Recipe(RecipePage::new(
            resolved,
            &recipe,
            image.as_deref(),
            markup,
            display.print,
        )),
        modified: state.tree.modified(resolved),
    })
}

/// Build a cacheable response, or `304` when the client copy is current.
pub(crate) fn cached_response(
    state: &AppState,
    headers: &HeaderMap,
    content_type: &'static str,
    body: String,
    modified: Option<SystemTime>,
) -> Response {
    let etag = compute_etag(&state.version, &body);

    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return StatusCode::NOT_MODIFIED.into_response();
    }

    let mut response = (
        [
            (header::CONTENT_TYPE, content_type.to_owned()),
            (header::ETAG, etag),
            (header::CACHE_CONTROL, "private, max-age=60".to_owned()),
        ],
        body,
    )
        .into_response();

    if let Some(modified) = modified {
        let last_modified: DateTime<Utc> = modified.into();
        if let Ok(value) =
            HeaderValue::from_str(&last_modified.format("%a, %d %b %Y %H:%M:%S GMT").to_string())
        {
            response.headers_mut().insert(header::LAST_MODIFIED, value);
        }
    }

    response
}

/// Compute `ETag` from version and content.
///
/// Uses MD5 hash truncated to 64 bits (16 hex chars).
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}
