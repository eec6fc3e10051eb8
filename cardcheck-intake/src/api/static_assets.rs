//! Upload UI static file serving
//!
//! Serves the chat upload page and its assets from the configured web root.
//! Lookup is confined to that root: a request path that escapes it is
//! rejected with 400 before any filesystem access happens.

use std::path::{Component, Path, PathBuf};

use axum::{
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::AppState;

/// Fallback handler for everything the API routes do not claim.
pub async fn serve_asset(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    if method != Method::GET {
        return plain_not_found();
    }

    let path = uri.path();
    let is_index = path == "/" || path == "/index.html";

    let relative = if is_index {
        PathBuf::from("index.html")
    } else {
        match sanitize_request_path(path) {
            Some(relative) if !relative.as_os_str().is_empty() => relative,
            Some(_) => return plain_not_found(),
            None => {
                tracing::warn!(%path, "Rejected asset path escaping the web root");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"success": false, "message": "Bad request"})),
                )
                    .into_response();
            }
        }
    };

    let file_path = state.config.web_root.join(&relative);

    match tokio::fs::read(&file_path).await {
        Ok(contents) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, content_type_for(&relative)),
                (header::CACHE_CONTROL, "no-store"),
            ],
            contents,
        )
            .into_response(),
        Err(e) => {
            tracing::debug!(file = %file_path.display(), error = %e, "Asset not served");
            if is_index {
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({"success": false, "message": "UI not found"})),
                )
                    .into_response()
            } else {
                plain_not_found()
            }
        }
    }
}

fn plain_not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}

/// Lexically resolve a request path to a path relative to the web root.
///
/// Returns `None` when the path, after resolving `.` and `..` components,
/// would land outside the root. Never touches the filesystem.
fn sanitize_request_path(path: &str) -> Option<PathBuf> {
    let trimmed = path.trim_start_matches('/');

    let mut clean = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !clean.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    Some(clean)
}

/// Content types for the handful of asset kinds the UI uses.
fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match ext.as_deref() {
        Some("html") => "text/html",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}
