//! File statici: le immagini caricate sotto /uploads e il frontend compilato per tutto il resto,
//! con fallback su index.html per il routing lato client.

use axum::extract::{Extension, Path as UrlPath};
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::AppState;

/// Handler per GET /uploads/*file
pub async fn upload(
    Extension(state): Extension<Arc<AppState>>,
    UrlPath(file): UrlPath<String>,
) -> Response {
    let Some(path) = safe_join(&state.upload_dir, &file) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    match tokio::fs::read(&path).await {
        Ok(bytes) => file_response(&path, bytes),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Fallback per ogni percorso che non è una rotta dell'API.
pub async fn spa(Extension(state): Extension<Arc<AppState>>, uri: Uri) -> Response {
    let index = state.static_dir.join("index.html");
    let Some(mut path) = safe_join(&state.static_dir, uri.path()) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_dir() => path = path.join("index.html"),
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => path = index.clone(),
        Err(e) => {
            tracing::error!(path = ?path, error = %e, "static file stat failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
        }
    }

    match tokio::fs::read(&path).await {
        Ok(bytes) => file_response(&path, bytes),
        Err(_) => match tokio::fs::read(&index).await {
            Ok(bytes) => file_response(&index, bytes),
            Err(_) => StatusCode::NOT_FOUND.into_response(),
        },
    }
}

/// Unisce un percorso di URL alla directory radice; `None` se prova a uscirne.
pub fn safe_join(root: &Path, request_path: &str) -> Option<PathBuf> {
    let mut out = root.to_path_buf();
    for component in Path::new(request_path.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(out)
}

fn file_response(path: &Path, bytes: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, content_type(path))], bytes).into_response()
}

fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "html" => "text/html; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" => "application/json",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_join_stays_under_root() {
        let root = Path::new("dist");
        assert_eq!(safe_join(root, "/assets/app.js"), Some(PathBuf::from("dist/assets/app.js")));
        assert_eq!(safe_join(root, "/"), Some(PathBuf::from("dist")));
        assert_eq!(safe_join(root, "/./a"), Some(PathBuf::from("dist/a")));
        assert_eq!(safe_join(root, "/../secret"), None);
        assert_eq!(safe_join(root, "/a/../../b"), None);
    }

    #[test]
    fn content_type_by_extension() {
        assert_eq!(content_type(Path::new("x/INDEX.HTML")), "text/html; charset=utf-8");
        assert_eq!(content_type(Path::new("1_bike.png")), "image/png");
        assert_eq!(content_type(Path::new("noext")), "application/octet-stream");
    }
}
