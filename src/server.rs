//! Static asset server for the browser UI.
//!
//! Serves files below a root directory with permissive CORS headers.

use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use percent_encoding::percent_decode_str;
use tokio::net::TcpListener;
use tracing::{debug, info};

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Clone)]
struct ServerState {
    root: Arc<PathBuf>,
}

/// Router serving `root`. Every path is looked up as a file.
pub fn router(root: impl Into<PathBuf>) -> Router {
    let state = ServerState {
        root: Arc::new(root.into()),
    };

    Router::new()
        .fallback(serve_file)
        .layer(middleware::from_fn(cors))
        .with_state(state)
}

/// Serve until the listener fails or the task is cancelled.
pub async fn serve(listener: TcpListener, root: impl Into<PathBuf>) -> std::io::Result<()> {
    let root = root.into();
    let addr = listener.local_addr()?;
    info!(%addr, root = %root.display(), "Static server listening");
    axum::serve(listener, router(root)).await
}

pub async fn bind(port: u16) -> std::io::Result<TcpListener> {
    TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port))).await
}

async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization"),
    );
    response
}

async fn serve_file(State(state): State<ServerState>, request: Request) -> Response {
    let Some(path) = resolve(&state.root, request.uri().path()) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            debug!(path = %path.display(), bytes = bytes.len(), "Serving file");
            (
                [(header::CONTENT_TYPE, content_type(&path))],
                Body::from(bytes),
            )
                .into_response()
        }
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Map a request path onto a file under `root`, rejecting anything that escapes it.
///
/// The path is percent-decoded before the component check, so an encoded `..`
/// is rejected like a literal one. Paths that do not decode to UTF-8 are rejected.
fn resolve(root: &Path, request_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(request_path).decode_utf8().ok()?;
    let request_path = decoded.as_ref();

    let mut path = root.to_path_buf();
    for component in Path::new(request_path.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }

    if request_path.ends_with('/') || path == root {
        path.push("index.html");
    }
    Some(path)
}

fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}
