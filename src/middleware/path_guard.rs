//! Path traversal guard middleware
//!
//! Rejects `.` and `..` path segments before the request reaches site
//! resolution or routing.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};

fn has_dot_segments(path: &str) -> bool {
    path.split('/').any(|seg| seg == "." || seg == "..")
}

pub async fn path_guard_middleware(
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    if has_dot_segments(request.uri().path()) {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(next.run(request).await)
}
