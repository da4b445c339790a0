//! Request span maker for `TraceLayer`
//!
//! Adds the Host header to every request span and redacts credential-like
//! query parameter values from the logged URI.

use axum::http::{header::HOST, Request, Uri};
use tower_http::trace::MakeSpan;
use tracing::Span;

const SENSITIVE_PARAMS: &[&str] = &["token", "access_token", "preview_token", "api_key", "password"];

#[derive(Clone, Debug)]
pub struct SanitizedMakeSpan;

impl<B> MakeSpan<B> for SanitizedMakeSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let host = request
            .headers()
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            host = %host,
            uri = %sanitize_uri(request.uri()),
            version = ?request.version(),
        )
    }
}

fn sanitize_uri(uri: &Uri) -> String {
    let Some(query) = uri.query() else {
        return uri.path().to_string();
    };

    let pairs: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if SENSITIVE_PARAMS.contains(&key.to_ascii_lowercase().as_str()) => {
                format!("{key}=[REDACTED]")
            }
            _ => pair.to_string(),
        })
        .collect();

    format!("{}?{}", uri.path(), pairs.join("&"))
}
