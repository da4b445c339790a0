//! Current request context endpoint

use crate::api::SuccessResponse;
use crate::context::CurrentSite;
use axum::{response::IntoResponse, Json};

/// GET /api/v1/context: the tenant and site the Host header resolved to.
pub async fn current(CurrentSite(ctx): CurrentSite) -> impl IntoResponse {
    Json(SuccessResponse::new(ctx.summary()))
}
