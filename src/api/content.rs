//! Site-scoped content and category endpoints
//!
//! Handlers never name a site: the services read it from the request
//! context, so a record from another site is simply "not found".

use crate::api::{PaginatedResponse, PaginationQuery, SuccessResponse};
use crate::context::CurrentSite;
use crate::domain::{CreateCategoryInput, CreateContentInput, StringUuid, UpdateContentInput};
use crate::error::Result;
use crate::state::HasServices;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

/// List content of the current site
pub async fn list<S: HasServices>(
    State(state): State<S>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let (items, total) = state
        .content_service()
        .list(pagination.page, pagination.per_page)
        .await?;

    Ok(Json(PaginatedResponse::new(
        items,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

pub async fn get<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    let item = state.content_service().get(id).await?;
    Ok(Json(SuccessResponse::new(item)))
}

pub async fn create<S: HasServices>(
    State(state): State<S>,
    Json(input): Json<CreateContentInput>,
) -> Result<impl IntoResponse> {
    let item = state.content_service().create(input).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(item))))
}

pub async fn update<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<StringUuid>,
    Json(input): Json<UpdateContentInput>,
) -> Result<impl IntoResponse> {
    let item = state.content_service().update(id, input).await?;
    Ok(Json(SuccessResponse::new(item)))
}

pub async fn delete<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    state.content_service().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_categories<S: HasServices>(State(state): State<S>) -> Result<impl IntoResponse> {
    let categories = state.category_service().list().await?;
    Ok(Json(SuccessResponse::new(categories)))
}

pub async fn create_category<S: HasServices>(
    State(state): State<S>,
    Json(input): Json<CreateCategoryInput>,
) -> Result<impl IntoResponse> {
    let category = state.category_service().create(input).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(category))))
}

pub async fn list_by_category<S: HasServices>(
    State(state): State<S>,
    Path(category_id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    let items = state
        .content_service()
        .list_by_category(category_id)
        .await?;
    Ok(Json(SuccessResponse::new(items)))
}

/// Per-site content counts across every site of the current tenant.
///
/// Deliberately crosses the site boundary through the unscoped accessor.
pub async fn tenant_totals<S: HasServices>(
    State(state): State<S>,
    CurrentSite(ctx): CurrentSite,
) -> Result<impl IntoResponse> {
    let totals = state
        .content_service()
        .unscoped()
        .totals_for_tenant(ctx.tenant_id())
        .await?;
    Ok(Json(SuccessResponse::new(totals)))
}
