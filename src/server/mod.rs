//! Server initialization and routing

use crate::api;
use crate::config::Config;
use crate::middleware::{
    path_guard_middleware, resolve_site_middleware, ObservabilityLayer, SanitizedMakeSpan,
};
use crate::repository::{
    category::CategoryRepositoryImpl, content::ContentRepositoryImpl,
    domain::DomainRepositoryImpl, site::SiteRepositoryImpl, tenant::TenantRepositoryImpl,
};
use crate::service::{CategoryService, ContentService, DomainResolver};
use crate::state::HasServices;
use anyhow::Result;
use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::{mysql::MySqlPoolOptions, MySqlPool};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: MySqlPool,
    pub resolver:
        Arc<DomainResolver<TenantRepositoryImpl, SiteRepositoryImpl, DomainRepositoryImpl>>,
    pub content_service: Arc<ContentService<ContentRepositoryImpl, CategoryRepositoryImpl>>,
    pub category_service: Arc<CategoryService<CategoryRepositoryImpl>>,
}

impl AppState {
    pub fn new(config: Config, db_pool: MySqlPool) -> Self {
        let tenant_repo = Arc::new(TenantRepositoryImpl::new(db_pool.clone()));
        let site_repo = Arc::new(SiteRepositoryImpl::new(db_pool.clone()));
        let domain_repo = Arc::new(DomainRepositoryImpl::new(db_pool.clone()));
        let content_repo = Arc::new(ContentRepositoryImpl::new(db_pool.clone()));
        let category_repo = Arc::new(CategoryRepositoryImpl::new(db_pool.clone()));

        Self {
            config: Arc::new(config),
            db_pool,
            resolver: Arc::new(DomainResolver::new(tenant_repo, site_repo, domain_repo)),
            content_service: Arc::new(ContentService::new(content_repo, category_repo.clone())),
            category_service: Arc::new(CategoryService::new(category_repo)),
        }
    }
}

impl HasServices for AppState {
    type TenantRepo = TenantRepositoryImpl;
    type SiteRepo = SiteRepositoryImpl;
    type DomainRepo = DomainRepositoryImpl;
    type ContentRepo = ContentRepositoryImpl;
    type CategoryRepo = CategoryRepositoryImpl;

    fn config(&self) -> &Config {
        &self.config
    }

    fn resolver(&self) -> &DomainResolver<Self::TenantRepo, Self::SiteRepo, Self::DomainRepo> {
        &self.resolver
    }

    fn content_service(&self) -> &ContentService<Self::ContentRepo, Self::CategoryRepo> {
        &self.content_service
    }

    fn category_service(&self) -> &CategoryService<Self::CategoryRepo> {
        &self.category_service
    }

    async fn check_ready(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.db_pool).await.is_ok()
    }
}

/// Open the MySQL pool described by the configuration.
pub async fn connect_pool(config: &Config) -> Result<MySqlPool> {
    let pool = MySqlPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await?;
    Ok(pool)
}

/// Run the HTTP server
pub async fn run(config: Config, prometheus_handle: Option<PrometheusHandle>) -> Result<()> {
    let db_pool = connect_pool(&config).await?;
    info!("Connected to database");

    let http_addr = config.http_addr();
    let state = AppState::new(config, db_pool);
    let app = build_router(state, prometheus_handle);

    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", http_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

/// Build the HTTP router with generic state type
///
/// Works with the production `AppState` and with test states that implement
/// `HasServices`. Layers run outermost first: observability, tracing, CORS,
/// path guard, then site resolution.
pub fn build_router<S: HasServices>(
    state: S,
    prometheus_handle: Option<PrometheusHandle>,
) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Bypass endpoints
        .route("/health", get(api::health::health))
        .route("/ready", get(api::health::ready::<S>))
        .route(
            "/metrics",
            get(api::metrics::metrics_handler).with_state(prometheus_handle),
        )
        // Site-scoped endpoints
        .route("/api/v1/context", get(api::context::current))
        .route(
            "/api/v1/content",
            get(api::content::list::<S>).post(api::content::create::<S>),
        )
        .route(
            "/api/v1/content/{id}",
            get(api::content::get::<S>)
                .put(api::content::update::<S>)
                .delete(api::content::delete::<S>),
        )
        .route(
            "/api/v1/categories",
            get(api::content::list_categories::<S>).post(api::content::create_category::<S>),
        )
        .route(
            "/api/v1/categories/{id}/content",
            get(api::content::list_by_category::<S>),
        )
        // Cross-site within the current tenant
        .route(
            "/api/v1/admin/content-totals",
            get(api::content::tenant_totals::<S>),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            resolve_site_middleware::<S>,
        ))
        .layer(axum::middleware::from_fn(path_guard_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(SanitizedMakeSpan))
        .layer(ObservabilityLayer)
        .with_state(state)
}
