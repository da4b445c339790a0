//! Configuration management for Sitegate

use anyhow::{bail, Context, Result};
use std::env;

/// Paths served without resolving the Host header.
pub const DEFAULT_BYPASS_PATHS: &[&str] = &["/health", "/ready", "/metrics"];

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server host
    pub http_host: String,
    /// HTTP server port
    pub http_port: u16,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Host resolution configuration
    pub resolution: ResolutionConfig,
    /// Logging, metrics and tracing configuration
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Deployment environment. Only `Development` enables the localhost overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    Test,
    #[default]
    Production,
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!("Unknown environment: {}", s)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolutionConfig {
    pub environment: Environment,
    /// Slug of the tenant that owns bare `localhost` in development
    pub root_tenant_slug: String,
    /// Exact request paths that skip resolution entirely
    pub bypass_paths: Vec<String>,
}

impl ResolutionConfig {
    pub fn local_overrides_enabled(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn is_bypassed(&self, path: &str) -> bool {
        self.bypass_paths.iter().any(|p| p == path)
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            root_tenant_slug: "root".to_string(),
            bypass_paths: DEFAULT_BYPASS_PATHS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// "json" or "pretty"
    pub log_format: String,
    pub metrics_enabled: bool,
    pub tracing_enabled: bool,
    pub otlp_endpoint: Option<String>,
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            tracing_enabled: false,
            otlp_endpoint: None,
            service_name: "sitegate".to_string(),
        }
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|s| s.to_lowercase() == "true")
        .unwrap_or(false)
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let environment = match env::var("APP_ENV") {
            Ok(value) => match value.parse::<Environment>() {
                Ok(env) => env,
                Err(e) => bail!("Invalid APP_ENV: {}", e),
            },
            Err(_) => Environment::default(),
        };

        let bypass_paths = env::var("RESOLUTION_BYPASS_PATHS")
            .map(|s| {
                s.split(',')
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| DEFAULT_BYPASS_PATHS.iter().map(|p| p.to_string()).collect());

        Ok(Self {
            http_host: env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid HTTP_PORT")?,
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").context("DATABASE_URL is required")?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .unwrap_or_else(|_| "2".to_string())
                    .parse()
                    .unwrap_or(2),
            },
            resolution: ResolutionConfig {
                environment,
                root_tenant_slug: env::var("ROOT_TENANT_SLUG")
                    .unwrap_or_else(|_| "root".to_string()),
                bypass_paths,
            },
            telemetry: TelemetryConfig {
                log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
                metrics_enabled: env_flag("METRICS_ENABLED"),
                tracing_enabled: env_flag("OTEL_TRACING_ENABLED"),
                otlp_endpoint: env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok(),
                service_name: env::var("OTEL_SERVICE_NAME")
                    .unwrap_or_else(|_| "sitegate".to_string()),
            },
        })
    }

    /// Get HTTP server address
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}
