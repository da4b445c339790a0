//! Sitegate - Host-to-site resolution and per-site data isolation
//!
//! Maps the Host header of every request to a (tenant, site) pair through a
//! domain directory, holds that pair in a request-scoped context, and scopes
//! every read and write of site-owned data to it.

pub mod api;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod hostname;
pub mod middleware;
pub mod migration;
pub mod repository;
pub mod server;
pub mod service;
pub mod state;
pub mod telemetry;

pub use config::Config;
pub use error::{AppError, Result};
