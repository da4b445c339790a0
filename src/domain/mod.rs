//! Domain models for Sitegate

pub mod common;
pub mod content;
pub mod site;
pub mod site_domain;
pub mod tenant;

pub use common::*;
pub use content::*;
pub use site::*;
pub use site_domain::*;
pub use tenant::*;
