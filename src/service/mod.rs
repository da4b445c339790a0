//! Business logic layer

pub mod content;
pub mod resolver;

pub use content::{CategoryService, ContentService, UnscopedContent};
pub use resolver::{DomainResolver, Resolution, ResolutionStrategy};
