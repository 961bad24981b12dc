//! Content management module.
//!
//! This module provides:
//! - ContentRepository / ChartRepository: position-keyed CRUD per page type
//! - Renderer: pluggable editor-document to HTML conversion

pub mod render;
mod repository;

pub use render::{PassthroughRenderer, RenderMode, Renderer, SanitizingRenderer};
pub use repository::{
    ChartRepository, ContentRepository, ItemRepository, RepositoryError, RepositoryResult,
};
