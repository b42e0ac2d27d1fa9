//! This module aggregates various utility submodules used throughout the application.

/// Client for generating images through Bing Image Creator.
pub mod image_creator;
