//! Utility functions

pub mod path;

pub use path::{expand_language, normalize_path};
