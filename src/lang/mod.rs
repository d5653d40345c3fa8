//! Language abstraction layer.
//!
//! Each supported language implements the [`Language`] trait: it supplies a
//! tree-sitter parser and lowers the concrete syntax tree into the
//! language-neutral tree in [`crate::ast`].

pub mod common;
pub mod registry;
pub mod traits;

// Language implementations
pub mod csharp;
pub mod java;

pub use registry::LanguageRegistry;
pub use traits::{BoxedLanguage, Language};
