//! Core Language trait definition.
//!
//! The [`Language`] trait is the seam between tree-sitter grammars and the
//! rules. Each front end provides a configured parser and a lowering from
//! its concrete syntax tree into the language-neutral [`CompilationUnit`].

use std::path::Path;

use tracing::debug;
use tree_sitter::{Parser, Tree};

use crate::ast::CompilationUnit;
use crate::error::{LintError, Result};
use crate::lang::common::count_error_nodes;

/// Trait for language-specific parsing and lowering.
pub trait Language: Send + Sync {
    /// Language identifier (e.g., "csharp", "java").
    fn name(&self) -> &'static str;

    /// File extensions for this language (e.g., &[".cs"]).
    fn extensions(&self) -> &[&'static str];

    /// Get a configured tree-sitter parser for this language.
    fn parser(&self) -> Result<Parser>;

    /// Lower a parsed tree. Never fails: unknown node kinds become
    /// `Other` nodes and `ERROR` nodes are lowered like any container.
    fn lower(&self, tree: &Tree, source: &[u8]) -> CompilationUnit;

    /// Parse and lower `source`.
    ///
    /// `path` is only used for error messages and logging.
    fn parse(&self, path: &Path, source: &str) -> Result<CompilationUnit> {
        let mut parser = self.parser()?;
        let tree = parser.parse(source, None).ok_or_else(|| LintError::Parse {
            path: path.to_path_buf(),
            detail: "tree-sitter produced no tree".to_string(),
        })?;

        let mut unit = self.lower(&tree, source.as_bytes());
        unit.error_nodes = count_error_nodes(tree.root_node());
        if unit.error_nodes > 0 {
            debug!(
                file = %path.display(),
                errors = unit.error_nodes,
                "Syntax errors present; analyzing recovered tree"
            );
        }
        Ok(unit)
    }
}

/// Boxed language trait object for dynamic dispatch.
pub type BoxedLanguage = Box<dyn Language>;
