//! brrr-loops - detection of `for` loop counters modified inside the loop body.
//!
//! Sources are parsed with tree-sitter, lowered into a small language-neutral
//! syntax tree, and checked by rule LOOP001: a counter introduced by a `for`
//! header may only be stepped by that loop's own update clause. Two
//! convention rules run alongside it: BRACE001 (control statement bodies
//! without braces) and TAB001 (tab characters).
//!
//! # Architecture
//!
//! - **AST Layer** ([`ast`]): lowered statements and expressions with source locations
//! - **Language Layer** ([`lang`]): C# and Java front ends and the language registry
//! - **Rules** ([`rules`]): rule codes, diagnostics, the loop counter analysis and the convention checks
//! - **Engine** ([`engine`]): runs rules over buffers, files and directory trees
//! - **Configuration** ([`config`]): `.brrr-loops.toml` loading and discovery
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//! use brrr_loops::{LintConfig, LintEngine};
//!
//! let engine = LintEngine::new(LintConfig::default());
//!
//! // One buffer, language detected from the extension
//! let diagnostics = engine.check_source(
//!     Path::new("Loop.cs"),
//!     "class C { void M() { for (int i = 0; i < 9; i++) { i = 0; } } }",
//! )?;
//! assert_eq!(diagnostics.len(), 1);
//!
//! // A whole tree, honouring .gitignore and .brrrignore
//! let report = engine.check_paths(&[PathBuf::from("./src")]);
//! for diagnostic in &report.diagnostics {
//!     println!("{diagnostic}");
//! }
//! # Ok::<(), brrr_loops::LintError>(())
//! ```
//!
//! # Using the analysis directly
//!
//! ```no_run
//! use std::path::Path;
//! use brrr_loops::lang::{Language, LanguageRegistry};
//! use brrr_loops::rules::loop_counter::{analyze, LoopCounterOptions, Violation};
//!
//! let java = LanguageRegistry::global().get_by_name("java").unwrap();
//! let unit = java.parse(Path::new("A.java"), "class A { void m() { for (int i = 0;; i++) i--; } }")?;
//!
//! let mut violations: Vec<Violation> = Vec::new();
//! analyze(&unit, LoopCounterOptions::default(), &mut violations);
//! # Ok::<(), brrr_loops::LintError>(())
//! ```

pub mod ast;
pub mod config;
pub mod engine;
pub mod error;
pub mod lang;
pub mod rules;

pub use config::{
    discover_and_load_config, discover_config, ConfigError, FileMatcher, LintFileConfig,
    CONFIG_FILE_NAME,
};
pub use engine::{FileFailure, LintConfig, LintEngine, LintReport};
pub use error::{LintError, Result};
pub use rules::loop_counter::{LoopCounterOptions, Violation, ViolationSink};
pub use rules::{
    CurlyBracesRule, Diagnostic, LoopCounterRule, Rule, RuleCode, Severity, TabCharacterRule,
};
