//! Lint rule definitions and diagnostic types.

pub mod braces;
pub mod loop_counter;
pub mod tabs;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ast::{CompilationUnit, SourceLocation};

pub use braces::CurlyBracesRule;
pub use loop_counter::LoopCounterRule;
pub use tabs::TabCharacterRule;

/// Rule codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RuleCode {
    /// LOOP001: `for` loop counter modified inside the loop body.
    LOOP001,
    /// BRACE001: `if`/`else`/`for`/`foreach`/`while`/`do` body without braces.
    BRACE001,
    /// TAB001: tab character in a source file.
    TAB001,
}

impl RuleCode {
    /// Parse a rule code from its code (e.g., "LOOP001") or its short name
    /// (e.g., "loop-counter-mutation").
    pub fn parse_code(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "LOOP001" | "LOOP-COUNTER-MUTATION" => Some(RuleCode::LOOP001),
            "BRACE001" | "MISSING-CURLY-BRACES" => Some(RuleCode::BRACE001),
            "TAB001" | "TAB-CHARACTER" => Some(RuleCode::TAB001),
            _ => None,
        }
    }

    /// All available rule codes.
    pub fn all() -> &'static [RuleCode] {
        &[RuleCode::LOOP001, RuleCode::BRACE001, RuleCode::TAB001]
    }

    /// Short name for the rule.
    pub fn name(&self) -> &'static str {
        match self {
            RuleCode::LOOP001 => "loop-counter-mutation",
            RuleCode::BRACE001 => "missing-curly-braces",
            RuleCode::TAB001 => "tab-character",
        }
    }

    /// Detailed description of what the rule checks.
    pub fn description(&self) -> &'static str {
        match self {
            RuleCode::LOOP001 => {
                "Detects assignments, compound assignments, increments and decrements \
                 of a `for` loop's counter variables inside the loop body. The loop's \
                 own update clause is the only sanctioned place to step a counter. \
                 Writes through member access, indexers or tuple projections are not \
                 analyzed, and foreach iteration variables are not counters."
            }
            RuleCode::BRACE001 => {
                "Detects `if`, `else`, `for`, `foreach`, `while` and `do` statements \
                 whose nested statement is not a block. `else if` chains are allowed."
            }
            RuleCode::TAB001 => {
                "Reports the first tab character of each file. Indentation should use \
                 spaces only."
            }
        }
    }

    /// Return the string representation (e.g., `"LOOP001"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCode::LOOP001 => "LOOP001",
            RuleCode::BRACE001 => "BRACE001",
            RuleCode::TAB001 => "TAB001",
        }
    }

    /// Severity used when configuration does not override it.
    pub fn default_severity(&self) -> Severity {
        match self {
            RuleCode::LOOP001 | RuleCode::BRACE001 => Severity::Warning,
            RuleCode::TAB001 => Severity::Info,
        }
    }
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    /// Parse a severity name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Some(Severity::Error),
            "warning" | "warn" => Some(Severity::Warning),
            "info" => Some(Severity::Info),
            "hint" => Some(Severity::Hint),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
            Severity::Hint => write!(f, "hint"),
        }
    }
}

/// A reported problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// The rule that produced this diagnostic.
    pub rule: RuleCode,
    pub severity: Severity,
    pub file: PathBuf,
    /// Span of the offending expression.
    pub location: SourceLocation,
    /// Counter variable that was modified (LOOP001 only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counter: Option<String>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: [{}] {}: {}",
            self.file.display(),
            self.location,
            self.rule,
            self.severity,
            self.message
        )
    }
}

/// A lint rule over a lowered tree.
pub trait Rule: Send + Sync {
    /// The rule code.
    fn code(&self) -> RuleCode;

    /// Check one file, given its text and lowered tree, and return diagnostics.
    fn check(&self, file: &Path, source: &str, unit: &CompilationUnit) -> Vec<Diagnostic>;
}
