//! TAB001: tab characters in source files.
//!
//! Reported once per file, at the first tab found.

use std::path::Path;

use crate::ast::{CompilationUnit, SourceLocation};
use crate::rules::{Diagnostic, Rule, RuleCode};

const MESSAGE: &str = "Replace all tab characters in this file by sequences of white-spaces.";

/// Location of the first tab in `source`, if any.
///
/// The column counts bytes from the start of the line, like every other
/// location in the crate.
pub fn first_tab(source: &str) -> Option<SourceLocation> {
    let offset = source.find('\t')?;
    let line_start = source[..offset].rfind('\n').map_or(0, |nl| nl + 1);
    let line = source[..offset].matches('\n').count() + 1;
    let column = offset - line_start + 1;
    Some(SourceLocation::new(line, column, line, column + 1).with_bytes(offset, offset + 1))
}

/// Rule adapter reporting TAB001.
#[derive(Debug, Clone, Copy, Default)]
pub struct TabCharacterRule;

impl TabCharacterRule {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for TabCharacterRule {
    fn code(&self) -> RuleCode {
        RuleCode::TAB001
    }

    fn check(&self, file: &Path, source: &str, _unit: &CompilationUnit) -> Vec<Diagnostic> {
        first_tab(source)
            .map(|location| Diagnostic {
                rule: RuleCode::TAB001,
                severity: RuleCode::TAB001.default_severity(),
                file: file.to_path_buf(),
                location,
                counter: None,
                message: MESSAGE.to_string(),
            })
            .into_iter()
            .collect()
    }
}
