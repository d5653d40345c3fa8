//! `.brrr-loops.toml` configuration file support.
//!
//! Provides deserialization, validation and discovery (walk up to the `.git`
//! root).
//!
//! # Example config
//!
//! ```toml
//! [rules]
//! select = ["LOOP001", "BRACE001"]
//! exclude = ["TAB001"]
//!
//! [rules.severity]
//! LOOP001 = "error"
//!
//! [rules.loop-counter]
//! track_incrementor_targets = true
//!
//! [files]
//! include = ["src/**/*.cs", "src/**/*.java"]
//! exclude = ["generated/**"]
//! no_ignore = false
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rules::loop_counter::LoopCounterOptions;
use crate::rules::{RuleCode, Severity};

/// Top-level `.brrr-loops.toml` configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LintFileConfig {
    /// Rule selection, severity overrides and rule settings.
    #[serde(default)]
    pub rules: RulesConfig,

    /// File include/exclude patterns.
    #[serde(default)]
    pub files: FilesConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RulesConfig {
    /// Rules to enable. If empty/absent, all rules are enabled.
    #[serde(default)]
    pub select: Vec<String>,

    /// Rules to exclude (takes precedence over `select`).
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Per-rule severity overrides, keyed by rule code.
    #[serde(default)]
    pub severity: HashMap<String, String>,

    /// Settings for LOOP001.
    #[serde(default, rename = "loop-counter")]
    pub loop_counter: LoopCounterOptions,
}

/// File include/exclude glob patterns.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FilesConfig {
    /// Glob patterns for files to include. If empty, every file with a
    /// supported extension is included.
    #[serde(default)]
    pub include: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,

    /// Walk directories without `.gitignore` and `.brrrignore` filtering.
    #[serde(default)]
    pub no_ignore: bool,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

impl LintFileConfig {
    /// Parse a config file from a string. Does not validate.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Parse)
    }

    /// Load and validate a config file from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate semantic constraints that the TOML schema cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for code in self.rules.select.iter().chain(&self.rules.exclude) {
            parse_rule_code(code)?;
        }

        for (code, severity) in &self.rules.severity {
            parse_rule_code(code)?;
            if Severity::parse(severity).is_none() {
                return Err(ConfigError::InvalidSeverity {
                    rule: code.clone(),
                    severity: severity.clone(),
                });
            }
        }

        for pattern in self.files.include.iter().chain(&self.files.exclude) {
            globset::Glob::new(pattern)
                .map_err(|e| ConfigError::InvalidGlob(pattern.clone(), e.to_string()))?;
        }

        Ok(())
    }

    /// Generate a default config file as a string.
    pub fn default_toml() -> &'static str {
        r#"# brrr-loops configuration file

# Rule selection and severity overrides.
[rules]
# Enable specific rules only (empty = all rules enabled):
# select = ["LOOP001", "BRACE001", "TAB001"]
#
# Exclude specific rules:
# exclude = []

# Override severity per rule (error, warning, info, hint):
# [rules.severity]
# LOOP001 = "error"
# TAB001 = "hint"

# Loop counter rule settings.
[rules.loop-counter]
# Variables stepped in the update clause count as counters too.
track_incrementor_targets = true

# File include/exclude glob patterns.
[files]
# include = ["src/**/*.cs", "src/**/*.java"]
# exclude = ["generated/**"]
# no_ignore = false
"#
    }

    /// Build a compiled matcher from the file include/exclude patterns.
    pub fn build_file_matcher(&self) -> Result<FileMatcher, ConfigError> {
        FileMatcher::new(&self.files)
    }
}

fn parse_rule_code(code: &str) -> Result<RuleCode, ConfigError> {
    RuleCode::parse_code(code).ok_or_else(|| ConfigError::InvalidRuleCode(code.to_string()))
}

// ---------------------------------------------------------------------------
// File matching
// ---------------------------------------------------------------------------

/// Compiled glob matcher for file include/exclude patterns.
#[derive(Debug, Clone, Default)]
pub struct FileMatcher {
    include: Option<globset::GlobSet>,
    exclude: Option<globset::GlobSet>,
}

impl FileMatcher {
    /// Build from a `FilesConfig`.
    pub fn new(files: &FilesConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            include: build_glob_set(&files.include)?,
            exclude: build_glob_set(&files.exclude)?,
        })
    }

    /// Check whether a file path should be linted.
    ///
    /// Exclusion wins; with include patterns present, a path must match one.
    pub fn is_included(&self, path: &Path) -> bool {
        if let Some(ref exclude) = self.exclude {
            if exclude.is_match(path) {
                return false;
            }
        }
        if let Some(ref include) = self.include {
            return include.is_match(path);
        }
        true
    }
}

fn build_glob_set(patterns: &[String]) -> Result<Option<globset::GlobSet>, ConfigError> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = globset::GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(
            globset::Glob::new(pattern)
                .map_err(|e| ConfigError::InvalidGlob(pattern.clone(), e.to_string()))?,
        );
    }
    builder
        .build()
        .map(Some)
        .map_err(|e| ConfigError::InvalidGlob("(build)".into(), e.to_string()))
}

// ---------------------------------------------------------------------------
// Config file discovery
// ---------------------------------------------------------------------------

/// Name of the config file.
pub const CONFIG_FILE_NAME: &str = ".brrr-loops.toml";

/// Discover a config file by walking up from `start_dir` to the repository
/// root (directory containing `.git`).
pub fn discover_config(start_dir: &Path) -> Option<PathBuf> {
    let mut current = if start_dir.is_file() {
        start_dir.parent()?.to_path_buf()
    } else {
        start_dir.to_path_buf()
    };

    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }

        if current.join(".git").exists() {
            return None;
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => return None,
        }
    }
}

/// Discover and load the config file, returning the parsed config and its
/// path. Returns `Ok(None)` if no config file is found.
pub fn discover_and_load_config(
    start_dir: &Path,
) -> Result<Option<(LintFileConfig, PathBuf)>, ConfigError> {
    match discover_config(start_dir) {
        Some(path) => {
            let config = LintFileConfig::load(&path)?;
            Ok(Some((config, path)))
        }
        None => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from config file operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {}", .0.display(), .1)]
    Io(PathBuf, std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(toml::de::Error),

    #[error("unknown rule code '{0}' in config (valid: LOOP001, BRACE001, TAB001)")]
    InvalidRuleCode(String),

    #[error("invalid severity '{severity}' for rule {rule} (valid: error, warning, info, hint)")]
    InvalidSeverity { rule: String, severity: String },

    #[error("invalid glob pattern '{0}': {1}")]
    InvalidGlob(String, String),
}
