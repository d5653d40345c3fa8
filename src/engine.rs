//! Lint engine: runs rules over sources, files and directory trees.
//!
//! Files are independent, so directory runs analyze them in parallel with
//! rayon. Each file gets its own parser and its own scope stack. A file that
//! cannot be read or parsed is logged and recorded in the report; it never
//! aborts the run.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::ast::CompilationUnit;
use crate::config::{discover_and_load_config, ConfigError, FileMatcher, LintFileConfig};
use crate::error::{LintError, Result};
use crate::lang::{Language, LanguageRegistry};
use crate::rules::loop_counter::{LoopCounterOptions, LoopCounterRule};
use crate::rules::{CurlyBracesRule, Diagnostic, Rule, RuleCode, Severity, TabCharacterRule};

/// Name of the extra ignore file honoured during directory walks.
pub const IGNORE_FILE_NAME: &str = ".brrrignore";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the lint engine.
#[derive(Debug, Clone, Default)]
pub struct LintConfig {
    /// Rules to enable (if None, all rules are enabled).
    pub select: Option<HashSet<RuleCode>>,
    /// Rules to ignore.
    pub ignore: HashSet<RuleCode>,
    /// Severity overrides.
    pub severity: HashMap<RuleCode, Severity>,
    pub loop_counter: LoopCounterOptions,
    /// Include/exclude filter for files found by directory walks.
    pub files: FileMatcher,
    /// Skip `.gitignore` and `.brrrignore` processing.
    pub no_ignore: bool,
}

impl LintConfig {
    /// Build from a parsed config file.
    pub fn from_file_config(file: &LintFileConfig) -> std::result::Result<Self, ConfigError> {
        file.validate()?;

        let parse = |code: &String| {
            RuleCode::parse_code(code).ok_or_else(|| ConfigError::InvalidRuleCode(code.clone()))
        };

        let select = if file.rules.select.is_empty() {
            None
        } else {
            Some(
                file.rules
                    .select
                    .iter()
                    .map(parse)
                    .collect::<std::result::Result<HashSet<_>, _>>()?,
            )
        };
        let ignore = file
            .rules
            .exclude
            .iter()
            .map(parse)
            .collect::<std::result::Result<HashSet<_>, _>>()?;

        let mut severity = HashMap::new();
        for (code, level) in &file.rules.severity {
            let level = Severity::parse(level).ok_or_else(|| ConfigError::InvalidSeverity {
                rule: code.clone(),
                severity: level.clone(),
            })?;
            severity.insert(parse(code)?, level);
        }

        Ok(Self {
            select,
            ignore,
            severity,
            loop_counter: file.rules.loop_counter,
            files: file.build_file_matcher()?,
            no_ignore: file.files.no_ignore,
        })
    }

    /// Builder: restrict to the given rules.
    pub fn with_select(mut self, codes: impl IntoIterator<Item = RuleCode>) -> Self {
        self.select = Some(codes.into_iter().collect());
        self
    }

    /// Builder: disable a rule.
    pub fn with_ignored(mut self, code: RuleCode) -> Self {
        self.ignore.insert(code);
        self
    }

    /// Builder: override the severity of a rule.
    pub fn with_severity(mut self, code: RuleCode, severity: Severity) -> Self {
        self.severity.insert(code, severity);
        self
    }

    pub fn with_loop_counter(mut self, options: LoopCounterOptions) -> Self {
        self.loop_counter = options;
        self
    }

    /// Builder: walk directories without ignore-file filtering.
    pub fn with_no_ignore(mut self, no_ignore: bool) -> Self {
        self.no_ignore = no_ignore;
        self
    }

    /// Check if a rule is enabled.
    pub fn is_rule_enabled(&self, rule: RuleCode) -> bool {
        if self.ignore.contains(&rule) {
            return false;
        }
        match &self.select {
            Some(selected) => selected.contains(&rule),
            None => true,
        }
    }

    /// Effective severity of a rule.
    pub fn severity_for(&self, rule: RuleCode) -> Severity {
        self.severity
            .get(&rule)
            .copied()
            .unwrap_or_else(|| rule.default_severity())
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// A file that could not be checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub file: PathBuf,
    pub error: String,
}

/// Result of checking a set of paths.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LintReport {
    /// Sorted by file, line, column.
    pub diagnostics: Vec<Diagnostic>,
    pub failures: Vec<FileFailure>,
    pub files_checked: usize,
}

impl LintReport {
    /// No diagnostics and no failures.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty() && self.failures.is_empty()
    }

    /// Number of distinct files with at least one diagnostic.
    pub fn files_with_issues(&self) -> usize {
        self.diagnostics
            .iter()
            .map(|d| &d.file)
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The main lint engine.
pub struct LintEngine {
    config: LintConfig,
    rules: Vec<Box<dyn Rule>>,
}

impl LintEngine {
    /// Create a new lint engine with the given configuration.
    pub fn new(config: LintConfig) -> Self {
        let mut rules: Vec<Box<dyn Rule>> = Vec::with_capacity(RuleCode::all().len());

        if config.is_rule_enabled(RuleCode::LOOP001) {
            rules.push(Box::new(LoopCounterRule::new(config.loop_counter)));
        }
        if config.is_rule_enabled(RuleCode::BRACE001) {
            rules.push(Box::new(CurlyBracesRule::new()));
        }
        if config.is_rule_enabled(RuleCode::TAB001) {
            rules.push(Box::new(TabCharacterRule::new()));
        }

        debug!("Enabled {} rule(s)", rules.len());
        Self { config, rules }
    }

    /// Create an engine from the config file found above `start_dir`, or
    /// with defaults when there is none.
    pub fn discover(start_dir: &Path) -> Result<Self> {
        let config = match discover_and_load_config(start_dir)? {
            Some((file, path)) => {
                info!("Using config {}", path.display());
                LintConfig::from_file_config(&file)?
            }
            None => LintConfig::default(),
        };
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    /// Run all enabled rules over a source text and its lowered tree.
    pub fn check_unit(
        &self,
        file: &Path,
        source: &str,
        unit: &CompilationUnit,
    ) -> Vec<Diagnostic> {
        let mut diagnostics: Vec<Diagnostic> = self
            .rules
            .iter()
            .flat_map(|rule| {
                let severity = self.config.severity_for(rule.code());
                rule.check(file, source, unit).into_iter().map(move |mut d| {
                    d.severity = severity;
                    d
                })
            })
            .collect();
        sort_diagnostics(&mut diagnostics);
        diagnostics
    }

    /// Check an in-memory buffer, detecting the language from `path`.
    pub fn check_source(&self, path: &Path, source: &str) -> Result<Vec<Diagnostic>> {
        let language = LanguageRegistry::global()
            .detect_language(path)
            .ok_or_else(|| LintError::UnsupportedLanguage(path.display().to_string()))?;
        self.check_with(language, path, source)
    }

    /// Check an in-memory buffer with an explicit language name or alias.
    pub fn check_source_as(
        &self,
        language: &str,
        path: &Path,
        source: &str,
    ) -> Result<Vec<Diagnostic>> {
        let language = LanguageRegistry::global()
            .get_by_name(language)
            .ok_or_else(|| LintError::UnsupportedLanguage(language.to_string()))?;
        self.check_with(language, path, source)
    }

    /// Read and check one file.
    pub fn check_file(&self, path: &Path) -> Result<Vec<Diagnostic>> {
        let bytes = fs::read(path).map_err(|e| LintError::file_read(e, path))?;
        let source = String::from_utf8(bytes).map_err(|_| LintError::Encoding {
            path: path.to_path_buf(),
        })?;
        self.check_source(path, &source)
    }

    /// Check files and directory trees.
    pub fn check_paths(&self, paths: &[PathBuf]) -> LintReport {
        info!("Checking {} path(s)", paths.len());

        let mut failures = Vec::new();
        let files = self.collect_files(paths, &mut failures);
        info!("Found {} source file(s)", files.len());

        let results: Vec<(PathBuf, Result<Vec<Diagnostic>>)> = files
            .into_par_iter()
            .map(|file| {
                let result = self.check_file(&file);
                (file, result)
            })
            .collect();

        let mut report = LintReport::default();
        for (file, result) in results {
            match result {
                Ok(diagnostics) => {
                    report.files_checked += 1;
                    report.diagnostics.extend(diagnostics);
                }
                Err(e) => {
                    warn!("Failed to check {}: {}", file.display(), e);
                    failures.push(FileFailure {
                        file,
                        error: e.to_string(),
                    });
                }
            }
        }

        sort_diagnostics(&mut report.diagnostics);
        failures.sort_by(|a, b| a.file.cmp(&b.file));
        report.failures = failures;

        info!(
            "{} diagnostic(s) in {} of {} file(s)",
            report.diagnostics.len(),
            report.files_with_issues(),
            report.files_checked
        );
        report
    }

    fn check_with(
        &self,
        language: &dyn Language,
        path: &Path,
        source: &str,
    ) -> Result<Vec<Diagnostic>> {
        debug!("Analyzing {} as {}", path.display(), language.name());
        let unit = language.parse(path, source)?;
        Ok(self.check_unit(path, source, &unit))
    }

    /// Expand `paths` into a sorted, deduplicated list of supported files.
    ///
    /// Explicit file arguments are taken as given when their language is
    /// supported. Directories are walked honouring `.gitignore` and
    /// `.brrrignore`, and filtered by the configured include/exclude globs
    /// relative to the walk root.
    fn collect_files(&self, paths: &[PathBuf], failures: &mut Vec<FileFailure>) -> Vec<PathBuf> {
        let registry = LanguageRegistry::global();
        let mut files = Vec::new();

        for path in paths {
            if path.is_file() {
                if registry.is_supported_path(path) {
                    files.push(path.clone());
                } else {
                    debug!("Skipping unsupported file {}", path.display());
                }
                continue;
            }
            if !path.is_dir() {
                warn!("Path does not exist: {}", path.display());
                failures.push(FileFailure {
                    file: path.clone(),
                    error: "path does not exist".to_string(),
                });
                continue;
            }

            let mut builder = WalkBuilder::new(path);
            if self.config.no_ignore {
                builder
                    .git_ignore(false)
                    .git_global(false)
                    .git_exclude(false)
                    .ignore(false);
            } else {
                builder.add_custom_ignore_filename(IGNORE_FILE_NAME);
            }
            builder.hidden(true);

            for entry in builder.build() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!("Walk error under {}: {}", path.display(), e);
                        failures.push(FileFailure {
                            file: path.clone(),
                            error: LintError::from(e).to_string(),
                        });
                        continue;
                    }
                };
                if !entry.file_type().is_some_and(|t| t.is_file()) {
                    continue;
                }
                let file = entry.path();
                let relative = file.strip_prefix(path).unwrap_or(file);
                if registry.is_supported_path(file) && self.config.files.is_included(relative) {
                    files.push(file.to_path_buf());
                }
            }
        }

        files.sort();
        files.dedup();
        files
    }
}

fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| {
        a.file
            .cmp(&b.file)
            .then_with(|| a.location.start_line.cmp(&b.location.start_line))
            .then_with(|| a.location.start_column.cmp(&b.location.start_column))
    });
}
