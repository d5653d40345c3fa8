//! LOOP001: loop counter modified inside the loop body.
//!
//! For every `for` statement the rule computes the set of counter variables
//! from the loop header, keeps that set active while the body is visited,
//! and reports any assignment, compound assignment, increment or decrement
//! of an active counter. Counters of all enclosing loops stay active inside
//! nested loops. The update clause of each loop is never visited, so
//! stepping a counter there is always allowed.
//!
//! ```text
//! for (int i = 0; i < n; i++) {
//!     i = 0;            // reported
//!     s.i = 0;          // not reported: member access is not analyzed
//! }
//! i = 0;                // not reported: the loop scope is closed
//! ```

mod counters;
mod lvalue;
mod scanner;
mod scope;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use counters::{CounterExtractor, CounterSet, VariableRef};
pub use lvalue::{classify, Lvalue};
pub use scope::{LoopScope, LoopScopeGuard, LoopScopeStack};

use super::{Diagnostic, Rule, RuleCode};
use crate::ast::{CompilationUnit, SourceLocation};
use scanner::BodyScanner;

/// A counter write inside a loop body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// The mutating expression.
    pub location: SourceLocation,
    pub counter_name: String,
    /// The innermost enclosing loop that owns the counter.
    pub loop_location: SourceLocation,
}

impl Violation {
    pub fn message(&self) -> String {
        format!(
            "loop counter '{}' is modified in the loop body",
            self.counter_name
        )
    }
}

/// Receives violations as they are found, in source order.
pub trait ViolationSink {
    fn report(&mut self, violation: Violation);
}

impl ViolationSink for Vec<Violation> {
    fn report(&mut self, violation: Violation) {
        self.push(violation);
    }
}

/// Rule settings, read from `[rules.loop-counter]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoopCounterOptions {
    /// Treat variables stepped in the update clause as counters even when
    /// the initializer does not mention them.
    pub track_incrementor_targets: bool,
}

impl Default for LoopCounterOptions {
    fn default() -> Self {
        Self {
            track_incrementor_targets: true,
        }
    }
}

/// Run the analysis over one tree.
pub fn analyze<K: ViolationSink + ?Sized>(
    unit: &CompilationUnit,
    options: LoopCounterOptions,
    sink: &mut K,
) {
    let extractor = CounterExtractor::new(options.track_incrementor_targets);
    BodyScanner::new(extractor, sink).scan(unit);
}

/// Collect violations into a vector.
pub fn find_violations(unit: &CompilationUnit, options: LoopCounterOptions) -> Vec<Violation> {
    let mut violations = Vec::new();
    analyze(unit, options, &mut violations);
    violations
}

/// LOOP001 as a [`Rule`].
#[derive(Debug, Clone, Default)]
pub struct LoopCounterRule {
    options: LoopCounterOptions,
}

impl LoopCounterRule {
    pub fn new(options: LoopCounterOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> LoopCounterOptions {
        self.options
    }
}

impl Rule for LoopCounterRule {
    fn code(&self) -> RuleCode {
        RuleCode::LOOP001
    }

    fn check(&self, file: &Path, _source: &str, unit: &CompilationUnit) -> Vec<Diagnostic> {
        let violations = find_violations(unit, self.options);
        if !violations.is_empty() {
            debug!(
                "{}: {} loop counter violation(s)",
                file.display(),
                violations.len()
            );
        }
        violations
            .into_iter()
            .map(|v| Diagnostic {
                rule: self.code(),
                severity: self.code().default_severity(),
                file: file.to_path_buf(),
                location: v.location,
                message: v.message(),
                counter: Some(v.counter_name),
            })
            .collect()
    }
}
