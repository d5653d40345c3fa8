//! Loop counter extraction from `for` headers.

use std::borrow::Borrow;
use std::fmt;

use rustc_hash::FxHashSet;

use super::lvalue::classify;
use crate::ast::{Expr, ExprKind, ForInitializer, ForStatement};

/// Name of a trackable variable. Equality is by name only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableRef(String);

impl VariableRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for VariableRef {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Counters of one loop. Built once, then read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterSet {
    names: FxHashSet<VariableRef>,
}

impl CounterSet {
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Names in sorted order.
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.iter().map(VariableRef::as_str).collect();
        names.sort_unstable();
        names
    }

    fn insert(&mut self, name: &str) {
        if !self.names.contains(name) {
            self.names.insert(VariableRef::new(name));
        }
    }
}

impl<S: Into<String>> FromIterator<S> for CounterSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(VariableRef::new).collect(),
        }
    }
}

/// Computes the [`CounterSet`] of a `for` statement.
///
/// Counters come from two places:
/// 1. the initializer: every declarator that has an initial value, or the
///    trackable target of every top-level assignment;
/// 2. the incrementor: the trackable target of every top-level `++`, `--`
///    or compound assignment, unless disabled.
///
/// The condition never contributes. Extraction cannot fail; a header with
/// nothing recognizable yields an empty set.
#[derive(Debug, Clone, Copy)]
pub struct CounterExtractor {
    track_incrementor_targets: bool,
}

impl Default for CounterExtractor {
    fn default() -> Self {
        Self {
            track_incrementor_targets: true,
        }
    }
}

impl CounterExtractor {
    pub fn new(track_incrementor_targets: bool) -> Self {
        Self {
            track_incrementor_targets,
        }
    }

    pub fn extract(&self, header: &ForStatement) -> CounterSet {
        let mut counters = CounterSet::default();

        match &header.initializer {
            ForInitializer::Empty => {}
            ForInitializer::Declaration(declarators) => {
                for declarator in declarators.iter().filter(|d| d.init.is_some()) {
                    counters.insert(&declarator.name);
                }
            }
            ForInitializer::Expressions(exprs) => {
                for expr in exprs {
                    if let ExprKind::Assignment { target, .. } = &expr.unparenthesized().kind {
                        if let Some(name) = classify(target).name() {
                            counters.insert(name);
                        }
                    }
                }
            }
        }

        if self.track_incrementor_targets {
            for expr in &header.incrementors {
                if let Some(name) = stepped_variable(expr) {
                    counters.insert(name);
                }
            }
        }

        counters
    }
}

/// Target of a top-level increment, decrement or compound assignment.
fn stepped_variable(expr: &Expr) -> Option<&str> {
    match &expr.unparenthesized().kind {
        ExprKind::Unary { op, operand } if op.is_step() => classify(operand).name(),
        ExprKind::Assignment { op, target, .. } if op.is_compound() => classify(target).name(),
        _ => None,
    }
}
