//! Lvalue classification.
//!
//! Only bare identifiers are tracked. Member accesses, indexers, tuple and
//! anonymous-object projections are opaque: telling whether `a.b` or `a[i]`
//! aliases a counter needs data-flow analysis, so those writes are never
//! reported.

use crate::ast::{Expr, ExprKind};

/// Result of classifying an assignment or increment target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lvalue<'a> {
    /// A plain variable reference.
    Trackable(&'a str),
    /// Any compound shape.
    Opaque,
}

impl<'a> Lvalue<'a> {
    /// Name of a trackable lvalue.
    pub fn name(self) -> Option<&'a str> {
        match self {
            Lvalue::Trackable(name) => Some(name),
            Lvalue::Opaque => None,
        }
    }
}

/// Classify the target of a mutating expression.
///
/// Redundant parentheses are transparent: `(i)++` writes `i`.
pub fn classify(target: &Expr) -> Lvalue<'_> {
    match &target.unparenthesized().kind {
        ExprKind::Identifier(name) => Lvalue::Trackable(name),
        ExprKind::MemberAccess { .. }
        | ExprKind::ElementAccess { .. }
        | ExprKind::Tuple(_)
        | ExprKind::AnonymousObject(_)
        | ExprKind::Cast(_)
        | ExprKind::Assignment { .. }
        | ExprKind::Unary { .. }
        | ExprKind::Binary { .. }
        | ExprKind::Call { .. }
        | ExprKind::Lambda { .. }
        | ExprKind::Literal
        | ExprKind::Other { .. } => Lvalue::Opaque,
        // unparenthesized() never returns a Parenthesized node
        ExprKind::Parenthesized(_) => Lvalue::Opaque,
    }
}
