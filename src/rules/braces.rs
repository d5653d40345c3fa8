//! BRACE001: control statements whose nested statement is not a block.
//!
//! `if`, `else`, `for`, `foreach`, `while` and `do` must wrap their body in
//! `{ }`. An `else if` chain is not a violation on the `else`.

use std::path::Path;

use crate::ast::{CompilationUnit, Expr, ExprKind, SourceLocation, Stmt, StmtKind};
use crate::rules::{Diagnostic, Rule, RuleCode};

/// Unbraced body found by [`find_unbraced`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnbracedBody {
    /// Keyword of the owning statement (`"if"`, `"else"`, `"for"`, ...).
    pub keyword: &'static str,
    pub location: SourceLocation,
}

impl UnbracedBody {
    pub fn message(&self) -> String {
        format!(
            "Add curly braces around the nested statement(s) in this \"{}\" block.",
            self.keyword
        )
    }
}

/// Every unbraced control statement body in `unit`, in source order.
pub fn find_unbraced(unit: &CompilationUnit) -> Vec<UnbracedBody> {
    let mut found = Vec::new();
    for stmt in &unit.items {
        visit_stmt(stmt, &mut found);
    }
    // Java spells its enhanced loop `for`.
    if unit.language == "java" {
        for body in &mut found {
            if body.keyword == "foreach" {
                body.keyword = "for";
            }
        }
    }
    found
}

fn needs_braces(owner: &Stmt, body: &Stmt) -> bool {
    match &body.kind {
        StmtKind::Block(_) => false,
        // Missing body in a tree with syntax errors.
        StmtKind::Empty => body.location != owner.location,
        _ => true,
    }
}

fn check_body(
    owner: &Stmt,
    keyword: &'static str,
    location: SourceLocation,
    body: &Stmt,
    found: &mut Vec<UnbracedBody>,
) {
    if needs_braces(owner, body) {
        found.push(UnbracedBody { keyword, location });
    }
}

fn visit_stmt(stmt: &Stmt, found: &mut Vec<UnbracedBody>) {
    match &stmt.kind {
        StmtKind::Block(stmts) => stmts.iter().for_each(|s| visit_stmt(s, found)),
        StmtKind::Expression(expr) => visit_expr(expr, found),
        StmtKind::Declaration(decls) => decls
            .iter()
            .filter_map(|d| d.init.as_ref())
            .for_each(|e| visit_expr(e, found)),
        StmtKind::For(for_stmt) => {
            check_body(stmt, "for", stmt.location, &for_stmt.body, found);
            visit_stmt(&for_stmt.body, found);
        }
        StmtKind::Foreach(foreach) => {
            check_body(stmt, "foreach", stmt.location, &foreach.body, found);
            visit_expr(&foreach.iterable, found);
            visit_stmt(&foreach.body, found);
        }
        StmtKind::If {
            condition,
            then_branch,
            else_branch,
        } => {
            visit_expr(condition, found);
            check_body(stmt, "if", stmt.location, then_branch, found);
            visit_stmt(then_branch, found);
            if let Some(alternative) = else_branch {
                if !matches!(alternative.kind, StmtKind::If { .. }) {
                    check_body(stmt, "else", alternative.location, alternative, found);
                }
                visit_stmt(alternative, found);
            }
        }
        StmtKind::While { condition, body } => {
            visit_expr(condition, found);
            check_body(stmt, "while", stmt.location, body, found);
            visit_stmt(body, found);
        }
        StmtKind::DoWhile { body, condition } => {
            check_body(stmt, "do", stmt.location, body, found);
            visit_stmt(body, found);
            visit_expr(condition, found);
        }
        StmtKind::Return(value) => {
            if let Some(value) = value {
                visit_expr(value, found);
            }
        }
        StmtKind::Empty => {}
        StmtKind::Other { exprs, stmts } => {
            exprs.iter().for_each(|e| visit_expr(e, found));
            stmts.iter().for_each(|s| visit_stmt(s, found));
        }
    }
}

/// Only lambdas and unmodelled expressions can hold statements.
fn visit_expr(expr: &Expr, found: &mut Vec<UnbracedBody>) {
    match &expr.kind {
        ExprKind::Lambda { body } => visit_stmt(body, found),
        ExprKind::Other { operands, bodies } => {
            operands.iter().for_each(|e| visit_expr(e, found));
            bodies.iter().for_each(|s| visit_stmt(s, found));
        }
        ExprKind::Call { callee, arguments } => {
            visit_expr(callee, found);
            arguments.iter().for_each(|e| visit_expr(e, found));
        }
        ExprKind::Assignment { target, value, .. } => {
            visit_expr(target, found);
            visit_expr(value, found);
        }
        ExprKind::Binary { left, right } => {
            visit_expr(left, found);
            visit_expr(right, found);
        }
        ExprKind::Unary { operand, .. } => visit_expr(operand, found),
        ExprKind::Parenthesized(inner) | ExprKind::Cast(inner) => visit_expr(inner, found),
        ExprKind::MemberAccess { target, .. } => visit_expr(target, found),
        ExprKind::ElementAccess { target, indices } => {
            visit_expr(target, found);
            indices.iter().for_each(|e| visit_expr(e, found));
        }
        ExprKind::Tuple(items) => items.iter().for_each(|e| visit_expr(e, found)),
        ExprKind::AnonymousObject(members) => {
            members.iter().for_each(|m| visit_expr(&m.value, found));
        }
        ExprKind::Identifier(_) | ExprKind::Literal => {}
    }
}

/// Rule adapter reporting BRACE001.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurlyBracesRule;

impl CurlyBracesRule {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for CurlyBracesRule {
    fn code(&self) -> RuleCode {
        RuleCode::BRACE001
    }

    fn check(&self, file: &Path, _source: &str, unit: &CompilationUnit) -> Vec<Diagnostic> {
        find_unbraced(unit)
            .into_iter()
            .map(|body| Diagnostic {
                rule: RuleCode::BRACE001,
                severity: RuleCode::BRACE001.default_severity(),
                file: file.to_path_buf(),
                location: body.location,
                counter: None,
                message: body.message(),
            })
            .collect()
    }
}
