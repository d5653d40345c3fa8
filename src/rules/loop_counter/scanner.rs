//! Recursive-descent visitor that finds counter mutations in loop bodies.

use super::counters::CounterExtractor;
use super::lvalue::classify;
use super::scope::{LoopScope, LoopScopeGuard, LoopScopeStack};
use super::{Violation, ViolationSink};
use crate::ast::{
    CompilationUnit, Expr, ExprKind, ForInitializer, ForStatement, MemberInit, Stmt, StmtKind,
};

/// Walks one tree. The scope stack lives exactly as long as the walk.
pub(super) struct BodyScanner<'k, K: ViolationSink + ?Sized> {
    stack: LoopScopeStack,
    extractor: CounterExtractor,
    sink: &'k mut K,
}

impl<K: ViolationSink + ?Sized> AsMut<LoopScopeStack> for BodyScanner<'_, K> {
    fn as_mut(&mut self) -> &mut LoopScopeStack {
        &mut self.stack
    }
}

impl<'k, K: ViolationSink + ?Sized> BodyScanner<'k, K> {
    pub(super) fn new(extractor: CounterExtractor, sink: &'k mut K) -> Self {
        Self {
            stack: LoopScopeStack::new(),
            extractor,
            sink,
        }
    }

    pub(super) fn scan(&mut self, unit: &CompilationUnit) {
        for item in &unit.items {
            self.visit_stmt(item);
        }
        debug_assert_eq!(self.stack.depth(), 0, "unbalanced loop scopes");
    }

    fn visit_stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.visit_stmt(stmt);
        }
    }

    fn visit_exprs(&mut self, exprs: &[Expr]) {
        for expr in exprs {
            self.visit_expr(expr);
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Block(stmts) => self.visit_stmts(stmts),
            StmtKind::Expression(expr) => self.visit_expr(expr),
            StmtKind::Declaration(declarators) => {
                for init in declarators.iter().filter_map(|d| d.init.as_ref()) {
                    self.visit_expr(init);
                }
            }
            StmtKind::For(for_stmt) => self.visit_for(for_stmt),
            StmtKind::Foreach(foreach) => {
                self.visit_expr(&foreach.iterable);
                self.visit_stmt(&foreach.body);
            }
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.visit_expr(condition);
                self.visit_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.visit_stmt(else_branch);
                }
            }
            StmtKind::While { condition, body } => {
                self.visit_expr(condition);
                self.visit_stmt(body);
            }
            StmtKind::DoWhile { body, condition } => {
                self.visit_stmt(body);
                self.visit_expr(condition);
            }
            StmtKind::Return(value) => {
                if let Some(value) = value {
                    self.visit_expr(value);
                }
            }
            StmtKind::Empty => {}
            StmtKind::Other { exprs, stmts } => {
                self.visit_exprs(exprs);
                self.visit_stmts(stmts);
            }
        }
    }

    /// Header clauses other than the incrementor belong to the enclosing
    /// scopes. The incrementor is never scanned.
    fn visit_for(&mut self, for_stmt: &ForStatement) {
        match &for_stmt.initializer {
            ForInitializer::Empty => {}
            ForInitializer::Declaration(declarators) => {
                for init in declarators.iter().filter_map(|d| d.init.as_ref()) {
                    self.visit_expr(init);
                }
            }
            ForInitializer::Expressions(exprs) => self.visit_exprs(exprs),
        }
        if let Some(condition) = &for_stmt.condition {
            self.visit_expr(condition);
        }

        let counters = self.extractor.extract(for_stmt);
        let mut scoped = LoopScopeGuard::enter(self, LoopScope::new(counters, for_stmt.location));
        scoped.visit_stmt(&for_stmt.body);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Assignment { target, value, .. } => {
                self.check_mutation(expr, target);
                self.visit_expr(target);
                self.visit_expr(value);
            }
            ExprKind::Unary { op, operand } => {
                if op.is_step() {
                    self.check_mutation(expr, operand);
                }
                self.visit_expr(operand);
            }
            ExprKind::Identifier(_) | ExprKind::Literal => {}
            ExprKind::MemberAccess { target, .. } => self.visit_expr(target),
            ExprKind::ElementAccess { target, indices } => {
                self.visit_expr(target);
                self.visit_exprs(indices);
            }
            ExprKind::Tuple(items) => self.visit_exprs(items),
            ExprKind::AnonymousObject(members) => {
                for MemberInit { value, .. } in members {
                    self.visit_expr(value);
                }
            }
            ExprKind::Parenthesized(inner) | ExprKind::Cast(inner) => self.visit_expr(inner),
            ExprKind::Binary { left, right } => {
                self.visit_expr(left);
                self.visit_expr(right);
            }
            ExprKind::Call { callee, arguments } => {
                self.visit_expr(callee);
                self.visit_exprs(arguments);
            }
            ExprKind::Lambda { body } => self.visit_stmt(body),
            ExprKind::Other { operands, bodies } => {
                self.visit_exprs(operands);
                self.visit_stmts(bodies);
            }
        }
    }

    fn check_mutation(&mut self, mutation: &Expr, target: &Expr) {
        let Some(name) = classify(target).name() else {
            return;
        };
        if let Some(owner) = self.stack.find_owner(name) {
            let violation = Violation {
                location: mutation.location,
                counter_name: name.to_string(),
                loop_location: owner.loop_location,
            };
            self.sink.report(violation);
        }
    }
}
