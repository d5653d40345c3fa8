//! Java language front end.
//!
//! Parses with `tree-sitter-java`. Java's `for` header exposes repeated
//! `init` and `update` fields, and its enhanced `for (T x : xs)` loop is
//! lowered to a foreach statement.

use tree_sitter::{Node, Parser, Tree};

use crate::ast::{
    CompilationUnit, Declarator, Expr, ExprKind, ForInitializer, ForStatement, ForeachStatement,
    SourceLocation, Stmt, StmtKind,
};
use crate::error::{LintError, Result};
use crate::lang::common::{
    child_by_field, children_by_field, is_literal_kind, named_children, operator_is_prefix,
    Lowerer,
};
use crate::lang::traits::Language;

/// Java language implementation.
pub struct Java;

impl Language for Java {
    fn name(&self) -> &'static str {
        "java"
    }

    fn extensions(&self) -> &[&'static str] {
        &[".java"]
    }

    fn parser(&self) -> Result<Parser> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .map_err(|e| LintError::TreeSitter(e.to_string()))?;
        Ok(parser)
    }

    fn lower(&self, tree: &Tree, source: &[u8]) -> CompilationUnit {
        let lowerer = JavaLowerer { source };
        let items = named_children(tree.root_node())
            .into_iter()
            .map(|child| lowerer.lower_stmt(child))
            .collect();
        CompilationUnit {
            language: self.name(),
            items,
            error_nodes: 0,
        }
    }
}

struct JavaLowerer<'s> {
    source: &'s [u8],
}

impl Lowerer for JavaLowerer<'_> {
    fn source(&self) -> &[u8] {
        self.source
    }

    fn is_statement_kind(&self, kind: &str) -> bool {
        kind == "block"
            || kind.ends_with("_statement")
            || kind.ends_with("_declaration")
            || kind.ends_with("_body")
            || matches!(
                kind,
                "program"
                    | "switch_block"
                    | "switch_block_statement_group"
                    | "switch_rule"
                    | "catch_clause"
                    | "finally_clause"
                    | "static_initializer"
            )
    }

    fn lower_stmt(&self, node: Node<'_>) -> Stmt {
        match node.kind() {
            "block" => self.lower_block(node),
            "expression_statement" => self.lower_expr_statement(node),
            "local_variable_declaration" | "field_declaration" => Stmt::new(
                StmtKind::Declaration(self.lower_declarators(node)),
                SourceLocation::of(node),
            ),
            "for_statement" => Stmt::new(
                StmtKind::For(self.lower_for(node)),
                SourceLocation::of(node),
            ),
            "enhanced_for_statement" => self.lower_enhanced_for(node),
            "if_statement" => self.lower_if(node),
            "while_statement" => self.lower_while(node),
            "do_statement" => self.lower_do(node),
            "return_statement" => self.lower_return(node),
            ";" => Stmt::new(StmtKind::Empty, SourceLocation::of(node)),
            _ => self.lower_other_stmt(node),
        }
    }

    fn lower_expr(&self, node: Node<'_>) -> Expr {
        let location = SourceLocation::of(node);
        match node.kind() {
            "identifier" => Expr::ident(self.text(node), location),
            "field_access" => {
                match (child_by_field(node, "object"), child_by_field(node, "field")) {
                    (Some(object), Some(field)) => {
                        Expr::member(self.lower_expr(object), self.text(field), location)
                    }
                    _ => self.lower_other_expr(node),
                }
            }
            "array_access" => {
                match (child_by_field(node, "array"), child_by_field(node, "index")) {
                    (Some(array), Some(index)) => Expr::index(
                        self.lower_expr(array),
                        vec![self.lower_expr(index)],
                        location,
                    ),
                    _ => self.lower_other_expr(node),
                }
            }
            "parenthesized_expression" => self.lower_parenthesized(node),
            "cast_expression" => self.lower_cast(node),
            "assignment_expression" => self.lower_assignment(node),
            "update_expression" => {
                // `++i` starts with the operator token, `i++` with the operand.
                let prefix = operator_is_prefix(node);
                self.lower_unary(node, prefix)
            }
            "unary_expression" => self.lower_unary(node, true),
            "binary_expression" => self.lower_binary(node),
            "method_invocation" => self.lower_method_invocation(node),
            "lambda_expression" => match child_by_field(node, "body") {
                Some(body) => Expr::new(
                    ExprKind::Lambda {
                        body: Box::new(self.lower_lambda_body(body)),
                    },
                    location,
                ),
                None => self.lower_other_expr(node),
            },
            kind if is_literal_kind(kind) => Expr::literal(location),
            _ => self.lower_other_expr(node),
        }
    }
}

impl JavaLowerer<'_> {
    fn lower_declarators(&self, node: Node<'_>) -> Vec<Declarator> {
        children_by_field(node, "declarator")
            .into_iter()
            .filter_map(|decl| {
                let name = child_by_field(decl, "name")?;
                Some(Declarator::new(
                    self.text(name),
                    child_by_field(decl, "value").map(|v| self.lower_expr(v)),
                    SourceLocation::of(decl),
                ))
            })
            .collect()
    }

    fn lower_for(&self, node: Node<'_>) -> ForStatement {
        let init = children_by_field(node, "init");
        let initializer = match init.as_slice() {
            [] => ForInitializer::Empty,
            [decl] if decl.kind() == "local_variable_declaration" => {
                ForInitializer::Declaration(self.lower_declarators(*decl))
            }
            exprs => ForInitializer::Expressions(
                exprs.iter().map(|e| self.lower_expr(*e)).collect(),
            ),
        };

        ForStatement {
            initializer,
            condition: child_by_field(node, "condition").map(|c| self.lower_expr(c)),
            incrementors: children_by_field(node, "update")
                .into_iter()
                .map(|u| self.lower_expr(u))
                .collect(),
            body: self.lower_body(child_by_field(node, "body"), node),
            location: SourceLocation::of(node),
        }
    }

    fn lower_enhanced_for(&self, node: Node<'_>) -> Stmt {
        let (Some(iterable), Some(body)) =
            (child_by_field(node, "value"), child_by_field(node, "body"))
        else {
            return self.lower_other_stmt(node);
        };
        Stmt::new(
            StmtKind::Foreach(ForeachStatement {
                variable: child_by_field(node, "name")
                    .filter(|n| n.kind() == "identifier")
                    .map(|n| self.text(n)),
                iterable: self.lower_expr(iterable),
                body: Box::new(self.lower_stmt(body)),
                location: SourceLocation::of(node),
            }),
            SourceLocation::of(node),
        )
    }

    fn lower_method_invocation(&self, node: Node<'_>) -> Expr {
        let location = SourceLocation::of(node);
        let Some(name) = child_by_field(node, "name") else {
            return self.lower_other_expr(node);
        };
        let callee = match child_by_field(node, "object") {
            Some(object) => {
                Expr::member(self.lower_expr(object), self.text(name), SourceLocation::of(name))
            }
            None => Expr::ident(self.text(name), SourceLocation::of(name)),
        };
        let arguments = child_by_field(node, "arguments")
            .map(|args| {
                named_children(args)
                    .into_iter()
                    .map(|arg| self.lower_expr(arg))
                    .collect()
            })
            .unwrap_or_default();
        Expr::new(
            ExprKind::Call {
                callee: Box::new(callee),
                arguments,
            },
            location,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::UnaryOp;
    use std::path::Path;

    fn lower(code: &str) -> CompilationUnit {
        Java.parse(Path::new("Test.java"), code)
            .expect("Java source should parse")
    }

    fn first_for(stmts: &[Stmt]) -> Option<&ForStatement> {
        stmts.iter().find_map(|s| match &s.kind {
            StmtKind::For(f) => Some(f),
            StmtKind::Block(inner) | StmtKind::Other { stmts: inner, .. } => first_for(inner),
            _ => None,
        })
    }

    fn wrap(body: &str) -> String {
        format!("class C {{ void m() {{ {} }} }}", body)
    }

    #[test]
    fn test_for_with_multiple_declarators() {
        let unit = lower(&wrap("for (int d = 0, e = 0; d < 42; d++) { }"));
        let for_stmt = first_for(&unit.items).expect("for statement");
        let ForInitializer::Declaration(decls) = &for_stmt.initializer else {
            panic!("expected declaration, got {:?}", for_stmt.initializer);
        };
        let names: Vec<_> = decls.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["d", "e"]);
    }

    #[test]
    fn test_for_with_multiple_updates() {
        let unit = lower(&wrap("for (i = 0, j = 0; i < 3; i++, --j) { }"));
        let for_stmt = first_for(&unit.items).expect("for statement");
        let ForInitializer::Expressions(init) = &for_stmt.initializer else {
            panic!("expected expressions");
        };
        assert_eq!(init.len(), 2);
        let ops: Vec<_> = for_stmt
            .incrementors
            .iter()
            .map(|e| match &e.kind {
                ExprKind::Unary { op, .. } => *op,
                other => panic!("expected unary, got {:?}", other),
            })
            .collect();
        assert_eq!(ops, vec![UnaryOp::PostIncrement, UnaryOp::PreDecrement]);
    }

    #[test]
    fn test_enhanced_for_is_foreach() {
        let unit = lower(&wrap("for (int x : xs) { x = 0; }"));
        assert!(first_for(&unit.items).is_none());
    }

    #[test]
    fn test_field_and_array_access_lowered() {
        let unit = lower(&wrap("for (;;) { a.b = 1; c[0] = 2; }"));
        let for_stmt = first_for(&unit.items).expect("for statement");
        let StmtKind::Block(stmts) = &for_stmt.body.kind else {
            panic!("expected block");
        };
        let targets: Vec<_> = stmts
            .iter()
            .filter_map(|s| match &s.kind {
                StmtKind::Expression(Expr {
                    kind: ExprKind::Assignment { target, .. },
                    ..
                }) => Some(&target.kind),
                _ => None,
            })
            .collect();
        assert!(matches!(targets[0], ExprKind::MemberAccess { .. }));
        assert!(matches!(targets[1], ExprKind::ElementAccess { .. }));
    }
}
