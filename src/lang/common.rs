//! Common utilities for language front ends.
//!
//! Provides shared functionality used by the C# and Java lowerers:
//! - Node text extraction (safe UTF-8 handling)
//! - Child traversal that skips comments
//! - Operator token lookup for unary and assignment nodes
//! - Error node counting
//! - The [`Lowerer`] driver with grammar-independent lowering defaults

use tree_sitter::Node;

use crate::ast::{AssignOp, Expr, ExprKind, SourceLocation, Stmt, StmtKind, UnaryOp};

// =============================================================================
// Node Text Extraction
// =============================================================================

/// Extract text from a tree-sitter node as a `&str`.
///
/// Returns an empty string on invalid UTF-8 rather than panicking.
#[inline]
pub fn node_text<'a>(node: Node<'_>, source: &'a [u8]) -> &'a str {
    source
        .get(node.start_byte()..node.end_byte())
        .and_then(|bytes| std::str::from_utf8(bytes).ok())
        .unwrap_or("")
}

// =============================================================================
// Child Node Traversal
// =============================================================================

/// Find a child node by its field name.
#[inline]
pub fn child_by_field<'a>(node: Node<'a>, field: &str) -> Option<Node<'a>> {
    node.child_by_field_name(field)
}

/// All children for a field name (fields may repeat, e.g. Java `update`).
pub fn children_by_field<'a>(node: Node<'a>, field: &str) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    node.children_by_field_name(field, &mut cursor)
        .filter(|child| !is_comment(*child))
        .collect()
}

/// Named children excluding comments.
pub fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !is_comment(*child))
        .collect()
}

/// All children (named and anonymous) excluding comments.
pub fn all_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|child| !is_comment(*child))
        .collect()
}

/// Comments are grammar extras and can appear between any two tokens.
#[inline]
pub fn is_comment(node: Node<'_>) -> bool {
    matches!(node.kind(), "comment" | "line_comment" | "block_comment")
}

// =============================================================================
// Operator Tokens
// =============================================================================

/// Text of the first anonymous child, which for unary and assignment nodes
/// is the operator token.
pub fn first_operator<'a>(node: Node<'_>, source: &'a [u8]) -> Option<&'a str> {
    all_children(node)
        .into_iter()
        .find(|child| !child.is_named())
        .map(|child| node_text(child, source))
}

/// Does the anonymous operator token come before the operand?
pub fn operator_is_prefix(node: Node<'_>) -> bool {
    all_children(node)
        .first()
        .is_some_and(|first| !first.is_named())
}

/// Operator of an assignment node.
///
/// Newer grammars expose it as an `operator` field holding an anonymous
/// token; older ones wrap it in an `assignment_operator` node. Both shapes
/// are accepted.
pub fn assignment_operator<'a>(node: Node<'_>, source: &'a [u8]) -> Option<&'a str> {
    if let Some(op) = child_by_field(node, "operator") {
        return Some(node_text(op, source).trim());
    }
    all_children(node)
        .into_iter()
        .find(|child| child.kind() == "assignment_operator" || !child.is_named())
        .map(|child| node_text(child, source).trim())
}

// =============================================================================
// Generic Lowering
// =============================================================================

/// Shared lowering driver.
///
/// Front ends implement the grammar-specific hooks; the default methods
/// handle the node kinds no rule cares about by keeping their children in
/// `Other` nodes so nothing below them is lost.
pub(crate) trait Lowerer {
    fn source(&self) -> &[u8];

    /// Lower a node in statement position.
    fn lower_stmt(&self, node: Node<'_>) -> Stmt;

    /// Lower a node in expression position.
    fn lower_expr(&self, node: Node<'_>) -> Expr;

    /// Whether a child of an unmodelled node should be lowered as a
    /// statement rather than an expression.
    fn is_statement_kind(&self, kind: &str) -> bool;

    fn text<'n>(&self, node: Node<'n>) -> String {
        node_text(node, self.source()).to_string()
    }

    /// Fallback for statements and declaration containers.
    fn lower_other_stmt(&self, node: Node<'_>) -> Stmt {
        let mut exprs = Vec::new();
        let mut stmts = Vec::new();
        for child in named_children(node) {
            if self.is_statement_kind(child.kind()) {
                stmts.push(self.lower_stmt(child));
            } else {
                exprs.push(self.lower_expr(child));
            }
        }
        if exprs.is_empty() && stmts.is_empty() {
            return Stmt::new(StmtKind::Empty, SourceLocation::of(node));
        }
        Stmt::new(StmtKind::Other { exprs, stmts }, SourceLocation::of(node))
    }

    /// Fallback for expressions.
    fn lower_other_expr(&self, node: Node<'_>) -> Expr {
        let mut operands = Vec::new();
        let mut bodies = Vec::new();
        for child in named_children(node) {
            if self.is_statement_kind(child.kind()) {
                bodies.push(self.lower_stmt(child));
            } else {
                operands.push(self.lower_expr(child));
            }
        }
        Expr::new(ExprKind::Other { operands, bodies }, SourceLocation::of(node))
    }

    fn lower_block(&self, node: Node<'_>) -> Stmt {
        let stmts = named_children(node)
            .into_iter()
            .map(|child| self.lower_stmt(child))
            .collect();
        Stmt::block(stmts, SourceLocation::of(node))
    }

    /// Lower an optional loop/branch body; a missing body is an empty statement.
    fn lower_body(&self, node: Option<Node<'_>>, parent: Node<'_>) -> Box<Stmt> {
        Box::new(match node {
            Some(body) => self.lower_stmt(body),
            None => Stmt::new(StmtKind::Empty, SourceLocation::of(parent)),
        })
    }

    /// Lambda bodies may be a block or a bare expression.
    fn lower_lambda_body(&self, body: Node<'_>) -> Stmt {
        if self.is_statement_kind(body.kind()) {
            self.lower_stmt(body)
        } else {
            Stmt::expr(self.lower_expr(body))
        }
    }

    fn lower_expr_statement(&self, node: Node<'_>) -> Stmt {
        match named_children(node).first() {
            Some(expr) => Stmt::new(
                StmtKind::Expression(self.lower_expr(*expr)),
                SourceLocation::of(node),
            ),
            None => Stmt::new(StmtKind::Empty, SourceLocation::of(node)),
        }
    }

    /// `target op value` with a textual operator.
    fn lower_assignment(&self, node: Node<'_>) -> Expr {
        let op = assignment_operator(node, self.source()).and_then(AssignOp::from_token);
        let operands: Vec<Node<'_>> = named_children(node)
            .into_iter()
            .filter(|child| child.kind() != "assignment_operator")
            .collect();
        let left = child_by_field(node, "left").or_else(|| operands.first().copied());
        let right = child_by_field(node, "right").or_else(|| operands.last().copied());

        match (op, left, right) {
            (Some(op), Some(left), Some(right)) if left != right => Expr::assign(
                op,
                self.lower_expr(left),
                self.lower_expr(right),
                SourceLocation::of(node),
            ),
            _ => self.lower_other_expr(node),
        }
    }

    /// Prefix or postfix unary node whose operator is an anonymous token.
    fn lower_unary(&self, node: Node<'_>, prefix: bool) -> Expr {
        let operand = child_by_field(node, "operand")
            .or_else(|| named_children(node).first().copied());
        let token = first_operator(node, self.source()).unwrap_or("");
        match operand {
            Some(operand) => {
                let op = if prefix {
                    UnaryOp::prefix(token)
                } else {
                    UnaryOp::postfix(token)
                };
                Expr::unary(op, self.lower_expr(operand), SourceLocation::of(node))
            }
            None => self.lower_other_expr(node),
        }
    }

    fn lower_binary(&self, node: Node<'_>) -> Expr {
        let children = named_children(node);
        let left = child_by_field(node, "left").or_else(|| children.first().copied());
        let right = child_by_field(node, "right").or_else(|| children.last().copied());
        match (left, right) {
            (Some(left), Some(right)) if left != right => Expr::binary(
                self.lower_expr(left),
                self.lower_expr(right),
                SourceLocation::of(node),
            ),
            _ => self.lower_other_expr(node),
        }
    }

    fn lower_parenthesized(&self, node: Node<'_>) -> Expr {
        match named_children(node).first() {
            Some(inner) => Expr::new(
                ExprKind::Parenthesized(Box::new(self.lower_expr(*inner))),
                SourceLocation::of(node),
            ),
            None => self.lower_other_expr(node),
        }
    }

    /// `(T)value`: the value is the last named child.
    fn lower_cast(&self, node: Node<'_>) -> Expr {
        let value = child_by_field(node, "value").or_else(|| named_children(node).last().copied());
        match value {
            Some(value) => Expr::new(
                ExprKind::Cast(Box::new(self.lower_expr(value))),
                SourceLocation::of(node),
            ),
            None => self.lower_other_expr(node),
        }
    }

    fn lower_if(&self, node: Node<'_>) -> Stmt {
        let (Some(condition), Some(consequence)) = (
            child_by_field(node, "condition"),
            child_by_field(node, "consequence"),
        ) else {
            return self.lower_other_stmt(node);
        };
        Stmt::new(
            StmtKind::If {
                condition: self.lower_expr(condition),
                then_branch: Box::new(self.lower_stmt(consequence)),
                else_branch: child_by_field(node, "alternative")
                    .map(|alt| Box::new(self.lower_stmt(alt))),
            },
            SourceLocation::of(node),
        )
    }

    fn lower_while(&self, node: Node<'_>) -> Stmt {
        let (Some(condition), Some(body)) =
            (child_by_field(node, "condition"), child_by_field(node, "body"))
        else {
            return self.lower_other_stmt(node);
        };
        Stmt::new(
            StmtKind::While {
                condition: self.lower_expr(condition),
                body: Box::new(self.lower_stmt(body)),
            },
            SourceLocation::of(node),
        )
    }

    fn lower_do(&self, node: Node<'_>) -> Stmt {
        let (Some(body), Some(condition)) =
            (child_by_field(node, "body"), child_by_field(node, "condition"))
        else {
            return self.lower_other_stmt(node);
        };
        Stmt::new(
            StmtKind::DoWhile {
                body: Box::new(self.lower_stmt(body)),
                condition: self.lower_expr(condition),
            },
            SourceLocation::of(node),
        )
    }

    fn lower_return(&self, node: Node<'_>) -> Stmt {
        let value = named_children(node).first().map(|e| self.lower_expr(*e));
        Stmt::new(StmtKind::Return(value), SourceLocation::of(node))
    }
}

/// Literal-like leaves that can never contain a write.
pub fn is_literal_kind(kind: &str) -> bool {
    kind.ends_with("literal")
        || matches!(
            kind,
            "true" | "false" | "this" | "this_expression" | "base" | "base_expression" | "super"
        )
}

// =============================================================================
// Error Nodes
// =============================================================================

/// Count `ERROR` and `MISSING` nodes below `root`.
pub fn count_error_nodes(root: Node<'_>) -> usize {
    if !root.has_error() {
        return 0;
    }
    let mut count = 0;
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            count += 1;
        }
        if node.has_error() {
            let mut cursor = node.walk();
            stack.extend(node.children(&mut cursor));
        }
    }
    count
}
