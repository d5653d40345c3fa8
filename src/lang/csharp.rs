//! C# language front end.
//!
//! Parses with `tree-sitter-c-sharp` and lowers the concrete tree into the
//! language-neutral syntax tree. Only loops, declarations, assignments,
//! increments and the lvalue shapes are modelled precisely; every other
//! construct is kept as an `Other` container.
//!
//! The `for` header is split on its `;` and `)` tokens rather than on field
//! names, so the lowering does not depend on how a given grammar release
//! names the initializer and update fields.

use tree_sitter::{Node, Parser, Tree};

use crate::ast::{
    CompilationUnit, Declarator, Expr, ExprKind, ForInitializer, ForStatement, ForeachStatement,
    MemberInit, SourceLocation, Stmt, StmtKind,
};
use crate::error::{LintError, Result};
use crate::lang::common::{
    all_children, child_by_field, is_literal_kind, named_children, node_text, Lowerer,
};
use crate::lang::traits::Language;

/// C# language implementation.
pub struct CSharp;

impl Language for CSharp {
    fn name(&self) -> &'static str {
        "csharp"
    }

    fn extensions(&self) -> &[&'static str] {
        &[".cs", ".csx"]
    }

    fn parser(&self) -> Result<Parser> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .map_err(|e| LintError::TreeSitter(e.to_string()))?;
        Ok(parser)
    }

    fn lower(&self, tree: &Tree, source: &[u8]) -> CompilationUnit {
        let lowerer = CSharpLowerer { source };
        let root = tree.root_node();
        let items = named_children(root)
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

/// Position inside a `for (...)` header while scanning its tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderSection {
    Keyword,
    Initializer,
    Condition,
    Update,
    Body,
}

struct CSharpLowerer<'s> {
    source: &'s [u8],
}

impl Lowerer for CSharpLowerer<'_> {
    fn source(&self) -> &[u8] {
        self.source
    }

    fn is_statement_kind(&self, kind: &str) -> bool {
        kind == "block"
            || kind == "variable_declaration"
            || kind.ends_with("_statement")
            || kind.ends_with("_declaration")
            || matches!(
                kind,
                "compilation_unit"
                    | "declaration_list"
                    | "switch_body"
                    | "switch_section"
                    | "catch_clause"
                    | "finally_clause"
                    | "accessor_list"
            )
    }

    fn lower_stmt(&self, node: Node<'_>) -> Stmt {
        match node.kind() {
            "block" => self.lower_block(node),
            "expression_statement" => self.lower_expr_statement(node),
            "local_declaration_statement" => {
                match named_children(node)
                    .into_iter()
                    .find(|c| c.kind() == "variable_declaration")
                {
                    Some(decl) => self.lower_variable_declaration(decl),
                    None => self.lower_other_stmt(node),
                }
            }
            "variable_declaration" => self.lower_variable_declaration(node),
            "for_statement" => Stmt::new(
                StmtKind::For(self.lower_for(node)),
                SourceLocation::of(node),
            ),
            "foreach_statement" => self.lower_foreach(node),
            "if_statement" => self.lower_if(node),
            "while_statement" => self.lower_while(node),
            "do_statement" => self.lower_do(node),
            "return_statement" => self.lower_return(node),
            "empty_statement" => Stmt::new(StmtKind::Empty, SourceLocation::of(node)),
            _ => self.lower_other_stmt(node),
        }
    }

    fn lower_expr(&self, node: Node<'_>) -> Expr {
        let location = SourceLocation::of(node);
        match node.kind() {
            "identifier" => Expr::ident(self.text(node), location),
            "member_access_expression" => self.lower_member_access(node),
            "element_access_expression" => self.lower_element_access(node),
            "tuple_expression" => Expr::new(
                ExprKind::Tuple(
                    named_children(node)
                        .into_iter()
                        .map(|c| self.lower_expr(c))
                        .collect(),
                ),
                location,
            ),
            "anonymous_object_creation_expression" => self.lower_anonymous_object(node),
            "object_creation_expression" | "implicit_object_creation_expression" => {
                self.lower_object_creation(node)
            }
            "parenthesized_expression" => self.lower_parenthesized(node),
            "cast_expression" => self.lower_cast(node),
            "assignment_expression" => self.lower_assignment(node),
            "prefix_unary_expression" => self.lower_unary(node, true),
            "postfix_unary_expression" => self.lower_unary(node, false),
            "binary_expression" => self.lower_binary(node),
            "invocation_expression" => self.lower_invocation(node),
            "lambda_expression" => match child_by_field(node, "body")
                .or_else(|| named_children(node).last().copied())
            {
                Some(body) => Expr::new(
                    ExprKind::Lambda {
                        body: Box::new(self.lower_lambda_body(body)),
                    },
                    location,
                ),
                None => self.lower_other_expr(node),
            },
            "anonymous_method_expression" => {
                match named_children(node).into_iter().find(|c| c.kind() == "block") {
                    Some(block) => Expr::new(
                        ExprKind::Lambda {
                            body: Box::new(self.lower_block(block)),
                        },
                        location,
                    ),
                    None => self.lower_other_expr(node),
                }
            }
            "argument" => match named_children(node).last() {
                // `ref x` / `out x` / `name: x` all wrap a single value.
                Some(value) => self.lower_expr(*value),
                None => self.lower_other_expr(node),
            },
            kind if is_literal_kind(kind) => Expr::literal(location),
            _ => self.lower_other_expr(node),
        }
    }
}

impl CSharpLowerer<'_> {
    fn lower_variable_declaration(&self, node: Node<'_>) -> Stmt {
        let declarators = named_children(node)
            .into_iter()
            .filter(|c| c.kind() == "variable_declarator")
            .filter_map(|c| self.lower_declarator(c))
            .collect();
        Stmt::new(StmtKind::Declaration(declarators), SourceLocation::of(node))
    }

    fn lower_declarator(&self, node: Node<'_>) -> Option<Declarator> {
        let name = child_by_field(node, "name").or_else(|| {
            named_children(node)
                .into_iter()
                .find(|c| c.kind() == "identifier")
        })?;
        Some(Declarator::new(
            self.text(name),
            self.declarator_initializer(node),
            SourceLocation::of(node),
        ))
    }

    /// Value after `=`, either inline or wrapped in `equals_value_clause`.
    fn declarator_initializer(&self, node: Node<'_>) -> Option<Expr> {
        let children = all_children(node);
        if let Some(clause) = children.iter().find(|c| c.kind() == "equals_value_clause") {
            return named_children(*clause)
                .first()
                .map(|value| self.lower_expr(*value));
        }
        let eq = children
            .iter()
            .position(|c| !c.is_named() && node_text(*c, self.source) == "=")?;
        children[eq + 1..]
            .iter()
            .find(|c| c.is_named())
            .map(|value| self.lower_expr(*value))
    }

    fn lower_for(&self, node: Node<'_>) -> ForStatement {
        let mut section = HeaderSection::Keyword;
        let mut init_nodes = Vec::new();
        let mut condition = None;
        let mut update_nodes = Vec::new();
        let mut body = None;

        for child in all_children(node) {
            if !child.is_named() {
                section = match (section, node_text(child, self.source)) {
                    (HeaderSection::Keyword, "(") => HeaderSection::Initializer,
                    (HeaderSection::Initializer, ";") => HeaderSection::Condition,
                    (HeaderSection::Condition, ";") => HeaderSection::Update,
                    (HeaderSection::Update, ")") => HeaderSection::Body,
                    (current, _) => current,
                };
                continue;
            }
            match section {
                HeaderSection::Initializer => init_nodes.push(child),
                HeaderSection::Condition => condition = Some(child),
                HeaderSection::Update => update_nodes.push(child),
                HeaderSection::Body => body = Some(child),
                HeaderSection::Keyword => {}
            }
        }

        let initializer = match init_nodes.as_slice() {
            [] => ForInitializer::Empty,
            [decl] if decl.kind() == "variable_declaration" => ForInitializer::Declaration(
                named_children(*decl)
                    .into_iter()
                    .filter(|c| c.kind() == "variable_declarator")
                    .filter_map(|c| self.lower_declarator(c))
                    .collect(),
            ),
            exprs => ForInitializer::Expressions(
                exprs.iter().map(|e| self.lower_expr(*e)).collect(),
            ),
        };

        ForStatement {
            initializer,
            condition: condition.map(|c| self.lower_expr(c)),
            incrementors: update_nodes.iter().map(|u| self.lower_expr(*u)).collect(),
            body: self.lower_body(body, node),
            location: SourceLocation::of(node),
        }
    }

    fn lower_foreach(&self, node: Node<'_>) -> Stmt {
        let (Some(iterable), Some(body)) =
            (child_by_field(node, "right"), child_by_field(node, "body"))
        else {
            return self.lower_other_stmt(node);
        };
        let variable = child_by_field(node, "left")
            .filter(|left| left.kind() == "identifier")
            .map(|left| self.text(left));
        Stmt::new(
            StmtKind::Foreach(ForeachStatement {
                variable,
                iterable: self.lower_expr(iterable),
                body: Box::new(self.lower_stmt(body)),
                location: SourceLocation::of(node),
            }),
            SourceLocation::of(node),
        )
    }

    fn lower_member_access(&self, node: Node<'_>) -> Expr {
        let children = named_children(node);
        let target = child_by_field(node, "expression").or_else(|| children.first().copied());
        let name = child_by_field(node, "name").or_else(|| children.last().copied());
        match (target, name) {
            (Some(target), Some(name)) if target != name => Expr::member(
                self.lower_expr(target),
                self.text(name),
                SourceLocation::of(node),
            ),
            _ => self.lower_other_expr(node),
        }
    }

    fn lower_element_access(&self, node: Node<'_>) -> Expr {
        let children = named_children(node);
        let Some(target) = child_by_field(node, "expression").or_else(|| children.first().copied())
        else {
            return self.lower_other_expr(node);
        };
        let indices = child_by_field(node, "subscript")
            .or_else(|| {
                children
                    .iter()
                    .copied()
                    .find(|c| c.kind() == "bracketed_argument_list")
            })
            .map(|list| {
                named_children(list)
                    .into_iter()
                    .map(|arg| self.lower_expr(arg))
                    .collect()
            })
            .unwrap_or_default();
        Expr::index(self.lower_expr(target), indices, SourceLocation::of(node))
    }

    fn lower_invocation(&self, node: Node<'_>) -> Expr {
        let children = named_children(node);
        let Some(callee) = child_by_field(node, "function").or_else(|| children.first().copied())
        else {
            return self.lower_other_expr(node);
        };
        let arguments = child_by_field(node, "arguments")
            .or_else(|| children.iter().copied().find(|c| c.kind() == "argument_list"))
            .map(|list| {
                named_children(list)
                    .into_iter()
                    .map(|arg| self.lower_expr(arg))
                    .collect()
            })
            .unwrap_or_default();
        Expr::new(
            ExprKind::Call {
                callee: Box::new(self.lower_expr(callee)),
                arguments,
            },
            SourceLocation::of(node),
        )
    }

    /// `new T(args) { ... }` and target-typed `new(args) { ... }`.
    fn lower_object_creation(&self, node: Node<'_>) -> Expr {
        let mut operands = Vec::new();
        for child in named_children(node) {
            match child.kind() {
                "argument_list" => operands.extend(
                    named_children(child)
                        .into_iter()
                        .map(|arg| self.lower_expr(arg)),
                ),
                "initializer_expression" => operands.push(self.lower_object_initializer(child)),
                _ => {}
            }
        }
        Expr::new(
            ExprKind::Other {
                operands,
                bodies: Vec::new(),
            },
            SourceLocation::of(node),
        )
    }

    /// `{ i = 2, Inner = { j = 3 }, [k] = v }` following an object creation.
    ///
    /// `name = value` sets a member of the new object and becomes a
    /// [`MemberInit`]. Collection elements are kept as unnamed members.
    fn lower_object_initializer(&self, node: Node<'_>) -> Expr {
        let mut members = Vec::new();
        for child in named_children(node) {
            if child.kind() != "assignment_expression" {
                members.push(MemberInit {
                    name: None,
                    value: self.lower_initializer_value(child),
                });
                continue;
            }
            let operands = named_children(child);
            let left = child_by_field(child, "left").or_else(|| operands.first().copied());
            let right = child_by_field(child, "right").or_else(|| operands.last().copied());
            let (Some(left), Some(right)) = (left, right) else {
                members.push(MemberInit {
                    name: None,
                    value: self.lower_other_expr(child),
                });
                continue;
            };
            if left == right {
                members.push(MemberInit {
                    name: None,
                    value: self.lower_other_expr(child),
                });
                continue;
            }
            let name = if left.kind() == "identifier" {
                Some(self.text(left))
            } else {
                // Indexer initializer: the index expressions are still visited.
                members.push(MemberInit {
                    name: None,
                    value: self.lower_other_expr(left),
                });
                None
            };
            members.push(MemberInit {
                name,
                value: self.lower_initializer_value(right),
            });
        }
        Expr::new(ExprKind::AnonymousObject(members), SourceLocation::of(node))
    }

    fn lower_initializer_value(&self, node: Node<'_>) -> Expr {
        if node.kind() == "initializer_expression" {
            self.lower_object_initializer(node)
        } else {
            self.lower_expr(node)
        }
    }

    /// `new { i = 0, x.j }`.
    ///
    /// A `name = value` member declarator is not an assignment. Depending on
    /// the grammar release it arrives either as inline `identifier = expr`
    /// tokens or as an `assignment_expression`; both become [`MemberInit`].
    fn lower_anonymous_object(&self, node: Node<'_>) -> Expr {
        let mut members = Vec::new();
        let mut pending_name: Option<String> = None;
        let mut after_equals = false;

        for child in all_children(node) {
            if !child.is_named() {
                after_equals = node_text(child, self.source) == "=" && pending_name.is_some();
                continue;
            }
            if after_equals {
                members.push(MemberInit {
                    name: pending_name.take(),
                    value: self.lower_expr(child),
                });
                after_equals = false;
                continue;
            }
            if let Some(name) = pending_name.take() {
                // Identifier projection without `=`: `new { x }`.
                members.push(MemberInit {
                    name: None,
                    value: Expr::ident(name, SourceLocation::of(child)),
                });
            }
            match child.kind() {
                "identifier" => pending_name = Some(self.text(child)),
                "assignment_expression" => {
                    let left = child_by_field(child, "left")
                        .or_else(|| named_children(child).first().copied());
                    let right = child_by_field(child, "right")
                        .or_else(|| named_children(child).last().copied());
                    match (left, right) {
                        (Some(left), Some(right)) if left != right => members.push(MemberInit {
                            name: Some(self.text(left)),
                            value: self.lower_expr(right),
                        }),
                        _ => members.push(MemberInit {
                            name: None,
                            value: self.lower_expr(child),
                        }),
                    }
                }
                _ => members.push(MemberInit {
                    name: None,
                    value: self.lower_expr(child),
                }),
            }
        }
        if let Some(name) = pending_name {
            members.push(MemberInit {
                name: None,
                value: Expr::ident(name, SourceLocation::of(node)),
            });
        }

        Expr::new(ExprKind::AnonymousObject(members), SourceLocation::of(node))
    }
}
