//! Lowered syntax tree.
//!
//! Front ends in [`crate::lang`] convert tree-sitter concrete syntax trees
//! into these types. The tree keeps only the shapes the rules reason about
//! (assignments, increments, lvalue forms, loops); everything else collapses
//! into the `Other` variants, which still carry their children so traversal
//! reaches nested code.

use super::location::SourceLocation;

// =============================================================================
// Expressions
// =============================================================================

/// Assignment operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `+=`
    Add,
    /// `-=`
    Sub,
    /// `*=`
    Mul,
    /// `/=`
    Div,
    /// `%=`
    Rem,
    /// `&=`
    BitAnd,
    /// `|=`
    BitOr,
    /// `^=`
    BitXor,
    /// `<<=`
    Shl,
    /// `>>=`
    Shr,
    /// `>>>=`
    UnsignedShr,
    /// `??=`
    Coalesce,
}

impl AssignOp {
    /// Parse an operator token.
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "=" => Self::Assign,
            "+=" => Self::Add,
            "-=" => Self::Sub,
            "*=" => Self::Mul,
            "/=" => Self::Div,
            "%=" => Self::Rem,
            "&=" => Self::BitAnd,
            "|=" => Self::BitOr,
            "^=" => Self::BitXor,
            "<<=" => Self::Shl,
            ">>=" => Self::Shr,
            ">>>=" => Self::UnsignedShr,
            "??=" => Self::Coalesce,
            _ => return None,
        })
    }

    /// Compound forms read the target before writing it.
    pub fn is_compound(self) -> bool {
        self != Self::Assign
    }
}

/// Unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
    /// `-x`
    Negate,
    /// `+x`
    Plus,
    /// `!x`, and the C# null-forgiving postfix `x!`
    Not,
    /// `~x`
    BitNot,
    /// Pointer, index-from-end and other operators that never write.
    Other,
}

impl UnaryOp {
    /// Parse a prefix operator token.
    pub fn prefix(token: &str) -> Self {
        match token {
            "++" => Self::PreIncrement,
            "--" => Self::PreDecrement,
            "-" => Self::Negate,
            "+" => Self::Plus,
            "!" => Self::Not,
            "~" => Self::BitNot,
            _ => Self::Other,
        }
    }

    /// Parse a postfix operator token.
    pub fn postfix(token: &str) -> Self {
        match token {
            "++" => Self::PostIncrement,
            "--" => Self::PostDecrement,
            "!" => Self::Not,
            _ => Self::Other,
        }
    }

    /// `++` / `--` in either position.
    pub fn is_step(self) -> bool {
        matches!(
            self,
            Self::PreIncrement | Self::PreDecrement | Self::PostIncrement | Self::PostDecrement
        )
    }
}

/// One member of an object initializer (`new { i = 0, x.j }`, `new P { i = 0 }`).
#[derive(Debug, Clone, PartialEq)]
pub struct MemberInit {
    /// Explicit member name, if written as `name = value`.
    pub name: Option<String>,
    pub value: Expr,
}

/// Expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub location: SourceLocation,
}

/// Closed set of expression shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Bare, unqualified identifier.
    Identifier(String),
    /// `target.member`, `target?.member`, `Type::member`
    MemberAccess { target: Box<Expr>, member: String },
    /// `target[indices]`
    ElementAccess { target: Box<Expr>, indices: Vec<Expr> },
    /// `(a, b)`
    Tuple(Vec<Expr>),
    /// `new { i = 0 }` or the `{ i = 0 }` initializer of `new P { i = 0 }`
    AnonymousObject(Vec<MemberInit>),
    /// `(expr)`
    Parenthesized(Box<Expr>),
    /// `(T)expr`
    Cast(Box<Expr>),
    /// `target op value`
    Assignment {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    /// Prefix or postfix unary operator.
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// Any binary operator, including comparisons and logical operators.
    Binary { left: Box<Expr>, right: Box<Expr> },
    /// Method invocation or object creation.
    Call { callee: Box<Expr>, arguments: Vec<Expr> },
    /// Lambda or anonymous method; expression bodies become a
    /// [`StmtKind::Expression`] statement.
    Lambda { body: Box<Stmt> },
    Literal,
    /// Unmodelled expression. Children are kept for traversal.
    Other { operands: Vec<Expr>, bodies: Vec<Stmt> },
}

impl Expr {
    pub fn new(kind: ExprKind, location: SourceLocation) -> Self {
        Self { kind, location }
    }

    /// Bare identifier.
    pub fn ident(name: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(ExprKind::Identifier(name.into()), location)
    }

    /// `target = value` (or any other assignment operator).
    pub fn assign(op: AssignOp, target: Expr, value: Expr, location: SourceLocation) -> Self {
        Self::new(
            ExprKind::Assignment {
                op,
                target: Box::new(target),
                value: Box::new(value),
            },
            location,
        )
    }

    pub fn unary(op: UnaryOp, operand: Expr, location: SourceLocation) -> Self {
        Self::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            location,
        )
    }

    pub fn member(target: Expr, member: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(
            ExprKind::MemberAccess {
                target: Box::new(target),
                member: member.into(),
            },
            location,
        )
    }

    pub fn index(target: Expr, indices: Vec<Expr>, location: SourceLocation) -> Self {
        Self::new(
            ExprKind::ElementAccess {
                target: Box::new(target),
                indices,
            },
            location,
        )
    }

    pub fn binary(left: Expr, right: Expr, location: SourceLocation) -> Self {
        Self::new(
            ExprKind::Binary {
                left: Box::new(left),
                right: Box::new(right),
            },
            location,
        )
    }

    pub fn literal(location: SourceLocation) -> Self {
        Self::new(ExprKind::Literal, location)
    }

    /// Strip any number of redundant parentheses.
    pub fn unparenthesized(&self) -> &Expr {
        let mut expr = self;
        while let ExprKind::Parenthesized(inner) = &expr.kind {
            expr = inner;
        }
        expr
    }
}

// =============================================================================
// Statements
// =============================================================================

/// One declared variable: `name = init`.
#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub name: String,
    pub init: Option<Expr>,
    pub location: SourceLocation,
}

impl Declarator {
    pub fn new(name: impl Into<String>, init: Option<Expr>, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            init,
            location,
        }
    }
}

/// Initializer clause of a `for` header.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ForInitializer {
    #[default]
    Empty,
    /// `for (int i = 0, j = 0; ...)`
    Declaration(Vec<Declarator>),
    /// `for (i = 0, j = 0; ...)`
    Expressions(Vec<Expr>),
}

/// Classic three-clause `for` loop.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    pub initializer: ForInitializer,
    pub condition: Option<Expr>,
    /// Top-level expressions of the update clause.
    pub incrementors: Vec<Expr>,
    pub body: Box<Stmt>,
    pub location: SourceLocation,
}

/// `foreach (T x in xs)` / `for (T x : xs)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeachStatement {
    /// Iteration variable name; `None` for deconstruction patterns.
    pub variable: Option<String>,
    pub iterable: Expr,
    pub body: Box<Stmt>,
    pub location: SourceLocation,
}

/// Statement node.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub location: SourceLocation,
}

/// Closed set of statement shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Block(Vec<Stmt>),
    Expression(Expr),
    /// Local or field variable declaration.
    Declaration(Vec<Declarator>),
    For(ForStatement),
    Foreach(ForeachStatement),
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While { condition: Expr, body: Box<Stmt> },
    DoWhile { body: Box<Stmt>, condition: Expr },
    Return(Option<Expr>),
    Empty,
    /// Unmodelled statement or declaration container (class, method,
    /// switch, try, ...). Children are kept for traversal.
    Other { exprs: Vec<Expr>, stmts: Vec<Stmt> },
}

impl Stmt {
    pub fn new(kind: StmtKind, location: SourceLocation) -> Self {
        Self { kind, location }
    }

    pub fn expr(expr: Expr) -> Self {
        let location = expr.location;
        Self::new(StmtKind::Expression(expr), location)
    }

    pub fn block(stmts: Vec<Stmt>, location: SourceLocation) -> Self {
        Self::new(StmtKind::Block(stmts), location)
    }
}

/// Lowered source file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompilationUnit {
    /// Language name of the front end that produced the tree.
    pub language: &'static str,
    pub items: Vec<Stmt>,
    /// Number of tree-sitter `ERROR`/`MISSING` nodes seen while lowering.
    pub error_nodes: usize,
}
