//! Language-neutral syntax tree consumed by the rules.

pub mod location;
pub mod types;

pub use location::SourceLocation;
pub use types::{
    AssignOp, CompilationUnit, Declarator, Expr, ExprKind, ForInitializer, ForStatement,
    ForeachStatement, MemberInit, Stmt, StmtKind, UnaryOp,
};
