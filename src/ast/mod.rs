/// AST (Abstract Syntax Tree) module
/// Contains the untyped tree produced by the parser
///
/// Submodules:
/// - ast: The program root and the closed `Stmt` / `Expr` enums
/// - expressions: Expression nodes and operator enums
/// - statements: Statement nodes
/// - types: Type annotations as written in source
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
