//! Hanami - front end for a small garden-flavored teaching language
//!
//! Turns Hanami source into a validated, typed AST: the lexer produces
//! an EOF-terminated token stream, the recursive-descent parser builds
//! the tree or fails fast on the first syntax error, and the semantic
//! analyzer checks the whole tree while collecting every diagnostic it
//! can. The validated AST serializes to a stable JSON interchange form.

pub mod diagnostics;
pub mod driver;
pub mod lexer;
pub mod parser;
pub mod semantic;

// Re-export commonly used types
pub use diagnostics::{Diagnostic, DiagnosticLevel, SourceLocation};
pub use driver::Driver;
