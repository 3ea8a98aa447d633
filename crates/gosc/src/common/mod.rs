//! Common infrastructure shared by the lexer, parser and semantic actions

mod config;
mod diagnostics;
mod error;
mod span;

pub use config::Config;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{CompileError, CompileResult, DiagnosticReporter};
pub use span::Span;
