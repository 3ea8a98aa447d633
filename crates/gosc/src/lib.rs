//! gosc - semantic front end for a Go subset
//!
//! This library is a syntax-directed translator: while parsing it evaluates
//! synthesized attributes (types, sizes, storage places, instructions) for
//! every grammar production, maintains the scope chain, and collects
//! diagnostics without stopping at the first semantic error.
//!
//! ## Architecture
//!
//! The translator is organized into:
//! - **Lexer** (`lexer/`): Tokens with line numbers and semicolon insertion
//! - **Parser** (`parser/`): Precedence-aware recursive descent driving reductions
//! - **Sema** (`sema/`): Scope chain and the semantic action of every production
//! - **Types** (`types/`): Type descriptors and the size/layout calculator
//! - **IR** (`ir/`): Temporaries and the three-address instruction skeleton
//! - **Common** (`common/`): Diagnostics, errors, configuration, spans
//! - **Driver** (`driver/`): One-call translation and graph output

pub mod common;
pub mod types;
pub mod ir;
pub mod node;
pub mod lexer;
pub mod sema;
pub mod parser;
pub mod driver;

// Re-exports for convenience
pub use common::{CompileError, CompileResult, Config, Diagnostic, DiagnosticKind, DiagnosticReporter, Diagnostics, Span};
pub use driver::{translate, translate_tokens, Translation};
pub use node::{Attributes, Node, Production};
pub use types::{Primitive, SizeConfig, Type};
