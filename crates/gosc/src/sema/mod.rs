//! Semantic analysis: scopes and the action of every production
//!
//! Each action is a method on [`Context`] that receives the already reduced
//! child nodes, checks them, updates the scope chain and returns the parent
//! node. Semantic errors are recorded and answered with a node that carries
//! no type, which enclosing actions treat as "already reported".

mod context;
mod decl;
mod expr;
pub mod operators;
mod scope;
mod stmt;
mod types;

pub use context::{BLANK, Context, Frame};
pub(crate) use expr::parse_int;
pub use scope::{Import, LookupMode, Scope, ScopeError, ScopeMetadata, Symbol, SymbolUpdate};
pub use stmt::{LoopHeader, RangeTargets};
