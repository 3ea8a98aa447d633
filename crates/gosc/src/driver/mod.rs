//! One-call translation pipeline
//!
//! The driver runs the whole front end on one compilation unit:
//! 1. Lexing source text into tokens
//! 2. Parsing, which evaluates every semantic action on the way
//! 3. Collecting the root node and the diagnostics
//!
//! A fresh [`Context`] is created for every call, so translations never
//! share state.

pub mod graph;

use crate::common::{Config, Diagnostic};
use crate::lexer::{Lexer, Token};
use crate::node::Node;
use crate::parser::Parser;
use crate::sema::Context;

pub use graph::write_graph;

/// Outcome of translating one compilation unit
#[derive(Debug)]
pub struct Translation {
    /// Root of the node graph; `None` after a fatal lexical or syntax error
    pub root: Option<Node>,
    /// Every diagnostic in the order it was reported
    pub diagnostics: Vec<Diagnostic>,
}

impl Translation {
    fn failed(diagnostics: Vec<Diagnostic>) -> Self {
        Self { root: None, diagnostics }
    }

    /// Whether translation finished without any diagnostic
    pub fn is_success(&self) -> bool {
        self.root.is_some() && self.diagnostics.is_empty()
    }
}

/// Translate source text
pub fn translate(source: &str, config: &Config) -> Translation {
    match Lexer::new(source).tokenize_all() {
        Ok(tokens) => translate_tokens(tokens, config),
        Err(err) => {
            log::info!("lexing failed: {}", err);
            Translation::failed(vec![err.to_diagnostic()])
        }
    }
}

/// Translate a token stream produced by any lexical supplier
pub fn translate_tokens(tokens: Vec<Token>, config: &Config) -> Translation {
    log::info!("translating {} tokens", tokens.len());

    let mut parser = Parser::new(tokens, Context::new(config));
    let result = parser.parse_source_file();
    let mut diagnostics = parser.into_context().finish().into_vec();

    match result {
        Ok(root) => {
            log::info!(
                "translation produced {} nodes and {} diagnostics",
                root.count(),
                diagnostics.len()
            );
            Translation { root: Some(root), diagnostics }
        }
        Err(err) => {
            log::info!("parsing stopped: {}", err);
            diagnostics.push(err.to_diagnostic());
            Translation::failed(diagnostics)
        }
    }
}
