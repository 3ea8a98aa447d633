//! Recursive descent parser driving the semantic actions
//!
//! Every production function first parses all of its children and only
//! then calls the matching action on [`Context`], so attributes are
//! evaluated in the same post-order an LR parser would reduce in. Scope
//! entry and exit happen at the points where the grammar opens and closes
//! blocks. The first syntax error ends the parse.

mod decl;
mod expr;
mod stmt;
mod types;

use std::mem;

use crate::common::{CompileError, CompileResult, Span};
use crate::lexer::{Token, TokenKind};
use crate::node::Node;
use crate::sema::Context;

/// Deepest nesting of expressions, types and blocks the parser accepts
pub const MAX_NESTING: usize = 64;

/// Parser over a complete token stream
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    ctx: Context,
}

impl Parser {
    /// The stream is terminated with `Eof` if it is not already
    pub fn new(mut tokens: Vec<Token>, ctx: Context) -> Self {
        if !matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof) {
            let line = tokens.last().map_or(1, |t| t.line);
            let end = tokens.last().map_or(0, |t| t.span.end);
            tokens.push(Token::new(TokenKind::Eof, Span::new(end, end), line));
        }
        Self {
            tokens,
            pos: 0,
            depth: 0,
            ctx,
        }
    }

    pub fn into_context(self) -> Context {
        self.ctx
    }

    /// Parse a whole compilation unit and return its root node
    pub fn parse_source_file(&mut self) -> CompileResult<Node> {
        let package = self.package_clause()?;
        self.expect_semi()?;

        let mut imports = Vec::new();
        while self.check(&TokenKind::Import) {
            imports.push(self.import_decl()?);
            self.expect_semi()?;
        }

        let mut decls = Vec::new();
        while !self.check(&TokenKind::Eof) {
            decls.push(self.top_level_decl()?);
            self.expect_semi()?;
        }

        let line = self.line();
        Ok(self.ctx.source_file(line, package, imports, decls))
    }

    // ==================== Helpers ====================

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &TokenKind {
        &self.current().kind
    }

    /// Kind of the token `n` positions ahead
    fn peek_at(&self, n: usize) -> &TokenKind {
        let index = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[index].kind
    }

    /// Line of the last consumed token, the line a reduction happens on
    fn line(&self) -> usize {
        match self.pos {
            0 => self.current().line,
            pos => self.tokens[pos - 1].line,
        }
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn check(&self, expected: &TokenKind) -> bool {
        mem::discriminant(self.peek()) == mem::discriminant(expected)
    }

    fn match_token(&mut self, expected: &TokenKind) -> bool {
        if self.check(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Run `parse` one level deeper, failing once [`MAX_NESTING`] is reached
    fn nested<T>(
        &mut self,
        what: &str,
        parse: impl FnOnce(&mut Self) -> CompileResult<T>,
    ) -> CompileResult<T> {
        if self.depth >= MAX_NESTING {
            return Err(CompileError::parser(
                format!("{} nested too deeply", what),
                self.current().line,
            ));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn unexpected<T>(&self, expected: &str) -> CompileResult<T> {
        let token = self.current();
        Err(CompileError::parser(
            format!("unexpected {}, expected {}", token.kind, expected),
            token.line,
        ))
    }

    fn expect(&mut self, expected: TokenKind) -> CompileResult<Token> {
        if self.check(&expected) {
            Ok(self.advance())
        } else {
            self.unexpected(&expected.to_string())
        }
    }

    fn expect_identifier(&mut self) -> CompileResult<String> {
        match self.peek() {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => self.unexpected("identifier"),
        }
    }

    /// Statement terminator; may be omitted before a closing `)` or `}`
    fn expect_semi(&mut self) -> CompileResult<()> {
        match self.peek() {
            TokenKind::Semi => {
                self.advance();
                Ok(())
            }
            TokenKind::RParen | TokenKind::RBrace | TokenKind::Eof => Ok(()),
            _ => self.unexpected("';' or newline"),
        }
    }

    /// Whether the tokens ahead read `IDENT {, IDENT} :=`
    fn at_short_var_decl(&self) -> bool {
        let mut n = 0;
        loop {
            if !matches!(self.peek_at(n), TokenKind::Identifier(_)) {
                return false;
            }
            match self.peek_at(n + 1) {
                TokenKind::ColonEq => return true,
                TokenKind::Comma => n += 2,
                _ => return false,
            }
        }
    }

    /// Tokens of an `if` or `for` header, up to the `{` opening the body
    fn header_tokens(&self) -> impl Iterator<Item = &TokenKind> {
        let mut depth = 0usize;
        self.tokens[self.pos..]
            .iter()
            .map(|t| &t.kind)
            .take_while(move |kind| {
                match kind {
                    TokenKind::LParen | TokenKind::LBracket => depth += 1,
                    TokenKind::RParen | TokenKind::RBracket => depth = depth.saturating_sub(1),
                    TokenKind::LBrace if depth == 0 => return false,
                    TokenKind::Eof => return false,
                    _ => {}
                }
                true
            })
    }

    /// Whether the header holds an init statement or a for clause
    fn header_has_semi(&self) -> bool {
        self.header_tokens().any(|kind| *kind == TokenKind::Semi)
    }

    fn header_has_range(&self) -> bool {
        self.header_tokens().any(|kind| *kind == TokenKind::Range)
    }
}
