//! Declaration productions

use crate::common::CompileResult;
use crate::lexer::TokenKind;
use crate::node::Node;

use super::Parser;

impl Parser {
    pub(super) fn package_clause(&mut self) -> CompileResult<Node> {
        self.expect(TokenKind::Package)?;
        let name = self.expect_identifier()?;
        let line = self.line();
        Ok(self.ctx.package_clause(line, &name))
    }

    pub(super) fn import_decl(&mut self) -> CompileResult<Node> {
        self.expect(TokenKind::Import)?;
        let specs = self.grouped(Self::import_spec)?;
        let line = self.line();
        Ok(self.ctx.import_decl(line, specs))
    }

    fn import_spec(&mut self) -> CompileResult<Node> {
        let alias = match self.peek() {
            TokenKind::Dot => {
                self.advance();
                Some(".".to_string())
            }
            TokenKind::Identifier(_) => Some(self.expect_identifier()?),
            _ => None,
        };

        let TokenKind::StringLiteral(path) = self.peek().clone() else {
            return self.unexpected("import path");
        };
        self.advance();

        let line = self.line();
        Ok(self.ctx.import_spec(line, alias.as_deref(), &path))
    }

    /// A single spec, or a parenthesized group of them
    fn grouped(&mut self, spec: fn(&mut Self) -> CompileResult<Node>) -> CompileResult<Vec<Node>> {
        if !self.match_token(&TokenKind::LParen) {
            return Ok(vec![spec(self)?]);
        }
        let mut specs = Vec::new();
        while !self.check(&TokenKind::RParen) {
            specs.push(spec(self)?);
            self.expect_semi()?;
        }
        self.expect(TokenKind::RParen)?;
        Ok(specs)
    }

    pub(super) fn top_level_decl(&mut self) -> CompileResult<Node> {
        let node = match self.peek() {
            TokenKind::Func => self.function_decl()?,
            TokenKind::Var | TokenKind::Const | TokenKind::Type => self.declaration()?,
            _ => return self.unexpected("declaration"),
        };
        log::trace!("reduced {} at line {}", node.production.name(), node.line);
        Ok(node)
    }

    /// `var`, `const` or `type` declaration, at top level or in a block
    pub(super) fn declaration(&mut self) -> CompileResult<Node> {
        match self.advance().kind {
            TokenKind::Var => {
                let specs = self.grouped(Self::var_spec)?;
                let line = self.line();
                Ok(self.ctx.var_decl(line, specs))
            }
            TokenKind::Const => {
                let specs = self.grouped(Self::const_spec)?;
                let line = self.line();
                Ok(self.ctx.const_decl(line, specs))
            }
            TokenKind::Type => {
                let specs = self.grouped(Self::type_spec)?;
                let line = self.line();
                Ok(self.ctx.type_decl(line, specs))
            }
            _ => self.unexpected("declaration"),
        }
    }

    fn var_spec(&mut self) -> CompileResult<Node> {
        let names = self.identifier_list()?;
        let ty = if self.check(&TokenKind::Eq) {
            None
        } else {
            Some(self.parse_type()?)
        };
        let values = if self.match_token(&TokenKind::Eq) {
            Some(self.expression_list()?)
        } else {
            None
        };
        let line = self.line();
        Ok(self.ctx.var_spec(line, names, ty, values))
    }

    fn const_spec(&mut self) -> CompileResult<Node> {
        let names = self.identifier_list()?;
        let ty = if self.check(&TokenKind::Eq) {
            None
        } else {
            Some(self.parse_type()?)
        };
        self.expect(TokenKind::Eq)?;
        let values = self.expression_list()?;
        let line = self.line();
        Ok(self.ctx.const_spec(line, names, ty, values))
    }

    /// `T U` defines a new type, `T = U` an alias
    fn type_spec(&mut self) -> CompileResult<Node> {
        let name = self.expect_identifier()?;
        let alias = self.match_token(&TokenKind::Eq);
        let ty = self.parse_type()?;
        let line = self.line();
        if alias {
            Ok(self.ctx.alias_decl(line, &name, ty))
        } else {
            Ok(self.ctx.type_def(line, &name, ty))
        }
    }

    pub(super) fn identifier_list(&mut self) -> CompileResult<Node> {
        let mut names = vec![self.expect_identifier()?];
        while self.match_token(&TokenKind::Comma) {
            names.push(self.expect_identifier()?);
        }
        let line = self.line();
        Ok(self.ctx.identifier_list(line, names))
    }

    /// `func name(params) [results] [body]`
    fn function_decl(&mut self) -> CompileResult<Node> {
        self.expect(TokenKind::Func)?;
        let name = self.expect_identifier()?;
        let params = self.parameters()?;

        let results = if self.check(&TokenKind::LParen) {
            Some(self.parameters()?)
        } else if self.starts_type() {
            let ty = self.parse_type()?;
            let line = self.line();
            let decl = self.ctx.parameter_decl(line, None, ty);
            Some(self.ctx.parameters(line, vec![decl]))
        } else {
            None
        };

        let line = self.line();
        let header = self.ctx.function_header(line, &name, params, results);
        // Parameters and the outermost block of the body share one scope
        let body = if self.check(&TokenKind::LBrace) {
            Some(self.block(false)?)
        } else {
            None
        };

        let line = self.line();
        Ok(self.ctx.function_decl(line, header, body))
    }

    /// Whether the parameter list ahead names its parameters
    ///
    /// Go only tells `(a, b int)` from `(int, string)` by the whole list:
    /// it is named as soon as one entry is an identifier followed by a type.
    fn parameters_are_named(&self) -> bool {
        let mut depth = 0usize;
        let mut entry_start = true;
        for n in 0.. {
            let kind = self.peek_at(n);
            match kind {
                TokenKind::Eof => return false,
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen if depth == 0 => return false,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => depth = depth.saturating_sub(1),
                _ => {}
            }
            if entry_start && depth == 0 {
                if let TokenKind::Identifier(_) = kind {
                    let next = self.peek_at(n + 1);
                    if !matches!(next, TokenKind::Comma | TokenKind::RParen | TokenKind::Dot) {
                        return true;
                    }
                }
            }
            entry_start = depth == 0 && *kind == TokenKind::Comma;
        }
        false
    }

    /// `(a, b T, c U)` or `(T, U)`
    fn parameters(&mut self) -> CompileResult<Node> {
        self.expect(TokenKind::LParen)?;
        let named = self.parameters_are_named();

        let mut decls = Vec::new();
        while !self.check(&TokenKind::RParen) {
            let names = if named {
                Some(self.identifier_list()?)
            } else {
                None
            };
            let ty = self.parse_type()?;
            let line = self.line();
            decls.push(self.ctx.parameter_decl(line, names, ty));
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;

        let line = self.line();
        Ok(self.ctx.parameters(line, decls))
    }
}
