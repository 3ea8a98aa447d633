//! Expression productions

use crate::common::CompileResult;
use crate::ir::{BinOp, UnOp};
use crate::lexer::TokenKind;
use crate::node::Node;

use super::Parser;
use super::types::primitive_kind;

fn binary_op(kind: &TokenKind) -> Option<BinOp> {
    Some(match kind {
        TokenKind::PipePipe => BinOp::LogOr,
        TokenKind::AmpAmp => BinOp::LogAnd,
        TokenKind::Pipe => BinOp::Or,
        TokenKind::Caret => BinOp::Xor,
        TokenKind::Amp => BinOp::And,
        TokenKind::EqEq => BinOp::Eq,
        TokenKind::NotEq => BinOp::Ne,
        TokenKind::Lt => BinOp::Lt,
        TokenKind::LtEq => BinOp::Le,
        TokenKind::Gt => BinOp::Gt,
        TokenKind::GtEq => BinOp::Ge,
        TokenKind::LtLt => BinOp::Shl,
        TokenKind::GtGt => BinOp::Shr,
        TokenKind::Plus => BinOp::Add,
        TokenKind::Minus => BinOp::Sub,
        TokenKind::Star => BinOp::Mul,
        TokenKind::Slash => BinOp::Div,
        TokenKind::Percent => BinOp::Rem,
        _ => return None,
    })
}

fn unary_op(kind: &TokenKind) -> Option<UnOp> {
    Some(match kind {
        TokenKind::Plus => UnOp::Plus,
        TokenKind::Minus => UnOp::Neg,
        TokenKind::Bang => UnOp::Not,
        TokenKind::Star => UnOp::Deref,
        TokenKind::Amp => UnOp::AddrOf,
        _ => return None,
    })
}

impl Parser {
    pub(super) fn expression(&mut self) -> CompileResult<Node> {
        self.binary_expr(1)
    }

    /// Precedence climbing over [`TokenKind::binary_precedence`]
    fn binary_expr(&mut self, min_prec: u8) -> CompileResult<Node> {
        let mut lhs = self.unary_expr()?;

        loop {
            let (Some(op), Some(prec)) = (binary_op(self.peek()), self.peek().binary_precedence()) else {
                break;
            };
            if prec < min_prec {
                break;
            }
            self.advance();
            // Left-associative: the right operand only takes tighter operators
            let rhs = self.binary_expr(prec + 1)?;
            let line = self.line();
            lhs = self.ctx.binary(line, op, lhs, rhs);
        }

        Ok(lhs)
    }

    fn unary_expr(&mut self) -> CompileResult<Node> {
        self.nested("expression", |p| match unary_op(p.peek()) {
            Some(op) => {
                p.advance();
                let operand = p.unary_expr()?;
                let line = p.line();
                Ok(p.ctx.unary(line, op, operand))
            }
            None => p.primary_expr(),
        })
    }

    pub(super) fn expression_list(&mut self) -> CompileResult<Node> {
        let mut exprs = vec![self.expression()?];
        while self.match_token(&TokenKind::Comma) {
            exprs.push(self.expression()?);
        }
        let line = self.line();
        Ok(self.ctx.expression_list(line, exprs))
    }

    /// Operand or conversion, followed by selectors, indexes, slices and calls
    fn primary_expr(&mut self) -> CompileResult<Node> {
        let mut expr = self.operand()?;

        loop {
            if self.match_token(&TokenKind::Dot) {
                let field = self.expect_identifier()?;
                let line = self.line();
                expr = self.ctx.selector(line, expr, &field);
            } else if self.match_token(&TokenKind::LBracket) {
                expr = self.index_or_slice(expr)?;
            } else if self.match_token(&TokenKind::LParen) {
                let args = if self.check(&TokenKind::RParen) {
                    None
                } else {
                    let args = self.expression_list()?;
                    self.match_token(&TokenKind::Comma);
                    Some(args)
                };
                self.expect(TokenKind::RParen)?;
                let line = self.line();
                expr = self.ctx.call(line, expr, args);
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// After `[`: `i]`, `lo:hi]`, `:hi]`, `lo:]` or `:]`
    fn index_or_slice(&mut self, base: Node) -> CompileResult<Node> {
        let low = if self.check(&TokenKind::Colon) {
            None
        } else {
            Some(self.expression()?)
        };

        if !self.match_token(&TokenKind::Colon) {
            self.expect(TokenKind::RBracket)?;
            let line = self.line();
            return match low {
                Some(index) => Ok(self.ctx.index(line, base, index)),
                None => self.unexpected("index"),
            };
        }

        let high = if self.check(&TokenKind::RBracket) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect(TokenKind::RBracket)?;
        let line = self.line();
        Ok(self.ctx.slice_expr(line, base, low, high))
    }

    fn operand(&mut self) -> CompileResult<Node> {
        if let Some(kind) = primitive_kind(self.peek()) {
            self.advance();
            let line = self.line();
            let target = self.ctx.primitive_type(line, kind);
            return self.conversion(target);
        }

        let token = self.current().clone();
        match token.kind {
            TokenKind::IntLiteral(text) => {
                self.advance();
                Ok(self.ctx.int_lit(token.line, &text))
            }
            TokenKind::FloatLiteral(text) => {
                self.advance();
                Ok(self.ctx.float_lit(token.line, &text))
            }
            TokenKind::StringLiteral(text) => {
                self.advance();
                Ok(self.ctx.string_lit(token.line, &text))
            }
            TokenKind::True => {
                self.advance();
                Ok(self.ctx.bool_lit(token.line, true))
            }
            TokenKind::False => {
                self.advance();
                Ok(self.ctx.bool_lit(token.line, false))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                let names_type = self.ctx.scope().resolves_to_type(&name);
                if names_type && self.check(&TokenKind::LParen) {
                    let target = self.ctx.type_name(token.line, &name);
                    self.conversion(target)
                } else {
                    Ok(self.ctx.operand_name(token.line, &name))
                }
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            _ => self.unexpected("expression"),
        }
    }

    /// `T(x)` once the target type has been reduced
    fn conversion(&mut self, target: Node) -> CompileResult<Node> {
        self.expect(TokenKind::LParen)?;
        let expr = self.expression()?;
        self.match_token(&TokenKind::Comma);
        self.expect(TokenKind::RParen)?;
        let line = self.line();
        Ok(self.ctx.conversion(line, target, expr))
    }
}
