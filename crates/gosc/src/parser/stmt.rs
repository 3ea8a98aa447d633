//! Statement productions

use crate::common::CompileResult;
use crate::ir::{AssignOp, BinOp, IncDec};
use crate::lexer::TokenKind;
use crate::node::Node;
use crate::sema::{LoopHeader, RangeTargets};

use super::Parser;

fn assign_op(kind: &TokenKind) -> Option<AssignOp> {
    let op = match kind {
        TokenKind::Eq => return Some(AssignOp::Assign),
        TokenKind::PlusEq => BinOp::Add,
        TokenKind::MinusEq => BinOp::Sub,
        TokenKind::StarEq => BinOp::Mul,
        TokenKind::SlashEq => BinOp::Div,
        TokenKind::PercentEq => BinOp::Rem,
        TokenKind::AmpEq => BinOp::And,
        TokenKind::PipeEq => BinOp::Or,
        TokenKind::CaretEq => BinOp::Xor,
        TokenKind::LtLtEq => BinOp::Shl,
        TokenKind::GtGtEq => BinOp::Shr,
        _ => return None,
    };
    Some(AssignOp::Compound(op))
}

impl Parser {
    /// `{ statements }`; `scoped` is false only for function bodies
    pub(super) fn block(&mut self, scoped: bool) -> CompileResult<Node> {
        self.nested("block", |p| p.block_inner(scoped))
    }

    fn block_inner(&mut self, scoped: bool) -> CompileResult<Node> {
        self.expect(TokenKind::LBrace)?;
        if scoped {
            self.ctx.enter_scope();
        }

        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.check(&TokenKind::Eof) {
            stmts.push(self.statement()?);
            if !self.check(&TokenKind::RBrace) {
                self.expect(TokenKind::Semi)?;
            }
        }
        let line = self.line();
        let list = self.ctx.statement_list(line, stmts);
        self.expect(TokenKind::RBrace)?;

        if scoped {
            self.ctx.exit_scope();
        }
        let line = self.line();
        Ok(self.ctx.block(line, list))
    }

    fn statement(&mut self) -> CompileResult<Node> {
        let node = match self.peek() {
            TokenKind::Var | TokenKind::Const | TokenKind::Type => self.declaration()?,
            TokenKind::Return => self.return_stmt()?,
            TokenKind::Break => {
                self.advance();
                let line = self.line();
                self.ctx.break_stmt(line)
            }
            TokenKind::Continue => {
                self.advance();
                let line = self.line();
                self.ctx.continue_stmt(line)
            }
            TokenKind::LBrace => self.block(true)?,
            TokenKind::If => self.if_stmt()?,
            TokenKind::For => self.for_stmt()?,
            TokenKind::Semi | TokenKind::RBrace => {
                let line = self.line();
                self.ctx.empty_stmt(line)
            }
            _ => self.simple_stmt()?,
        };
        log::trace!("reduced {} at line {}", node.production.name(), node.line);
        Ok(node)
    }

    /// Expression, `x++`, assignment or short variable declaration
    fn simple_stmt(&mut self) -> CompileResult<Node> {
        if self.at_short_var_decl() {
            let names = self.identifier_list()?;
            self.expect(TokenKind::ColonEq)?;
            let values = self.expression_list()?;
            let line = self.line();
            return Ok(self.ctx.short_var_decl(line, names, values));
        }

        let first = self.expression()?;

        let step = match self.peek() {
            TokenKind::PlusPlus => Some(IncDec::Inc),
            TokenKind::MinusMinus => Some(IncDec::Dec),
            _ => None,
        };
        if let Some(op) = step {
            self.advance();
            let line = self.line();
            return Ok(self.ctx.inc_dec(line, op, first));
        }

        if !self.check(&TokenKind::Comma) && assign_op(self.peek()).is_none() {
            let line = self.line();
            return Ok(self.ctx.expression_stmt(line, first));
        }

        let mut targets = vec![first];
        while self.match_token(&TokenKind::Comma) {
            targets.push(self.expression()?);
        }
        let line = self.line();
        let lhs = self.ctx.expression_list(line, targets);

        let Some(op) = assign_op(self.peek()) else {
            return self.unexpected("assignment operator");
        };
        self.advance();
        let rhs = self.expression_list()?;
        let line = self.line();
        Ok(self.ctx.assignment(line, op, lhs, rhs))
    }

    fn return_stmt(&mut self) -> CompileResult<Node> {
        self.expect(TokenKind::Return)?;
        let values = if self.peek().starts_expression() {
            Some(self.expression_list()?)
        } else {
            None
        };
        let line = self.line();
        Ok(self.ctx.return_stmt(line, values))
    }

    /// `if [init;] cond { } [else ...]`, with its own scope for `init`
    fn if_stmt(&mut self) -> CompileResult<Node> {
        self.expect(TokenKind::If)?;
        self.ctx.enter_scope();

        let init = if self.header_has_semi() {
            let init = if self.check(&TokenKind::Semi) {
                None
            } else {
                Some(self.simple_stmt()?)
            };
            self.expect(TokenKind::Semi)?;
            init
        } else {
            None
        };

        let expr = self.expression()?;
        let line = self.line();
        let cond = self.ctx.condition(line, expr);
        let then = self.block(true)?;

        let els = if self.match_token(&TokenKind::Else) {
            if self.check(&TokenKind::If) {
                Some(self.nested("block", Self::if_stmt)?)
            } else {
                Some(self.block(true)?)
            }
        } else {
            None
        };

        self.ctx.exit_scope();
        let line = self.line();
        Ok(self.ctx.if_stmt(line, init, cond, then, els))
    }

    fn for_stmt(&mut self) -> CompileResult<Node> {
        self.expect(TokenKind::For)?;
        self.ctx.enter_scope();

        let header = if self.check(&TokenKind::LBrace) {
            LoopHeader::Infinite
        } else if self.header_has_range() {
            LoopHeader::Range(self.range_clause()?)
        } else if self.header_has_semi() {
            self.for_clause()?
        } else {
            let expr = self.expression()?;
            let line = self.line();
            LoopHeader::Condition(self.ctx.condition(line, expr))
        };

        self.ctx.enter_loop();
        let body = self.block(true)?;
        self.ctx.exit_loop();
        self.ctx.exit_scope();

        let line = self.line();
        Ok(self.ctx.for_stmt(line, header, body))
    }

    /// `[init]; [cond]; [post]`
    fn for_clause(&mut self) -> CompileResult<LoopHeader> {
        let init = if self.check(&TokenKind::Semi) {
            None
        } else {
            Some(self.simple_stmt()?)
        };
        self.expect(TokenKind::Semi)?;

        let cond = if self.check(&TokenKind::Semi) {
            None
        } else {
            let expr = self.expression()?;
            let line = self.line();
            Some(self.ctx.condition(line, expr))
        };
        self.expect(TokenKind::Semi)?;

        let post = if self.check(&TokenKind::LBrace) {
            None
        } else {
            Some(self.simple_stmt()?)
        };
        Ok(LoopHeader::Clause { init, cond, post })
    }

    /// `[k, v :=] range x` or `a, b = range x`
    fn range_clause(&mut self) -> CompileResult<Node> {
        let targets = if self.check(&TokenKind::Range) {
            RangeTargets::Discard
        } else if self.at_short_var_decl() {
            let names = self.identifier_list()?;
            self.expect(TokenKind::ColonEq)?;
            RangeTargets::Define(names)
        } else {
            let targets = self.expression_list()?;
            self.expect(TokenKind::Eq)?;
            RangeTargets::Assign(targets)
        };

        self.expect(TokenKind::Range)?;
        let expr = self.expression()?;
        let line = self.line();
        Ok(self.ctx.range_clause(line, targets, expr))
    }
}
