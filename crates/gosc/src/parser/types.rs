//! Type productions

use crate::common::{CompileError, CompileResult};
use crate::lexer::TokenKind;
use crate::node::Node;
use crate::sema::parse_int;
use crate::types::Primitive;

use super::Parser;

/// Built-in type named by a keyword token
pub(super) fn primitive_kind(kind: &TokenKind) -> Option<Primitive> {
    match kind {
        TokenKind::IntType => Some(Primitive::Int),
        TokenKind::FloatType => Some(Primitive::Float),
        TokenKind::StringType => Some(Primitive::String),
        TokenKind::BoolType => Some(Primitive::Bool),
        _ => None,
    }
}

impl Parser {
    /// Whether the next token can begin a type
    pub(super) fn starts_type(&self) -> bool {
        self.peek().is_primitive_type()
            || matches!(
                self.peek(),
                TokenKind::Identifier(_)
                    | TokenKind::LBracket
                    | TokenKind::Struct
                    | TokenKind::Star
                    | TokenKind::LParen
            )
    }

    pub(super) fn parse_type(&mut self) -> CompileResult<Node> {
        self.nested("type", Self::type_inner)
    }

    fn type_inner(&mut self) -> CompileResult<Node> {
        if let Some(kind) = primitive_kind(self.peek()) {
            self.advance();
            let line = self.line();
            return Ok(self.ctx.primitive_type(line, kind));
        }

        match self.peek() {
            TokenKind::Identifier(_) => {
                let name = self.expect_identifier()?;
                let line = self.line();
                Ok(self.ctx.type_name(line, &name))
            }
            TokenKind::LParen => {
                self.advance();
                let ty = self.parse_type()?;
                self.expect(TokenKind::RParen)?;
                Ok(ty)
            }
            TokenKind::LBracket => self.parse_array_type(),
            TokenKind::Struct => self.parse_struct_type(),
            TokenKind::Star => {
                self.advance();
                let base = self.parse_type()?;
                let line = self.line();
                Ok(self.ctx.pointer_type(line, base))
            }
            _ => self.unexpected("type"),
        }
    }

    /// `[N]T`, `[-N]T` or `[]T`
    fn parse_array_type(&mut self) -> CompileResult<Node> {
        self.expect(TokenKind::LBracket)?;

        let bound = if self.match_token(&TokenKind::RBracket) {
            None
        } else {
            let negative = self.match_token(&TokenKind::Minus);
            let token = self.advance();
            let TokenKind::IntLiteral(text) = &token.kind else {
                return Err(CompileError::parser(
                    format!("unexpected {}, expected array bound", token.kind),
                    token.line,
                ));
            };
            let value = parse_int(text).ok_or_else(|| {
                CompileError::parser(format!("array bound {} is too large", text), token.line)
            })?;
            self.expect(TokenKind::RBracket)?;
            Some(if negative { -value } else { value })
        };

        let element = self.parse_type()?;
        let line = self.line();
        Ok(self.ctx.array_type(line, bound, element))
    }

    /// `struct { a, b T; c U }`
    fn parse_struct_type(&mut self) -> CompileResult<Node> {
        self.expect(TokenKind::Struct)?;
        self.expect(TokenKind::LBrace)?;

        let mut fields = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            let names = self.identifier_list()?;
            let ty = self.parse_type()?;
            let line = self.line();
            fields.push(self.ctx.field_decl(line, names, ty));
            self.expect_semi()?;
        }
        self.expect(TokenKind::RBrace)?;

        let line = self.line();
        Ok(self.ctx.struct_type(line, fields))
    }
}

#[cfg(test)]
mod tests {
    use crate::common::DiagnosticKind;
    use crate::lexer::Lexer;
    use crate::node::Production;
    use crate::parser::Parser;
    use crate::sema::Context;
    use crate::types::Type;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Context {
        let tokens = Lexer::new(source).tokenize_all().unwrap();
        let mut parser = Parser::new(tokens, Context::default());
        parser.parse_source_file().unwrap();
        parser.into_context()
    }

    #[test]
    fn test_array_sizes() {
        let ctx = parse("package p\nvar a [3]int\nvar m [2][4]float\nvar s []string\n");
        assert_eq!(ctx.lookup("a").unwrap().size, 12);
        assert_eq!(ctx.lookup("m").unwrap().size, 64);
        assert_eq!(ctx.lookup("s").unwrap().ty, Some(Type::slice_of(Type::string())));
        assert_eq!(ctx.lookup("s").unwrap().size, 0);
    }

    #[test]
    fn test_negative_bound() {
        let ctx = parse("package p\nvar a [-1]int\n");
        assert_eq!(ctx.diagnostics().count(DiagnosticKind::SizeError), 1);
        assert_eq!(ctx.diagnostics().len(), 1);
        assert_eq!(ctx.lookup("a").unwrap().ty, None);
    }

    #[test]
    fn test_struct_fields_on_separate_lines() {
        let source = "package p\ntype Point struct {\n\tx, y int\n\tlabel string\n\tnext *Point2\n}\n";
        let ctx = parse(source);
        // `Point2` is unknown, so the struct and `Point` are rejected
        assert_eq!(ctx.diagnostics().count(DiagnosticKind::TypeError), 1);
        assert_eq!(ctx.scope().lookup_type("Point"), Some(None));
    }

    #[test]
    fn test_parenthesized_and_pointer_types() {
        let tokens = Lexer::new("package p\nvar p *(int)\n").tokenize_all().unwrap();
        let mut parser = Parser::new(tokens, Context::default());
        let root = parser.parse_source_file().unwrap();
        assert!(root.find(Production::PointerType).is_some());
        let ctx = parser.into_context();
        assert_eq!(ctx.lookup("p").unwrap().ty, Some(Type::pointer_to(Type::int())));
    }
}
