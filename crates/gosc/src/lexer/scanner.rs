//! Lexer implementation using logos

use super::token::{Token, TokenKind};
use crate::common::{CompileError, CompileResult, Span};
use logos::Logos;

/// Lexer for Go source code
///
/// Newlines are significant only through semicolon insertion: a line break
/// that follows a token which can end a statement yields a `;` token, and
/// so does the end of input. All other line breaks are dropped.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    line: usize,
    /// Whether the last returned token can end a statement
    terminable: bool,
    at_eof: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            line: 1,
            terminable: false,
            at_eof: false,
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> CompileResult<Token> {
        loop {
            if self.at_eof {
                let len = self.inner.source().len();
                return Ok(Token::new(TokenKind::Eof, Span::new(len, len), self.line));
            }

            let Some(result) = self.inner.next() else {
                self.at_eof = true;
                if self.terminable {
                    let len = self.inner.source().len();
                    return Ok(self.emit(TokenKind::Semi, Span::new(len, len), self.line));
                }
                continue;
            };

            let range = self.inner.span();
            let span = Span::new(range.start, range.end);
            let newlines = self.inner.slice().matches('\n').count();

            match result {
                Ok(TokenKind::Newline | TokenKind::BlockComment) if newlines > 0 => {
                    let line = self.line;
                    self.line += newlines;
                    if self.terminable {
                        return Ok(self.emit(TokenKind::Semi, span, line));
                    }
                }
                Ok(TokenKind::BlockComment) => {}
                Ok(kind) => {
                    let line = self.line;
                    // Raw strings may span lines
                    self.line += newlines;
                    return Ok(self.emit(kind, span, line));
                }
                Err(()) => {
                    return Err(CompileError::lexer(
                        format!("unexpected character '{}'", self.inner.slice()),
                        self.line,
                    ));
                }
            }
        }
    }

    fn emit(&mut self, kind: TokenKind, span: Span, line: usize) -> Token {
        self.terminable = kind.ends_statement();
        Token::new(kind, span, line)
    }

    /// Tokenize the entire source and return all tokens
    pub fn tokenize_all(mut self) -> CompileResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    /// Current line, 1-based
    pub fn line(&self) -> usize {
        self.line
    }

    /// Get the source being lexed
    pub fn source(&self) -> &'a str {
        self.inner.source()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize_all()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_keywords() {
        let source = "package import func var const type struct if else for range";
        let mut lexer = Lexer::new(source);

        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Package));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Import));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Func));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Var));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Const));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Type));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Struct));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::If));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Else));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::For));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Range));
    }

    #[test]
    fn test_identifiers_and_type_names() {
        let source = "foo int_ _test bool";
        let mut lexer = Lexer::new(source);

        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "foo"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "int_"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "_test"
        ));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::BoolType));
    }

    #[test]
    fn test_number_literals() {
        let source = "42 0x1F 3.25 1e3 .5";
        let mut lexer = Lexer::new(source);

        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::IntLiteral(s) if s == "42"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::IntLiteral(s) if s == "0x1F"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::FloatLiteral(s) if s == "3.25"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::FloatLiteral(s) if s == "1e3"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::FloatLiteral(s) if s == ".5"
        ));
    }

    #[test]
    fn test_operators() {
        let source = "<<= >>= := & ^ && || ! ++ --";
        let tokens = kinds(source);
        assert_eq!(
            tokens,
            vec![
                TokenKind::LtLtEq,
                TokenKind::GtGtEq,
                TokenKind::ColonEq,
                TokenKind::Amp,
                TokenKind::Caret,
                TokenKind::AmpAmp,
                TokenKind::PipePipe,
                TokenKind::Bang,
                TokenKind::PlusPlus,
                TokenKind::MinusMinus,
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_literals() {
        let source = r#""hello \"world\"" `raw
string`"#;
        let tokens = Lexer::new(source).tokenize_all().unwrap();

        assert!(matches!(
            &tokens[0].kind,
            TokenKind::StringLiteral(s) if s == r#""hello \"world\"""#
        ));
        assert!(matches!(&tokens[1].kind, TokenKind::StringLiteral(s) if s.starts_with('`')));
        // The semicolon after the raw string lands on the line it ends on
        assert_eq!(tokens[2].kind, TokenKind::Semi);
        assert_eq!(tokens[2].line, 2);
    }

    #[test]
    fn test_semicolon_insertion() {
        let source = "x := 1\ny++\nfoo(a,\n  b)\n";
        let tokens = kinds(source);
        assert_eq!(
            tokens,
            vec![
                TokenKind::Identifier("x".into()),
                TokenKind::ColonEq,
                TokenKind::IntLiteral("1".into()),
                TokenKind::Semi,
                TokenKind::Identifier("y".into()),
                TokenKind::PlusPlus,
                TokenKind::Semi,
                TokenKind::Identifier("foo".into()),
                TokenKind::LParen,
                TokenKind::Identifier("a".into()),
                TokenKind::Comma,
                TokenKind::Identifier("b".into()),
                TokenKind::RParen,
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_no_semicolon_after_operator_or_open_brace() {
        let tokens = kinds("func f() {\n\treturn a +\n\t\tb\n}");
        let semis = tokens.iter().filter(|k| **k == TokenKind::Semi).count();
        // after `b` and after the closing brace at end of input
        assert_eq!(semis, 2);
    }

    #[test]
    fn test_comments_and_lines() {
        let source = "var x int // line comment\n/* block\n comment */ y";
        let tokens = Lexer::new(source).tokenize_all().unwrap();

        assert!(matches!(tokens[0].kind, TokenKind::Var));
        assert_eq!(tokens[3].kind, TokenKind::Semi);
        assert_eq!(tokens[3].line, 1);
        assert!(matches!(&tokens[4].kind, TokenKind::Identifier(s) if s == "y"));
        assert_eq!(tokens[4].line, 3);
    }

    #[test]
    fn test_unknown_character_is_a_lexical_error() {
        let err = Lexer::new("x := 1\n@").tokenize_all().unwrap_err();
        match err {
            CompileError::Lexer { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains('@'));
            }
            other => panic!("expected lexer error, got {:?}", other),
        }
    }

    #[test]
    fn test_simple_function() {
        let source = "func main() { return }";
        let tokens = Lexer::new(source).tokenize_all().unwrap();

        assert!(matches!(tokens[0].kind, TokenKind::Func));
        assert!(matches!(&tokens[1].kind, TokenKind::Identifier(s) if s == "main"));
        assert!(matches!(tokens[2].kind, TokenKind::LParen));
        assert!(matches!(tokens[3].kind, TokenKind::RParen));
        assert!(matches!(tokens[4].kind, TokenKind::LBrace));
        assert!(matches!(tokens[5].kind, TokenKind::Return));
        assert!(matches!(tokens[6].kind, TokenKind::RBrace));
        assert!(matches!(tokens[7].kind, TokenKind::Semi));
        assert!(matches!(tokens[8].kind, TokenKind::Eof));
    }
}
