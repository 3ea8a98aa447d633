//! Error types and diagnostic reporting

use codespan_reporting::diagnostic::{Diagnostic as Report, Label};
use codespan_reporting::files::{Files, SimpleFiles};
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use thiserror::Error;

use super::{Diagnostic, DiagnosticKind};

/// Fatal error that ends a translation run
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Lexer error at line {line}: {message}")]
    Lexer { message: String, line: usize },

    #[error("Parser error at line {line}: {message}")]
    Parser { message: String, line: usize },
}

impl CompileError {
    pub fn lexer(message: impl Into<String>, line: usize) -> Self {
        Self::Lexer {
            message: message.into(),
            line,
        }
    }

    pub fn parser(message: impl Into<String>, line: usize) -> Self {
        Self::Parser {
            message: message.into(),
            line,
        }
    }

    /// The diagnostic recorded for this error
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            CompileError::Lexer { message, line } => {
                Diagnostic::new(DiagnosticKind::LexicalError, *line, message.clone())
            }
            CompileError::Parser { message, line } => {
                Diagnostic::new(DiagnosticKind::ParsingError, *line, message.clone())
            }
        }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(ColorChoice::Auto),
            config: term::Config::default(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    /// Render one diagnostic, underlining the whole source line it refers to
    pub fn report(&self, file_id: usize, diagnostic: &Diagnostic) {
        let range = self
            .files
            .line_range(file_id, diagnostic.line.saturating_sub(1))
            .unwrap_or(0..0);

        let report = Report::error()
            .with_message(diagnostic.kind.label())
            .with_labels(vec![
                Label::primary(file_id, range).with_message(&diagnostic.message)
            ]);

        let _ = term::emit(&mut self.writer.lock(), &self.config, &self.files, &report);
    }

    pub fn report_all<'a>(&self, file_id: usize, diagnostics: impl IntoIterator<Item = &'a Diagnostic>) {
        for diagnostic in diagnostics {
            self.report(file_id, diagnostic);
        }
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}
