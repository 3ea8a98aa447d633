//! Categorized, line-tagged compiler messages
//!
//! The collector is append-only: entries are never reordered, merged or
//! dropped. Whether to stop early or print everything at the end is left to
//! the caller.

use std::fmt;

/// Category of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Use of an identifier with no visible binding
    NameError,
    /// Operand or assignment types disagree, or a kind is not valid for an operator
    TypeMismatch,
    /// Malformed use of a type: unknown type name, bad index, bad selector
    TypeError,
    /// Name already bound in the same scope, or repeated struct field
    RedeclareError,
    /// Invalid array bound
    SizeError,
    /// Left and right hand sides have different lengths
    AssignmentMismatch,
    /// Assignment to a constant
    ConstantAssignment,
    /// `break` or `continue` outside a loop
    ControlError,
    /// Character the lexer does not recognize
    LexicalError,
    /// Unexpected token
    ParsingError,
}

impl DiagnosticKind {
    /// Fatal diagnostics end the run; everything else is accumulated
    pub fn is_fatal(&self) -> bool {
        matches!(self, DiagnosticKind::ParsingError | DiagnosticKind::LexicalError)
    }

    pub fn label(&self) -> &'static str {
        match self {
            DiagnosticKind::NameError => "NameError",
            DiagnosticKind::TypeMismatch => "TypeMismatch",
            DiagnosticKind::TypeError => "TypeError",
            DiagnosticKind::RedeclareError => "RedeclareError",
            DiagnosticKind::SizeError => "SizeError",
            DiagnosticKind::AssignmentMismatch => "AssignmentMismatch",
            DiagnosticKind::ConstantAssignment => "ConstantAssignment",
            DiagnosticKind::ControlError => "ControlError",
            DiagnosticKind::LexicalError => "LexicalError",
            DiagnosticKind::ParsingError => "ParsingError",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single message. `line` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub line: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, line: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at line {}: {}", self.kind, self.line, self.message)
    }
}

/// Ordered collection of diagnostics for one compilation
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: DiagnosticKind, line: usize, message: impl Into<String>) {
        let diagnostic = Diagnostic::new(kind, line, message);
        log::debug!("{}", diagnostic);
        self.entries.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Number of entries of the given kind
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    pub fn has_fatal(&self) -> bool {
        self.entries.iter().any(|d| d.kind.is_fatal())
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_entries_keep_insertion_order() {
        let mut diags = Diagnostics::new();
        diags.push(DiagnosticKind::TypeMismatch, 3, "first");
        diags.push(DiagnosticKind::NameError, 1, "second");
        diags.push(DiagnosticKind::TypeMismatch, 3, "first");

        let messages: Vec<_> = diags.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "first"]);
        assert_eq!(diags.count(DiagnosticKind::TypeMismatch), 2);
        assert!(!diags.has_fatal());
    }

    #[test]
    fn test_display_carries_category_and_line() {
        let diag = Diagnostic::new(DiagnosticKind::SizeError, 7, "array bound must be non-negative");
        assert_eq!(
            diag.to_string(),
            "SizeError at line 7: array bound must be non-negative"
        );
    }

    #[test]
    fn test_only_syntactic_kinds_are_fatal() {
        assert!(DiagnosticKind::ParsingError.is_fatal());
        assert!(DiagnosticKind::LexicalError.is_fatal());
        assert!(!DiagnosticKind::RedeclareError.is_fatal());
        assert!(!DiagnosticKind::ConstantAssignment.is_fatal());
    }
}
