/*!
Translation-time diagnostics (spec §6): what a caller sees instead of a solve
when a model constraint cannot be expressed under its chosen scope/bitwidth.
Span information is optional since this crate consumes an already-built
[SymbolTable](crate::relational::ast::SymbolTable) rather than source text —
a caller with its own parser can attach real spans; one built directly (as
every test here does) leaves it `None`.
*/

use serde::{Deserialize, Serialize};

use crate::error::TranslationError;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A single point in source text.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub col: usize,
    pub offset: usize,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    pub message: String,
    pub span: Option<Span>,
}

impl Diagnostic {
    /// A translation error collected before any solve was attempted (spec §7:
    /// "surfaced as a diagnostic at the offending span; no SAT run attempted").
    pub fn from_translation_error(error: &TranslationError, span: Option<Span>) -> Self {
        let (code, message) = match error {
            TranslationError::UnknownSignature(name) => ("unknown-signature", format!("no signature named `{name}`")),
            TranslationError::UnknownRelation(name) => ("unknown-relation", format!("no relation named `{name}`")),
            TranslationError::UnboundVariable(name) => ("unbound-variable", format!("`{name}` is not bound here")),
            TranslationError::ArityMismatch { expected, found } => (
                "arity-mismatch",
                format!("expected arity {expected}, found {found}"),
            ),
            TranslationError::IntegerOverflow => ("integer-overflow", "integer overflow is certain at this bit-width".to_string()),
            TranslationError::NoSuchCommand(name) => ("no-such-command", format!("no command named `{name}`")),
            TranslationError::NoCommands => ("no-commands", "no command was declared to run".to_string()),
        };
        Diagnostic {
            severity: Severity::Error,
            code: code.to_string(),
            message,
            span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_mismatch_reports_both_arities_in_its_message() {
        let error = TranslationError::ArityMismatch { expected: 2, found: 1 };
        let diagnostic = Diagnostic::from_translation_error(&error, None);
        assert_eq!(diagnostic.code, "arity-mismatch");
        assert!(diagnostic.message.contains('2') && diagnostic.message.contains('1'));
        assert_eq!(diagnostic.severity, Severity::Error);
    }
}
