//! Error types and reporting

use crate::ast::Span;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Parse error: the message plus the span of the offending token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// Errors surfaced to callers driving whole programs
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{} parse error(s), first: {}", .0.len(), first_message(.0))]
    Parse(Vec<ParseError>),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

fn first_message(errors: &[ParseError]) -> &str {
    errors.first().map(|e| e.message.as_str()).unwrap_or("")
}

/// Report parse errors with ariadne
pub fn report_parse_errors(filename: &str, source: &str, errors: &[ParseError]) {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    for error in errors {
        let range = error.span.start..error.span.end.max(error.span.start);
        let printed = Report::build(ReportKind::Error, (filename, range.clone()))
            .with_message("Parse error")
            .with_label(
                Label::new((filename, range))
                    .with_message(&error.message)
                    .with_color(Color::Red),
            )
            .finish()
            .eprint((filename, Source::from(source)));
        if printed.is_err() {
            eprintln!("Parse error at {}: {}", error.span, error.message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display_is_message() {
        let err = ParseError::new("no prefix parse function for ) found", Span::new(3, 4));
        assert_eq!(err.to_string(), "no prefix parse function for ) found");
    }

    #[test]
    fn test_parse_errors_summary() {
        let err = Error::Parse(vec![
            ParseError::new("first", Span::new(0, 1)),
            ParseError::new("second", Span::new(2, 3)),
        ]);
        assert_eq!(err.to_string(), "2 parse error(s), first: first");
    }

    #[test]
    fn test_runtime_error_display() {
        let err = Error::Runtime("division by zero".into());
        assert_eq!(err.to_string(), "Runtime error: division by zero");
    }
}
