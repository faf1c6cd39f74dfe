use thiserror::Error;

use crate::span::Span;

#[derive(Error, Debug)]
pub enum BlError {
    #[error("Syntax error at line {line}, column {column}: {message}")]
    SyntaxError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Misuse of a kernel operation on `Statement` or `Program`.
    #[error("Violation of: {message}")]
    ContractViolation { message: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl BlError {
    pub fn syntax(span: &Span, message: impl Into<String>) -> Self {
        BlError::SyntaxError {
            line: span.line,
            column: span.column,
            message: message.into(),
        }
    }

    pub fn violation(message: impl Into<String>) -> Self {
        BlError::ContractViolation {
            message: message.into(),
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, BlError::SyntaxError { .. })
    }
}
