use crate::error::BlError;
use crate::ir::ast::Condition;
use crate::span::Span;

use super::token::{Token, TokenStream, is_condition, is_identifier, is_keyword};

/// Deepest IF/WHILE nesting accepted. Anything deeper is a syntax error
/// rather than a risk of exhausting the stack.
pub const MAX_NESTING: usize = 128;

/// Recursive-descent cursor over a borrowed token stream.
///
/// Every rule consumes tokens straight out of the stream, so the caller can
/// see how far parsing got. On error the stream is left wherever the failing
/// rule stopped and nothing partial is returned.
pub(super) struct Parser<'a> {
    tokens: &'a mut TokenStream,
    last_span: Span,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub(super) fn new(tokens: &'a mut TokenStream) -> Self {
        let last_span = tokens.front().map(|t| t.span).unwrap_or_default();
        Self {
            tokens,
            last_span,
            depth: 0,
        }
    }

    // Token helpers

    pub(super) fn peek(&self) -> Option<&Token> {
        self.tokens.front()
    }

    pub(super) fn at(&self, text: &str) -> bool {
        matches!(self.peek(), Some(token) if token.is(text))
    }

    /// Called before parsing a compound statement; pair with
    /// [`Parser::leave_nested`] once it has been parsed.
    pub(super) fn enter_nested(&mut self) -> Result<(), BlError> {
        if self.depth >= MAX_NESTING {
            return Err(self.error_at_peek(format!(
                "Nesting too deep (limit {} levels of IF/WHILE)",
                MAX_NESTING
            )));
        }
        self.depth += 1;
        Ok(())
    }

    pub(super) fn leave_nested(&mut self) {
        self.depth -= 1;
    }

    pub(super) fn advance(&mut self, expected: &str) -> Result<Token, BlError> {
        match self.tokens.dequeue() {
            Some(token) => {
                self.last_span = token.span;
                Ok(token)
            }
            None => Err(BlError::syntax(
                &self.last_span,
                format!("Expected {}, but the token stream is exhausted", expected),
            )),
        }
    }

    pub(super) fn expect(&mut self, keyword: &str) -> Result<Token, BlError> {
        let token = self.advance(&format!("'{}'", keyword))?;
        if token.is(keyword) {
            Ok(token)
        } else {
            Err(BlError::syntax(
                &token.span,
                format!("Expected '{}', found {}", keyword, describe(&token)),
            ))
        }
    }

    /// `what` names the identifier's role, e.g. "program name".
    pub(super) fn expect_identifier(&mut self, what: &str) -> Result<Token, BlError> {
        let token = self.advance(what)?;
        if is_identifier(&token.text) {
            return Ok(token);
        }
        let message = if token.is_end_of_input() {
            format!("Expected {}, found end of input", what)
        } else if is_keyword(&token.text) {
            format!("Expected {}, found keyword '{}'", what, token.text)
        } else if is_condition(&token.text) {
            format!("Expected {}, found condition '{}'", what, token.text)
        } else {
            format!("Expected {}, found invalid identifier {}", what, describe(&token))
        };
        Err(BlError::syntax(&token.span, message))
    }

    /// `after` is the keyword that introduced the condition.
    pub(super) fn expect_condition(&mut self, after: &str) -> Result<Condition, BlError> {
        let what = format!("a condition after '{}'", after);
        let token = self.advance(&what)?;
        if !is_condition(&token.text) {
            return Err(BlError::syntax(
                &token.span,
                format!("Expected {}, found {}", what, describe(&token)),
            ));
        }
        token
            .text
            .parse()
            .map_err(|_| BlError::syntax(&token.span, format!("Unknown condition '{}'", token.text)))
    }

    pub(super) fn expect_end_of_input(&mut self) -> Result<(), BlError> {
        let token = self.advance("end of input")?;
        if !token.is_end_of_input() {
            return Err(BlError::syntax(
                &token.span,
                format!("Expected end of input, found {}", describe(&token)),
            ));
        }
        if let Some(extra) = self.peek() {
            return Err(BlError::syntax(
                &extra.span,
                format!("Unexpected {} after end of input", describe(extra)),
            ));
        }
        Ok(())
    }

    pub(super) fn error_at_peek(&self, message: impl Into<String>) -> BlError {
        let span = self.peek().map(|t| t.span).unwrap_or(self.last_span);
        BlError::syntax(&span, message)
    }
}

/// Human-readable token for error messages.
pub(super) fn describe(token: &Token) -> String {
    if token.is_end_of_input() {
        "end of input".to_string()
    } else {
        format!("'{}'", token.text)
    }
}
