use crate::error::BlError;
use crate::ir::ast::{Context, Program, Statement};
use crate::span::Span;

use super::parser::{Parser, describe};
use super::token::is_primitive;

/// Instruction definitions collected while one program is being parsed.
#[derive(Debug, Default)]
struct ContextBuilder {
    context: Context,
}

impl ContextBuilder {
    /// Name syntax and primitive names are checked by `parse_instruction`;
    /// this only guards against redefinition.
    fn define(&mut self, name: String, body: Statement, span: &Span) -> Result<(), BlError> {
        if self.context.contains_key(&name) {
            return Err(BlError::syntax(
                span,
                format!("Duplicate definition of instruction '{}'", name),
            ));
        }
        self.context.insert(name, body);
        Ok(())
    }

    fn finish(self) -> Context {
        self.context
    }
}

impl Parser<'_> {
    pub(super) fn parse_program(&mut self) -> Result<Program, BlError> {
        self.expect("PROGRAM")?;
        let name = self.expect_identifier("a program name after 'PROGRAM'")?;
        self.expect("IS")?;

        let mut context = ContextBuilder::default();
        while !self.at("BEGIN") {
            if !self.at("INSTRUCTION") {
                let message = match self.peek() {
                    Some(token) => {
                        format!("Expected 'INSTRUCTION' or 'BEGIN', found {}", describe(token))
                    }
                    None => "Expected 'INSTRUCTION' or 'BEGIN', but the token stream is exhausted"
                        .to_string(),
                };
                return Err(self.error_at_peek(message));
            }
            let (instruction, span, body) = self.parse_instruction()?;
            context.define(instruction, body, &span)?;
        }

        self.expect("BEGIN")?;
        let body = self.parse_block()?;
        self.expect("END")?;

        let closing = self.expect_identifier("the program name after 'END'")?;
        if closing.text != name.text {
            return Err(BlError::syntax(
                &closing.span,
                format!(
                    "Program name mismatch: expected '{}', found '{}'",
                    name.text, closing.text
                ),
            ));
        }
        self.expect_end_of_input()?;

        let context = context.finish();
        tracing::debug!(program = %name.text, instructions = context.len(), "parsed program");

        let mut program = Program::new();
        program.set_name(name.text)?;
        program.swap_context(context)?;
        program.swap_body(body)?;
        Ok(program)
    }

    /// Returns the instruction's name, where the name was written, and its
    /// body.
    fn parse_instruction(&mut self) -> Result<(String, Span, Statement), BlError> {
        self.expect("INSTRUCTION")?;
        let name = self.expect_identifier("an instruction name after 'INSTRUCTION'")?;
        if is_primitive(&name.text) {
            return Err(BlError::syntax(
                &name.span,
                format!(
                    "'{}' is a primitive instruction and cannot be redefined",
                    name.text
                ),
            ));
        }
        self.expect("IS")?;

        let body = self.parse_block()?;

        self.expect("END")?;
        let closing = self.expect_identifier("the instruction name after 'END'")?;
        if closing.text != name.text {
            return Err(BlError::syntax(
                &closing.span,
                format!(
                    "Instruction name mismatch: expected '{}', found '{}'",
                    name.text, closing.text
                ),
            ));
        }

        let statements = body.length_of_block()?;
        tracing::debug!(instruction = %name.text, statements, "parsed instruction");
        Ok((name.text, name.span, body))
    }
}
