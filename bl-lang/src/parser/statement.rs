use crate::error::BlError;
use crate::ir::ast::Statement;

use super::parser::{Parser, describe};
use super::token::is_identifier;

impl Parser<'_> {
    pub(super) fn parse_statement(&mut self) -> Result<Statement, BlError> {
        let statement = if self.at("WHILE") {
            self.enter_nested()?;
            let statement = self.parse_while()?;
            self.leave_nested();
            statement
        } else if self.at("IF") {
            self.enter_nested()?;
            let statement = self.parse_if()?;
            self.leave_nested();
            statement
        } else if matches!(self.peek(), Some(token) if is_identifier(&token.text)) {
            self.parse_call()?
        } else {
            let message = match self.peek() {
                Some(token) => format!(
                    "Expected 'IF', 'WHILE' or an instruction name, found {}",
                    describe(token)
                ),
                None => "Expected a statement, but the token stream is exhausted".to_string(),
            };
            return Err(self.error_at_peek(message));
        };
        tracing::trace!(kind = ?statement.kind(), "parsed statement");
        Ok(statement)
    }

    /// Parses statements up to, but not including, `END`, `ELSE` or the
    /// end of input. The result is always a `Block`, possibly empty.
    pub(super) fn parse_block(&mut self) -> Result<Statement, BlError> {
        let mut children = Vec::new();
        while !self.at_block_end() {
            children.push(self.parse_statement()?);
        }
        Ok(Statement::block(children))
    }

    fn at_block_end(&self) -> bool {
        match self.peek() {
            Some(token) => token.is("END") || token.is("ELSE") || token.is_end_of_input(),
            None => true,
        }
    }

    fn parse_while(&mut self) -> Result<Statement, BlError> {
        self.expect("WHILE")?;
        let condition = self.expect_condition("WHILE")?;
        self.expect("DO")?;

        let body = self.parse_block()?;

        self.expect("END")?;
        self.expect("WHILE")?;
        Statement::assemble_while(condition, body)
    }

    fn parse_if(&mut self) -> Result<Statement, BlError> {
        self.expect("IF")?;
        let condition = self.expect_condition("IF")?;
        self.expect("THEN")?;

        let then_block = self.parse_block()?;

        if self.at("ELSE") {
            self.expect("ELSE")?;
            let else_block = self.parse_block()?;
            self.expect("END")?;
            self.expect("IF")?;
            Statement::assemble_if_else(condition, then_block, else_block)
        } else {
            self.expect("END")?;
            self.expect("IF")?;
            Statement::assemble_if(condition, then_block)
        }
    }

    fn parse_call(&mut self) -> Result<Statement, BlError> {
        let token = self.expect_identifier("an instruction name")?;
        Ok(Statement::call(token.text))
    }
}
