pub mod lexer;
mod parser;
mod program;
mod statement;
pub mod token;

use std::path::Path;

use crate::error::BlError;
use crate::ir::ast;

pub use parser::MAX_NESTING;
use parser::Parser;
use token::TokenStream;

/// Main entry point: BL source text to a `Program`.
pub fn parse(source: &str) -> Result<ast::Program, BlError> {
    let mut tokens = lexer::tokenize(source);
    parse_program(&mut tokens)
}

pub fn parse_file(path: impl AsRef<Path>) -> Result<ast::Program, BlError> {
    let source = std::fs::read_to_string(path)?;
    parse(&source)
}

/// Parses a whole program. On success every token, including the
/// end-of-input sentinel, has been consumed.
pub fn parse_program(tokens: &mut TokenStream) -> Result<ast::Program, BlError> {
    Parser::new(tokens).parse_program()
}

/// Parses one statement from the front of `tokens`.
pub fn parse_statement(tokens: &mut TokenStream) -> Result<ast::Statement, BlError> {
    Parser::new(tokens).parse_statement()
}

/// Parses a (possibly empty) block from the front of `tokens`. The token
/// that ended the block is left in the stream.
pub fn parse_block(tokens: &mut TokenStream) -> Result<ast::Statement, BlError> {
    Parser::new(tokens).parse_block()
}

/// Parses source text that holds nothing but a sequence of statements.
pub fn parse_statements(source: &str) -> Result<ast::Statement, BlError> {
    let mut tokens = lexer::tokenize(source);
    let mut parser = Parser::new(&mut tokens);
    let block = parser.parse_block()?;
    parser.expect_end_of_input()?;
    Ok(block)
}
