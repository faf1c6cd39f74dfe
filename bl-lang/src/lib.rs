//! Parser and syntax tree for BL, the Block Language used to script simple
//! agents (`move`, `turnleft`, `infect`, ...) with IF, WHILE and user-defined
//! instructions.
//!
//! ```
//! let program = bl_lang::parse("PROGRAM Test IS BEGIN move END Test").unwrap();
//! assert_eq!(program.name(), "Test");
//! assert_eq!(bl_lang::parse(&program.to_string()).unwrap(), program);
//! ```

pub mod error;
pub mod ir;
pub mod parser;
pub mod span;

pub use error::BlError;
pub use ir::ast::{Condition, Context, Kind, Program, Statement};
pub use ir::pretty::Printer;
pub use parser::token::{END_OF_INPUT, TokenStream};
pub use parser::{
    MAX_NESTING, parse, parse_block, parse_file, parse_program, parse_statement, parse_statements,
};
