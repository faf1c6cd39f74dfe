//! Canonical BL surface syntax for statements and programs.
//!
//! Output of the printer re-tokenizes and re-parses into a structurally
//! equal tree, whatever indent width is chosen.

use std::fmt::{self, Write};

use super::ast::{Program, Statement};

pub const DEFAULT_INDENT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Printer {
    indent: usize,
}

impl Default for Printer {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
        }
    }
}

impl Printer {
    pub fn new(indent: usize) -> Self {
        Self { indent }
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    /// Displays `statement` with every line indented by at least `offset`.
    pub fn statement<'a>(&self, statement: &'a Statement, offset: usize) -> PrettyStatement<'a> {
        PrettyStatement {
            printer: *self,
            statement,
            offset,
        }
    }

    pub fn program<'a>(&self, program: &'a Program) -> PrettyProgram<'a> {
        PrettyProgram {
            printer: *self,
            program,
        }
    }

    pub fn write_statement<W: Write>(
        &self,
        out: &mut W,
        statement: &Statement,
        offset: usize,
    ) -> fmt::Result {
        let inner = offset + self.indent;
        match statement {
            Statement::Block(children) => self.write_block(out, children, offset),
            Statement::If {
                condition,
                then_block,
            } => {
                writeln!(out, "{:offset$}IF {} THEN", "", condition)?;
                self.write_block(out, then_block, inner)?;
                writeln!(out, "{:offset$}END IF", "")
            }
            Statement::IfElse {
                condition,
                then_block,
                else_block,
            } => {
                writeln!(out, "{:offset$}IF {} THEN", "", condition)?;
                self.write_block(out, then_block, inner)?;
                writeln!(out, "{:offset$}ELSE", "")?;
                self.write_block(out, else_block, inner)?;
                writeln!(out, "{:offset$}END IF", "")
            }
            Statement::While { condition, body } => {
                writeln!(out, "{:offset$}WHILE {} DO", "", condition)?;
                self.write_block(out, body, inner)?;
                writeln!(out, "{:offset$}END WHILE", "")
            }
            Statement::Call { instruction } => writeln!(out, "{:offset$}{}", "", instruction),
        }
    }

    fn write_block<W: Write>(&self, out: &mut W, children: &[Statement], offset: usize) -> fmt::Result {
        for child in children {
            self.write_statement(out, child, offset)?;
        }
        Ok(())
    }

    pub fn write_program<W: Write>(&self, out: &mut W, program: &Program) -> fmt::Result {
        let indent = self.indent;
        writeln!(out, "PROGRAM {} IS", program.name())?;
        writeln!(out)?;
        for (name, body) in program.context() {
            writeln!(out, "{:indent$}INSTRUCTION {} IS", "", name)?;
            self.write_statement(out, body, indent * 2)?;
            writeln!(out, "{:indent$}END {}", "", name)?;
            writeln!(out)?;
        }
        writeln!(out, "BEGIN")?;
        self.write_statement(out, program.body(), indent)?;
        writeln!(out, "END {}", program.name())
    }
}

pub struct PrettyStatement<'a> {
    printer: Printer,
    statement: &'a Statement,
    offset: usize,
}

impl fmt::Display for PrettyStatement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.printer.write_statement(f, self.statement, self.offset)
    }
}

pub struct PrettyProgram<'a> {
    printer: Printer,
    program: &'a Program,
}

impl fmt::Display for PrettyProgram<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.printer.write_program(f, self.program)
    }
}

impl Statement {
    pub fn pretty_print(&self, offset: usize) -> String {
        Printer::default().statement(self, offset).to_string()
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Printer::default().write_statement(f, self, 0)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Printer::default().write_program(f, self)
    }
}
