use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::BlError;
use crate::parser::token::{is_identifier, is_primitive};

/// User-defined instructions of a program, by name.
pub type Context = BTreeMap<String, Statement>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Block,
    If,
    IfElse,
    While,
    Call,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Statements executed in order
    Block(Vec<Statement>),
    /// IF next-is-wall THEN ... END IF
    If {
        condition: Condition,
        then_block: Vec<Statement>,
    },
    /// IF random THEN ... ELSE ... END IF
    IfElse {
        condition: Condition,
        then_block: Vec<Statement>,
        else_block: Vec<Statement>,
    },
    /// WHILE true DO ... END WHILE
    While {
        condition: Condition,
        body: Vec<Statement>,
    },
    /// move, turnleft, or any user instruction
    Call { instruction: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    NextIsEmpty,
    NextIsNotEmpty,
    NextIsWall,
    NextIsNotWall,
    NextIsFriend,
    NextIsNotFriend,
    NextIsEnemy,
    NextIsNotEnemy,
    Random,
    True,
}

impl Condition {
    pub fn all() -> [Self; 10] {
        [
            Self::NextIsEmpty,
            Self::NextIsNotEmpty,
            Self::NextIsWall,
            Self::NextIsNotWall,
            Self::NextIsFriend,
            Self::NextIsNotFriend,
            Self::NextIsEnemy,
            Self::NextIsNotEnemy,
            Self::Random,
            Self::True,
        ]
    }

    /// Surface form, as written in BL source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NextIsEmpty => "next-is-empty",
            Self::NextIsNotEmpty => "next-is-not-empty",
            Self::NextIsWall => "next-is-wall",
            Self::NextIsNotWall => "next-is-not-wall",
            Self::NextIsFriend => "next-is-friend",
            Self::NextIsNotFriend => "next-is-not-friend",
            Self::NextIsEnemy => "next-is-enemy",
            Self::NextIsNotEnemy => "next-is-not-enemy",
            Self::Random => "random",
            Self::True => "true",
        }
    }
}

impl FromStr for Condition {
    type Err = BlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| BlError::violation(format!("'{}' is a condition string", s)))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for Statement {
    fn default() -> Self {
        Statement::Block(Vec::new())
    }
}

impl Statement {
    pub fn block(children: Vec<Statement>) -> Self {
        Statement::Block(children)
    }

    pub fn call(instruction: impl Into<String>) -> Self {
        Statement::Call {
            instruction: instruction.into(),
        }
    }

    pub fn if_then(condition: Condition, then_block: Vec<Statement>) -> Self {
        Statement::If {
            condition,
            then_block,
        }
    }

    pub fn if_then_else(
        condition: Condition,
        then_block: Vec<Statement>,
        else_block: Vec<Statement>,
    ) -> Self {
        Statement::IfElse {
            condition,
            then_block,
            else_block,
        }
    }

    pub fn while_do(condition: Condition, body: Vec<Statement>) -> Self {
        Statement::While { condition, body }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Statement::Block(_) => Kind::Block,
            Statement::If { .. } => Kind::If,
            Statement::IfElse { .. } => Kind::IfElse,
            Statement::While { .. } => Kind::While,
            Statement::Call { .. } => Kind::Call,
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Statement::Block(_))
    }

    /// Whether a `Block` appears anywhere beneath this statement. Such a tree
    /// prints the same as its flattened form, so the kernel never stores one.
    pub fn has_nested_block(&self) -> bool {
        let (first, second): (&[Statement], &[Statement]) = match self {
            Statement::Block(children)
            | Statement::If {
                then_block: children,
                ..
            }
            | Statement::While { body: children, .. } => (children.as_slice(), &[][..]),
            Statement::IfElse {
                then_block,
                else_block,
                ..
            } => (then_block.as_slice(), else_block.as_slice()),
            Statement::Call { .. } => (&[][..], &[][..]),
        };
        first
            .iter()
            .chain(second)
            .any(|s| s.is_block() || s.has_nested_block())
    }

    // Block kernel

    pub fn length_of_block(&self) -> Result<usize, BlError> {
        Ok(self.children()?.len())
    }

    pub fn add_to_block(&mut self, pos: usize, statement: Statement) -> Result<(), BlError> {
        if statement.is_block() {
            return Err(BlError::violation("[s is not a BLOCK statement]"));
        }
        if statement.has_nested_block() {
            return Err(BlError::violation("[s contains no nested BLOCK statement]"));
        }
        let children = self.children_mut()?;
        if pos > children.len() {
            return Err(BlError::violation(format!(
                "0 <= pos <= |this| (pos = {}, |this| = {})",
                pos,
                children.len()
            )));
        }
        children.insert(pos, statement);
        Ok(())
    }

    pub fn remove_from_block(&mut self, pos: usize) -> Result<Statement, BlError> {
        let children = self.children_mut()?;
        if pos >= children.len() {
            return Err(BlError::violation(format!(
                "0 <= pos < |this| (pos = {}, |this| = {})",
                pos,
                children.len()
            )));
        }
        Ok(children.remove(pos))
    }

    fn children(&self) -> Result<&Vec<Statement>, BlError> {
        match self {
            Statement::Block(children) => Ok(children),
            other => Err(not_kind(Kind::Block, other)),
        }
    }

    fn children_mut(&mut self) -> Result<&mut Vec<Statement>, BlError> {
        match self {
            Statement::Block(children) => Ok(children),
            other => Err(not_kind(Kind::Block, other)),
        }
    }

    // Assembly consumes the parts; disassembly consumes the parent.

    pub fn assemble_if(condition: Condition, block: Statement) -> Result<Self, BlError> {
        Ok(Statement::if_then(condition, into_children(block)?))
    }

    pub fn disassemble_if(self) -> Result<(Condition, Statement), BlError> {
        match self {
            Statement::If {
                condition,
                then_block,
            } => Ok((condition, Statement::Block(then_block))),
            other => Err(not_kind(Kind::If, &other)),
        }
    }

    pub fn assemble_if_else(
        condition: Condition,
        then_block: Statement,
        else_block: Statement,
    ) -> Result<Self, BlError> {
        Ok(Statement::if_then_else(
            condition,
            into_children(then_block)?,
            into_children(else_block)?,
        ))
    }

    pub fn disassemble_if_else(self) -> Result<(Condition, Statement, Statement), BlError> {
        match self {
            Statement::IfElse {
                condition,
                then_block,
                else_block,
            } => Ok((
                condition,
                Statement::Block(then_block),
                Statement::Block(else_block),
            )),
            other => Err(not_kind(Kind::IfElse, &other)),
        }
    }

    pub fn assemble_while(condition: Condition, block: Statement) -> Result<Self, BlError> {
        Ok(Statement::while_do(condition, into_children(block)?))
    }

    pub fn disassemble_while(self) -> Result<(Condition, Statement), BlError> {
        match self {
            Statement::While { condition, body } => Ok((condition, Statement::Block(body))),
            other => Err(not_kind(Kind::While, &other)),
        }
    }

    pub fn assemble_call(instruction: impl Into<String>) -> Result<Self, BlError> {
        let instruction = instruction.into();
        if !is_identifier(&instruction) {
            return Err(BlError::violation(format!(
                "'{}' is a valid IDENTIFIER",
                instruction
            )));
        }
        Ok(Statement::Call { instruction })
    }

    pub fn disassemble_call(self) -> Result<String, BlError> {
        match self {
            Statement::Call { instruction } => Ok(instruction),
            other => Err(not_kind(Kind::Call, &other)),
        }
    }
}

fn into_children(block: Statement) -> Result<Vec<Statement>, BlError> {
    if block.has_nested_block() {
        return Err(BlError::violation("[block contains no nested BLOCK statement]"));
    }
    match block {
        Statement::Block(children) => Ok(children),
        other => Err(not_kind(Kind::Block, &other)),
    }
}

fn not_kind(expected: Kind, found: &Statement) -> BlError {
    BlError::violation(format!(
        "[statement is a {:?}] (found {:?})",
        expected,
        found.kind()
    ))
}

/// A parsed BL program. The body is always a `Block`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    name: String,
    context: Context,
    body: Statement,
}

impl Default for Program {
    fn default() -> Self {
        Self {
            name: "Unnamed".to_string(),
            context: Context::new(),
            body: Statement::default(),
        }
    }
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), BlError> {
        let name = name.into();
        if !is_identifier(&name) {
            return Err(BlError::violation(format!("'{}' is a valid IDENTIFIER", name)));
        }
        self.name = name;
        Ok(())
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn new_context(&self) -> Context {
        Context::new()
    }

    /// Replaces the context, returning the previous one. Nothing changes on
    /// error.
    pub fn swap_context(&mut self, context: Context) -> Result<Context, BlError> {
        for (name, body) in &context {
            if !is_identifier(name) {
                return Err(BlError::violation(format!(
                    "names in c are valid IDENTIFIERs ('{}')",
                    name
                )));
            }
            if is_primitive(name) {
                return Err(BlError::violation(format!(
                    "names in c do not match the names of primitive instructions ('{}')",
                    name
                )));
            }
            if !body.is_block() {
                return Err(BlError::violation(format!(
                    "bodies in c are BLOCK statements ('{}')",
                    name
                )));
            }
            if body.has_nested_block() {
                return Err(BlError::violation(format!(
                    "bodies in c contain no nested BLOCK statement ('{}')",
                    name
                )));
            }
        }
        Ok(std::mem::replace(&mut self.context, context))
    }

    pub fn body(&self) -> &Statement {
        &self.body
    }

    pub fn new_body(&self) -> Statement {
        Statement::default()
    }

    /// Replaces the body, returning the previous one.
    pub fn swap_body(&mut self, body: Statement) -> Result<Statement, BlError> {
        if !body.is_block() {
            return Err(BlError::violation(format!(
                "b is a BLOCK statement (found {:?})",
                body.kind()
            )));
        }
        if body.has_nested_block() {
            return Err(BlError::violation("b contains no nested BLOCK statement"));
        }
        Ok(std::mem::replace(&mut self.body, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_block() -> Statement {
        Statement::block(vec![
            Statement::call("move"),
            Statement::if_then(Condition::NextIsWall, vec![Statement::call("turnleft")]),
            Statement::while_do(Condition::True, vec![Statement::call("infect")]),
        ])
    }

    #[test]
    fn test_default_statement_is_empty_block() {
        let s = Statement::default();
        assert_eq!(s.kind(), Kind::Block);
        assert_eq!(s.length_of_block().unwrap(), 0);
    }

    #[test]
    fn test_condition_from_str() {
        for c in Condition::all() {
            assert_eq!(c.as_str().parse::<Condition>().unwrap(), c);
        }
        assert!("next-is-hole".parse::<Condition>().is_err());
        assert!("NEXT-IS-EMPTY".parse::<Condition>().is_err());
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(sample_block(), sample_block());

        let mut other = sample_block();
        other.remove_from_block(0).unwrap();
        other.add_to_block(0, Statement::call("skip")).unwrap();
        assert_ne!(sample_block(), other);

        let a = Statement::if_then(Condition::Random, vec![]);
        let b = Statement::if_then(Condition::True, vec![]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_remove_then_add_restores_block() {
        let mut s = sample_block();
        let removed = s.remove_from_block(1).unwrap();
        assert_eq!(removed.kind(), Kind::If);
        assert_eq!(s.length_of_block().unwrap(), 2);

        s.add_to_block(1, removed).unwrap();
        assert_eq!(s, sample_block());
    }

    #[test]
    fn test_add_to_block_at_end() {
        let mut s = sample_block();
        s.add_to_block(3, Statement::call("skip")).unwrap();
        assert_eq!(s.remove_from_block(3).unwrap(), Statement::call("skip"));
    }

    #[test]
    fn test_block_kernel_rejects_misuse() {
        let mut s = sample_block();
        assert!(s.add_to_block(4, Statement::call("move")).is_err());
        assert!(s.add_to_block(0, Statement::default()).is_err());
        assert!(s.remove_from_block(3).is_err());

        let mut call = Statement::call("move");
        assert!(call.length_of_block().is_err());
        assert!(call.remove_from_block(0).is_err());
        assert_eq!(s, sample_block());
    }

    #[test]
    fn test_assemble_disassemble_if() {
        let block = Statement::block(vec![Statement::call("move")]);
        let s = Statement::assemble_if(Condition::NextIsEmpty, block.clone()).unwrap();
        assert_eq!(s.kind(), Kind::If);

        let (condition, then_block) = s.disassemble_if().unwrap();
        assert_eq!(condition, Condition::NextIsEmpty);
        assert_eq!(then_block, block);
    }

    #[test]
    fn test_assemble_disassemble_if_else() {
        let b1 = Statement::block(vec![Statement::call("move")]);
        let b2 = Statement::block(vec![Statement::call("turnright")]);
        let s = Statement::assemble_if_else(Condition::Random, b1.clone(), b2.clone()).unwrap();

        let (condition, then_block, else_block) = s.disassemble_if_else().unwrap();
        assert_eq!(condition, Condition::Random);
        assert_eq!(then_block, b1);
        assert_eq!(else_block, b2);
    }

    #[test]
    fn test_assemble_disassemble_while_and_call() {
        let s = Statement::assemble_while(Condition::NextIsNotEnemy, sample_block()).unwrap();
        let (condition, body) = s.disassemble_while().unwrap();
        assert_eq!(condition, Condition::NextIsNotEnemy);
        assert_eq!(body, sample_block());

        let call = Statement::assemble_call("turn-left").unwrap();
        assert_eq!(call.disassemble_call().unwrap(), "turn-left");
    }

    #[test]
    fn test_assemble_rejects_non_block_and_bad_names() {
        assert!(Statement::assemble_if(Condition::True, Statement::call("move")).is_err());
        assert!(Statement::assemble_while(Condition::True, Statement::call("move")).is_err());
        assert!(Statement::assemble_call("IF").is_err());
        assert!(Statement::assemble_call("bad name").is_err());
    }

    #[test]
    fn test_disassemble_wrong_kind() {
        let err = Statement::call("move").disassemble_while().unwrap_err();
        assert!(matches!(err, BlError::ContractViolation { .. }));
        assert!(sample_block().disassemble_call().is_err());
    }

    #[test]
    fn test_program_defaults() {
        let p = Program::new();
        assert_eq!(p.name(), "Unnamed");
        assert!(p.context().is_empty());
        assert_eq!(p.body(), &Statement::default());
        assert_eq!(p.new_body().length_of_block().unwrap(), 0);
    }

    #[test]
    fn test_program_set_name() {
        let mut p = Program::new();
        p.set_name("A".repeat(100)).unwrap();
        assert_eq!(p.name(), "A".repeat(100));

        assert!(p.set_name("Invalid Name").is_err());
        assert_eq!(p.name(), "A".repeat(100));
    }

    #[test]
    fn test_program_swap_body() {
        let mut p = Program::new();
        let old = p.swap_body(sample_block()).unwrap();
        assert_eq!(old, Statement::default());
        assert_eq!(p.body(), &sample_block());

        let back = p.swap_body(old).unwrap();
        assert_eq!(back, sample_block());
        assert_eq!(p.body(), &Statement::default());
    }

    #[test]
    fn test_program_swap_body_rejects_non_block() {
        let mut p = Program::new();
        p.swap_body(sample_block()).unwrap();
        assert!(p.swap_body(Statement::call("move")).is_err());
        assert_eq!(p.body(), &sample_block());
    }

    #[test]
    fn test_program_swap_context() {
        let mut p = Program::new();
        let mut c = p.new_context();
        c.insert("go".to_string(), Statement::block(vec![Statement::call("move")]));

        let old = p.swap_context(c).unwrap();
        assert!(old.is_empty());
        assert_eq!(p.context().len(), 1);
    }

    #[test]
    fn test_program_swap_context_rejects_bad_entries() {
        let mut p = Program::new();

        let mut primitive = Context::new();
        primitive.insert("move".to_string(), Statement::default());
        assert!(p.swap_context(primitive).is_err());

        let mut invalid = Context::new();
        invalid.insert("invalid identifier".to_string(), Statement::default());
        assert!(p.swap_context(invalid).is_err());

        let mut non_block = Context::new();
        non_block.insert("go".to_string(), Statement::call("move"));
        assert!(p.swap_context(non_block).is_err());

        assert!(p.context().is_empty());
    }

    #[test]
    fn test_has_nested_block() {
        assert!(!sample_block().has_nested_block());
        assert!(!Statement::call("move").has_nested_block());

        let direct = Statement::block(vec![Statement::block(vec![])]);
        assert!(direct.has_nested_block());

        let in_else = Statement::if_then_else(
            Condition::Random,
            vec![Statement::call("move")],
            vec![Statement::while_do(Condition::True, vec![Statement::default()])],
        );
        assert!(in_else.has_nested_block());
    }

    #[test]
    fn test_program_swap_body_rejects_nested_block() {
        let mut p = Program::new();
        p.swap_body(sample_block()).unwrap();

        let nested = Statement::block(vec![Statement::block(vec![Statement::call("move")])]);
        let err = p.swap_body(nested).unwrap_err();
        assert!(matches!(err, BlError::ContractViolation { .. }), "{err}");

        let deep = Statement::block(vec![Statement::if_then(
            Condition::True,
            vec![Statement::block(vec![Statement::call("move")])],
        )]);
        assert!(p.swap_body(deep).is_err());
        assert_eq!(p.body(), &sample_block());
    }

    #[test]
    fn test_program_swap_context_rejects_nested_block() {
        let mut p = Program::new();
        let mut c = Context::new();
        c.insert(
            "go".to_string(),
            Statement::block(vec![Statement::while_do(
                Condition::True,
                vec![Statement::block(vec![])],
            )]),
        );
        assert!(p.swap_context(c).is_err());
        assert!(p.context().is_empty());
    }

    #[test]
    fn test_kernel_rejects_statements_holding_blocks() {
        let holds_block = Statement::if_then(Condition::True, vec![Statement::default()]);

        let mut s = sample_block();
        assert!(s.add_to_block(0, holds_block).is_err());
        assert_eq!(s, sample_block());

        let nested = Statement::block(vec![Statement::default()]);
        assert!(Statement::assemble_while(Condition::True, nested.clone()).is_err());
        assert!(Statement::assemble_if_else(Condition::True, sample_block(), nested).is_err());
    }
}
