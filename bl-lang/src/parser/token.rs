use std::collections::VecDeque;

use crate::span::Span;

/// Reserved sentinel terminating every token stream.
pub const END_OF_INPUT: &str = "### END OF INPUT ###";

pub const KEYWORDS: [&str; 10] = [
    "PROGRAM",
    "IS",
    "BEGIN",
    "END",
    "INSTRUCTION",
    "IF",
    "THEN",
    "ELSE",
    "WHILE",
    "DO",
];

/// Built-in instructions that user code may call but never redefine.
pub const PRIMITIVES: [&str; 5] = ["move", "turnleft", "turnright", "infect", "skip"];

pub const CONDITIONS: [&str; 10] = [
    "next-is-empty",
    "next-is-not-empty",
    "next-is-wall",
    "next-is-not-wall",
    "next-is-friend",
    "next-is-not-friend",
    "next-is-enemy",
    "next-is-not-enemy",
    "random",
    "true",
];

pub fn is_keyword(s: &str) -> bool {
    KEYWORDS.contains(&s)
}

pub fn is_condition(s: &str) -> bool {
    CONDITIONS.contains(&s)
}

pub fn is_primitive(s: &str) -> bool {
    PRIMITIVES.contains(&s)
}

/// `[A-Za-z][A-Za-z0-9-]*`, excluding keywords and condition names.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let starts_with_letter = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic());
    starts_with_letter
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !is_keyword(s)
        && !is_condition(s)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
        }
    }

    pub fn is(&self, text: &str) -> bool {
        self.text == text
    }

    pub fn is_end_of_input(&self) -> bool {
        self.text == END_OF_INPUT
    }
}

/// Front-peekable, front-removable queue of tokens.
///
/// Streams built through [`TokenStream::from_words`] or
/// [`super::lexer::tokenize`] always end with [`END_OF_INPUT`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    tokens: VecDeque<Token>,
}

impl TokenStream {
    /// Builds a stream as if `words` were written on one line separated by
    /// single spaces, then appends the sentinel.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens = VecDeque::new();
        let mut column = 1;
        for word in words {
            let text = word.into();
            let width = text.chars().count();
            tokens.push_back(Token::new(text, Span::new(1, column)));
            column += width + 1;
        }
        tokens.push_back(Token::new(END_OF_INPUT, Span::new(1, column)));
        Self { tokens }
    }

    pub fn front(&self) -> Option<&Token> {
        self.tokens.front()
    }

    pub fn dequeue(&mut self) -> Option<Token> {
        self.tokens.pop_front()
    }

    pub fn enqueue(&mut self, token: Token) {
        self.tokens.push_back(token);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }
}

impl FromIterator<Token> for TokenStream {
    fn from_iter<T: IntoIterator<Item = Token>>(iter: T) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}
