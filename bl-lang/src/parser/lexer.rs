use crate::span::Span;

use super::token::{END_OF_INPUT, Token, TokenStream};

/// Splits BL source into words and appends the end-of-input sentinel.
///
/// A word is a maximal run of ASCII letters, digits and hyphens. Any other
/// non-whitespace character becomes a one-character token of its own, which
/// the parser will then reject. Classification is left to the parser.
pub fn tokenize(source: &str) -> TokenStream {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();
    let mut line = 1;
    let mut column = 1;

    while let Some(&ch) = chars.peek() {
        match ch {
            '\n' => {
                chars.next();
                line += 1;
                column = 1;
            }
            c if c.is_whitespace() => {
                chars.next();
                column += 1;
            }
            c if is_word_char(c) => {
                let span = Span::new(line, column);
                let word = read_word(&mut chars);
                column += word.chars().count();
                tokens.push(Token::new(word, span));
            }
            _ => {
                chars.next();
                tokens.push(Token::new(ch.to_string(), Span::new(line, column)));
                column += 1;
            }
        }
    }

    tokens.push(Token::new(END_OF_INPUT, Span::new(line, column)));
    tokens.into_iter().collect()
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

fn read_word<I: Iterator<Item = char>>(chars: &mut std::iter::Peekable<I>) -> String {
    let mut word = String::new();

    while let Some(&ch) = chars.peek() {
        if !is_word_char(ch) {
            break;
        }
        word.push(ch);
        chars.next();
    }

    word
}
