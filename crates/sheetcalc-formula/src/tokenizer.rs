//! Formula tokenizer
//!
//! Splits formula text into a lazy sequence of [`Token`]s. At each position the
//! lexical classes are tried in this order: `(`, `)`, one of `+ - * /`, an
//! identifier, a numeric literal, and a run of whitespace (skipped). Text that
//! matches none of them is reported as a [`LexError`] so the validator can name it.

use std::fmt;
use thiserror::Error;

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// The operator's symbol
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    /// Parse an operator symbol
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Subtract),
            '*' => Some(Operator::Multiply),
            '/' => Some(Operator::Divide),
            _ => None,
        }
    }

    /// `+` or `-`
    pub fn is_additive(self) -> bool {
        matches!(self, Operator::Add | Operator::Subtract)
    }

    /// `*` or `/`
    pub fn is_multiplicative(self) -> bool {
        matches!(self, Operator::Multiply | Operator::Divide)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A lexical token
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Numeric literal
    Number(f64),
    /// Variable name
    Identifier(String),
    /// One of the four arithmetic operators
    Operator(Operator),
    LeftParen,
    RightParen,
}

impl Token {
    /// Tokens that may begin an operand: a number, a variable or `(`
    pub fn starts_operand(&self) -> bool {
        matches!(
            self,
            Token::Number(_) | Token::Identifier(_) | Token::LeftParen
        )
    }

    /// Tokens that may end an operand: a number, a variable or `)`
    pub fn ends_operand(&self) -> bool {
        matches!(
            self,
            Token::Number(_) | Token::Identifier(_) | Token::RightParen
        )
    }
}

/// Tokens serialize to their canonical text: numbers via `f64` formatting,
/// everything else verbatim.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Identifier(name) => write!(f, "{}", name),
            Token::Operator(op) => write!(f, "{}", op),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
        }
    }
}

/// Why a piece of text could not be tokenized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    /// Matches no lexical class
    Unrecognized,
    /// Numeric literal too large for `f64`
    OutOfRange,
}

/// Text that could not be turned into a token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot tokenize {text:?} at offset {offset}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub text: String,
    pub offset: usize,
}

/// Lazy token stream over formula text
///
/// The tokenizer is `Clone`, so a sequence can be restarted from any point.
///
/// # Example
/// ```rust
/// use sheetcalc_formula::tokenizer::{tokenize, Operator, Token};
///
/// let tokens: Vec<Token> = tokenize("x1 + 2.50").collect::<Result<_, _>>().unwrap();
/// assert_eq!(
///     tokens,
///     vec![
///         Token::Identifier("x1".into()),
///         Token::Operator(Operator::Add),
///         Token::Number(2.5),
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

/// Tokenize formula text
pub fn tokenize(input: &str) -> Tokenizer<'_> {
    Tokenizer::new(input)
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer positioned at the start of `input`
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Byte offset of the next unread character
    pub fn offset(&self) -> usize {
        self.pos
    }

    // === Token scanning ===

    fn scan_identifier(&mut self) -> Token {
        let start = self.pos;
        while self
            .peek_char()
            .map_or(false, |c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }
        Token::Identifier(self.input[start..self.pos].to_string())
    }

    fn scan_number(&mut self) -> Result<Token, LexError> {
        let start = self.pos;

        // Integer part
        let mut digits = self.skip_digits();

        // Decimal part
        if self.peek_char() == Some('.')
            && (digits > 0 || self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit()))
        {
            self.advance();
            digits += self.skip_digits();
        }

        // Exponent part, only when digits actually follow
        if digits > 0 && self.peek_char().map_or(false, |c| c == 'e' || c == 'E') {
            let exponent_digits_at = match self.peek_char_at(1) {
                Some('+') | Some('-') => 2,
                _ => 1,
            };
            if self
                .peek_char_at(exponent_digits_at)
                .map_or(false, |c| c.is_ascii_digit())
            {
                for _ in 0..exponent_digits_at {
                    self.advance();
                }
                self.skip_digits();
            }
        }

        let text = &self.input[start..self.pos];
        match text.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Token::Number(n)),
            Ok(_) => Err(self.error(LexErrorKind::OutOfRange, start)),
            Err(_) => Err(self.error(LexErrorKind::Unrecognized, start)),
        }
    }

    fn scan_unrecognized(&mut self) -> LexError {
        let start = self.pos;
        self.advance();
        while !self.is_at_end()
            && !self.peek_char().map_or(false, char::is_whitespace)
            && !self.at_token_start()
        {
            self.advance();
        }
        self.error(LexErrorKind::Unrecognized, start)
    }

    fn at_token_start(&self) -> bool {
        match self.peek_char() {
            Some('(') | Some(')') => true,
            Some(c) if Operator::from_char(c).is_some() => true,
            Some(c) if c.is_ascii_alphabetic() || c == '_' => true,
            Some(_) => self.at_number_start(),
            None => false,
        }
    }

    fn at_number_start(&self) -> bool {
        match self.peek_char() {
            Some(c) if c.is_ascii_digit() => true,
            Some('.') => self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit()),
            _ => false,
        }
    }

    fn error(&self, kind: LexErrorKind, start: usize) -> LexError {
        LexError {
            kind,
            text: self.input[start..self.pos].to_string(),
            offset: start,
        }
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_digits(&mut self) -> usize {
        let mut count = 0;
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
            count += 1;
        }
        count
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, char::is_whitespace) {
            self.advance();
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();

        let c = self.peek_char()?;

        let token = match (c, Operator::from_char(c)) {
            ('(', _) => Token::LeftParen,
            (')', _) => Token::RightParen,
            (_, Some(op)) => Token::Operator(op),
            (c, None) if c.is_ascii_alphabetic() || c == '_' => {
                return Some(Ok(self.scan_identifier()))
            }
            _ if self.at_number_start() => return Some(self.scan_number()),
            _ => return Some(Err(self.scan_unrecognized())),
        };

        self.advance();
        Some(Ok(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(input: &str) -> Vec<Token> {
        tokenize(input)
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_tokenize_operators_and_parens() {
        assert_eq!(
            tokens("(+-*/)"),
            vec![
                Token::LeftParen,
                Token::Operator(Operator::Add),
                Token::Operator(Operator::Subtract),
                Token::Operator(Operator::Multiply),
                Token::Operator(Operator::Divide),
                Token::RightParen,
            ]
        );
        assert_eq!(
            tokens("A1-(-2)"),
            vec![
                Token::Identifier("A1".into()),
                Token::Operator(Operator::Subtract),
                Token::LeftParen,
                Token::Operator(Operator::Subtract),
                Token::Number(2.0),
                Token::RightParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_numbers() {
        assert_eq!(tokens("42"), vec![Token::Number(42.0)]);
        assert_eq!(tokens("3.25"), vec![Token::Number(3.25)]);
        assert_eq!(tokens("5."), vec![Token::Number(5.0)]);
        assert_eq!(tokens(".5"), vec![Token::Number(0.5)]);
        assert_eq!(tokens("1e10"), vec![Token::Number(1e10)]);
        assert_eq!(tokens("7e-5"), vec![Token::Number(7e-5)]);
        assert_eq!(tokens(".0005e+92"), vec![Token::Number(0.0005e92)]);
        assert_eq!(tokens("2E3"), vec![Token::Number(2000.0)]);
    }

    #[test]
    fn test_exponent_needs_digits() {
        // "2e" is a number followed by the identifier "e"
        assert_eq!(
            tokens("2e"),
            vec![Token::Number(2.0), Token::Identifier("e".into())]
        );
        assert_eq!(
            tokens("2e+"),
            vec![
                Token::Number(2.0),
                Token::Identifier("e".into()),
                Token::Operator(Operator::Add),
            ]
        );
    }

    #[test]
    fn test_tokenize_identifiers() {
        assert_eq!(tokens("xy"), vec![Token::Identifier("xy".into())]);
        assert_eq!(
            tokens("x y"),
            vec![Token::Identifier("x".into()), Token::Identifier("y".into())]
        );
        assert_eq!(tokens("_a23_"), vec![Token::Identifier("_a23_".into())]);
        assert_eq!(
            tokens("x 23"),
            vec![Token::Identifier("x".into()), Token::Number(23.0)]
        );
        assert_eq!(
            tokens("5x"),
            vec![Token::Number(5.0), Token::Identifier("x".into())]
        );
    }

    #[test]
    fn test_whitespace_is_never_a_token() {
        assert!(tokens("").is_empty());
        assert!(tokens(" \t\n ").is_empty());
        assert_eq!(
            tokens("  x1  +\t2 "),
            vec![
                Token::Identifier("x1".into()),
                Token::Operator(Operator::Add),
                Token::Number(2.0),
            ]
        );
    }

    #[test]
    fn test_unrecognized_text() {
        let mut lexer = tokenize("1 + $#@ x");
        assert_eq!(lexer.next(), Some(Ok(Token::Number(1.0))));
        assert_eq!(lexer.next(), Some(Ok(Token::Operator(Operator::Add))));
        let err = lexer.next().unwrap().unwrap_err();
        assert_eq!(err.kind, LexErrorKind::Unrecognized);
        assert_eq!(err.text, "$#@");
        assert_eq!(err.offset, 4);
        assert_eq!(lexer.next(), Some(Ok(Token::Identifier("x".into()))));
        assert_eq!(lexer.next(), None);

        let err = tokenize(".").next().unwrap().unwrap_err();
        assert_eq!(err.text, ".");
    }

    #[test]
    fn test_number_out_of_range() {
        let err = tokenize("1e400").next().unwrap().unwrap_err();
        assert_eq!(err.kind, LexErrorKind::OutOfRange);
        assert_eq!(err.text, "1e400");
    }

    #[test]
    fn test_restartable() {
        let lexer = tokenize("a+b");
        let first: Vec<_> = lexer.clone().collect();
        let second: Vec<_> = lexer.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_canonical_display() {
        assert_eq!(Token::Number(2.0).to_string(), "2");
        assert_eq!(Token::Number(2.5).to_string(), "2.5");
        assert_eq!(Token::Number(0.01).to_string(), "0.01");
        assert_eq!(Token::Operator(Operator::Divide).to_string(), "/");
    }
}
