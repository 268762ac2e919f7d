//! Rule lexer.
//!
//! Turns a rule string into a flat token sequence. A price identifier is only
//! valid when immediately followed by a bracketed offset, so the lexer emits
//! the pair `PriceIdent`, `Offset` as a unit.

use crate::domain::error::{LexError, LexErrorKind};
use crate::domain::expr::{ArithOp, CompareOp, Operator, PriceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    PriceIdent(PriceKind),
    Offset(usize),
    Operator(Operator),
    LParen,
    RParen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the token's first character in the rule text.
    pub position: usize,
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            tokens: Vec::new(),
        }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn error(&self, kind: LexErrorKind, position: usize) -> LexError {
        LexError {
            kind,
            rule: self.input.to_string(),
            position,
        }
    }

    fn push(&mut self, kind: TokenKind, position: usize) {
        self.tokens.push(Token { kind, position });
    }

    fn push_operator(&mut self, op: Operator, position: usize) {
        self.push(TokenKind::Operator(op), position);
    }

    /// Consume `second` if it is next, returning whether it was.
    fn follows(&mut self, second: char) -> bool {
        if self.peek() == Some(second) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn read_word(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }
        &self.input[start..self.pos]
    }

    fn lex_price(&mut self) -> Result<(), LexError> {
        let start = self.pos;
        let word = self.read_word();
        let kind = PriceKind::from_keyword(word)
            .ok_or_else(|| self.error(LexErrorKind::UnknownIdentifier(word.to_string()), start))?;
        self.push(TokenKind::PriceIdent(kind), start);

        if self.peek() != Some('[') {
            return Err(self.error(LexErrorKind::MissingOffset, self.pos));
        }
        let bracket = self.pos;
        self.advance();
        let offset = self.lex_offset(bracket)?;
        self.push(TokenKind::Offset(offset), bracket);
        Ok(())
    }

    /// Reads `integer ]` after an opening bracket at `bracket`.
    fn lex_offset(&mut self, bracket: usize) -> Result<usize, LexError> {
        self.skip_whitespace();
        let content_start = self.pos;

        if self.peek() == Some('-') {
            return Err(self.error(LexErrorKind::NegativeOffset, content_start));
        }

        while self.peek().is_some_and(|ch| ch.is_ascii_digit()) {
            self.advance();
        }
        let digits = &self.input[content_start..self.pos];
        self.skip_whitespace();

        match self.peek() {
            Some(']') if !digits.is_empty() => {
                self.advance();
                digits.parse::<usize>().map_err(|_| {
                    self.error(
                        LexErrorKind::MalformedOffset(digits.to_string()),
                        content_start,
                    )
                })
            }
            None => Err(self.error(LexErrorKind::UnterminatedBracket, bracket)),
            Some(_) => Err(self.malformed_or_unterminated(content_start, bracket)),
        }
    }

    /// The offset is malformed only if its bracket closes right after it;
    /// running into a comparison, paren or another bracket means the `[`
    /// was never closed.
    fn malformed_or_unterminated(&mut self, content_start: usize, bracket: usize) -> LexError {
        self.pos = content_start;
        while self
            .peek()
            .is_some_and(|ch| ch.is_alphanumeric() || ch.is_whitespace() || "_.+-*/".contains(ch))
        {
            self.advance();
        }
        let content = self.input[content_start..self.pos].trim();
        if self.peek() == Some(']') {
            self.error(LexErrorKind::MalformedOffset(content.to_string()), content_start)
        } else {
            self.error(LexErrorKind::UnterminatedBracket, bracket)
        }
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        loop {
            self.skip_whitespace();
            let start = self.pos;
            let ch = match self.peek() {
                Some(ch) => ch,
                None => break,
            };

            if ch.is_alphabetic() || ch == '_' {
                self.lex_price()?;
                continue;
            }

            self.advance();
            match ch {
                '(' => self.push(TokenKind::LParen, start),
                ')' => self.push(TokenKind::RParen, start),
                '+' => self.push_operator(Operator::Arith(ArithOp::Add), start),
                '-' => self.push_operator(Operator::Arith(ArithOp::Sub), start),
                '*' => self.push_operator(Operator::Arith(ArithOp::Mul), start),
                '/' => self.push_operator(Operator::Arith(ArithOp::Div), start),
                '<' => {
                    let op = if self.follows('=') {
                        CompareOp::Le
                    } else {
                        CompareOp::Lt
                    };
                    self.push_operator(Operator::Compare(op), start);
                }
                '>' => {
                    let op = if self.follows('=') {
                        CompareOp::Ge
                    } else {
                        CompareOp::Gt
                    };
                    self.push_operator(Operator::Compare(op), start);
                }
                '=' | '!' => {
                    if !self.follows('=') {
                        return Err(self.error(LexErrorKind::UnexpectedChar(ch), start));
                    }
                    let op = if ch == '=' { CompareOp::Eq } else { CompareOp::Ne };
                    self.push_operator(Operator::Compare(op), start);
                }
                other => return Err(self.error(LexErrorKind::UnexpectedChar(other), start)),
            }
        }
        Ok(self.tokens)
    }
}

/// Tokenize a single rule string.
pub fn tokenize(rule: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(rule).run()
}
