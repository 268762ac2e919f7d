//! Rule parser.
//!
//! Recursive descent over the token stream produced by the lexer:
//!
//! ```text
//! rule   := arith cmp arith
//! arith  := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := PriceRef | '(' arith ')'
//! ```
//!
//! Exactly one comparison is allowed per rule and only at the top level.
//! Parenthesis nesting and the number of arithmetic operators are each
//! capped at [`MAX_DEPTH`], which bounds the depth of every parsed tree.

use crate::domain::error::{ParseError, ParseErrorKind, TranslateError};
use crate::domain::expr::{ArithOp, CompareOp, Expr, Operator, PriceRef};
use crate::domain::lexer::{self, Token, TokenKind};

/// Maximum parenthesis nesting, and maximum arithmetic operators per rule.
pub const MAX_DEPTH: usize = 256;

fn describe(kind: TokenKind) -> String {
    match kind {
        TokenKind::PriceIdent(k) => k.keyword().to_string(),
        TokenKind::Offset(n) => format!("offset [{}]", n),
        TokenKind::Operator(op) => format!("'{}'", op.symbol()),
        TokenKind::LParen => "'('".to_string(),
        TokenKind::RParen => "')'".to_string(),
    }
}

struct Parser<'a> {
    rule: &'a str,
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], rule: &'a str) -> Self {
        Self {
            rule,
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    /// Position of the next token, or the end of the rule text.
    fn here(&self) -> usize {
        self.peek().map_or(self.rule.len(), |t| t.position)
    }

    fn error(&self, kind: ParseErrorKind, position: usize, message: String) -> ParseError {
        ParseError {
            kind,
            rule: self.rule.to_string(),
            position,
            message,
        }
    }

    fn found(&self) -> String {
        self.peek()
            .map(|t| describe(t.kind))
            .unwrap_or_else(|| "end of input".to_string())
    }

    fn peek_arith(&self, ops: [ArithOp; 2]) -> Option<ArithOp> {
        match self.peek()?.kind {
            TokenKind::Operator(Operator::Arith(op)) if ops.contains(&op) => Some(op),
            _ => None,
        }
    }

    fn peek_compare(&self) -> Option<CompareOp> {
        match self.peek()?.kind {
            TokenKind::Operator(Operator::Compare(op)) => Some(op),
            _ => None,
        }
    }

    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        let position = self.here();
        let token = match self.peek() {
            Some(t) => t,
            None => {
                return Err(self.error(
                    ParseErrorKind::EmptyOperand,
                    position,
                    "expected price reference, found end of input".to_string(),
                ));
            }
        };

        match token.kind {
            TokenKind::PriceIdent(kind) => {
                self.advance();
                match self.peek().map(|t| t.kind) {
                    Some(TokenKind::Offset(offset)) => {
                        self.advance();
                        Ok(Expr::Ref(PriceRef::new(kind, offset)))
                    }
                    _ => Err(self.error(
                        ParseErrorKind::EmptyOperand,
                        self.here(),
                        format!("expected offset after {}, found {}", kind.keyword(), self.found()),
                    )),
                }
            }
            TokenKind::LParen => {
                if self.depth == MAX_DEPTH {
                    return Err(self.error(
                        ParseErrorKind::TooDeep,
                        position,
                        format!("parentheses nest deeper than {} levels", MAX_DEPTH),
                    ));
                }
                self.advance();
                if matches!(self.peek().map(|t| t.kind), Some(TokenKind::RParen)) {
                    return Err(self.error(
                        ParseErrorKind::EmptyOperand,
                        self.here(),
                        "empty parentheses".to_string(),
                    ));
                }
                self.depth += 1;
                let inner = self.parse_arith();
                self.depth -= 1;
                let inner = inner?;
                match self.peek().map(|t| t.kind) {
                    Some(TokenKind::RParen) => {
                        self.advance();
                        Ok(inner)
                    }
                    Some(TokenKind::Operator(Operator::Compare(op))) => Err(self.error(
                        ParseErrorKind::NestedComparison,
                        self.here(),
                        format!(
                            "comparison '{}' is not allowed inside parentheses",
                            op.symbol()
                        ),
                    )),
                    None => Err(self.error(
                        ParseErrorKind::UnbalancedParens,
                        position,
                        "unclosed '('".to_string(),
                    )),
                    Some(_) => Err(self.error(
                        ParseErrorKind::UnbalancedParens,
                        self.here(),
                        format!("expected ')', found {}", self.found()),
                    )),
                }
            }
            other => Err(self.error(
                ParseErrorKind::EmptyOperand,
                position,
                format!("expected price reference, found {}", describe(other)),
            )),
        }
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_factor()?;
        while let Some(op) = self.peek_arith([ArithOp::Mul, ArithOp::Div]) {
            self.advance();
            let right = self.parse_factor()?;
            expr = Expr::arith(op, expr, right);
        }
        Ok(expr)
    }

    fn parse_arith(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_term()?;
        while let Some(op) = self.peek_arith([ArithOp::Add, ArithOp::Sub]) {
            self.advance();
            let right = self.parse_term()?;
            expr = Expr::arith(op, expr, right);
        }
        Ok(expr)
    }

    fn unmatched_close(&self) -> ParseError {
        self.error(
            ParseErrorKind::UnbalancedParens,
            self.here(),
            "unmatched ')'".to_string(),
        )
    }

    fn parse(&mut self) -> Result<Expr, ParseError> {
        if self.tokens.is_empty() {
            return Err(self.error(
                ParseErrorKind::EmptyOperand,
                0,
                "empty rule".to_string(),
            ));
        }

        let excess = self
            .tokens
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::Operator(Operator::Arith(_))))
            .nth(MAX_DEPTH);
        if let Some(token) = excess {
            return Err(self.error(
                ParseErrorKind::TooDeep,
                token.position,
                format!("rule has more than {} arithmetic operators", MAX_DEPTH),
            ));
        }

        let left = self.parse_arith()?;

        let op = match self.peek().map(|t| t.kind) {
            Some(TokenKind::Operator(Operator::Compare(op))) => {
                self.advance();
                op
            }
            Some(TokenKind::RParen) => return Err(self.unmatched_close()),
            Some(_) => {
                return Err(self.error(
                    ParseErrorKind::MissingComparison,
                    self.here(),
                    format!("expected comparison operator, found {}", self.found()),
                ));
            }
            None => {
                return Err(self.error(
                    ParseErrorKind::MissingComparison,
                    self.here(),
                    "rule has no comparison operator".to_string(),
                ));
            }
        };

        let right = self.parse_arith()?;

        if let Some(extra) = self.peek_compare() {
            return Err(self.error(
                ParseErrorKind::MultipleComparisons,
                self.here(),
                format!(
                    "rule already has comparison '{}', found another '{}'",
                    op.symbol(),
                    extra.symbol()
                ),
            ));
        }
        match self.peek().map(|t| t.kind) {
            None => Ok(Expr::compare(op, left, right)),
            Some(TokenKind::RParen) => Err(self.unmatched_close()),
            Some(_) => Err(self.error(
                ParseErrorKind::TrailingInput,
                self.here(),
                format!("unexpected input after rule: {}", self.found()),
            )),
        }
    }
}

/// Parse a token stream into a `Comparison`-rooted AST. `rule` is the text
/// the tokens came from and is attached to any error.
pub fn parse(tokens: &[Token], rule: &str) -> Result<Expr, ParseError> {
    Parser::new(tokens, rule).parse()
}

/// Tokenize and parse a rule string.
pub fn parse_rule(rule: &str) -> Result<Expr, TranslateError> {
    let tokens = lexer::tokenize(rule)?;
    Ok(parse(&tokens, rule)?)
}
