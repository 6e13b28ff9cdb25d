//! Filter logic parsing
//!
//! Parses a filter logic expression such as `f0 or (f1 and not f2)` into an
//! [`Expr`] tree. Precedence from loosest to tightest: `or`, `and`, `not`.
//! Keywords are case-insensitive. Positions in errors count characters,
//! not bytes.

use std::fmt;

use crate::core::constants::MAX_LOGIC_DEPTH;

use super::error::QueryError;

/// Parsed filter logic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Filter(String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Group(Box<Expr>),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filter(key) => write!(f, "{}", key),
            Self::Not(inner) => write!(f, "not {}", inner),
            Self::And(left, right) => write!(f, "{} and {}", left, right),
            Self::Or(left, right) => write!(f, "{} or {}", left, right),
            Self::Group(inner) => write!(f, "({})", inner),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Filter(String),
    And,
    Or,
    Not,
    LParen,
    RParen,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filter(key) => write!(f, "'{}'", key),
            Self::And => write!(f, "'and'"),
            Self::Or => write!(f, "'or'"),
            Self::Not => write!(f, "'not'"),
            Self::LParen => write!(f, "'('"),
            Self::RParen => write!(f, "')'"),
        }
    }
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    position: usize,
}

fn syntax_error(position: usize, message: impl Into<String>) -> QueryError {
    QueryError::InvalidSyntax {
        position,
        message: message.into(),
    }
}

fn is_filter_key(word: &str) -> bool {
    word.strip_prefix('f')
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}

fn tokenize(input: &str) -> Result<Vec<Token>, QueryError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().enumerate().peekable();

    while let Some(&(position, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let kind = match c {
            '(' => {
                chars.next();
                TokenKind::LParen
            }
            ')' => {
                chars.next();
                TokenKind::RParen
            }
            c if c.is_alphanumeric() || c == '_' => {
                let mut word = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if !(c.is_alphanumeric() || c == '_') {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                match word.to_lowercase().as_str() {
                    "and" => TokenKind::And,
                    "or" => TokenKind::Or,
                    "not" => TokenKind::Not,
                    _ if is_filter_key(&word) => TokenKind::Filter(word),
                    _ => {
                        return Err(syntax_error(
                            position,
                            format!("unknown identifier '{}', expected a filter such as 'f0'", word),
                        ));
                    }
                }
            }
            other => {
                return Err(syntax_error(
                    position,
                    format!("unexpected character '{}'", other),
                ));
            }
        };

        tokens.push(Token { kind, position });
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    end: usize,
    depth: usize,
}

impl Parser {
    /// Enter one level of `not` or parentheses
    fn descend(&mut self, position: usize) -> Result<(), QueryError> {
        if self.depth >= MAX_LOGIC_DEPTH {
            return Err(syntax_error(
                position,
                format!("filter logic nested deeper than {} levels", MAX_LOGIC_DEPTH),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn position(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |t| t.position)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn parse_or(&mut self) -> Result<Expr, QueryError> {
        let mut left = self.parse_and()?;
        while self.peek() == Some(&TokenKind::Or) {
            self.advance();
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, QueryError> {
        let mut left = self.parse_not()?;
        while self.peek() == Some(&TokenKind::And) {
            self.advance();
            let right = self.parse_not()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr, QueryError> {
        if self.peek() == Some(&TokenKind::Not) {
            self.descend(self.position())?;
            self.advance();
            let inner = self.parse_not()?;
            self.depth -= 1;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, QueryError> {
        let position = self.position();
        match self.advance() {
            Some(Token {
                kind: TokenKind::Filter(key),
                ..
            }) => Ok(Expr::Filter(key)),
            Some(Token {
                kind: TokenKind::LParen,
                position: open,
            }) => {
                self.descend(open)?;
                let inner = self.parse_or()?;
                self.depth -= 1;
                match self.advance() {
                    Some(Token {
                        kind: TokenKind::RParen,
                        ..
                    }) => Ok(Expr::Group(Box::new(inner))),
                    _ => Err(syntax_error(open, "unclosed '('")),
                }
            }
            Some(token) => Err(syntax_error(
                position,
                format!("expected a filter or '(' but found {}", token.kind),
            )),
            None => Err(syntax_error(position, "unexpected end of filter logic")),
        }
    }
}

/// Parse filter logic into an expression tree
pub fn parse_expression(input: &str) -> Result<Expr, QueryError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(syntax_error(0, "filter logic is empty"));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        end: input.chars().count(),
        depth: 0,
    };
    let expr = parser.parse_or()?;

    if let Some(token) = parser.advance() {
        return Err(syntax_error(
            token.position,
            format!("unexpected {} after complete expression", token.kind),
        ));
    }

    Ok(expr)
}
