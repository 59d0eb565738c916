use crate::{
    parser::{
        ast::{
            binary::Binary,
            call::Call,
            literal::{LitFloat, LitInt, LitSym, Literal},
            paren::Paren,
            unary::Unary,
        },
        error,
        Parse,
        Parser,
        Precedence,
    },
    tokenizer::TokenKind,
};
use curvy_error::Error;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents any kind of expression.
///
/// An expression is a piece of input that describes a real function of one variable, such as
/// `(x**3 + 2*x**2) / (x**2 - 1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// A literal value.
    Literal(Literal),

    /// A parenthesized expression, such as `(1 + 2)`.
    Paren(Paren),

    /// A function call, such as `sin(x)`.
    Call(Call),

    /// A unary operation, such as `-x`.
    Unary(Unary),

    /// A binary operation, such as `1 + 2`.
    Binary(Binary),
}

impl Expr {
    /// Returns the span of the expression.
    pub fn span(&self) -> Range<usize> {
        match self {
            Expr::Literal(literal) => literal.span(),
            Expr::Paren(paren) => paren.span(),
            Expr::Call(call) => call.span(),
            Expr::Unary(unary) => unary.span(),
            Expr::Binary(binary) => binary.span(),
        }
    }

    /// If this expression is a [`Expr::Paren`], returns the innermost expression in the
    /// parenthesized expression. Otherwise, returns `self`.
    pub fn innermost(&self) -> &Expr {
        let mut inner = self;
        while let Expr::Paren(paren) = inner {
            inner = &paren.expr;
        }
        inner
    }
}

impl Parse for Expr {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        if input.peek_kind() == Some(TokenKind::CloseParen) {
            input.advance_past_whitespace();
            return Err(input.error(error::UnclosedParenthesis { opening: false }));
        }

        let lhs = Unary::parse_or_lower(input)?;
        Binary::parse_expr(input, lhs, Precedence::Any)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(literal) => literal.fmt(f),
            Expr::Paren(paren) => paren.fmt(f),
            Expr::Call(call) => call.fmt(f),
            Expr::Unary(unary) => unary.fmt(f),
            Expr::Binary(binary) => binary.fmt(f),
        }
    }
}

/// Represents a primary expression: a self-contained operand that binary and unary operators
/// can be applied to.
///
/// A name cannot automatically be declared a literal symbol; we must look one token ahead to see
/// if it is actually the name of a function being called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primary {
    /// A literal value.
    Literal(Literal),

    /// A parenthesized expression, such as `(1 + 2)`.
    Paren(Paren),

    /// A function call, such as `abs(-1)`.
    Call(Call),
}

impl Primary {
    /// Returns the span of the primary expression.
    pub fn span(&self) -> Range<usize> {
        match self {
            Primary::Literal(literal) => literal.span(),
            Primary::Paren(paren) => paren.span(),
            Primary::Call(call) => call.span(),
        }
    }
}

impl Parse for Primary {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        match input.peek_kind() {
            Some(TokenKind::Int) => LitInt::parse(input).map(|int| Primary::Literal(Literal::Integer(int))),
            Some(TokenKind::Float) => LitFloat::parse(input).map(|float| Primary::Literal(Literal::Float(float))),
            Some(TokenKind::Name) => {
                let mut ahead = input.clone();
                ahead.next_token()?;
                if ahead.peek_kind() == Some(TokenKind::OpenParen) {
                    Call::parse(input).map(Primary::Call)
                } else {
                    LitSym::parse(input).map(|sym| Primary::Literal(Literal::Symbol(sym)))
                }
            },
            Some(TokenKind::OpenParen) => Paren::parse(input).map(Primary::Paren),
            Some(found) => {
                input.advance_past_whitespace();
                Err(input.error(error::UnexpectedToken {
                    expected: &[TokenKind::Int, TokenKind::Float, TokenKind::Name, TokenKind::OpenParen],
                    found,
                }))
            },
            None => Err(input.error(error::UnexpectedEof)),
        }
    }
}

impl From<Primary> for Expr {
    fn from(primary: Primary) -> Self {
        match primary {
            Primary::Literal(literal) => Self::Literal(literal),
            Primary::Paren(paren) => Self::Paren(paren),
            Primary::Call(call) => Self::Call(call),
        }
    }
}
