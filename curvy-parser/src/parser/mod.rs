pub mod ast;
pub mod error;
pub mod token;

use curvy_error::{Error, ErrorKind};
use super::tokenizer::{tokenize_complete, Token, TokenKind};
use std::ops::Range;

/// A high-level parser for expressions. This is the type to use to parse an arbitrary piece of
/// input into an abstract syntax tree.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source.
    pub fn new(source: &'source str) -> Self {
        Self {
            tokens: tokenize_complete(source),
            cursor: 0,
        }
    }

    /// Creates an error that points at the current token, or the end of the source code if the
    /// cursor is at the end of the stream.
    pub fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(0..0, |token| token.span.end..token.span.end)
    }

    /// Returns the span of the current token, or the end of the source code if the cursor is at
    /// the end of the stream.
    pub fn span(&self) -> Range<usize> {
        self.tokens
            .get(self.cursor)
            .map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Returns the current token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the end of the stream.
    pub fn current_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor)
    }

    /// Advances the cursor past any whitespace tokens.
    pub fn advance_past_whitespace(&mut self) {
        while let Some(token) = self.current_token() {
            if !token.is_whitespace() {
                break;
            }
            self.cursor += 1;
        }
    }

    /// Returns the kind of the next non-whitespace token without moving the cursor.
    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens[self.cursor..]
            .iter()
            .find(|token| !token.is_whitespace())
            .map(|token| token.kind)
    }

    /// Returns the next token to be parsed, then advances the cursor. Whitespace tokens are
    /// skipped.
    ///
    /// Returns an EOF error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        self.advance_past_whitespace();
        match self.tokens.get(self.cursor) {
            Some(token) => {
                self.cursor += 1;
                // cloning is cheap: only Range<_> is cloned
                Ok(token.clone())
            },
            None => Err(self.error(error::UnexpectedEof)),
        }
    }

    /// Speculatively parses a value from the given stream of tokens. This function can be used
    /// in the [`Parse::parse`] implementation of a type with the given [`Parser`], as it will
    /// automatically backtrack the cursor position if parsing fails.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse<T: Parse>(&mut self) -> Result<T, Error> {
        self.try_parse_with_fn(T::parse)
    }

    /// Speculatively parses a value from the given stream of tokens, using a custom parsing
    /// function to parse the value.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse_with_fn<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Parser<'source>) -> Result<T, Error>,
    {
        let start = self.cursor;
        match f(self) {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                err
            },
        }
    }

    /// Attempts to parse a value from the given stream of tokens. All the tokens must be consumed
    /// by the parser; if not, an error is returned.
    ///
    /// Every character outside of the grammar is reported before parsing begins, so the returned
    /// list may contain more than one error.
    pub fn try_parse_full<T: Parse>(&mut self) -> Result<T, Vec<Error>> {
        let invalid = self.tokens
            .iter()
            .filter(|token| token.kind == TokenKind::Symbol)
            .map(|token| Error::new(vec![token.span.clone()], error::InvalidCharacter {
                character: token.lexeme.to_owned(),
            }))
            .collect::<Vec<_>>();
        if !invalid.is_empty() {
            return Err(invalid);
        }

        let value = T::parse(self).map_err(|err| vec![err])?;
        self.advance_past_whitespace();
        match self.current_token() {
            None => Ok(value),
            Some(token) if token.kind == TokenKind::CloseParen => {
                Err(vec![self.error(error::UnclosedParenthesis { opening: false })])
            },
            Some(_) => {
                let span = self.span().start..self.eof_span().end;
                Err(vec![Error::new(vec![span], error::ExpectedEof)])
            },
        }
    }
}

/// Any type that can be parsed from a source of tokens.
pub trait Parse: Sized {
    /// Parses a value from the given stream of tokens, advancing the stream past the consumed
    /// tokens if parsing is successful.
    ///
    /// This function should be used by consumers of the library.
    fn parse(input: &mut Parser) -> Result<Self, Error>;
}

/// The associativity of a binary or unary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Associativity {
    /// The binary / unary operation is left-associative.
    ///
    /// For binary operations, this means `a op b op c` is evaluated as `(a op b) op c`.
    Left,

    /// The binary / unary operation is right-associative.
    ///
    /// For binary operations, this means `a op b op c` is evaluated as `a op (b op c)`. For unary
    /// operations, this means `op op a` is evaluated as `op (op a)`.
    Right,
}

/// The precedence of an operation, in order from lowest precedence (evaluated last) to highest
/// precedence (evaluated first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Any precedence.
    Any,

    /// Precedence of addition (`+`) and subtraction (`-`), which separate terms.
    Term,

    /// Precedence of multiplication (`*`) and division (`/`), which separate factors.
    Factor,

    /// Precedence of unary negation and unary plus.
    Neg,

    /// Precedence of exponentiation (`^` or `**`).
    Exp,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use ast::{
        binary::Binary,
        call::Call,
        expr::Expr,
        literal::{LitFloat, LitInt, LitSym, Literal},
        paren::Paren,
        unary::Unary,
    };
    use token::op::{BinOp, BinOpKind, UnaryOp, UnaryOpKind};

    fn parse(input: &str) -> Result<Expr, Vec<Error>> {
        Parser::new(input).try_parse_full::<Expr>()
    }

    fn sym(name: &str, span: Range<usize>) -> Expr {
        Expr::Literal(Literal::Symbol(LitSym { name: name.to_owned(), span }))
    }

    fn int(value: &str, span: Range<usize>) -> Expr {
        Expr::Literal(Literal::Integer(LitInt { value: value.to_owned(), span }))
    }

    #[test]
    fn literal_int() {
        assert_eq!(parse("16").unwrap(), int("16", 0..2));
    }

    #[test]
    fn literal_float() {
        assert_eq!(parse("3.14").unwrap(), Expr::Literal(Literal::Float(LitFloat {
            value: "3.14".to_owned(),
            span: 0..4,
        })));
    }

    #[test]
    fn surrounding_whitespace() {
        assert_eq!(parse("  x \n").unwrap(), sym("x", 2..3));
    }

    #[test]
    fn binary_precedence() {
        let expr = parse("1 + 2 * x").unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: Box::new(int("1", 0..1)),
            op: BinOp { kind: BinOpKind::Add, span: 2..3 },
            rhs: Box::new(Expr::Binary(Binary {
                lhs: Box::new(int("2", 4..5)),
                op: BinOp { kind: BinOpKind::Mul, span: 6..7 },
                rhs: Box::new(sym("x", 8..9)),
                span: 4..9,
            })),
            span: 0..9,
        }));
    }

    #[test]
    fn left_associative_subtraction() {
        let expr = parse("x-1-2").unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: Box::new(Expr::Binary(Binary {
                lhs: Box::new(sym("x", 0..1)),
                op: BinOp { kind: BinOpKind::Sub, span: 1..2 },
                rhs: Box::new(int("1", 2..3)),
                span: 0..3,
            })),
            op: BinOp { kind: BinOpKind::Sub, span: 3..4 },
            rhs: Box::new(int("2", 4..5)),
            span: 0..5,
        }));
    }

    #[test]
    fn right_associative_exponent() {
        let expr = parse("x**2^3").unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: Box::new(sym("x", 0..1)),
            op: BinOp { kind: BinOpKind::Exp, span: 1..3 },
            rhs: Box::new(Expr::Binary(Binary {
                lhs: Box::new(int("2", 3..4)),
                op: BinOp { kind: BinOpKind::Exp, span: 4..5 },
                rhs: Box::new(int("3", 5..6)),
                span: 3..6,
            })),
            span: 0..6,
        }));
    }

    #[test]
    fn negation_binds_looser_than_exponent() {
        let expr = parse("-x^2").unwrap();

        assert_eq!(expr, Expr::Unary(Unary {
            operand: Box::new(Expr::Binary(Binary {
                lhs: Box::new(sym("x", 1..2)),
                op: BinOp { kind: BinOpKind::Exp, span: 2..3 },
                rhs: Box::new(int("2", 3..4)),
                span: 1..4,
            })),
            op: UnaryOp { kind: UnaryOpKind::Neg, span: 0..1 },
            span: 0..4,
        }));
    }

    #[test]
    fn negative_exponent() {
        let expr = parse("x^-1").unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: Box::new(sym("x", 0..1)),
            op: BinOp { kind: BinOpKind::Exp, span: 1..2 },
            rhs: Box::new(Expr::Unary(Unary {
                operand: Box::new(int("1", 3..4)),
                op: UnaryOp { kind: UnaryOpKind::Neg, span: 2..3 },
                span: 2..4,
            })),
            span: 0..4,
        }));
    }

    #[test]
    fn call_and_paren() {
        let expr = parse("sin(x) / (x)").unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: Box::new(Expr::Call(Call {
                name: LitSym { name: "sin".to_owned(), span: 0..3 },
                args: vec![sym("x", 4..5)],
                span: 0..6,
                paren_span: 3..6,
            })),
            op: BinOp { kind: BinOpKind::Div, span: 7..8 },
            rhs: Box::new(Expr::Paren(Paren {
                expr: Box::new(sym("x", 10..11)),
                span: 9..12,
            })),
            span: 0..12,
        }));
    }

    #[test]
    fn call_with_multiple_args() {
        let expr = parse("log(x, 2)").unwrap();
        let Expr::Call(call) = expr else {
            panic!("expected a call, got {:?}", expr);
        };

        assert_eq!(call.args, vec![sym("x", 4..5), int("2", 7..8)]);
    }

    #[test]
    fn double_operator_is_rejected() {
        let errors = parse("x +* 2").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].is::<error::UnexpectedToken>());
        assert_eq!(errors[0].spans, vec![3..4]);
    }

    #[test]
    fn implicit_multiplication_is_rejected() {
        let errors = parse("2x").unwrap_err();
        assert!(errors[0].is::<error::ExpectedEof>());
    }

    #[test]
    fn empty_input() {
        let errors = parse("   ").unwrap_err();
        assert!(errors[0].is::<error::UnexpectedEof>());
    }

    #[test]
    fn unbalanced_parentheses() {
        let errors = parse("(x + 1").unwrap_err();
        assert_eq!(
            errors[0].downcast_ref::<error::UnclosedParenthesis>(),
            Some(&error::UnclosedParenthesis { opening: true }),
        );
        assert_eq!(errors[0].spans, vec![0..1]);

        let errors = parse("x + 1)").unwrap_err();
        assert_eq!(
            errors[0].downcast_ref::<error::UnclosedParenthesis>(),
            Some(&error::UnclosedParenthesis { opening: false }),
        );
    }

    #[test]
    fn empty_parentheses() {
        let errors = parse("x * ()").unwrap_err();
        assert!(errors[0].is::<error::EmptyParenthesis>());
    }

    #[test]
    fn invalid_characters_are_all_reported() {
        let errors = parse("x $ 2 # 3").unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[1].downcast_ref::<error::InvalidCharacter>(),
            Some(&error::InvalidCharacter { character: "#".to_owned() }),
        );
    }

    #[test]
    fn display_round_trip() {
        let expr = parse("(x**3 + 2*x**2) / (x**2 - 1)").unwrap();
        assert_eq!(expr.to_string(), "(x^3+2*x^2)/(x^2-1)");
    }
}
