use crate::{
    parser::{error, Parser, Parse},
    tokenizer::TokenKind,
};
use curvy_error::Error;
use std::ops::Range;

/// Generates a unit struct for each token kind, as well as a simple [`Parse`] implementation for
/// each token kind. This enables the parser to use and request token kinds as a type.
macro_rules! token_kinds {
    ($($name:ident)*) => {
        $(
            #[derive(Clone, Debug, PartialEq)]
            pub(crate) struct $name {
                pub(crate) lexeme: String,
                pub(crate) span: Range<usize>,
            }

            impl Parse for $name {
                fn parse(input: &mut Parser) -> Result<Self, Error> {
                    let token = input.next_token()?;

                    if token.kind == TokenKind::$name {
                        Ok(Self {
                            lexeme: token.lexeme.to_owned(),
                            span: token.span,
                        })
                    } else {
                        Err(Error::new(vec![token.span], error::UnexpectedToken {
                            expected: &[TokenKind::$name],
                            found: token.kind,
                        }))
                    }
                }
            }
        )*
    };
}

token_kinds!(
    Name
    Comma
    OpenParen
    CloseParen
    Int
    Float
);

pub mod op {
    //! Structs to help parse binary and unary operators.

    use crate::{
        parser::{error, Associativity, Parse, Parser, Precedence},
        tokenizer::TokenKind,
    };
    use curvy_error::Error;
    use std::{fmt, ops::Range};

    #[cfg(feature = "serde")]
    use serde::{Deserialize, Serialize};

    /// The unary operation that is being performed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub enum UnaryOpKind {
        Neg,
        Pos,
    }

    impl UnaryOpKind {
        /// Returns the precedence of the unary operation.
        pub fn precedence(&self) -> Precedence {
            Precedence::Neg
        }

        /// Returns the associativity of the unary operation.
        pub fn associativity(&self) -> Associativity {
            Associativity::Right
        }
    }

    /// A unary operator that takes one operand.
    #[derive(Debug, Clone, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct UnaryOp {
        /// The kind of unary operator.
        pub kind: UnaryOpKind,

        /// The region of the source code that this operator was parsed from.
        pub span: Range<usize>,
    }

    impl UnaryOp {
        /// Returns the precedence of the unary operator.
        pub fn precedence(&self) -> Precedence {
            self.kind.precedence()
        }
    }

    impl Parse for UnaryOp {
        fn parse(input: &mut Parser) -> Result<Self, Error> {
            let token = input.next_token()?;
            let kind = match token.kind {
                TokenKind::Sub => UnaryOpKind::Neg,
                TokenKind::Add => UnaryOpKind::Pos,
                _ => return Err(Error::new(vec![token.span], error::UnexpectedToken {
                    expected: &[TokenKind::Sub, TokenKind::Add],
                    found: token.kind,
                })),
            };

            Ok(Self {
                kind,
                span: token.span,
            })
        }
    }

    impl fmt::Display for UnaryOp {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            match self.kind {
                UnaryOpKind::Neg => write!(f, "-"),
                UnaryOpKind::Pos => write!(f, "+"),
            }
        }
    }

    /// The binary operation that is being performed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub enum BinOpKind {
        Exp,
        Mul,
        Div,
        Add,
        Sub,
    }

    impl BinOpKind {
        /// Returns the precedence of the binary operation.
        pub fn precedence(&self) -> Precedence {
            match self {
                Self::Exp => Precedence::Exp,
                Self::Mul | Self::Div => Precedence::Factor,
                Self::Add | Self::Sub => Precedence::Term,
            }
        }

        /// Returns the binary operation a token represents, if any.
        pub fn from_token(kind: TokenKind) -> Option<Self> {
            match kind {
                TokenKind::Exp => Some(Self::Exp),
                TokenKind::Mul => Some(Self::Mul),
                TokenKind::Div => Some(Self::Div),
                TokenKind::Add => Some(Self::Add),
                TokenKind::Sub => Some(Self::Sub),
                _ => None,
            }
        }

        /// Returns the associativity of the binary operation.
        pub fn associativity(&self) -> Associativity {
            match self {
                Self::Exp => Associativity::Right,
                Self::Mul | Self::Div | Self::Add | Self::Sub => Associativity::Left,
            }
        }
    }

    /// A binary operator that takes two operands.
    #[derive(Debug, Clone, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct BinOp {
        /// The kind of binary operator.
        pub kind: BinOpKind,

        /// The region of the source code that this operator was parsed from.
        pub span: Range<usize>,
    }

    impl BinOp {
        /// Returns the precedence of the binary operation.
        pub fn precedence(&self) -> Precedence {
            self.kind.precedence()
        }

        /// Returns the associativity of the binary operation.
        pub fn associativity(&self) -> Associativity {
            self.kind.associativity()
        }
    }

    impl Parse for BinOp {
        fn parse(input: &mut Parser) -> Result<Self, Error> {
            let token = input.next_token()?;
            let kind = match BinOpKind::from_token(token.kind) {
                Some(kind) => kind,
                None => return Err(Error::new(vec![token.span], error::UnexpectedToken {
                    expected: &[
                        TokenKind::Exp,
                        TokenKind::Mul,
                        TokenKind::Div,
                        TokenKind::Add,
                        TokenKind::Sub,
                    ],
                    found: token.kind,
                })),
            };

            Ok(Self {
                kind,
                span: token.span,
            })
        }
    }

    impl fmt::Display for BinOp {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            match self.kind {
                BinOpKind::Exp => write!(f, "^"),
                BinOpKind::Mul => write!(f, "*"),
                BinOpKind::Div => write!(f, "/"),
                BinOpKind::Add => write!(f, "+"),
                BinOpKind::Sub => write!(f, "-"),
            }
        }
    }
}
