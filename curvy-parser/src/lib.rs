//! Parser for the single-variable expressions analyzed by curvy.
//!
//! The grammar is small: integer and decimal literals, names, function calls, parentheses, the
//! binary operators `+ - * / ^` (with `**` as an alias of `^`), and unary `+` / `-`. There is no
//! implicit multiplication; `2x` is rejected.
//!
//! Use [`parser::Parser`] to parse a source string into a [`parser::ast::Expr`].

pub mod parser;
pub mod tokenizer;
