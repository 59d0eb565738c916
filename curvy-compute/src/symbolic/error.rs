//! Errors that can occur while converting, differentiating, or solving expressions.

use ariadne::Fmt;
use curvy_attrs::ErrorKind;
use curvy_error::{ErrorKind, EXPR};

/// A name was used that is neither the analysis variable nor a known constant.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unknown symbol `{}`", name),
    labels = ["this symbol"],
    help = match suggestion {
        Some(suggestion) => format!("did you mean `{}`?", suggestion.fg(EXPR)),
        None => format!(
            "the only symbols allowed are the variable `{}` and the constants `pi` and `e`",
            variable.fg(EXPR),
        ),
    },
)]
pub struct UnknownSymbol {
    /// The name of the symbol.
    pub name: String,

    /// The closest known symbol, if one is close enough.
    pub suggestion: Option<String>,

    /// The name of the analysis variable.
    pub variable: String,
}

/// A function was called that is not supported.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unknown function `{}`", name),
    labels = ["this function", ""],
    help = if suggestions.is_empty() {
        String::from("see the list of supported functions in the documentation")
    } else {
        format!("did you mean one of these functions? {}", suggestions.iter()
            .map(|s| format!("`{}`", s.fg(EXPR)))
            .collect::<Vec<_>>()
            .join(", "))
    },
)]
pub struct UnknownFunction {
    /// The name of the function.
    pub name: String,

    /// Supported functions with similar names.
    pub suggestions: Vec<String>,
}

/// A function was called with the wrong number of arguments.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("wrong number of arguments for `{}`", name),
    labels = [format!("this function takes {} argument(s)", expected), String::new()],
    help = format!("{} argument(s) were given", given),
)]
pub struct WrongArgumentCount {
    /// The name of the function.
    pub name: String,

    /// The number of arguments the function takes.
    pub expected: usize,

    /// The number of arguments that were given.
    pub given: usize,
}

/// A number literal could not be represented exactly.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid number `{}`", literal),
    labels = ["this number"],
)]
pub struct InvalidNumber {
    /// The literal as written.
    pub literal: String,
}

/// No differentiation rule exists for an expression.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot differentiate `{}`", expr),
    labels = ["while differentiating this expression"],
    help = "the derivative of this expression cannot be written in closed form",
)]
pub struct Underivable {
    /// The expression (or sub-expression) that could not be differentiated.
    pub expr: String,
}

/// An equation could not be solved, and the numeric fallback is disabled.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot solve `{} = 0`", equation),
    labels = ["while solving this expression"],
    help = format!("enable the {} to search for roots numerically", "numeric fallback".fg(EXPR)),
)]
pub struct Unsolvable {
    /// The expression that was set to zero.
    pub equation: String,
}

/// A symbol was encountered that has no numeric value.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot evaluate `{}`", name),
    labels = ["this symbol has no value"],
)]
pub struct NoValue {
    /// The name of the symbol or function.
    pub name: String,
}

/// The expression divides by zero for every value of the variable, such as `1/0`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "division by zero",
    labels = ["this expression divides by zero"],
    help = format!("`{}` is undefined for every value of the variable", expr.fg(EXPR)),
)]
pub struct DivisionByZero {
    /// The expression, after simplification.
    pub expr: String,
}

/// The expression has no real value anywhere in the sampled domain.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` has no real values", expr),
    labels = ["this expression"],
    help = format!("the expression is undefined everywhere in [{}, {}]", lo, hi),
)]
pub struct NoRealValues {
    /// The expression that was sampled.
    pub expr: String,

    /// The lower end of the domain.
    pub lo: f64,

    /// The upper end of the domain.
    pub hi: f64,
}
