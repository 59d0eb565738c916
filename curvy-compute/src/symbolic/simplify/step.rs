use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A rewrite applied by the simplifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Step {
    /// `a+0 = a`
    AddZero,

    /// `2+3 = 5`
    AddNumbers,

    /// `a+a = 2a`
    CombineLikeTerms,

    /// `a*0 = 0`
    MultiplyZero,

    /// `a*1 = a`
    MultiplyOne,

    /// `2*3 = 6`
    MultiplyNumbers,

    /// `a*a = a^2`
    CombineLikeFactors,

    /// `a^0 = 1`
    PowerZero,

    /// `a^1 = a`
    PowerOne,

    /// `0^a = 0` for positive `a`
    ZeroBase,

    /// `1^a = 1`
    OneBase,

    /// `2^3 = 8`, `4^(1/2) = 2`
    EvaluatePower,

    /// `(a^b)^c = a^(b*c)` for integer `c`
    PowerOfPower,

    /// `(a*b)^n = a^n * b^n` for integer `n`
    PowerOfProduct,

    /// `log(1) = 0`, `sin(0) = 0`, etc.
    EvaluateFunction,

    /// `log(e^u) = u`
    LogOfExp,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            Self::AddZero => "remove zero terms",
            Self::AddNumbers => "add numbers",
            Self::CombineLikeTerms => "combine like terms",
            Self::MultiplyZero => "multiply by zero",
            Self::MultiplyOne => "remove factors of one",
            Self::MultiplyNumbers => "multiply numbers",
            Self::CombineLikeFactors => "combine like factors",
            Self::PowerZero => "raise to the power of zero",
            Self::PowerOne => "raise to the power of one",
            Self::ZeroBase => "raise zero to a positive power",
            Self::OneBase => "raise one to a power",
            Self::EvaluatePower => "evaluate a numeric power",
            Self::PowerOfPower => "multiply nested exponents",
            Self::PowerOfProduct => "distribute a power over a product",
            Self::EvaluateFunction => "evaluate a function at a special value",
            Self::LogOfExp => "cancel a logarithm of a power of e",
        };
        write!(f, "{}", description)
    }
}
