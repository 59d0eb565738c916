//! Simplification rules for powers.

use crate::primitive::{exact_root, is_integer, pow_rational};
use crate::symbolic::{
    expr::Expr,
    simplify::{rules::do_power, step::Step},
    step_collector::StepCollector,
};
use rug::Rational;
use std::cmp::Ordering;

/// `a^0 = 1`
pub fn power_zero(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |_, rhs| {
        if rhs.is_zero() {
            Some(Expr::integer(1))
        } else {
            None
        }
    })?;

    // keep the step collection logic outside of the closure
    step_collector.push(Step::PowerZero);
    Some(opt)
}

/// `a^1 = a`
pub fn power_one(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |lhs, rhs| {
        if rhs.is_one() {
            Some(lhs.clone())
        } else {
            None
        }
    })?;

    step_collector.push(Step::PowerOne);
    Some(opt)
}

/// `0^a = 0`, for positive numbers `a`
pub fn zero_base(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |lhs, rhs| {
        let positive = rhs.as_number().map_or(false, |n| n.cmp0() == Ordering::Greater);
        if lhs.is_zero() && positive {
            Some(Expr::integer(0))
        } else {
            None
        }
    })?;

    step_collector.push(Step::ZeroBase);
    Some(opt)
}

/// `1^a = 1`
pub fn one_base(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |lhs, _| {
        if lhs.is_one() {
            Some(Expr::integer(1))
        } else {
            None
        }
    })?;

    step_collector.push(Step::OneBase);
    Some(opt)
}

/// Evaluates a power of numbers when the result is rational.
///
/// `2^3 = 8`
/// `2^-1 = 1/2`
/// `(4/9)^(1/2) = 2/3`
/// `8^(2/3) = 4`
pub fn evaluate_power(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |lhs, rhs| {
        let base = lhs.as_number()?;
        let exp = rhs.as_number()?;

        if is_integer(exp) {
            return pow_rational(base, exp.numer()).map(Expr::number);
        }

        // rational exponent p/q: take the q-th root, then raise to p
        if base.cmp0() == Ordering::Less {
            return None;
        }
        let root = exp.denom().to_u32()?;
        let numer = exact_root(base.numer(), root)?;
        let denom = exact_root(base.denom(), root)?;
        pow_rational(&Rational::from((numer, denom)), exp.numer()).map(Expr::number)
    })?;

    step_collector.push(Step::EvaluatePower);
    Some(opt)
}

/// `(a^b)^c = a^(b*c)`, for integers `c`
pub fn power_of_power(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |lhs, rhs| {
        let c = rhs.as_number().filter(|n| is_integer(n))?;
        match lhs {
            Expr::Exp(base, b) => Some((**base).clone().pow((**b).clone() * Expr::number(c.clone()))),
            _ => None,
        }
    })?;

    step_collector.push(Step::PowerOfPower);
    Some(opt)
}

/// `(a*b)^n = a^n * b^n`, for integers `n`
pub fn power_of_product(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |lhs, rhs| {
        rhs.as_number().filter(|n| is_integer(n))?;
        match lhs {
            Expr::Mul(factors) => Some(Expr::Mul(
                factors.iter()
                    .map(|factor| factor.clone().pow(rhs.clone()))
                    .collect(),
            )),
            _ => None,
        }
    })?;

    step_collector.push(Step::PowerOfProduct);
    Some(opt)
}

/// Applies all power rules.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    power_zero(expr, step_collector)
        .or_else(|| power_one(expr, step_collector))
        .or_else(|| zero_base(expr, step_collector))
        .or_else(|| one_base(expr, step_collector))
        .or_else(|| evaluate_power(expr, step_collector))
        .or_else(|| power_of_power(expr, step_collector))
        .or_else(|| power_of_product(expr, step_collector))
}
