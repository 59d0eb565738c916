//! Simplification rules for expressions involving multiplication, including combining like
//! factors.

use crate::primitive::rat;
use crate::symbolic::{
    expr::Expr,
    simplify::{rules::do_multiply, step::Step},
    step_collector::StepCollector,
};

/// `0*a = 0`
/// `a*0 = 0`
pub fn multiply_zero(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors| {
        if factors.iter().any(Expr::is_zero) {
            Some(Expr::integer(0))
        } else {
            None
        }
    })?;

    // keep the step collection logic outside of the closure
    step_collector.push(Step::MultiplyZero);
    Some(opt)
}

/// `1*a = a`
/// `a*1 = a`
pub fn multiply_one(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors| {
        let new_factors = factors.iter()
            .filter(|factor| !factor.is_one())
            .cloned()
            .collect::<Vec<_>>();

        if new_factors.len() == factors.len() {
            None
        } else {
            Some(Expr::Mul(new_factors).downgrade())
        }
    })?;

    step_collector.push(Step::MultiplyOne);
    Some(opt)
}

/// Multiplies all numeric factors together, placing the product first.
///
/// `a*2*3 = 6*a`
pub fn multiply_numbers(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors| {
        let numbers = factors.iter().filter(|factor| factor.is_number()).count();
        if numbers < 2 {
            return None;
        }

        let mut product = rat(1);
        let mut new_factors = Vec::with_capacity(factors.len() - numbers + 1);
        for factor in factors {
            match factor.as_number() {
                Some(n) => product *= n,
                None => new_factors.push(factor.clone()),
            }
        }
        new_factors.insert(0, Expr::number(product));
        Some(Expr::Mul(new_factors).downgrade())
    })?;

    step_collector.push(Step::MultiplyNumbers);
    Some(opt)
}

/// Combines like factors by adding their exponents.
///
/// `a*a = a^2`
/// `a^2*a^3 = a^5`
/// `a*a^-1 = a^0`
pub fn combine_like_factors(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors| {
        /// Splits a factor into its base and exponent. Factors that are not powers have an
        /// exponent of 1.
        fn split_power(factor: &Expr) -> (&Expr, Expr) {
            match factor {
                Expr::Exp(base, exp) => (base, (**exp).clone()),
                _ => (factor, Expr::integer(1)),
            }
        }

        let mut new_factors: Vec<Expr> = Vec::with_capacity(factors.len());
        let mut groups: Vec<(&Expr, Expr)> = Vec::with_capacity(factors.len());
        let mut combined = false;
        for factor in factors {
            if factor.is_number() {
                new_factors.push(factor.clone());
                continue;
            }

            let (base, exp) = split_power(factor);
            match groups.iter_mut().find(|(other, _)| *other == base) {
                Some((_, sum)) => {
                    *sum += exp;
                    combined = true;
                },
                None => groups.push((base, exp)),
            }
        }

        if !combined {
            return None;
        }

        new_factors.extend(groups.into_iter().map(|(base, exp)| {
            if exp.is_one() {
                base.clone()
            } else {
                base.clone().pow(exp)
            }
        }));
        Some(Expr::Mul(new_factors).downgrade())
    })?;

    step_collector.push(Step::CombineLikeFactors);
    Some(opt)
}

/// Applies all multiplication rules.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    multiply_zero(expr, step_collector)
        .or_else(|| multiply_one(expr, step_collector))
        .or_else(|| multiply_numbers(expr, step_collector))
        .or_else(|| combine_like_factors(expr, step_collector))
}
