//! Simplification rules for expressions involving addition, including combining like terms.

use crate::primitive::{is_zero, rat};
use crate::symbolic::{
    expr::Expr,
    simplify::{rules::do_add, step::Step},
    step_collector::StepCollector,
};

/// `0+a = a`
/// `a+0 = a`
pub fn add_zero(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_add(expr, |terms| {
        let new_terms = terms.iter()
            .filter(|term| !term.is_zero())
            .cloned()
            .collect::<Vec<_>>();

        if new_terms.len() == terms.len() {
            None
        } else {
            Some(Expr::Add(new_terms).downgrade())
        }
    })?;

    // keep the step collection logic outside of the closure
    step_collector.push(Step::AddZero);
    Some(opt)
}

/// Adds all numeric terms together, placing the sum last.
///
/// `2+a+3 = a+5`
pub fn add_numbers(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_add(expr, |terms| {
        let numbers = terms.iter().filter(|term| term.is_number()).count();
        if numbers < 2 {
            return None;
        }

        let mut sum = rat(0);
        let mut new_terms = Vec::with_capacity(terms.len() - numbers + 1);
        for term in terms {
            match term.as_number() {
                Some(n) => sum += n,
                None => new_terms.push(term.clone()),
            }
        }
        new_terms.push(Expr::number(sum));
        Some(Expr::Add(new_terms).downgrade())
    })?;

    step_collector.push(Step::AddNumbers);
    Some(opt)
}

/// Combines like terms.
///
/// `a+a = 2a`
/// `a+a+a = 3a`
/// `2a+3a = 5a`
/// `a-a = 0`
pub fn combine_like_terms(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_add(expr, |terms| {
        // (coefficient, factors) pairs, in the order they first appear
        let mut groups: Vec<(rug::Rational, Expr)> = Vec::with_capacity(terms.len());
        for term in terms.iter().filter(|term| !term.is_number()) {
            let (coefficient, factors) = term.split_coefficient();
            match groups.iter_mut().find(|(_, other)| *other == factors) {
                Some((sum, _)) => *sum += coefficient,
                None => groups.push((coefficient, factors)),
            }
        }

        let non_numbers = terms.iter().filter(|term| !term.is_number()).count();
        if groups.len() == non_numbers {
            return None;
        }

        let mut new_terms = groups.into_iter()
            .filter(|(coefficient, _)| !is_zero(coefficient))
            .map(|(coefficient, factors)| {
                if coefficient == 1 {
                    factors
                } else {
                    Expr::number(coefficient) * factors
                }
            })
            .collect::<Vec<_>>();
        new_terms.extend(terms.iter().filter(|term| term.is_number()).cloned());

        Some(Expr::Add(new_terms).downgrade())
    })?;

    step_collector.push(Step::CombineLikeTerms);
    Some(opt)
}

/// Applies all addition rules.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    add_zero(expr, step_collector)
        .or_else(|| add_numbers(expr, step_collector))
        .or_else(|| combine_like_terms(expr, step_collector))
}
