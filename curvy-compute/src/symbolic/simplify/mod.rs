//! Simplification of expressions.
//!
//! The simplifier rewrites an expression bottom-up: every child is simplified first, then the
//! [rules](rules) are applied to the parent until none of them match. Rewriting a node can create
//! new opportunities in its children (for example, combining `x*x` creates the exponent `1+1`), so
//! whole passes are repeated until the expression stops changing.
//!
//! Simplification does not check domains. `x/x` simplifies to `1`, even though the original
//! expression is undefined at `x = 0`.

pub mod fraction;
pub mod rules;
pub mod step;

use log::trace;
use super::{expr::{Expr, Primary}, step_collector::StepCollector};
use step::Step;

/// The maximum number of full passes over the expression.
const MAX_PASSES: usize = 64;

/// The maximum number of rules applied to a single node in one pass.
const MAX_REWRITES_PER_NODE: usize = 256;

/// Simplifies the given expression.
pub fn simplify(expr: &Expr) -> Expr {
    simplify_with(expr, &mut ())
}

/// Simplifies the given expression, returning the simplified expression and the steps taken to
/// simplify it.
pub fn simplify_with_steps(expr: &Expr) -> (Expr, Vec<Step>) {
    let mut steps = Vec::new();
    let expr = simplify_with(expr, &mut steps);
    (expr, steps)
}

/// Simplifies the given expression, reporting every rule that was applied to the step collector.
pub fn simplify_with(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Expr {
    let mut current = expr.clone();
    for pass in 0..MAX_PASSES {
        let next = simplify_pass(current.clone(), step_collector);
        if next == current {
            trace!("simplified `{}` to `{}` in {} pass(es)", expr, next, pass + 1);
            return next;
        }
        current = next;
    }

    trace!("simplification of `{}` stopped after {} passes", expr, MAX_PASSES);
    current
}

/// Simplifies every node of the expression once, children first.
fn simplify_pass(expr: Expr, step_collector: &mut dyn StepCollector<Step>) -> Expr {
    // rebuilding with the operators flattens nested sums and products
    let rebuilt = match expr {
        Expr::Primary(Primary::Call(name, args)) => Expr::Primary(Primary::Call(
            name,
            args.into_iter().map(|arg| simplify_pass(arg, step_collector)).collect(),
        )),
        Expr::Primary(primary) => Expr::Primary(primary),
        Expr::Add(terms) => terms.into_iter()
            .map(|term| simplify_pass(term, step_collector))
            .fold(Expr::Add(Vec::new()), |acc, term| acc + term)
            .downgrade(),
        Expr::Mul(factors) => factors.into_iter()
            .map(|factor| simplify_pass(factor, step_collector))
            .fold(Expr::Mul(Vec::new()), |acc, factor| acc * factor)
            .downgrade(),
        Expr::Exp(base, exp) => {
            simplify_pass(*base, step_collector).pow(simplify_pass(*exp, step_collector))
        },
    };

    let mut current = rebuilt;
    for _ in 0..MAX_REWRITES_PER_NODE {
        match rules::all(&current, step_collector) {
            Some(next) => current = next,
            None => break,
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use crate::primitive::rat;
    use curvy_parser::parser::{ast::expr::Expr as AstExpr, Parser};
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse_simplify(input: &str) -> Expr {
        let ast = Parser::new(input).try_parse_full::<AstExpr>().unwrap();
        simplify(&Expr::from_ast(&ast, "x").unwrap())
    }

    #[test]
    fn combine_like_terms() {
        assert_eq!(parse_simplify("x + x + x"), Expr::Mul(vec![
            Expr::integer(3),
            Expr::symbol("x"),
        ]));
    }

    #[test]
    fn cancel_terms() {
        assert_eq!(parse_simplify("2*x - x*2 + 5"), Expr::integer(5));
    }

    #[test]
    fn combine_like_factors() {
        assert_eq!(parse_simplify("x * x^2 * 3"), Expr::Mul(vec![
            Expr::integer(3),
            Expr::symbol("x").pow(Expr::integer(3)),
        ]));
    }

    #[test]
    fn cancel_factors() {
        assert_eq!(parse_simplify("sin(x) / sin(x)"), Expr::integer(1));
    }

    #[test]
    fn numeric_powers() {
        assert_eq!(parse_simplify("8^(2/3) + 2^-2"), Expr::number(rat((17, 4))));
        assert_eq!(parse_simplify("sqrt(4/9)"), Expr::number(rat((2, 3))));
    }

    #[test]
    fn irrational_powers_are_kept() {
        assert_eq!(parse_simplify("sqrt(2)"), Expr::integer(2).sqrt());
    }

    #[test]
    fn function_special_values() {
        assert_eq!(parse_simplify("cos(0) + log(e^x) + sin(x - x)"), Expr::Add(vec![
            Expr::symbol("x"),
            Expr::integer(1),
        ]));
    }

    #[test]
    fn power_of_product() {
        assert_eq!(parse_simplify("(2*x)^2"), Expr::Mul(vec![
            Expr::integer(4),
            Expr::symbol("x").pow(Expr::integer(2)),
        ]));
    }

    #[test]
    fn records_steps() {
        let ast = Parser::new("x + 0").try_parse_full::<AstExpr>().unwrap();
        let (expr, steps) = simplify_with_steps(&Expr::from_ast(&ast, "x").unwrap());

        assert_eq!(expr, Expr::symbol("x"));
        assert_eq!(steps, vec![Step::AddZero]);
    }

    #[test]
    fn idempotent() {
        let once = parse_simplify("(x**3 + 2*x**2) / (x**2 - 1) + x*x");
        assert_eq!(simplify(&once), once);
    }
}
