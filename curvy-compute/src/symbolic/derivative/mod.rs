//! Symbolic differentiation.
//!
//! [`derivative`] applies the sum, product, power and chain rules directly to the tree, without
//! simplifying the result. Callers should pass the result through
//! [`simplify`](crate::symbolic::simplify()) before displaying or analyzing it.

mod function;

use crate::primitive::rat;
use crate::consts::E;
use super::{error::Underivable, expr::Primary, Expr};

/// Returns `true` if the given [`Expr`] is "clearly" zero. This is intended to keep derivatives
/// small and is not mathematically rigorous.
fn is_trivially_zero(e: &Expr) -> bool {
    match e {
        Expr::Primary(Primary::Number(_)) => e.is_zero(),
        Expr::Add(sum) => sum.iter().all(is_trivially_zero),
        Expr::Mul(mul) => mul.iter().any(is_trivially_zero),
        _ => false,
    }
}

/// Returns `true` if the given [`Expr`] is "clearly" one. This is intended to keep derivatives
/// small and is not mathematically rigorous.
fn is_trivially_unity(e: &Expr) -> bool {
    match e {
        Expr::Primary(Primary::Number(_)) => e.is_one(),
        Expr::Mul(factors) => factors.iter().all(is_trivially_unity),
        Expr::Exp(_, exp) => exp.is_zero(),
        _ => false,
    }
}

/// Helper struct to build a product of expressions while applying basic simplification rules. If
/// any of the expressions are zero, the product is reduced to zero.
#[derive(Default)]
struct MultBuilder(Vec<Expr>);

impl From<MultBuilder> for Expr {
    fn from(value: MultBuilder) -> Self {
        Expr::Mul(value.0).downgrade()
    }
}

impl MultBuilder {
    fn mult(&mut self, e: Expr) {
        if self.0.first().map_or(false, is_trivially_zero) {
            return;
        }

        if is_trivially_zero(&e) {
            self.0 = vec![Expr::integer(0)];
        } else if !is_trivially_unity(&e) {
            self.0.push(e);
        }
    }
}

/// Helper struct to build a summation of expressions while applying basic simplification rules.
/// Only non-zero expressions are added to the sum.
#[derive(Default)]
struct SumBuilder(Vec<Expr>);

impl From<SumBuilder> for Expr {
    fn from(value: SumBuilder) -> Self {
        Expr::Add(value.0).downgrade()
    }
}

impl SumBuilder {
    fn add(&mut self, e: Expr) {
        if !is_trivially_zero(&e) {
            self.0.push(e);
        }
    }
}

/// `(f + g)' = f' + g'`
fn sum_rule(terms: &[Expr], with: &str) -> Result<Expr, Underivable> {
    let mut sum = SumBuilder::default();
    for term in terms {
        sum.add(derivative(term, with)?);
    }
    Ok(sum.into())
}

/// `(f * g * h)' = f' * g * h + f * g' * h + f * g * h'`
fn product_rule(product: &[Expr], with: &str) -> Result<Expr, Underivable> {
    let mut outer_sum = SumBuilder::default();

    for derivative_index in 0..product.len() {
        // constant factors contribute nothing on their own
        if !product[derivative_index].contains_symbol(with) {
            continue;
        }

        let mut inner_mult = MultBuilder::default();
        for (term_index, term) in product.iter().enumerate() {
            if derivative_index == term_index {
                inner_mult.mult(derivative(term, with)?);
            } else {
                inner_mult.mult(term.clone());
            }
        }

        outer_sum.add(inner_mult.into());
    }

    Ok(outer_sum.into())
}

/// Differentiates `base^exp`.
///
/// - `(u^n)' = n * u^(n-1) * u'` when `n` does not depend on the variable
/// - `(a^v)' = a^v * log(a) * v'` when `a` does not depend on the variable
/// - `(u^v)' = u^v * (v' * log(u) + v * u' / u)` otherwise
fn power_rule(base: &Expr, exp: &Expr, with: &str) -> Result<Expr, Underivable> {
    let base_varies = base.contains_symbol(with);
    let exp_varies = exp.contains_symbol(with);

    let mut mult = MultBuilder::default();
    match (base_varies, exp_varies) {
        (false, false) => return Ok(Expr::integer(0)),
        (true, false) => {
            let lowered = match exp.as_number() {
                Some(n) => Expr::number(n.clone() - rat(1)),
                None => exp.clone() + Expr::integer(-1),
            };
            mult.mult(exp.clone());
            mult.mult(base.clone().pow(lowered));
            mult.mult(derivative(base, with)?);
        },
        (false, true) => {
            mult.mult(base.clone().pow(exp.clone()));
            if base.as_symbol() != Some(E) {
                mult.mult(Expr::call("log", vec![base.clone()]));
            }
            mult.mult(derivative(exp, with)?);
        },
        (true, true) => {
            let mut inner = SumBuilder::default();

            let mut log_term = MultBuilder::default();
            log_term.mult(derivative(exp, with)?);
            log_term.mult(Expr::call("log", vec![base.clone()]));
            inner.add(log_term.into());

            let mut ratio_term = MultBuilder::default();
            ratio_term.mult(exp.clone());
            ratio_term.mult(derivative(base, with)?);
            ratio_term.mult(base.clone().recip());
            inner.add(ratio_term.into());

            mult.mult(base.clone().pow(exp.clone()));
            mult.mult(inner.into());
        },
    }

    Ok(mult.into())
}

/// Computes the derivative of the given expression with respect to the variable `with`. Returns
/// [`Err`] if the expression calls a function with no known derivative.
pub fn derivative(f: &Expr, with: &str) -> Result<Expr, Underivable> {
    if !f.contains_symbol(with) {
        return Ok(Expr::integer(0));
    }

    let expr = match f {
        Expr::Primary(Primary::Number(_)) => Expr::integer(0),
        Expr::Primary(Primary::Symbol(sym)) => {
            if sym == with {
                Expr::integer(1)
            } else {
                Expr::integer(0)
            }
        },
        Expr::Primary(Primary::Call(func, args)) => function::function_derivative(func, args, with)?,
        Expr::Add(terms) => sum_rule(terms, with)?,
        Expr::Mul(factors) => product_rule(factors, with)?,
        Expr::Exp(base, exp) => power_rule(base, exp, with)?,
    };

    if is_trivially_zero(&expr) {
        Ok(Expr::integer(0))
    } else {
        Ok(expr)
    }
}

#[cfg(test)]
pub mod tests {
    use crate::numerical::eval;
    use crate::symbolic::simplify;
    use curvy_parser::parser::{ast::Expr as AstExpr, Parser};
    use pretty_assertions::assert_eq;
    use rand::Rng;

    use super::*;

    fn parse(input: &str) -> Expr {
        let ast = Parser::new(input).try_parse_full::<AstExpr>().unwrap();
        Expr::from_ast(&ast, "x").unwrap()
    }

    /// Approximates the derivative of the expression with a central difference.
    fn finite_difference(e: &Expr, x: f64) -> f64 {
        const DX: f64 = 1e-6;
        (eval(e, "x", x + DX).unwrap() - eval(e, "x", x - DX).unwrap()) / (2.0 * DX)
    }

    /// Checks the symbolic derivative of `function` against a finite difference at the given
    /// points, and at a few random points in `range`.
    fn test_for_function(
        function: &'static str,
        points: impl IntoIterator<Item = f64>,
        range: std::ops::Range<f64>,
    ) {
        const TOL: f64 = 1e-4;

        let expr = parse(function);
        let symbolic = simplify(&derivative(&expr, "x").unwrap());

        let mut rng = rand::thread_rng();
        let random_points = (0..8).map(|_| rng.gen_range(range.clone())).collect::<Vec<_>>();

        for point in points.into_iter().chain(random_points) {
            let symbolically_computed = eval(&symbolic, "x", point).unwrap();
            let numerically_computed = finite_difference(&expr, point);
            let tol = TOL * numerically_computed.abs().max(1.0);

            assert!(
                (symbolically_computed - numerically_computed).abs() < tol,
                "for `{function}` at x={point}, symbolic derivative `{symbolic}` was \
                {symbolically_computed} but the finite difference was {numerically_computed}",
            );
        }
    }

    #[test]
    fn power_rule() {
        test_for_function("x^2 + x + 1", [0., 1., 2., 5., 8.], -10.0..10.0);
    }

    #[test]
    fn quotient() {
        test_for_function("(x**3 + 2*x**2) / (x**2 - 1)", [0., 2., -3., 0.5], 1.5..10.0);
    }

    #[test]
    fn trigonometry() {
        test_for_function("sin(2*x) * cos(x) + tan(x/3)", [0., 1., -2.], -3.0..3.0);
        test_for_function("asin(x/2) + acos(x/3) + atan(x^2)", [0., 0.5, -1.], -1.0..1.0);
    }

    #[test]
    fn exponential_and_logarithm() {
        test_for_function("exp(x^2) - 3*log(x)", [0.5, 1., 2.], 0.1..3.0);
        test_for_function("2^x + x^x", [0.5, 1., 2.], 0.1..3.0);
    }

    #[test]
    fn roots_and_abs() {
        test_for_function("sqrt(x^2 + 1) + abs(x - 1)", [-2., 0., 3.], 1.5..10.0);
        test_for_function("x^pi", [0.5, 1., 2.], 0.1..3.0);
    }

    #[test]
    fn exact_derivatives() {
        let expr = parse("x^2 - 4");
        assert_eq!(simplify(&derivative(&expr, "x").unwrap()), Expr::Mul(vec![
            Expr::integer(2),
            Expr::symbol("x"),
        ]));

        let second = derivative(&derivative(&expr, "x").unwrap(), "x").unwrap();
        assert_eq!(simplify(&second), Expr::integer(2));
    }

    #[test]
    fn constants_have_zero_derivative() {
        assert_eq!(derivative(&parse("pi^2 + e"), "x").unwrap(), Expr::integer(0));
    }

    #[test]
    fn unknown_function() {
        let expr = Expr::call("gamma", vec![Expr::symbol("x")]);
        assert_eq!(derivative(&expr, "x").unwrap_err().expr, "gamma(x)");
    }
}
