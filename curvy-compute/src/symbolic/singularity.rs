//! Non-removable singularities (vertical asymptotes).

use crate::numerical::{eval, eval_const};
use log::{debug, trace};
use std::f64::consts::PI;
use super::{
    expr::{Expr, Primary},
    rational::RationalFunction,
    simplify::simplify,
    solve::{polynomial_roots, solve, Root, SolveOptions, DEDUP_TOLERANCE},
};

/// Distances from a candidate at which the expression is sampled to decide whether it blows up.
const APPROACH_DISTANCES: [f64; 3] = [1e-3, 1e-6, 1e-9];

/// Returns the x-values in `options.window`, or anywhere for rational functions, where `expr`
/// has a vertical asymptote, sorted in ascending order.
///
/// For rational functions, these are the real roots of the reduced denominator, so removable
/// singularities like the one in `(x^2 - 1)/(x - 1)` are excluded exactly. For other
/// expressions, candidates are the zeros of every base raised to a negative power, the zeros of
/// every logarithm's argument, and the poles of every tangent. A candidate is kept only if the
/// expression grows without bound next to it.
pub fn vertical_asymptotes(expr: &Expr, var: &str, options: &SolveOptions) -> Vec<f64> {
    if let Some(function) = RationalFunction::from_expr(expr, var) {
        let asymptotes = polynomial_roots(&function.den)
            .into_iter()
            .map(|root| root.value)
            .collect::<Vec<_>>();
        debug!("vertical asymptotes of rational `{}`: {:?}", expr, asymptotes);
        return asymptotes;
    }

    let mut candidates = Vec::new();
    for node in expr.post_order_iter() {
        if let Some(target) = pole_equation(node, var) {
            // the numeric search is always allowed here: candidates are verified anyway
            let options = SolveOptions { numeric_fallback: true, ..*options };
            match solve_unfiltered(&target, var, &options) {
                Ok(roots) => candidates.extend(roots),
                Err(err) => trace!("could not solve for poles of `{}`: {:?}", node, err),
            }
        }
        if let Some(u) = node.as_call("tan").and_then(<[Expr]>::first) {
            candidates.extend(tangent_poles(u, var, options));
        }
    }

    let mut asymptotes = candidates.into_iter()
        .filter(|&x| x.is_finite() && blows_up(expr, var, x))
        .collect::<Vec<_>>();
    asymptotes.sort_by(f64::total_cmp);
    asymptotes.dedup_by(|a, b| (*a - *b).abs() <= DEDUP_TOLERANCE);
    debug!("vertical asymptotes of `{}`: {:?}", expr, asymptotes);
    asymptotes
}

/// If the node can be undefined where some expression is zero, returns that expression.
///
/// - `u^c` for negative `c`: `u`
/// - `log(u)`: `u`
fn pole_equation(node: &Expr, var: &str) -> Option<Expr> {
    match node {
        Expr::Exp(base, exp) if base.contains_symbol(var) && !exp.contains_symbol(var) => {
            let c = eval_const(exp).ok()?;
            if c < 0.0 {
                Some((**base).clone())
            } else {
                None
            }
        },
        Expr::Primary(Primary::Call(name, args)) if name == "log" || name == "ln" => args.first().cloned(),
        _ => None,
    }
}

/// Solves `expr = 0` without dropping roots where `expr` is undefined.
fn solve_unfiltered(expr: &Expr, var: &str, options: &SolveOptions) -> Result<Vec<f64>, super::error::Unsolvable> {
    // `solve` drops roots where the expression is undefined, which is exactly where poles of a
    // sub-expression may hide, so solve the numerator of rational bases directly
    if let Some(function) = RationalFunction::from_expr(expr, var) {
        return Ok(polynomial_roots(&function.num).into_iter().map(|root| root.value).collect());
    }
    Ok(solve(expr, var, options)?.into_iter().map(|root: Root| root.value).collect())
}

/// Returns the points in the window where `tan(u)` has a pole, i.e. where `cos(u) = 0`.
fn tangent_poles(u: &Expr, var: &str, options: &SolveOptions) -> Vec<f64> {
    // tan(a*x + b) has poles at x = (pi/2 + k*pi - b) / a, which would otherwise need a
    // numeric search
    if let Some(function) = RationalFunction::from_expr(u, var).filter(|f| f.is_polynomial()) {
        if function.num.degree() == Some(1) {
            let a = function.num.coeff(1).to_f64();
            let b = function.num.coeff(0).to_f64();
            let (lo, hi) = options.window;
            let (k_lo, k_hi) = {
                let k1 = ((a * lo + b) - PI / 2.0) / PI;
                let k2 = ((a * hi + b) - PI / 2.0) / PI;
                (k1.min(k2).floor() as i64, k1.max(k2).ceil() as i64)
            };
            return (k_lo..=k_hi)
                .map(|k| (PI / 2.0 + k as f64 * PI - b) / a)
                .filter(|x| (lo..=hi).contains(x))
                .collect();
        }
    }

    let cosine = simplify(&Expr::call("cos", vec![u.clone()]));
    let options = SolveOptions { numeric_fallback: true, ..*options };
    solve(&cosine, var, &options)
        .map(|roots| roots.into_iter().map(|root| root.value).collect())
        .unwrap_or_default()
}

/// Returns true if `expr` grows without bound as `x` approaches `x0` from either side.
///
/// On each side the magnitude is sampled at decreasing distances. The side blows up if a sample
/// is infinite, or if the magnitudes strictly increase, the nearest is at least twice the
/// farthest, and the nearest exceeds 1. Sides where the expression is undefined are ignored.
pub fn blows_up(expr: &Expr, var: &str, x0: f64) -> bool {
    [-1.0, 1.0].into_iter().any(|side| {
        let magnitudes = APPROACH_DISTANCES.iter()
            .map(|h| eval(expr, var, x0 + side * h * x0.abs().max(1.0)).map(f64::abs))
            .collect::<Result<Vec<_>, _>>();
        let Ok(magnitudes) = magnitudes else { return false };

        if magnitudes.iter().any(|m| m.is_nan()) {
            return false;
        }
        if magnitudes.iter().any(|m| m.is_infinite()) {
            return true;
        }

        let increasing = magnitudes.windows(2).all(|pair| pair[1] > pair[0]);
        let first = magnitudes[0];
        let last = magnitudes[magnitudes.len() - 1];
        increasing && last >= 2.0 * first && last > 1.0
    })
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use curvy_parser::parser::{ast::expr::Expr as AstExpr, Parser};
    use pretty_assertions::assert_eq;
    use super::*;

    fn asymptotes_of(input: &str) -> Vec<f64> {
        let ast = Parser::new(input).try_parse_full::<AstExpr>().unwrap();
        let expr = simplify(&Expr::from_ast(&ast, "x").unwrap());
        vertical_asymptotes(&expr, "x", &SolveOptions::default())
    }

    #[test]
    fn rational_functions() {
        assert_eq!(asymptotes_of("(x**3 + 2*x**2) / (x**2 - 1)"), vec![-1.0, 1.0]);
        assert_eq!(asymptotes_of("1/x"), vec![0.0]);
        assert_eq!(asymptotes_of("x^2 + 1"), Vec::<f64>::new());
    }

    #[test]
    fn removable_singularities() {
        assert!(asymptotes_of("(x^2 - 1)/(x - 1)").is_empty());
        assert!(asymptotes_of("sin(x)/x").is_empty());
    }

    #[test]
    fn logarithm() {
        assert_eq!(asymptotes_of("log(x)"), vec![0.0]);
        assert_eq!(asymptotes_of("log(x - 2) + x"), vec![2.0]);
    }

    #[test]
    fn non_rational_denominator() {
        assert_eq!(asymptotes_of("exp(x) / (x - 3)"), vec![3.0]);
        assert_eq!(asymptotes_of("1 / sqrt(x - 4)"), vec![4.0]);
    }

    #[test]
    fn tangent() {
        let asymptotes = asymptotes_of("tan(x)");
        assert_eq!(asymptotes.len(), 6);
        assert_float_absolute_eq!(asymptotes[3], PI / 2.0, 1e-12);
    }
}
