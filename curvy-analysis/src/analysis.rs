//! The analysis pipeline.
//!
//! The pipeline runs these stages in order, and fails as a whole if any of them fails:
//!
//! 1. Parse the input, convert it to a symbolic [`Expr`], simplify it, and rewrite rational
//!    sub-expressions as reduced fractions.
//! 2. Differentiate the expression twice.
//! 3. Solve `f = 0`, `f' = 0` and `f'' = 0` for the roots, critical points and inflection points.
//! 4. Find the vertical, horizontal and oblique asymptotes.
//! 5. Sample the expression over the domain for plotting.

use curvy_compute::symbolic::{
    derivative::derivative,
    error::{DivisionByZero, NoRealValues},
    limit::{limit_at_infinity, Direction},
    rational::{canonicalize, RationalFunction},
    simplify_with_steps,
    singularity::vertical_asymptotes,
    solve::{solve, Root},
    Expr,
};
use curvy_compute::numerical::eval;
use curvy_error::Error;
use curvy_parser::parser::{ast::expr::Expr as AstExpr, Parser};
use log::{debug, info};
use std::{fmt, ops::Range};
use super::{error::AnalysisError, opts::AnalysisOptions, sample::SampledCurve};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point on the graph of the function.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    /// The x-value, with its exact form if one is known.
    pub x: Root,

    /// The value of the function at `x`.
    pub y: f64,
}

/// A line `y = slope * x + intercept`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Line {
    pub slope: f64,
    pub intercept: f64,

    /// The exact right-hand side of the line's equation.
    pub expr: Expr,
}

/// The number of roots, critical points and inflection points of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Summary {
    pub roots: usize,
    pub critical_points: usize,
    pub inflection_points: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} root(s), {} critical point(s), {} inflection point(s)",
            self.roots, self.critical_points, self.inflection_points,
        )
    }
}

/// The result of analyzing a function.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Analysis {
    /// The name of the independent variable.
    pub variable: String,

    /// The simplified expression.
    pub expr: Expr,

    /// The simplified first derivative.
    pub first_derivative: Expr,

    /// The simplified second derivative.
    pub second_derivative: Expr,

    /// The distinct real roots, in ascending order.
    pub roots: Vec<Root>,

    /// The points where the first derivative is zero, in ascending order of x.
    pub critical_points: Vec<Point>,

    /// The points where the second derivative is zero, in ascending order of x.
    pub inflection_points: Vec<Point>,

    /// The x-values of the vertical asymptotes, in ascending order.
    pub vertical_asymptotes: Vec<f64>,

    /// The limit of the function as x goes to positive infinity, if it is finite.
    pub horizontal_asymptote_right: Option<f64>,

    /// The limit of the function as x goes to negative infinity, if it is finite.
    pub horizontal_asymptote_left: Option<f64>,

    /// The oblique asymptote. Only rational functions whose numerator is one degree higher than
    /// their non-constant denominator have one.
    pub oblique_asymptote: Option<Line>,

    /// The function sampled over the domain.
    pub curve: SampledCurve,
}

impl Analysis {
    /// Returns the number of roots, critical points and inflection points.
    pub fn summary(&self) -> Summary {
        Summary {
            roots: self.roots.len(),
            critical_points: self.critical_points.len(),
            inflection_points: self.inflection_points.len(),
        }
    }
}

/// Analyzes the expression in `input` with the default [`AnalysisOptions`].
pub fn analyze(input: &str) -> Result<Analysis, AnalysisError> {
    analyze_with(input, &AnalysisOptions::default())
}

/// Analyzes the expression in `input`.
pub fn analyze_with(input: &str, options: &AnalysisOptions) -> Result<Analysis, AnalysisError> {
    let var = options.variable.as_str();
    let whole = 0..input.len();

    let ast = Parser::new(input).try_parse_full::<AstExpr>()?;
    let converted = Expr::from_ast(&ast, var)?;
    let (simplified, steps) = simplify_with_steps(&converted);
    debug!("simplified `{}` to `{}` in {} step(s): {:?}", input, simplified, steps.len(), steps);
    let expr = canonicalize(&simplified, var);
    if converted.divides_by_zero() || expr.divides_by_zero() {
        return Err(AnalysisError::Evaluation(Error::new(
            vec![whole.clone()],
            DivisionByZero { expr: expr.to_string() },
        )));
    }

    let first_derivative = differentiate(&expr, var, &whole)?;
    let second_derivative = differentiate(&first_derivative, var, &whole)?;
    debug!("f' = `{}`, f'' = `{}`", first_derivative, second_derivative);

    let solve_options = options.solve_options();
    let solve_for = |equation: &Expr| {
        solve(equation, var, &solve_options)
            .map_err(|err| AnalysisError::Unsolvable(Error::new(vec![whole.clone()], err)))
    };
    let roots = solve_for(&expr)?;
    let critical_points = points_on(&expr, var, solve_for(&first_derivative)?, &whole)?;
    let inflection_points = points_on(&expr, var, solve_for(&second_derivative)?, &whole)?;

    let vertical_asymptotes = vertical_asymptotes(&expr, var, &solve_options);
    let horizontal_asymptote_right = limit_at_infinity(&expr, var, Direction::PosInfinity).finite();
    let horizontal_asymptote_left = limit_at_infinity(&expr, var, Direction::NegInfinity).finite();
    let oblique_asymptote = oblique_asymptote(&expr, var);

    let curve = SampledCurve::sample(&expr, options, &vertical_asymptotes)
        .map_err(|err| AnalysisError::Evaluation(with_span(err, &whole)))?;
    if curve.defined_points().next().is_none() {
        let (lo, hi) = options.domain;
        return Err(AnalysisError::Evaluation(Error::new(
            vec![whole.clone()],
            NoRealValues { expr: expr.to_string(), lo, hi },
        )));
    }

    let analysis = Analysis {
        variable: options.variable.clone(),
        expr,
        first_derivative,
        second_derivative,
        roots,
        critical_points,
        inflection_points,
        vertical_asymptotes,
        horizontal_asymptote_right,
        horizontal_asymptote_left,
        oblique_asymptote,
        curve,
    };
    info!("analyzed `{}`: {}", input, analysis.summary());
    Ok(analysis)
}

/// Differentiates and simplifies the expression.
fn differentiate(expr: &Expr, var: &str, whole: &Range<usize>) -> Result<Expr, AnalysisError> {
    derivative(expr, var)
        .map(|derivative| canonicalize(&derivative, var))
        .map_err(|err| AnalysisError::Underivable(Error::new(vec![whole.clone()], err)))
}

/// Pairs each x-value with the value of `expr` there, dropping the x-values where `expr` is
/// undefined.
fn points_on(
    expr: &Expr,
    var: &str,
    xs: Vec<Root>,
    whole: &Range<usize>,
) -> Result<Vec<Point>, AnalysisError> {
    let mut points = Vec::with_capacity(xs.len());
    for x in xs {
        let y = eval(expr, var, x.value)
            .map_err(|err| AnalysisError::Evaluation(with_span(err, whole)))?;
        if y.is_finite() {
            // no negative zero
            points.push(Point { x, y: y + 0.0 });
        }
    }
    Ok(points)
}

/// Returns the oblique asymptote of a rational function, if it has one.
fn oblique_asymptote(expr: &Expr, var: &str) -> Option<Line> {
    let quotient = RationalFunction::from_expr(expr, var)?.oblique_asymptote()?;
    Some(Line {
        slope: quotient.coeff(1).to_f64(),
        intercept: quotient.coeff(0).to_f64(),
        expr: quotient.to_expr(var),
    })
}

/// Points an error that is not tied to part of the input at the whole input.
fn with_span(mut err: Error, whole: &Range<usize>) -> Error {
    if err.spans.iter().all(|span| span.is_empty()) {
        err.spans = vec![whole.clone()];
    }
    err
}

/// Formats a number for display, with at most 6 decimal places and no trailing zeros.
fn fmt_value(value: f64) -> String {
    let formatted = format!("{:.6}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" => String::from("0"),
        trimmed => trimmed.to_owned(),
    }
}

fn fmt_root(root: &Root) -> String {
    match &root.exact {
        Some(exact) => exact.to_string(),
        None => format!("≈{}", fmt_value(root.value)),
    }
}

/// Writes a labelled, comma-separated list, or `none`.
fn fmt_list(f: &mut fmt::Formatter, label: &str, items: Vec<String>) -> fmt::Result {
    if items.is_empty() {
        writeln!(f, "{}: none", label)
    } else {
        writeln!(f, "{}: {}", label, items.join(", "))
    }
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let var = &self.variable;
        writeln!(f, "f({})   = {}", var, self.expr)?;
        writeln!(f, "f'({})  = {}", var, self.first_derivative)?;
        writeln!(f, "f''({}) = {}", var, self.second_derivative)?;

        let points = |points: &[Point]| points.iter()
            .map(|point| format!("({}, {})", fmt_root(&point.x), fmt_value(point.y)))
            .collect::<Vec<_>>();
        fmt_list(f, "roots", self.roots.iter().map(|root| format!("{} = {}", var, fmt_root(root))).collect())?;
        fmt_list(f, "critical points", points(&self.critical_points))?;
        fmt_list(f, "inflection points", points(&self.inflection_points))?;

        fmt_list(
            f,
            "vertical asymptotes",
            self.vertical_asymptotes.iter().map(|x| format!("{} = {}", var, fmt_value(*x))).collect(),
        )?;
        let horizontal = [
            (self.horizontal_asymptote_right, "∞"),
            (self.horizontal_asymptote_left, "-∞"),
        ]
            .into_iter()
            .filter_map(|(y, side)| y.map(|y| format!("y = {} as {} -> {}", fmt_value(y), var, side)))
            .collect();
        fmt_list(f, "horizontal asymptotes", horizontal)?;
        fmt_list(
            f,
            "oblique asymptote",
            self.oblique_asymptote.iter().map(|line| format!("y = {}", line.expr)).collect(),
        )?;

        write!(f, "{}", self.summary())
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use crate::dashboard::DEFAULT_EXPRESSION;
    use pretty_assertions::assert_eq;
    use super::*;

    fn values(roots: &[Root]) -> Vec<f64> {
        roots.iter().map(|root| root.value).collect()
    }

    #[test]
    fn formats_values() {
        assert_eq!(fmt_value(2.0), "2");
        assert_eq!(fmt_value(-0.0000001), "0");
        assert_eq!(fmt_value(1.4142135623), "1.414214");
        assert_eq!(fmt_value(-2.5), "-2.5");
    }

    #[test]
    fn derivatives_are_simplified() {
        let analysis = analyze("x^3 - 3*x").unwrap();
        assert_eq!(analysis.first_derivative.to_string(), "3*x^2 - 3");
        assert_eq!(analysis.second_derivative.to_string(), "6*x");
        assert_eq!(values(&analysis.roots).len(), 3);
        assert_eq!(
            analysis.critical_points.iter().map(|point| (point.x.value, point.y)).collect::<Vec<_>>(),
            vec![(-1.0, 2.0), (1.0, -2.0)],
        );
        assert_eq!(
            analysis.inflection_points.iter().map(|point| (point.x.value, point.y)).collect::<Vec<_>>(),
            vec![(0.0, 0.0)],
        );
    }

    #[test]
    fn removable_singularity_is_cancelled() {
        let analysis = analyze("(x^2 - 1)/(x - 1)").unwrap();
        assert_eq!(analysis.expr.to_string(), "x + 1");
        assert!(analysis.vertical_asymptotes.is_empty());
        assert_eq!(values(&analysis.roots), vec![-1.0]);
    }

    #[test]
    fn transcendental() {
        let analysis = analyze("x * exp(-x)").unwrap();
        assert_eq!(values(&analysis.roots), vec![0.0]);
        assert_eq!(analysis.critical_points.len(), 1);
        assert_float_absolute_eq!(analysis.critical_points[0].x.value, 1.0, 1e-9);
        assert_float_absolute_eq!(analysis.critical_points[0].y, (-1.0f64).exp(), 1e-9);
        assert_eq!(analysis.horizontal_asymptote_right, Some(0.0));
        assert_eq!(analysis.horizontal_asymptote_left, None);
        assert_eq!(analysis.oblique_asymptote, None);
    }

    #[test]
    fn display() {
        let analysis = analyze("x**2 - 4").unwrap();
        let report = analysis.to_string();
        assert!(report.contains("roots: x = -2, x = 2"));
        assert!(report.contains("critical points: (0, -4)"));
        assert!(report.contains("inflection points: none"));
        assert!(report.ends_with("2 root(s), 1 critical point(s), 0 inflection point(s)"));
    }

    #[test]
    fn other_variable() {
        let options = AnalysisOptions::default().variable("t");
        let analysis = analyze_with("t^2 - 9", &options).unwrap();
        assert_eq!(values(&analysis.roots), vec![-3.0, 3.0]);
        assert!(analysis.to_string().starts_with("f(t)   = t^2 - 9"));
    }

    #[test]
    fn numeric_fallback_disabled() {
        let options = AnalysisOptions::default().numeric_fallback(false);
        let err = analyze_with("cos(x) - x", &options).unwrap_err();
        assert!(matches!(err, AnalysisError::Unsolvable(_)));
        assert_eq!(err.errors()[0].spans, vec![0..10]);
    }

    #[test]
    fn division_by_zero() {
        for input in ["1/0", "x/(2 - 2)", "1/(x - x)"] {
            let err = analyze(input).unwrap_err();
            assert!(matches!(err, AnalysisError::Evaluation(_)), "`{}` should fail", input);
            assert!(err.errors()[0].is::<DivisionByZero>());
        }
    }

    #[test]
    fn undefined_everywhere() {
        let err = analyze("sqrt(-1 - x^2)").unwrap_err();
        assert!(matches!(err, AnalysisError::Evaluation(_)));
        assert!(err.errors()[0].is::<NoRealValues>());
    }

    #[test]
    fn critical_values_are_never_negative_zero() {
        let analysis = analyze(DEFAULT_EXPRESSION).unwrap();
        let origin = analysis.critical_points.iter()
            .find(|point| point.x.value == 0.0)
            .unwrap();
        assert_eq!(origin.y, 0.0);
        assert!(origin.y.is_sign_positive());
    }
}
