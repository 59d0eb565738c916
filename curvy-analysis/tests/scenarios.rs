use assert_float_eq::assert_float_absolute_eq;
use curvy_analysis::{analyze, analyze_with, AnalysisError, AnalysisOptions, Dashboard, DEFAULT_EXPRESSION};
use curvy_compute::symbolic::solve::Root;
use pretty_assertions::assert_eq;

fn values(roots: &[Root]) -> Vec<f64> {
    roots.iter().map(|root| root.value).collect()
}

#[test]
fn parabola() {
    let analysis = analyze("x**2 - 4").unwrap();
    assert_eq!(values(&analysis.roots), vec![-2.0, 2.0]);

    assert_eq!(analysis.critical_points.len(), 1);
    assert_eq!(analysis.critical_points[0].x.value, 0.0);
    assert_eq!(analysis.critical_points[0].y, -4.0);
    assert!(analysis.inflection_points.is_empty());

    assert!(analysis.vertical_asymptotes.is_empty());
    assert_eq!(analysis.horizontal_asymptote_right, None);
    assert_eq!(analysis.horizontal_asymptote_left, None);
    assert_eq!(analysis.oblique_asymptote, None);
}

#[test]
fn default_expression() {
    let analysis = analyze(DEFAULT_EXPRESSION).unwrap();
    assert_eq!(values(&analysis.roots), vec![-2.0, 0.0]);
    assert_eq!(analysis.vertical_asymptotes, vec![-1.0, 1.0]);
    assert_eq!(analysis.horizontal_asymptote_right, None);
    assert_eq!(analysis.horizontal_asymptote_left, None);

    let line = analysis.oblique_asymptote.as_ref().unwrap();
    assert_eq!(line.slope, 1.0);
    assert_eq!(line.intercept, 2.0);
    assert_eq!(line.expr.to_string(), "x + 2");
}

#[test]
fn reciprocal() {
    let analysis = analyze("1/x").unwrap();
    assert!(analysis.roots.is_empty());
    assert!(analysis.critical_points.is_empty());
    assert_eq!(analysis.vertical_asymptotes, vec![0.0]);
    assert_eq!(analysis.horizontal_asymptote_right, Some(0.0));
    assert_eq!(analysis.horizontal_asymptote_left, Some(0.0));
    assert_eq!(analysis.oblique_asymptote, None);
}

#[test]
fn malformed_input() {
    let err = analyze("x +* 2").unwrap_err();
    assert!(matches!(err, AnalysisError::Parse(_)));
    assert!(!err.errors().is_empty());

    for input in ["", "(x + 1", "x + y", "sin(x, 2)", "foo(x)"] {
        assert!(matches!(analyze(input), Err(AnalysisError::Parse(_))), "`{}` should not parse", input);
    }
}

#[test]
fn polynomial_root_count() {
    let analysis = analyze("(x - 1)*(x - 2)*(x - 3)*(x + 4)").unwrap();
    assert_eq!(values(&analysis.roots), vec![-4.0, 1.0, 2.0, 3.0]);

    let analysis = analyze("(x - 1)^2 * (x + 2)").unwrap();
    assert_eq!(values(&analysis.roots), vec![-2.0, 1.0]);

    let analysis = analyze("x^5 - 3*x + 1").unwrap();
    assert_eq!(analysis.roots.len(), 3);
}

#[test]
fn uncancelled_denominator_zeros() {
    let analysis = analyze("1/((x - 2)*(x + 3))").unwrap();
    assert_eq!(analysis.vertical_asymptotes, vec![-3.0, 2.0]);

    let analysis = analyze("(x - 2)/((x - 2)*(x + 3))").unwrap();
    assert_eq!(analysis.vertical_asymptotes, vec![-3.0]);
}

#[test]
fn horizontal_asymptotes() {
    let analysis = analyze("(2*x^2 + 1)/(x^2 + 3)").unwrap();
    assert_eq!(analysis.horizontal_asymptote_right, Some(2.0));
    assert_eq!(analysis.horizontal_asymptote_left, Some(2.0));

    let analysis = analyze("atan(x)").unwrap();
    assert_float_absolute_eq!(analysis.horizontal_asymptote_right.unwrap(), std::f64::consts::FRAC_PI_2);
    assert_float_absolute_eq!(analysis.horizontal_asymptote_left.unwrap(), -std::f64::consts::FRAC_PI_2);

    let analysis = analyze("sin(x)").unwrap();
    assert_eq!(analysis.horizontal_asymptote_right, None);
}

#[test]
fn algebraic_horizontal_asymptotes() {
    let analysis = analyze("x / sqrt(x^2 + 1)").unwrap();
    assert_float_absolute_eq!(analysis.horizontal_asymptote_right.unwrap(), 1.0);
    assert_float_absolute_eq!(analysis.horizontal_asymptote_left.unwrap(), -1.0);

    let analysis = analyze("sqrt(x^2 + 1) - x").unwrap();
    assert_float_absolute_eq!(analysis.horizontal_asymptote_right.unwrap(), 0.0);
    assert_eq!(analysis.horizontal_asymptote_left, None);

    let analysis = analyze("x - sqrt(x^2 + x)").unwrap();
    assert_float_absolute_eq!(analysis.horizontal_asymptote_right.unwrap(), -0.5);

    let analysis = analyze("log(x + 1) - log(x)").unwrap();
    assert_float_absolute_eq!(analysis.horizontal_asymptote_right.unwrap(), 0.0);
}

#[test]
fn flat_second_derivative() {
    let analysis = analyze("abs(x)").unwrap();
    assert!(analysis.inflection_points.is_empty());
    assert!(analysis.critical_points.len() <= 1);
}

#[test]
fn constant_division_by_zero() {
    for input in ["1/0", "0/0", "x + 1/(3 - 3)"] {
        assert!(matches!(analyze(input), Err(AnalysisError::Evaluation(_))), "`{}` should fail", input);
    }

    let mut dashboard = Dashboard::new();
    dashboard.submit("x^2").unwrap();
    assert!(dashboard.submit("1/0").is_err());
    assert!(dashboard.current().is_none());
}

#[test]
fn oblique_only_for_polynomial_ratios() {
    assert!(analyze("(x^2 + 1)/x").unwrap().oblique_asymptote.is_some());
    assert!(analyze("x^2 + 1").unwrap().oblique_asymptote.is_none());
    assert!(analyze("(x^3 + 1)/x").unwrap().oblique_asymptote.is_none());
    assert!(analyze("x + 1/x + sin(x)").unwrap().oblique_asymptote.is_none());
}

#[test]
fn idempotent() {
    for input in [DEFAULT_EXPRESSION, "x * exp(-x)", "tan(x)"] {
        assert_eq!(analyze(input).unwrap(), analyze(input).unwrap());
    }
}

#[test]
fn samples_stay_within_threshold() {
    let options = AnalysisOptions::default().threshold(20.0);
    let analysis = analyze_with(DEFAULT_EXPRESSION, &options).unwrap();
    assert_eq!(analysis.curve.points.len(), 1000);
    assert!(analysis.curve.defined_points().all(|(_, y)| y.abs() <= 20.0));

    // the curve is never drawn across x = -1 or x = 1
    for segment in analysis.curve.segments() {
        let (first, last) = (segment[0].0, segment[segment.len() - 1].0);
        assert!(!(first < -1.0 && -1.0 < last));
        assert!(!(first < 1.0 && 1.0 < last));
    }
}

#[test]
fn dashboard_keeps_latest_result() {
    let mut dashboard = Dashboard::new();
    dashboard.submit("x**2 - 4").unwrap();
    dashboard.submit("1/x").unwrap();
    assert_eq!(dashboard.current().unwrap().vertical_asymptotes, vec![0.0]);

    assert!(dashboard.submit("x +* 2").is_err());
    assert!(dashboard.current().is_none());
}
