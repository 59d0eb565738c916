//! Sampling an expression for plotting.

use curvy_compute::{numerical::eval, symbolic::Expr};
use curvy_error::Error;
use log::trace;
use super::opts::AnalysisOptions;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An expression sampled at evenly spaced points.
///
/// Points where the expression is undefined, or whose magnitude exceeds the threshold, have no
/// y-value. They are gaps in the plot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SampledCurve {
    /// The sampled `(x, y)` points, in ascending order of x.
    pub points: Vec<(f64, Option<f64>)>,

    /// x-values the curve must not be drawn across, even if the samples on both sides are
    /// defined.
    pub breaks: Vec<f64>,
}

impl SampledCurve {
    /// Samples `expr` at `options.samples` evenly spaced points over `options.domain`, both ends
    /// included. The curve is also broken at every x-value in `breaks`.
    pub fn sample(expr: &Expr, options: &AnalysisOptions, breaks: &[f64]) -> Result<Self, Error> {
        let (min, max) = options.domain;
        let mut points = Vec::with_capacity(options.samples);
        for i in 0..options.samples {
            let x = if options.samples == 1 {
                min
            } else {
                min + (max - min) * i as f64 / (options.samples - 1) as f64
            };
            let y = eval(expr, &options.variable, x)?;
            let y = if y.is_finite() && y.abs() <= options.threshold {
                Some(y)
            } else {
                None
            };
            points.push((x, y));
        }

        let gaps = points.iter().filter(|(_, y)| y.is_none()).count();
        trace!("sampled `{}` at {} points, {} gaps", expr, points.len(), gaps);
        Ok(Self { points, breaks: breaks.to_vec() })
    }

    /// Returns the maximal runs of consecutive defined points that do not cross a break. Each run
    /// can be drawn as one connected line.
    pub fn segments(&self) -> Vec<Vec<(f64, f64)>> {
        let mut segments = Vec::new();
        let mut current: Vec<(f64, f64)> = Vec::new();

        for &(x, y) in &self.points {
            let crosses_break = current.last()
                .map_or(false, |&(last_x, _)| self.breaks.iter().any(|&b| last_x < b && b < x));
            if crosses_break || y.is_none() {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
            if let Some(y) = y {
                current.push((x, y));
            }
        }

        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }

    /// Returns the defined points.
    pub fn defined_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().filter_map(|&(x, y)| y.map(|y| (x, y)))
    }
}

#[cfg(test)]
mod tests {
    use curvy_parser::parser::{ast::expr::Expr as AstExpr, Parser};
    use pretty_assertions::assert_eq;
    use super::*;

    fn sample(input: &str, options: &AnalysisOptions, breaks: &[f64]) -> SampledCurve {
        let ast = Parser::new(input).try_parse_full::<AstExpr>().unwrap();
        let expr = Expr::from_ast(&ast, "x").unwrap();
        SampledCurve::sample(&expr, options, breaks).unwrap()
    }

    #[test]
    fn evenly_spaced() {
        let options = AnalysisOptions::default().domain(0.0, 4.0).samples(5);
        let curve = sample("x^2", &options, &[]);
        assert_eq!(curve.points, vec![
            (0.0, Some(0.0)),
            (1.0, Some(1.0)),
            (2.0, Some(4.0)),
            (3.0, Some(9.0)),
            (4.0, Some(16.0)),
        ]);
        assert_eq!(curve.segments().len(), 1);
    }

    #[test]
    fn threshold_makes_gaps() {
        let options = AnalysisOptions::default().domain(-2.0, 2.0).samples(5).threshold(3.0);
        let curve = sample("x^2", &options, &[]);
        assert_eq!(curve.points[0], (-2.0, None));
        assert_eq!(curve.points[4], (2.0, None));
        assert_eq!(curve.segments(), vec![vec![(-1.0, 1.0), (0.0, 0.0), (1.0, 1.0)]]);
    }

    #[test]
    fn undefined_points_make_gaps() {
        let options = AnalysisOptions::default().domain(-2.0, 2.0).samples(5);
        let curve = sample("1/x", &options, &[]);
        assert_eq!(curve.points[2], (0.0, None));
        assert_eq!(curve.segments().len(), 2);
    }

    #[test]
    fn breaks_split_segments() {
        let options = AnalysisOptions::default().domain(-1.0, 1.0).samples(2);
        let curve = sample("x", &options, &[0.0]);
        assert_eq!(curve.segments(), vec![vec![(-1.0, -1.0)], vec![(1.0, 1.0)]]);
    }

    #[test]
    fn never_exceeds_threshold() {
        let options = AnalysisOptions::default();
        let curve = sample("tan(x) + 1/(x - 3)", &options, &[]);
        assert!(curve.defined_points().all(|(_, y)| y.abs() <= options.threshold));
        assert_eq!(curve.points.len(), 1000);
    }
}
