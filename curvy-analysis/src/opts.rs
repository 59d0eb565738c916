use curvy_compute::symbolic::solve::SolveOptions;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options that control an analysis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnalysisOptions {
    /// The interval `(min, max)` that is sampled for plotting, and searched when roots cannot be
    /// found symbolically.
    ///
    /// The default value is `(-10.0, 10.0)`.
    pub domain: (f64, f64),

    /// The number of evenly spaced points sampled over the domain, including both ends.
    ///
    /// The default value is `1000`.
    pub samples: usize,

    /// Samples whose magnitude exceeds this value are left out of the plot.
    ///
    /// The default value is `50.0`.
    pub threshold: f64,

    /// Whether to search the domain numerically for solutions of equations that cannot be solved
    /// symbolically. When disabled, such equations cause the analysis to fail.
    ///
    /// The default value is `true`.
    pub numeric_fallback: bool,

    /// The name of the independent variable.
    ///
    /// The default value is `"x"`.
    pub variable: String,
}

/// The default options for an analysis. Returns an [`AnalysisOptions`] with the following values:
///
/// - [`domain`](AnalysisOptions::domain): `(-10.0, 10.0)`
/// - [`samples`](AnalysisOptions::samples): `1000`
/// - [`threshold`](AnalysisOptions::threshold): `50.0`
/// - [`numeric_fallback`](AnalysisOptions::numeric_fallback): `true`
/// - [`variable`](AnalysisOptions::variable): `"x"`
impl Default for AnalysisOptions {
    fn default() -> AnalysisOptions {
        AnalysisOptions {
            domain: (-10.0, 10.0),
            samples: 1000,
            threshold: 50.0,
            numeric_fallback: true,
            variable: String::from("x"),
        }
    }
}

impl AnalysisOptions {
    /// Set the domain. Returns an updated [`AnalysisOptions`] for chaining.
    pub fn domain(mut self, min: f64, max: f64) -> Self {
        self.domain = (min, max);
        self
    }

    /// Set the number of samples. Returns an updated [`AnalysisOptions`] for chaining.
    pub fn samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// Set the plotting threshold. Returns an updated [`AnalysisOptions`] for chaining.
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set whether to fall back to a numeric search for roots. Returns an updated
    /// [`AnalysisOptions`] for chaining.
    pub fn numeric_fallback(mut self, numeric_fallback: bool) -> Self {
        self.numeric_fallback = numeric_fallback;
        self
    }

    /// Set the name of the independent variable. Returns an updated [`AnalysisOptions`] for
    /// chaining.
    pub fn variable(mut self, variable: impl Into<String>) -> Self {
        self.variable = variable.into();
        self
    }

    /// Returns the options passed to the equation solver.
    pub(crate) fn solve_options(&self) -> SolveOptions {
        SolveOptions {
            window: self.domain,
            numeric_fallback: self.numeric_fallback,
        }
    }
}
