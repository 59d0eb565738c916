use log::{info, warn};
use super::{
    analysis::{analyze_with, Analysis},
    error::AnalysisError,
    opts::AnalysisOptions,
};

/// The expression a dashboard shows before the user enters anything.
pub const DEFAULT_EXPRESSION: &str = "(x**3 + 2*x**2) / (x**2 - 1)";

/// Holds the analysis of the most recently submitted expression, for a front-end to display.
///
/// A failed submission clears the previous result, so the front-end never shows the analysis of
/// an expression other than the one the user last entered.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    current: Option<Analysis>,
    options: AnalysisOptions,
}

impl Dashboard {
    /// Creates an empty dashboard with the default [`AnalysisOptions`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty dashboard with the given options.
    pub fn with_options(options: AnalysisOptions) -> Self {
        Self { current: None, options }
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Analyzes `input` and makes it the current result.
    ///
    /// On failure, there is no current result afterwards, and the failure is logged.
    pub fn submit(&mut self, input: &str) -> Result<&Analysis, AnalysisError> {
        self.current = None;
        match analyze_with(input, &self.options) {
            Ok(analysis) => {
                info!("dashboard now shows `{}`", analysis.expr);
                Ok(self.current.insert(analysis))
            },
            Err(err) => {
                warn!("could not analyze `{}`: {}", input, err);
                Err(err)
            },
        }
    }

    /// Analyzes [`DEFAULT_EXPRESSION`] and makes it the current result.
    pub fn submit_default(&mut self) -> Result<&Analysis, AnalysisError> {
        self.submit(DEFAULT_EXPRESSION)
    }

    /// Returns the current result, if the last submission succeeded.
    pub fn current(&self) -> Option<&Analysis> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_clears_current() {
        let mut dashboard = Dashboard::new();
        assert!(dashboard.current().is_none());

        dashboard.submit("x^2").unwrap();
        assert!(dashboard.current().is_some());

        assert!(dashboard.submit("x +* 2").is_err());
        assert!(dashboard.current().is_none());
    }

    #[test]
    fn default_expression() {
        let mut dashboard = Dashboard::with_options(AnalysisOptions::default().samples(10));
        let analysis = dashboard.submit_default().unwrap();
        assert_eq!(analysis.vertical_asymptotes, vec![-1.0, 1.0]);
        assert_eq!(dashboard.current().map(|analysis| analysis.curve.points.len()), Some(10));
    }
}
