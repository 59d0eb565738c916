use curvy_error::Error;
use std::{fmt, io};

/// The reason an analysis failed.
///
/// Analysis either succeeds completely or fails with one of these; there are no partial results.
#[derive(Debug)]
pub enum AnalysisError {
    /// The input is not a valid expression. Every problem found in the input is reported.
    Parse(Vec<Error>),

    /// The expression, or one of its derivatives, could not be differentiated.
    Underivable(Error),

    /// An equation could not be solved symbolically, and the numeric fallback is disabled.
    Unsolvable(Error),

    /// The expression could not be evaluated numerically.
    Evaluation(Error),
}

impl AnalysisError {
    /// Returns the errors contained in this [`AnalysisError`].
    pub fn errors(&self) -> &[Error] {
        match self {
            Self::Parse(errs) => errs,
            Self::Underivable(err) | Self::Unsolvable(err) | Self::Evaluation(err) => {
                std::slice::from_ref(err)
            },
        }
    }

    /// Report the errors in this [`AnalysisError`] to stderr.
    pub fn report_to_stderr(&self, src_id: &str, input: &str) -> io::Result<()> {
        for err in self.errors() {
            err.report_to_stderr(src_id, input)?;
        }
        Ok(())
    }

    /// Writes the reports of every error into a [`String`]. The output may contain ANSI color
    /// codes.
    pub fn report_to_string(&self, src_id: &str, input: &str) -> String {
        self.errors()
            .iter()
            .map(|err| err.report_to_string(src_id, input))
            .collect()
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(errs) if errs.len() == 1 => write!(f, "the input is not a valid expression"),
            Self::Parse(errs) => write!(f, "the input is not a valid expression ({} errors)", errs.len()),
            Self::Underivable(_) => write!(f, "the expression cannot be differentiated"),
            Self::Unsolvable(_) => write!(f, "an equation cannot be solved symbolically"),
            Self::Evaluation(_) => write!(f, "the expression cannot be evaluated"),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<Vec<Error>> for AnalysisError {
    fn from(errs: Vec<Error>) -> Self {
        Self::Parse(errs)
    }
}
