//! Analysis of real functions of one variable.
//!
//! Given the text of an expression such as `(x**3 + 2*x**2) / (x**2 - 1)`, [`analyze`] finds its
//! derivatives, roots, critical points, inflection points and asymptotes, and samples it for
//! plotting. The [`Dashboard`] holds the result of the most recent successful analysis for a
//! front-end to display.
//!
//! ```
//! use curvy_analysis::analyze;
//!
//! let analysis = analyze("x**2 - 4").unwrap();
//! let roots = analysis.roots.iter().map(|root| root.value).collect::<Vec<_>>();
//! assert_eq!(roots, vec![-2.0, 2.0]);
//! ```

pub mod analysis;
pub mod dashboard;
pub mod error;
pub mod opts;
pub mod sample;

pub use analysis::{analyze, analyze_with, Analysis, Line, Point, Summary};
pub use dashboard::{Dashboard, DEFAULT_EXPRESSION};
pub use error::AnalysisError;
pub use opts::AnalysisOptions;
pub use sample::SampledCurve;
