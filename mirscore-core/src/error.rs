//! Fatal error types. Recoverable input-hygiene problems are logged and
//! substituted in place (see the module docs of `sequence`, `conservation`
//! and `variant`); only the two fatal cases named in the scoring pipeline
//! are represented here, since every other failure mode is absorbed by a
//! documented recovery policy rather than propagated.

use thiserror::Error;

/// Errors that abort the evaluation of a single (variant, predicted-site)
/// pair. Every other input problem is recovered from and logged instead.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The external RNA secondary-structure predictor could not be run to
    /// completion, or its output could not be parsed.
    #[error("external structure predictor failed: {0}")]
    ExternalPredictorFailed(String),

    /// A resource bound (DP matrix size, alignment count, ...) was exceeded.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),
}
