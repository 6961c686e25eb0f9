//! Secondary-structure prediction capability.
//!
//! The feature extractor needs local accessibility probabilities around a
//! candidate site but must not hard-code a particular predictor binary or
//! invocation mechanism: that concern is pushed out to a trait so the core
//! stays a pure function of its inputs, mirroring how the alignment/scoring
//! stages never touch a process or a file.

use crate::error::CoreError;

/// A pluggable RNA secondary-structure predictor, invoked with the span,
/// window and sliding-probe-width parameters mirSVR was trained with.
///
/// `predict` returns one unpaired-probability estimate per position of
/// `subsequence`, in 5'->3' order. Implementations that shell out to an
/// external tool should map every failure (non-zero exit, missing output,
/// malformed row) to [`CoreError::ExternalPredictorFailed`] rather than
/// silently returning zeros or an empty vector.
pub trait StructurePredictor {
    fn predict(&self, subsequence: &str, span: u32, window: u32, probe_width: u32) -> Result<Vec<f64>, CoreError>;
}

/// A fixed-probability predictor for tests: returns `probability` at every
/// position regardless of `subsequence`.
#[derive(Clone, Copy, Debug)]
pub struct StubStructurePredictor {
    pub probability: f64,
}

impl StubStructurePredictor {
    #[must_use]
    pub fn new(probability: f64) -> Self {
        Self { probability }
    }
}

impl StructurePredictor for StubStructurePredictor {
    fn predict(&self, subsequence: &str, _span: u32, _window: u32, _probe_width: u32) -> Result<Vec<f64>, CoreError> {
        Ok(vec![self.probability; subsequence.chars().count()])
    }
}
