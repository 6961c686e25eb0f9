//! Process-backed [`StructurePredictor`]: shells out to an external RNA
//! secondary-structure predictor (an RNAplfold-compatible tool), reads its
//! probability table back, and cleans up after itself.
//!
//! RNAplfold is invoked with the subsequence piped in on stdin and
//! `-L`/`-W`/`-u` selecting span/window/probe width; it drops two fixed-name
//! files (`plfold_lunp`, `plfold_dp.ps`) in its working directory. We run it
//! inside a fresh temp directory so a predictor invocation never collides
//! with another process's leftovers on those filenames, and the dot-plot
//! file is always removed before `predict` returns, success or failure.

use log::warn;
use mirscore_core::{CoreError, StructurePredictor};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

const COMMENT_LINES: usize = 2;
const OUTPUT_FILE: &str = "plfold_lunp";
const DOT_PLOT_FILE: &str = "plfold_dp.ps";

/// Invokes `executable` as an RNAplfold-compatible predictor.
#[derive(Clone, Debug)]
pub struct ProcessStructurePredictor {
    executable: PathBuf,
}

impl ProcessStructurePredictor {
    #[must_use]
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self { executable: executable.into() }
    }
}

impl StructurePredictor for ProcessStructurePredictor {
    fn predict(&self, subsequence: &str, span: u32, window: u32, probe_width: u32) -> Result<Vec<f64>, CoreError> {
        let workdir = tempfile::tempdir()
            .map_err(|e| CoreError::ExternalPredictorFailed(format!("could not create working directory: {e}")))?;

        let result = run_and_parse(&self.executable, workdir.path(), subsequence, span, window, probe_width);

        let dot_plot_path = workdir.path().join(DOT_PLOT_FILE);
        if dot_plot_path.exists() {
            if let Err(e) = std::fs::remove_file(&dot_plot_path) {
                warn!("structure predictor: could not remove dot-plot file {dot_plot_path:?}: {e}");
            }
        }

        result
    }
}

fn run_and_parse(
    executable: &Path,
    workdir: &Path,
    subsequence: &str,
    span: u32,
    window: u32,
    probe_width: u32,
) -> Result<Vec<f64>, CoreError> {
    let mut child = Command::new(executable)
        .current_dir(workdir)
        .arg("-L")
        .arg(span.to_string())
        .arg("-W")
        .arg(window.to_string())
        .arg("-u")
        .arg(probe_width.to_string())
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .spawn()
        .map_err(|e| CoreError::ExternalPredictorFailed(format!("could not spawn {executable:?}: {e}")))?;

    {
        let stdin = child
            .stdin
            .as_mut()
            .ok_or_else(|| CoreError::ExternalPredictorFailed("predictor stdin not captured".to_string()))?;
        writeln!(stdin, "{subsequence}")
            .map_err(|e| CoreError::ExternalPredictorFailed(format!("could not write predictor input: {e}")))?;
    }

    let status = child
        .wait()
        .map_err(|e| CoreError::ExternalPredictorFailed(format!("could not wait for predictor: {e}")))?;
    if !status.success() {
        return Err(CoreError::ExternalPredictorFailed(format!("predictor exited with {status}")));
    }

    let output_path = workdir.join(OUTPUT_FILE);
    let text = std::fs::read_to_string(&output_path)
        .map_err(|e| CoreError::ExternalPredictorFailed(format!("could not read predictor output {output_path:?}: {e}")))?;

    let probabilities = parse_lunp(&text)?;
    let _ = std::fs::remove_file(&output_path);
    Ok(probabilities)
}

/// Parses an RNAplfold `_lunp`-style table: `COMMENT_LINES` header lines,
/// then one line per position with the probability in the second
/// tab-separated column.
fn parse_lunp(text: &str) -> Result<Vec<f64>, CoreError> {
    let mut probabilities = Vec::new();
    for (row_index, line) in text.lines().enumerate().skip(COMMENT_LINES) {
        let mut columns = line.split('\t');
        columns.next();
        let Some(value) = columns.next() else {
            return Err(CoreError::ExternalPredictorFailed(format!("predictor output row {row_index} has no second column")));
        };
        let probability: f64 = value
            .trim()
            .parse()
            .map_err(|e| CoreError::ExternalPredictorFailed(format!("predictor output row {row_index}: {e}")))?;
        probabilities.push(probability);
    }
    Ok(probabilities)
}
