//! Logging setup. `mirscore-core` never touches stdout/stderr directly --
//! every diagnostic is a `log::*` call, and this is the one place that
//! facade is wired to an actual sink.

use clap_verbosity_flag::{Verbosity, WarnLevel};
use log::LevelFilter;

/// Resolves the effective verbosity from `--verbose`/`--quiet` repeats and
/// the `--verbosity`/`--silent` overrides, then installs `env_logger` as
/// the global `log` sink. Records go to stderr so stdout stays reserved
/// for the single score line `main` prints.
pub fn setup_logger(verbose: &Verbosity<WarnLevel>, verbosity: Option<LevelFilter>, silent: bool) {
    let filter_level = if silent {
        LevelFilter::Off
    } else {
        verbosity.unwrap_or_else(|| verbose.log_level_filter())
    };

    env_logger::Builder::new().filter_level(filter_level).format_timestamp(None).format_target(false).init();
}
