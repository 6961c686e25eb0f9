use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use std::path::PathBuf;

/// Score how a variant deregulates a predicted miRNA target site.
///
/// Reads one miRNA sequence record, one mRNA sequence record, one variant
/// record and a predicted 3' target position, computes the mirSVR
/// downregulation score for the wild-type and mutant pairs, and prints
/// their signed difference to stdout.
#[derive(Parser, Debug)]
#[clap(name = "mirscore")]
#[clap(author, version)]
pub struct Args {
    /// Path to a file containing the miRNA sequence record.
    #[clap(long, short = 'i')]
    pub mirna: PathBuf,

    /// Path to a file containing the mRNA sequence record.
    #[clap(long, short = 'm')]
    pub mrna: PathBuf,

    /// Path to a file containing the variant record.
    #[clap(long, short = 'v')]
    pub variant: PathBuf,

    /// Chromosome position of the predicted 3' end of the target site, on
    /// the plus strand.
    #[clap(long, short = 'p')]
    pub predicted_position: u32,

    /// Path to the conservation-range TSV file.
    ///
    /// If omitted, every position scores 0.
    #[clap(long, short = 'c')]
    pub conservation: Option<PathBuf>,

    /// Path to the external RNA secondary-structure predictor executable.
    #[clap(long, default_value = "RNAplfold")]
    pub predictor: PathBuf,

    /// Make output more quiet or more verbose.
    #[clap(flatten)]
    pub verbose: Verbosity<WarnLevel>,

    /// Set verbosity level explicitly; overrides `--verbose`/`--quiet`.
    #[clap(long, global = true, conflicts_with = "verbose")]
    pub verbosity: Option<log::LevelFilter>,

    /// Disable all diagnostic output. Same as `--verbosity=off`.
    #[clap(long, global = true, conflicts_with = "verbose", conflicts_with = "verbosity")]
    pub silent: bool,
}

pub fn parse_cli_args() -> Args {
    Args::parse()
}
