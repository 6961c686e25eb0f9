//! Record I/O (component C9): parsers for the three external input
//! record formats, plus the handful of hard-parse-failure
//! cases that cannot be recovered from by substitution (most input hygiene
//! problems are handled inside [`crate::sequence::SplicedSequence::new`],
//! [`crate::variant::Variant::new`] and
//! [`crate::conservation::ConservationTable::from_rows`] instead).

pub mod conservation;
pub mod fasta;
pub mod variant;

use thiserror::Error;

/// A record could not be parsed at all -- distinct from the recoverable,
/// logged-and-substituted problems each constructor already handles.
#[derive(Debug, Error)]
pub enum RecordParseError {
    #[error("sequence record has no header line")]
    MissingHeader,

    #[error("sequence record header has {0} pipe-separated fields, expected at least 5")]
    MalformedHeader(usize),

    #[error("strand field {0:?} is neither \"1\" nor \"-1\"")]
    MalformedStrand(String),

    #[error("could not parse position {0:?}: {1}")]
    MalformedPosition(String, std::num::ParseIntError),

    #[error("variant record has {0} fields, expected 6")]
    MalformedVariantRecord(usize),

    #[error("empty input")]
    EmptyInput,
}
