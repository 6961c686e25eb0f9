//! mRNA:miRNA alignment engine (component C5).
//!
//! Three affine-gap score matrices (`O`, `Gx`, `Gy`) are filled over a
//! flat arena, then every traceback path from a best-scoring cell in the
//! last miRNA column back to the origin is enumerated depth-first,
//! sharing one column stack across the whole search instead of cloning a
//! prefix per branch.

mod matrix;
mod traceback;

use crate::nucleotide::{ChromosomePosition, IndelKind, MatchPosition, Nucleotide};
use crate::sequence::SplicedSequence;
use log::warn;

pub use matrix::AlignmentScore;

/// Which kind of seed match an alignment's first eight columns form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SeedType {
    EightMer,
    SevenMerM8,
    SevenMerA1,
    SixMer,
}

impl SeedType {
    /// The sequence-position offset (from the seed-match end) used by the
    /// UTR-distance feature: 9 for the two seed types whose eighth column
    /// is a confirmed match, 8 otherwise.
    #[must_use]
    pub fn seed_end_offset(self) -> u32 {
        match self {
            SeedType::EightMer | SeedType::SevenMerM8 => 9,
            SeedType::SevenMerA1 | SeedType::SixMer => 8,
        }
    }
}

/// One aligned column: an mRNA nucleotide, a miRNA nucleotide (either may
/// be a gap), the match type between them, and whether it falls in the
/// seed window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlignmentColumn {
    pub(crate) mrna: Nucleotide,
    pub(crate) mirna: Nucleotide,
    pub(crate) position: MatchPosition,
    pub(crate) indel: IndelKind,
}

impl AlignmentColumn {
    #[must_use]
    pub fn mrna_nucleotide(&self) -> Nucleotide {
        self.mrna
    }

    #[must_use]
    pub fn mirna_nucleotide(&self) -> Nucleotide {
        self.mirna
    }

    #[must_use]
    pub fn position(&self) -> MatchPosition {
        self.position
    }

    #[must_use]
    pub fn is_match(&self) -> bool {
        use crate::nucleotide::MatchIdentifier::Match;
        self.mrna.get_match(&self.mirna, self.position, self.indel).identifier() == Match
    }
}

/// A single co-optimal mRNA:miRNA alignment: its columns in 5'→3' miRNA
/// order (column 0 is the miRNA 5' end) and its total score.
#[derive(Clone, Debug, PartialEq)]
pub struct Alignment {
    columns: Vec<AlignmentColumn>,
    score: AlignmentScore,
}

impl Alignment {
    #[must_use]
    pub fn columns(&self) -> &[AlignmentColumn] {
        &self.columns
    }

    #[must_use]
    pub fn score(&self) -> AlignmentScore {
        self.score
    }

    /// Classifies the seed (first eight columns) per the fixed rule:
    /// `EightMer` needs columns 1..=6 and 7 all Match plus an Adenine at
    /// column 0; dropping either the A1 or the M8 condition degrades the
    /// class, dropping both yields `SixMer`.
    #[must_use]
    pub fn seed_type(&self) -> SeedType {
        use crate::nucleotide::Base::Adenine;
        let a1 = self.columns.first().is_some_and(|c| c.mrna.base() == Adenine);
        let m = self.columns.get(1..7).is_some_and(|cols| cols.iter().all(AlignmentColumn::is_match));
        let m8 = self.columns.get(7).is_some_and(AlignmentColumn::is_match);
        match (m && m8, a1) {
            (true, true) => SeedType::EightMer,
            (true, false) => SeedType::SevenMerM8,
            (false, true) => SeedType::SevenMerA1,
            (false, false) => SeedType::SixMer,
        }
    }
}

/// Computes every alignment of `mrna` (read 3'→5') against `miRNA` (read
/// 5'→3') whose score equals the maximum achievable over all endpoints in
/// the last miRNA column.
///
/// Either sequence being empty yields an empty list, matching the source
/// behaviour of skipping matrix construction entirely.
#[must_use]
pub fn alignments(mrna: &SplicedSequence, mirna: &SplicedSequence) -> Vec<Alignment> {
    let m = mrna.total_length() as usize;
    let n = mirna.total_length() as usize;
    if m == 0 || n == 0 {
        return Vec::new();
    }

    let arena = matrix::fill(mrna, mirna);
    let best = arena.best_row_scores(m, n);
    let mut alignments = Vec::new();
    for row in best {
        traceback::collect(&arena, row, n - 1, &mut alignments);
    }
    alignments
}

/// A 3' predicted binding window: the `len` nucleotides of `sequence`
/// whose 3' end sits at chromosome position `p` (after conversion to
/// sequence coordinates).
#[must_use]
pub fn window_for_alignment(sequence: &SplicedSequence, p: ChromosomePosition, len: u32) -> SplicedSequence {
    let seq_pos = sequence.chromosome_to_sequence(p);
    if seq_pos == 0 {
        warn!(
            "alignment window: position {p} does not map onto sequence {} -- returning empty window",
            sequence.id()
        );
    }
    sequence.window_ending_at(seq_pos, len)
}
