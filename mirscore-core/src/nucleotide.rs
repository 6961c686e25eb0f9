//! Nucleotide and match algebra (component C1).
//!
//! Scoring scheme is inherited from miRanda, since mirSVR was trained on
//! miRanda alignments: `IndelOpen -9`, `IndelExtend -4`, `Mismatch -3`,
//! `Masked -1`, `Wobble -1`, `Match +5`. Seed-window pairs score ×4.

use serde::{Deserialize, Serialize};

/// A position in sequence-internal coordinates, 1-based from the 5' end.
pub type SequencePosition = u32;

/// A position on a chromosome's plus strand, 1-based.
pub type ChromosomePosition = u32;

/// A per-nucleotide conservation score, as loaded from the conservation table.
pub type ConservationScore = f64;

/// One of the four RNA bases, a gap, or a masked (unknown) position.
///
/// `T` is accepted as an input synonym for `Uracil` but is never produced
/// as output: the model only ever reasons about RNA.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Base {
    Adenine,
    Cytosine,
    Guanine,
    Uracil,
    Gap,
    Mask,
}

impl Base {
    /// Watson-Crick / wobble complement. `Gap` and `Mask` complement to themselves.
    #[must_use]
    pub fn complement(self) -> Self {
        match self {
            Base::Adenine => Base::Uracil,
            Base::Uracil => Base::Adenine,
            Base::Cytosine => Base::Guanine,
            Base::Guanine => Base::Cytosine,
            Base::Gap => Base::Gap,
            Base::Mask => Base::Mask,
        }
    }

    #[must_use]
    pub fn is_gap(self) -> bool {
        matches!(self, Base::Gap)
    }
}

/// Which identifier a pair of nucleotides falls under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchIdentifier {
    IndelOpen,
    IndelExtend,
    Mismatch,
    Masked,
    Wobble,
    Match,
}

impl MatchIdentifier {
    fn base_score(self) -> i32 {
        match self {
            MatchIdentifier::Match => 5,
            MatchIdentifier::Mismatch => -3,
            MatchIdentifier::IndelExtend => -4,
            MatchIdentifier::IndelOpen => -9,
            MatchIdentifier::Wobble | MatchIdentifier::Masked => -1,
        }
    }
}

/// Whether an indel would be the first base of a gap run (`Open`) or a
/// continuation of one already started (`Extend`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IndelKind {
    Open,
    Extend,
}

/// Whether a column falls in the miRNA seed (positions 2-8, weighted x4)
/// or in the 3' region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatchPosition {
    Seed,
    ThreePrime,
}

/// The classified match state of a pair of nucleotides, with its integer score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchType {
    identifier: MatchIdentifier,
    score: i32,
}

impl MatchType {
    #[must_use]
    pub fn identifier(&self) -> MatchIdentifier {
        self.identifier
    }

    #[must_use]
    pub fn score(&self) -> i32 {
        self.score
    }
}

/// Seed-weight multiplier applied to column `j` (1-based miRNA column
/// index) as used by the alignment engine: the miRNA seed spans
/// positions 2..=8.
#[must_use]
pub fn seed_weight(one_based_mirna_column: u32) -> i32 {
    if (2..=8).contains(&one_based_mirna_column) {
        4
    } else {
        1
    }
}

/// Classifies and scores a pair of nucleotides. Commutative in `(a, b)`.
#[must_use]
pub fn pair(a: Base, b: Base, position: MatchPosition, indel: IndelKind) -> MatchType {
    use Base::{Adenine, Cytosine, Gap, Guanine, Mask, Uracil};
    use MatchIdentifier::{IndelExtend, IndelOpen, Masked, Mismatch, Wobble};

    let identifier = match (a, b) {
        (Mask, _) | (_, Mask) => Masked,
        (Gap, Gap) => unreachable!("a gap never pairs with a gap"),
        (Gap, _) | (_, Gap) => match indel {
            IndelKind::Open => IndelOpen,
            IndelKind::Extend => IndelExtend,
        },
        (Adenine, Uracil) | (Uracil, Adenine) => MatchIdentifier::Match,
        (Cytosine, Guanine) | (Guanine, Cytosine) => MatchIdentifier::Match,
        (Guanine, Uracil) | (Uracil, Guanine) => Wobble,
        _ => Mismatch,
    };
    let multiplier = match position {
        MatchPosition::Seed => 4,
        MatchPosition::ThreePrime => 1,
    };
    MatchType {
        identifier,
        score: identifier.base_score() * multiplier,
    }
}

/// An immutable nucleotide at a fixed position in both sequence-internal
/// and chromosome coordinates, carrying its conservation score.
///
/// Gaps (which never occur in a [`SplicedSequence`](crate::sequence::SplicedSequence),
/// only in alignment columns) would carry the position of their 5' neighbour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Nucleotide {
    base: Base,
    sequence_position: SequencePosition,
    chromosome_position: ChromosomePosition,
    conservation: ConservationScore,
}

impl Nucleotide {
    #[must_use]
    pub fn new(
        base: Base,
        sequence_position: SequencePosition,
        chromosome_position: ChromosomePosition,
        conservation: ConservationScore,
    ) -> Self {
        Self {
            base,
            sequence_position,
            chromosome_position,
            conservation,
        }
    }

    #[must_use]
    pub fn base(&self) -> Base {
        self.base
    }

    #[must_use]
    pub fn sequence_position(&self) -> SequencePosition {
        self.sequence_position
    }

    #[must_use]
    pub fn chromosome_position(&self) -> ChromosomePosition {
        self.chromosome_position
    }

    #[must_use]
    pub fn conservation(&self) -> ConservationScore {
        self.conservation
    }

    /// Match type between this nucleotide and another. Commutative.
    #[must_use]
    pub fn get_match(&self, other: &Nucleotide, position: MatchPosition, indel: IndelKind) -> MatchType {
        pair(self.base, other.base, position, indel)
    }
}
