//! Variant model (component C4).
//!
//! A [`Variant`] stores its reference/alternative bases on both strands
//! and a single plus-strand anchor position, mirroring the source
//! representation: whichever strand the caller describes the variant on,
//! it is normalized to a plus-strand anchor (the 5' end of the reference
//! on the plus strand) at construction time.

use crate::nucleotide::{Base, ChromosomePosition};
use crate::sequence::{SplicedSequence, Strand};
use log::warn;

fn char_to_base(c: char) -> Base {
    match c.to_ascii_uppercase() {
        'A' => Base::Adenine,
        'C' => Base::Cytosine,
        'G' => Base::Guanine,
        'U' | 'T' => Base::Uracil,
        'X' => Base::Mask,
        other => {
            warn!("variant: illegal base character '{other}' -- treating as Mask");
            Base::Mask
        }
    }
}

fn parse_bases(s: &str) -> Vec<Base> {
    s.chars().filter(|&c| c != '-').map(char_to_base).collect()
}

fn reverse_complement_bases(bases: &[Base]) -> Vec<Base> {
    bases.iter().rev().map(|b| b.complement()).collect()
}

/// A single-nucleotide or short indel variant, anchored to the plus
/// strand and carrying its reference/alternative bases on both strands.
#[derive(Clone, Debug, PartialEq)]
pub struct Variant {
    id: String,
    chromosome: String,
    /// Plus-strand chromosome position of the 5' end of the reference sequence.
    anchor: ChromosomePosition,
    reference_plus: Vec<Base>,
    reference_minus: Vec<Base>,
    alternative_plus: Vec<Base>,
    alternative_minus: Vec<Base>,
    shift: i32,
}

impl Variant {
    /// Builds a variant from `reference`/`alternative` strings given on
    /// `strand` at `position` (the 5' end of the reference on `strand`).
    /// Internally normalizes to a plus-strand anchor: on `Strand::Minus`,
    /// `position` is the 5' end on the minus strand (the higher plus-strand
    /// coordinate), so the stored anchor is moved upstream by
    /// `reference.len() - 1`.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        chromosome: impl Into<String>,
        position: ChromosomePosition,
        strand: Strand,
        reference: &str,
        alternative: &str,
    ) -> Self {
        let reference_bases = parse_bases(reference);
        let alternative_bases = parse_bases(alternative);
        let shift = alternative_bases.len() as i32 - reference_bases.len() as i32;

        let (anchor, reference_plus, reference_minus, alternative_plus, alternative_minus) = match strand {
            Strand::Plus => {
                let reference_minus = reverse_complement_bases(&reference_bases);
                let alternative_minus = reverse_complement_bases(&alternative_bases);
                (position, reference_bases, reference_minus, alternative_bases, alternative_minus)
            }
            Strand::Minus => {
                let anchor = position.saturating_sub(reference_bases.len() as u32).saturating_add(1);
                let reference_plus = reverse_complement_bases(&reference_bases);
                let alternative_plus = reverse_complement_bases(&alternative_bases);
                (anchor, reference_plus, reference_bases, alternative_plus, alternative_bases)
            }
        };

        Self {
            id: id.into(),
            chromosome: chromosome.into(),
            anchor,
            reference_plus,
            reference_minus,
            alternative_plus,
            alternative_minus,
            shift,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    /// The length change `alternative.len() - reference.len()` applied
    /// downstream of the variant.
    #[must_use]
    pub fn shift(&self) -> i32 {
        self.shift
    }

    /// The reference sequence's 5' end on the plus strand.
    #[must_use]
    pub fn anchor(&self) -> ChromosomePosition {
        self.anchor
    }

    /// The reference sequence's 5' end on `strand`: equal to [`Self::anchor`]
    /// on the plus strand, or shifted to the reference's other end on the
    /// minus strand.
    #[must_use]
    pub fn anchor_position(&self, strand: Strand) -> ChromosomePosition {
        match strand {
            Strand::Plus => self.anchor,
            Strand::Minus => self.anchor + self.reference_len().saturating_sub(1),
        }
    }

    #[must_use]
    pub fn reference_len(&self) -> u32 {
        self.reference_plus.len() as u32
    }

    #[must_use]
    pub fn reference(&self, strand: Strand) -> &[Base] {
        match strand {
            Strand::Plus => &self.reference_plus,
            Strand::Minus => &self.reference_minus,
        }
    }

    #[must_use]
    pub fn alternative(&self, strand: Strand) -> &[Base] {
        match strand {
            Strand::Plus => &self.alternative_plus,
            Strand::Minus => &self.alternative_minus,
        }
    }

    /// Whether the whole reference interval lies on a single exon of
    /// `sequence` and its bases agree with the reference stored here.
    #[must_use]
    pub fn matches(&self, sequence: &SplicedSequence) -> bool {
        if self.chromosome != sequence.chromosome() {
            return false;
        }
        let length = self.reference_len();
        let last_reference_position = self.anchor.saturating_add(length).saturating_sub(1);
        let Some(exon) = sequence.exons().iter().find(|e| e.end >= last_reference_position) else {
            return false;
        };
        if exon.start > self.anchor {
            return false;
        }

        let strand = sequence.strand();
        let reference = self.reference(strand);
        let start = sequence.chromosome_to_sequence(self.anchor_position(strand));
        if start == 0 {
            return false;
        }
        reference
            .iter()
            .enumerate()
            .all(|(i, &base)| sequence.nucleotide_at(start + i as u32).is_some_and(|n| n.base() == base))
    }

    /// Applies this variant to `sequence`, returning the mutated copy.
    /// Equivalent to `sequence.mutate(self)`.
    #[must_use]
    pub fn apply_to(&self, sequence: &SplicedSequence) -> SplicedSequence {
        sequence.mutate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conservation::ConservationTable;
    use pretty_assertions::assert_eq;

    fn plus_seq() -> SplicedSequence {
        SplicedSequence::new(
            "t1",
            "AAAAAAAUAAGCUAAAAAAA",
            "chr1",
            Strand::Plus,
            &[1],
            &[20],
            &ConservationTable::empty(),
        )
    }

    fn minus_seq() -> SplicedSequence {
        SplicedSequence::new(
            "t2",
            "AAAAAAAUAAGCUAAAAAAA",
            "chr1",
            Strand::Minus,
            &[1],
            &[20],
            &ConservationTable::empty(),
        )
    }

    #[test]
    fn plus_strand_anchor_is_position() {
        let v = Variant::new("v1", "chr1", 8, Strand::Plus, "U", "C");
        assert_eq!(v.anchor(), 8);
        assert_eq!(v.anchor_position(Strand::Plus), 8);
    }

    #[test]
    fn minus_strand_anchor_moves_upstream_by_reference_length() {
        let v = Variant::new("v1", "chr1", 10, Strand::Minus, "AGC", "A");
        // position 10 is the 5' end on the minus strand, i.e. the high
        // plus-strand coordinate; the plus-strand anchor is 10-(3-1)=8.
        assert_eq!(v.anchor(), 8);
        assert_eq!(v.anchor_position(Strand::Minus), 10);
    }

    #[test]
    fn shift_is_alternative_minus_reference_length() {
        let insertion = Variant::new("ins", "chr1", 5, Strand::Plus, "A", "AGG");
        assert_eq!(insertion.shift(), 2);
        let deletion = Variant::new("del", "chr1", 5, Strand::Plus, "AGG", "A");
        assert_eq!(deletion.shift(), -2);
    }

    #[test]
    fn reference_minus_is_reverse_complement_of_reference_plus() {
        let v = Variant::new("v1", "chr1", 8, Strand::Plus, "UAAG", "C");
        assert_eq!(v.reference(Strand::Minus), &[Base::Cytosine, Base::Uracil, Base::Adenine, Base::Adenine]);
    }

    #[test]
    fn matches_on_plus_strand_reference() {
        // plus_seq position 8 is 'U' (1-indexed: AAAAAAA U AAGCU AAAAAAA)
        let v = Variant::new("v1", "chr1", 8, Strand::Plus, "U", "C");
        assert!(v.matches(&plus_seq()));
    }

    #[test]
    fn mismatched_reference_base_does_not_match() {
        let v = Variant::new("v1", "chr1", 8, Strand::Plus, "G", "C");
        assert!(!v.matches(&plus_seq()));
    }

    #[test]
    fn wrong_chromosome_does_not_match() {
        let v = Variant::new("v1", "chr2", 8, Strand::Plus, "U", "C");
        assert!(!v.matches(&plus_seq()));
    }

    #[test]
    fn out_of_bounds_position_does_not_match() {
        let v = Variant::new("v1", "chr1", 500, Strand::Plus, "U", "C");
        assert!(!v.matches(&plus_seq()));
    }

    #[test]
    fn matches_on_minus_strand_sequence_uses_minus_strand_reference() {
        // On the minus-strand sequence, chromosome position 8 reads as the
        // complement of the plus-strand base there ('U' -> 'A').
        let v = Variant::new("v1", "chr1", 8, Strand::Plus, "A", "C");
        assert!(v.matches(&minus_seq()));
    }
}
