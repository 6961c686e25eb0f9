//! Strand-aware spliced-sequence model (component C3).
//!
//! A [`SplicedSequence`] maps between chromosome coordinates and
//! sequence-internal coordinates across a union of exons, on either
//! strand. It is immutable: every transformation (sub-sequencing,
//! reverse-complementing, mutating) returns a new value.

use crate::conservation::ConservationTable;
use crate::nucleotide::{Base, ChromosomePosition, Nucleotide, SequencePosition};
use log::warn;

/// The strand a spliced sequence is read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strand {
    Plus,
    Minus,
}

/// An exon on the plus strand: `start <= end`, both 1-based and inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Exon {
    pub start: ChromosomePosition,
    pub end: ChromosomePosition,
}

impl Exon {
    #[must_use]
    pub fn new(start: ChromosomePosition, end: ChromosomePosition) -> Self {
        Self { start, end }
    }

    /// `end - start + 1`, or `0` for the degenerate `end + 1 == start` case.
    #[must_use]
    pub fn len(&self) -> u32 {
        if self.end >= self.start {
            self.end - self.start + 1
        } else {
            0
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn overlaps_or_touches(&self, other: &Exon) -> bool {
        self.start <= other.end.saturating_add(1) && other.start <= self.end.saturating_add(1)
    }

    fn merge(&self, other: &Exon) -> Exon {
        Exon::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// Pairs sorted starts with the first unconsumed end `>= start`, drops
/// surplus endpoints, and merges overlapping/adjacent pairs. Every
/// recovery step is logged, per the constructor's recovery policy.
fn build_exons(starts: &[ChromosomePosition], ends: &[ChromosomePosition]) -> Vec<Exon> {
    let mut starts = starts.to_vec();
    let mut ends = ends.to_vec();
    starts.sort_unstable();
    ends.sort_unstable();

    let mut unmerged = Vec::new();
    let mut end_idx = 0;
    for &start in &starts {
        while end_idx < ends.len() && ends[end_idx] < start {
            end_idx += 1;
        }
        if end_idx >= ends.len() {
            warn!("spliced sequence: exon start {start} has no matching end -- dropping");
            break;
        }
        unmerged.push(Exon::new(start, ends[end_idx]));
        end_idx += 1;
    }
    if end_idx < ends.len() {
        warn!(
            "spliced sequence: {} surplus exon end(s) with no matching start -- dropping",
            ends.len() - end_idx
        );
    }

    let mut merged: Vec<Exon> = Vec::new();
    for exon in unmerged {
        match merged.last_mut() {
            Some(last) if last.overlaps_or_touches(&exon) => {
                warn!(
                    "spliced sequence: merging overlapping/adjacent exons {:?} and {:?}",
                    last, exon
                );
                *last = last.merge(&exon);
            }
            _ => merged.push(exon),
        }
    }
    merged
}

/// Converts a raw base character to a [`Base`], recovering from illegal
/// characters by substituting [`Base::Mask`] and logging, per the
/// constructor's recovery policy. `T`/`t` map to `Uracil`. `-` is not
/// handled here: callers drop it before reaching this point.
fn char_to_base(c: char) -> Base {
    match c.to_ascii_uppercase() {
        'A' => Base::Adenine,
        'C' => Base::Cytosine,
        'G' => Base::Guanine,
        'U' => Base::Uracil,
        'T' => {
            warn!("spliced sequence: base 'T' treated as Uracil");
            Base::Uracil
        }
        'X' => Base::Mask,
        other => {
            warn!("spliced sequence: illegal base character '{other}' -- treating as Mask");
            Base::Mask
        }
    }
}

/// An immutable, strand-aware sequence spliced together from a union of
/// exons. Used for both mRNA and miRNA inputs: the model is identical,
/// only the alignment engine treats the two roles differently.
#[derive(Clone, Debug, PartialEq)]
pub struct SplicedSequence {
    id: String,
    chromosome: String,
    strand: Strand,
    exons: Vec<Exon>,
    nucleotides: Vec<Nucleotide>,
}

impl SplicedSequence {
    /// Builds a spliced sequence from a raw base string and chromosome
    /// exon coordinates, looking up each nucleotide's conservation score
    /// from `conservation`.
    ///
    /// Recovery policy (all logged, never fatal): case-insensitive input;
    /// `T` is read as `U`; `-` is a gap and is dropped; any other
    /// character becomes `Mask`; exon starts/ends are sorted and paired
    /// independently, with surplus endpoints dropped and
    /// overlapping/adjacent pairs merged; if the base count doesn't match
    /// the summed exon length, the sequence is truncated or padded with
    /// `Mask`.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        raw_bases: &str,
        chromosome: impl Into<String>,
        strand: Strand,
        exon_starts: &[ChromosomePosition],
        exon_ends: &[ChromosomePosition],
        conservation: &ConservationTable,
    ) -> Self {
        let id = id.into();
        let chromosome = chromosome.into();
        let exons = build_exons(exon_starts, exon_ends);
        let target_length: u32 = exons.iter().map(Exon::len).sum();

        let mut bases: Vec<Base> = Vec::with_capacity(raw_bases.len());
        for c in raw_bases.chars() {
            if c == '-' {
                continue;
            }
            bases.push(char_to_base(c));
        }

        if bases.len() as u32 != target_length {
            warn!(
                "spliced sequence {id}: {} bases parsed but exons require {target_length} -- truncating/padding with Mask",
                bases.len()
            );
        }
        bases.resize(target_length as usize, Base::Mask);

        let mut nucleotides = Vec::with_capacity(target_length as usize);
        let mut base_iter = bases.into_iter();
        let exon_walk: Box<dyn Iterator<Item = &Exon>> = if strand == Strand::Plus {
            Box::new(exons.iter())
        } else {
            Box::new(exons.iter().rev())
        };
        let mut seq_pos: SequencePosition = 0;
        for exon in exon_walk {
            let positions: Box<dyn Iterator<Item = ChromosomePosition>> = if strand == Strand::Plus {
                Box::new(exon.start..=exon.end)
            } else {
                Box::new((exon.start..=exon.end).rev())
            };
            for chr_pos in positions {
                let Some(base) = base_iter.next() else { break };
                seq_pos += 1;
                let score = conservation.score_at(&chromosome, chr_pos);
                nucleotides.push(Nucleotide::new(base, seq_pos, chr_pos, score));
            }
        }

        Self {
            id,
            chromosome,
            strand,
            exons,
            nucleotides,
        }
    }

    fn empty_like(&self) -> Self {
        Self {
            id: self.id.clone(),
            chromosome: self.chromosome.clone(),
            strand: self.strand,
            exons: Vec::new(),
            nucleotides: Vec::new(),
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

    #[must_use]
    pub fn strand(&self) -> Strand {
        self.strand
    }

    #[must_use]
    pub fn exons(&self) -> &[Exon] {
        &self.exons
    }

    #[must_use]
    pub fn total_length(&self) -> u32 {
        self.nucleotides.len() as u32
    }

    #[must_use]
    pub fn nucleotides(&self) -> &[Nucleotide] {
        &self.nucleotides
    }

    /// The nucleotide at 1-based sequence position `pos`, if in range.
    #[must_use]
    pub fn nucleotide_at(&self, pos: SequencePosition) -> Option<&Nucleotide> {
        if pos == 0 {
            return None;
        }
        self.nucleotides.get(pos as usize - 1)
    }

    /// Maps a chromosome position to this sequence's internal coordinate,
    /// or `0` if the position is intronic or out of range.
    #[must_use]
    pub fn chromosome_to_sequence(&self, pos: ChromosomePosition) -> SequencePosition {
        let mut prefix = 0u32;
        for exon in &self.exons {
            if pos >= exon.start && pos <= exon.end {
                return if self.strand == Strand::Plus {
                    prefix + (pos - exon.start) + 1
                } else {
                    self.total_length() - prefix - (pos - exon.start)
                };
            }
            prefix += exon.len();
        }
        0
    }

    /// Sub-sequence spanning sequence positions `[from, to]`, clamped to
    /// the sequence's bounds. Sequence positions are renumbered from 1;
    /// chromosome positions and exon boundaries are preserved/recomputed.
    #[must_use]
    pub fn subsequence_from_to(&self, from: SequencePosition, to: SequencePosition) -> Self {
        let len = self.total_length();
        if len == 0 || from == 0 && to == 0 {
            return self.empty_like();
        }
        let from = from.clamp(1, len);
        let to = to.clamp(1, len);
        if from > to {
            return self.empty_like();
        }

        let slice = &self.nucleotides[(from as usize - 1)..(to as usize)];
        let mut exons = Vec::new();
        let mut start = slice[0].chromosome_position();
        let mut end = start;
        for pair in slice.windows(2) {
            let prev = pair[0].chromosome_position();
            let cur = pair[1].chromosome_position();
            let contiguous = match self.strand {
                Strand::Plus => cur == prev + 1,
                Strand::Minus => cur + 1 == prev,
            };
            if contiguous {
                end = cur;
            } else {
                exons.push(Exon::new(start.min(end), start.max(end)));
                start = cur;
                end = cur;
            }
        }
        exons.push(Exon::new(start.min(end), start.max(end)));
        exons.sort();

        let nucleotides = slice
            .iter()
            .enumerate()
            .map(|(i, n)| Nucleotide::new(n.base(), i as u32 + 1, n.chromosome_position(), n.conservation()))
            .collect();

        Self {
            id: self.id.clone(),
            chromosome: self.chromosome.clone(),
            strand: self.strand,
            exons,
            nucleotides,
        }
    }

    /// Sub-sequence between two chromosome positions. For a minus-strand
    /// sequence, `from`/`to` are swapped before conversion so that the
    /// result is always ordered 5' to 3' in sequence coordinates.
    #[must_use]
    pub fn subsequence_chr_from_to(&self, from: ChromosomePosition, to: ChromosomePosition) -> Self {
        let (from, to) = if self.strand == Strand::Minus { (to, from) } else { (from, to) };
        self.subsequence_from_to(self.chromosome_to_sequence(from), self.chromosome_to_sequence(to))
    }

    /// The `len` nucleotides whose 3' end sits at sequence position `p`,
    /// i.e. `[p - len + 1, p]` clamped to the sequence.
    #[must_use]
    pub fn window_ending_at(&self, p: SequencePosition, len: u32) -> Self {
        let from = p.saturating_sub(len.saturating_sub(1)).max(1);
        self.subsequence_from_to(from, p)
    }

    /// Reverses nucleotide order, complements every base, flips the
    /// strand, and renumbers sequence positions. Exon coordinates (on the
    /// plus strand) are unchanged. Applying this twice restores the
    /// original base identities and exon layout.
    #[must_use]
    pub fn reverse_complement(&self) -> Self {
        let nucleotides = self
            .nucleotides
            .iter()
            .rev()
            .enumerate()
            .map(|(i, n)| Nucleotide::new(n.base().complement(), i as u32 + 1, n.chromosome_position(), n.conservation()))
            .collect();
        Self {
            id: self.id.clone(),
            chromosome: self.chromosome.clone(),
            strand: match self.strand {
                Strand::Plus => Strand::Minus,
                Strand::Minus => Strand::Plus,
            },
            exons: self.exons.clone(),
            nucleotides,
        }
    }

    /// Splices in the variant's alternative bases in place of its
    /// reference interval, shifting everything downstream in both
    /// sequence and chromosome coordinates, and widening/shrinking the
    /// exons downstream of the anchor. Returns an unchanged copy (logged)
    /// if the variant does not match this sequence.
    #[must_use]
    pub fn mutate(&self, variant: &crate::variant::Variant) -> Self {
        if !variant.matches(self) {
            warn!(
                "spliced sequence {}: variant {} does not match -- returning unchanged copy",
                self.id,
                variant.id()
            );
            return self.clone();
        }

        let shift = variant.shift();
        // The splice point is located using the position on *this*
        // sequence's own strand, but exon-boundary shifts are always
        // compared against the plus-strand anchor: the source exon
        // coordinates are plus-strand regardless of which strand this
        // sequence reads from.
        let strand_anchor = variant.anchor_position(self.strand);
        let plus_anchor = variant.anchor();
        let reference_len = variant.reference_len();
        let alternative = variant.alternative(self.strand);

        let change_begin_seq = self.chromosome_to_sequence(strand_anchor);
        let change_begin = change_begin_seq as usize - 1;
        let change_end = change_begin + reference_len as usize;

        let mut nucleotides = Vec::with_capacity((self.total_length() as i64 + shift as i64).max(0) as usize);
        let mut seq_pos: SequencePosition = 0;

        for n in &self.nucleotides[..change_begin] {
            seq_pos += 1;
            let chr = if self.strand == Strand::Plus {
                n.chromosome_position()
            } else {
                (n.chromosome_position() as i64 + shift as i64) as ChromosomePosition
            };
            nucleotides.push(Nucleotide::new(n.base(), seq_pos, chr, n.conservation()));
        }

        let mut chr_cursor = strand_anchor as i64;
        for &base in alternative {
            seq_pos += 1;
            nucleotides.push(Nucleotide::new(base, seq_pos, chr_cursor as ChromosomePosition, 0.0));
            chr_cursor += if self.strand == Strand::Plus { 1 } else { -1 };
        }

        for n in &self.nucleotides[change_end..] {
            seq_pos += 1;
            let chr = if self.strand == Strand::Plus {
                (n.chromosome_position() as i64 + shift as i64) as ChromosomePosition
            } else {
                n.chromosome_position()
            };
            nucleotides.push(Nucleotide::new(n.base(), seq_pos, chr, n.conservation()));
        }

        let exons = self
            .exons
            .iter()
            .map(|exon| {
                if shift == 0 || exon.end < plus_anchor {
                    *exon
                } else if exon.start < plus_anchor {
                    Exon::new(exon.start, (exon.end as i64 + shift as i64) as ChromosomePosition)
                } else {
                    Exon::new(
                        (exon.start as i64 + shift as i64) as ChromosomePosition,
                        (exon.end as i64 + shift as i64) as ChromosomePosition,
                    )
                }
            })
            .collect();

        Self {
            id: format!("{}:{}", self.id, variant.id()),
            chromosome: self.chromosome.clone(),
            strand: self.strand,
            exons,
            nucleotides,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::Variant;
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
    fn total_length_matches_exon_sum() {
        let seq = plus_seq();
        assert_eq!(seq.total_length(), 20);
    }

    #[test]
    fn chromosome_round_trip_plus_strand() {
        let seq = plus_seq();
        for chr_pos in 1..=20u32 {
            let seq_pos = seq.chromosome_to_sequence(chr_pos);
            assert_eq!(seq.nucleotide_at(seq_pos).unwrap().chromosome_position(), chr_pos);
        }
    }

    #[test]
    fn chromosome_round_trip_minus_strand() {
        let seq = minus_seq();
        for chr_pos in 1..=20u32 {
            let seq_pos = seq.chromosome_to_sequence(chr_pos);
            assert_eq!(seq.nucleotide_at(seq_pos).unwrap().chromosome_position(), chr_pos);
        }
    }

    #[test]
    fn intronic_position_returns_zero() {
        let seq = plus_seq();
        assert_eq!(seq.chromosome_to_sequence(500), 0);
    }

    #[test]
    fn double_reverse_complement_restores_bases_and_exons() {
        let seq = plus_seq();
        let twice = seq.reverse_complement().reverse_complement();
        assert_eq!(twice.exons(), seq.exons());
        let original_bases: Vec<_> = seq.nucleotides().iter().map(Nucleotide::base).collect();
        let restored_bases: Vec<_> = twice.nucleotides().iter().map(Nucleotide::base).collect();
        assert_eq!(original_bases, restored_bases);
    }

    #[test]
    fn minus_strand_is_complemented_and_reversed() {
        let seq = plus_seq();
        let rc = seq.reverse_complement();
        assert_eq!(rc.strand(), Strand::Minus);
        assert_eq!(rc.nucleotide_at(1).unwrap().base(), seq.nucleotide_at(20).unwrap().base().complement());
    }

    #[test]
    fn illegal_chars_become_mask() {
        let seq = SplicedSequence::new("t3", "AAZZA", "chr1", Strand::Plus, &[1], &[5], &ConservationTable::empty());
        assert_eq!(seq.nucleotide_at(3).unwrap().base(), Base::Mask);
        assert_eq!(seq.nucleotide_at(4).unwrap().base(), Base::Mask);
    }

    #[test]
    fn non_matching_variant_leaves_sequence_unchanged() {
        let seq = plus_seq();
        let variant = Variant::new("v1", "chr1", 500, Strand::Plus, "G", "C");
        let mutated = seq.mutate(&variant);
        assert_eq!(mutated.total_length(), seq.total_length());
        assert_eq!(mutated.nucleotides(), seq.nucleotides());
    }

    #[test]
    fn insertion_widens_downstream_exon_and_shifts_positions() {
        let seq = SplicedSequence::new(
            "t4",
            "AAAAAAAAAA",
            "chr1",
            Strand::Plus,
            &[1, 20],
            &[10, 29],
            &ConservationTable::empty(),
        );
        let variant = Variant::new("ins1", "chr1", 5, Strand::Plus, "A", "AGG");
        let mutated = seq.mutate(&variant);
        assert_eq!(mutated.total_length(), seq.total_length() + 2);
        assert_eq!(mutated.exons()[0], Exon::new(1, 12));
        assert_eq!(mutated.exons()[1], Exon::new(22, 31));
    }
}
