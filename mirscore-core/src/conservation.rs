//! Conservation table (component C2).
//!
//! Holds a sorted per-chromosome list of `(chromosome, start, score)`
//! ranges. A point query returns the score of the range whose start is the
//! greatest position `<=` the query, on the same chromosome.

use crate::nucleotide::{ChromosomePosition, ConservationScore};
use log::warn;

/// A single conservation range: `[start, next_start_on_same_chromosome)`
/// holds a constant score.
#[derive(Clone, Debug, PartialEq)]
pub struct ConservationRange {
    pub chromosome: String,
    pub start: ChromosomePosition,
    pub score: ConservationScore,
}

/// Sorted, validated collection of conservation ranges, queryable by
/// chromosome position.
#[derive(Clone, Debug, Default)]
pub struct ConservationTable {
    ranges: Vec<ConservationRange>,
}

impl ConservationTable {
    /// An empty table; every query returns `0.0` after logging `UnknownChromosome`.
    #[must_use]
    pub fn empty() -> Self {
        Self { ranges: Vec::new() }
    }

    /// Builds a table from rows assumed sorted ascending by `(chromosome, start)`.
    /// Rows that break that order are logged and skipped, mirroring the
    /// TSV loader's recovery policy (they would never be reachable by the
    /// binary search otherwise).
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, ChromosomePosition, ConservationScore)>,
    {
        let mut ranges = Vec::new();
        for (chromosome, start, score) in rows {
            if let Some(last) = ranges.last() {
                let last: &ConservationRange = last;
                let in_order = (last.chromosome.as_str(), last.start) <= (chromosome.as_str(), start);
                if !in_order {
                    warn!(
                        "conservation table: out-of-order range {chromosome}:{start} after {}:{} -- skipping",
                        last.chromosome, last.start
                    );
                    continue;
                }
            }
            ranges.push(ConservationRange { chromosome, start, score });
        }
        Self { ranges }
    }

    /// Score of the range covering `position` on `chromosome`, or `0.0`
    /// with a logged `UnknownChromosome` warning if no such range exists.
    #[must_use]
    pub fn score_at(&self, chromosome: &str, position: ChromosomePosition) -> ConservationScore {
        let key = (chromosome, position);
        let idx = self
            .ranges
            .partition_point(|r| (r.chromosome.as_str(), r.start) <= key);
        if idx == 0 {
            warn!("conservation table: unknown chromosome/position {chromosome}:{position}");
            return 0.0;
        }
        let candidate = &self.ranges[idx - 1];
        if candidate.chromosome != chromosome {
            warn!("conservation table: unknown chromosome {chromosome}");
            return 0.0;
        }
        candidate.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> ConservationTable {
        ConservationTable::from_rows([
            ("chr1".to_string(), 1, 0.1),
            ("chr1".to_string(), 100, 0.5),
            ("chr1".to_string(), 200, 0.9),
            ("chr2".to_string(), 50, 0.3),
        ])
    }

    #[test]
    fn exact_hit() {
        assert_eq!(sample().score_at("chr1", 100), 0.5);
    }

    #[test]
    fn preceding_range() {
        assert_eq!(sample().score_at("chr1", 150), 0.5);
        assert_eq!(sample().score_at("chr1", 250), 0.9);
    }

    #[test]
    fn before_first_range_on_chromosome() {
        // chr2 starts at 50; chr1 sorts before chr2 so this hits idx==0 only
        // if chr2 is queried before any chr2 row -- here query a position
        // earlier than every range on the matching chromosome's own run.
        let table = ConservationTable::from_rows([("chr2".to_string(), 50, 0.3)]);
        assert_eq!(table.score_at("chr2", 10), 0.0);
    }

    #[test]
    fn unknown_chromosome_returns_zero() {
        assert_eq!(sample().score_at("chrX", 10), 0.0);
    }

    #[test]
    fn out_of_order_row_is_dropped() {
        let table = ConservationTable::from_rows([
            ("chr1".to_string(), 100, 0.5),
            ("chr1".to_string(), 50, 0.9), // out of order, dropped
        ]);
        assert_eq!(table.score_at("chr1", 50), 0.0);
        assert_eq!(table.score_at("chr1", 100), 0.5);
    }
}
