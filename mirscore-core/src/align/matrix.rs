//! Matrix filling for the alignment engine.
//!
//! Three matrices are kept in a single flat arena: `Overall` (`O`),
//! `MrnaGap` (`Gx`, a gap opened in the mRNA) and `MirnaGap` (`Gy`, a gap
//! opened in the miRNA). `O`'s entries at a tied cell are the union of
//! its own match entry and whichever gap matrices tie its score --
//! mirroring the source's `overallMatrixCell` constructor, which splices
//! the gap cells' own entries directly into its entry list rather than
//! wrapping them in another indirection.

use super::AlignmentColumn;
use crate::nucleotide::{seed_weight, Base, IndelKind, MatchPosition, Nucleotide};
use crate::sequence::SplicedSequence;

pub type AlignmentScore = i32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MatrixId {
    Overall,
    MrnaGap,
    MirnaGap,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CellRef {
    pub matrix: MatrixId,
    pub row: usize,
    pub col: usize,
}

#[derive(Clone, Debug)]
pub(crate) struct Entry {
    pub column: AlignmentColumn,
    pub predecessor: Option<CellRef>,
}

#[derive(Clone, Debug, Default)]
struct Cell {
    entries: Vec<Entry>,
    score: AlignmentScore,
}

pub(crate) struct Arena {
    cols: usize,
    overall: Vec<Cell>,
    mrna_gap: Vec<Cell>,
    mirna_gap: Vec<Cell>,
}

fn match_position(one_based_column: u32) -> MatchPosition {
    if seed_weight(one_based_column) == 4 {
        MatchPosition::Seed
    } else {
        MatchPosition::ThreePrime
    }
}

fn gapped(nucleotide: &Nucleotide) -> Nucleotide {
    Nucleotide::new(Base::Gap, nucleotide.sequence_position(), nucleotide.chromosome_position(), 0.0)
}

impl Arena {
    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    fn cell(&self, r: CellRef) -> &Cell {
        let i = self.idx(r.row, r.col);
        match r.matrix {
            MatrixId::Overall => &self.overall[i],
            MatrixId::MrnaGap => &self.mrna_gap[i],
            MatrixId::MirnaGap => &self.mirna_gap[i],
        }
    }

    pub(crate) fn entry(&self, r: CellRef) -> &[Entry] {
        &self.cell(r).entries
    }

    pub(crate) fn score(&self, r: CellRef) -> AlignmentScore {
        self.cell(r).score
    }

    fn overall_ref(&self, row: usize, col: usize) -> CellRef {
        CellRef { matrix: MatrixId::Overall, row, col }
    }

    /// Every row whose `O(row, n-1)` score equals the global maximum.
    pub(crate) fn best_row_scores(&self, rows: usize, cols: usize) -> Vec<usize> {
        let last_col = cols - 1;
        let max = (0..rows).map(|r| self.overall[self.idx(r, last_col)].score).max().unwrap_or(0);
        (0..rows).filter(|&r| self.overall[self.idx(r, last_col)].score == max).collect()
    }

}

/// Fills all three matrices for `mrna` (read 3'->5', row 0 at the 3' end)
/// against `mirna` (read 5'->3', column 0 at the 5' end).
pub(crate) fn fill(mrna: &SplicedSequence, mirna: &SplicedSequence) -> Arena {
    let rows = mrna.total_length() as usize;
    let cols = mirna.total_length() as usize;
    let mut arena = Arena {
        cols,
        overall: vec![Cell::default(); rows * cols],
        mrna_gap: vec![Cell::default(); rows * cols],
        mirna_gap: vec![Cell::default(); rows * cols],
    };

    let mrna_at = |row: usize| mrna.nucleotide_at(rows as u32 - row as u32).expect("row in range");
    let mirna_at = |col: usize| mirna.nucleotide_at(col as u32 + 1).expect("col in range");

    for row in 0..rows {
        for col in 0..cols {
            let mrna_nt = mrna_at(row);
            let mirna_nt = mirna_at(col);
            let position = match_position(col as u32 + 1);
            let idx = arena.idx(row, col);

            if row == 0 && col == 0 {
                let column = AlignmentColumn { mrna: *mrna_nt, mirna: *mirna_nt, position, indel: IndelKind::Open };
                arena.overall[idx] = Cell { entries: vec![Entry { column, predecessor: None }], score: 0 };
                continue;
            }

            if row == 0 {
                // first row: only mRNA-gap extensions are reachable.
                let indel = if col == 1 { IndelKind::Open } else { IndelKind::Extend };
                let gap_nt = gapped(mrna_nt);
                let column = AlignmentColumn { mrna: gap_nt, mirna: *mirna_nt, position, indel };
                let score_delta = gap_nt.get_match(mirna_nt, position, indel).score();
                let (predecessor, base_score) = if col == 1 {
                    (arena.overall_ref(0, 0), arena.overall[arena.idx(0, 0)].score)
                } else {
                    (CellRef { matrix: MatrixId::MrnaGap, row: 0, col: col - 1 }, arena.mrna_gap[arena.idx(0, col - 1)].score)
                };
                let score = base_score + score_delta;
                let cell = Cell { entries: vec![Entry { column, predecessor: Some(predecessor) }], score };
                arena.mrna_gap[idx] = cell.clone();
                arena.overall[idx] = cell;
                continue;
            }

            if col == 0 {
                // first column: only miRNA-gap extensions are reachable.
                let indel = if row == 1 { IndelKind::Open } else { IndelKind::Extend };
                let gap_nt = gapped(mirna_nt);
                let column = AlignmentColumn { mrna: *mrna_nt, mirna: gap_nt, position, indel };
                let score_delta = mrna_nt.get_match(&gap_nt, position, indel).score();
                let (predecessor, base_score) = if row == 1 {
                    (arena.overall_ref(0, 0), arena.overall[arena.idx(0, 0)].score)
                } else {
                    (CellRef { matrix: MatrixId::MirnaGap, row: row - 1, col: 0 }, arena.mirna_gap[arena.idx(row - 1, 0)].score)
                };
                let score = base_score + score_delta;
                let cell = Cell { entries: vec![Entry { column, predecessor: Some(predecessor) }], score };
                arena.mirna_gap[idx] = cell.clone();
                arena.overall[idx] = cell;
                continue;
            }

            // general case: row >= 1, col >= 1.
            let mrna_gap_nt = gapped(mrna_nt);
            let mirna_gap_nt = gapped(mirna_nt);

            let open_gap_x_column = AlignmentColumn { mrna: mrna_gap_nt, mirna: *mirna_nt, position, indel: IndelKind::Open };
            let open_gap_x_score = mrna_gap_nt.get_match(mirna_nt, position, IndelKind::Open).score() + arena.overall[arena.idx(row, col - 1)].score;
            let mut gx_entries = vec![(open_gap_x_score, Entry { column: open_gap_x_column, predecessor: Some(arena.overall_ref(row, col - 1)) })];
            if col >= 2 {
                let extend_gap_x_column = AlignmentColumn { mrna: mrna_gap_nt, mirna: *mirna_nt, position, indel: IndelKind::Extend };
                let extend_gap_x_score = mrna_gap_nt.get_match(mirna_nt, position, IndelKind::Extend).score() + arena.mrna_gap[arena.idx(row, col - 1)].score;
                gx_entries.push((
                    extend_gap_x_score,
                    Entry { column: extend_gap_x_column, predecessor: Some(CellRef { matrix: MatrixId::MrnaGap, row, col: col - 1 }) },
                ));
            }
            let gx_score = gx_entries.iter().map(|(s, _)| *s).max().unwrap();
            let gx_cell = Cell { entries: gx_entries.into_iter().filter(|(s, _)| *s == gx_score).map(|(_, e)| e).collect(), score: gx_score };

            let open_gap_y_column = AlignmentColumn { mrna: *mrna_nt, mirna: mirna_gap_nt, position, indel: IndelKind::Open };
            let open_gap_y_score = mrna_nt.get_match(&mirna_gap_nt, position, IndelKind::Open).score() + arena.overall[arena.idx(row - 1, col)].score;
            let mut gy_entries = vec![(open_gap_y_score, Entry { column: open_gap_y_column, predecessor: Some(arena.overall_ref(row - 1, col)) })];
            if row >= 2 {
                let extend_gap_y_column = AlignmentColumn { mrna: *mrna_nt, mirna: mirna_gap_nt, position, indel: IndelKind::Extend };
                let extend_gap_y_score = mrna_nt.get_match(&mirna_gap_nt, position, IndelKind::Extend).score() + arena.mirna_gap[arena.idx(row - 1, col)].score;
                gy_entries.push((
                    extend_gap_y_score,
                    Entry { column: extend_gap_y_column, predecessor: Some(CellRef { matrix: MatrixId::MirnaGap, row: row - 1, col }) },
                ));
            }
            let gy_score = gy_entries.iter().map(|(s, _)| *s).max().unwrap();
            let gy_cell = Cell { entries: gy_entries.into_iter().filter(|(s, _)| *s == gy_score).map(|(_, e)| e).collect(), score: gy_score };

            let match_column = AlignmentColumn { mrna: *mrna_nt, mirna: *mirna_nt, position, indel: IndelKind::Open };
            let match_score = mrna_nt.get_match(mirna_nt, position, IndelKind::Open).score() + arena.overall[arena.idx(row - 1, col - 1)].score;

            let mut best_score = gx_score.max(gy_score);
            let mut overall_entries = Vec::new();
            if match_score >= best_score {
                best_score = match_score;
                overall_entries.push(Entry { column: match_column, predecessor: Some(arena.overall_ref(row - 1, col - 1)) });
            }
            if gy_score == best_score {
                overall_entries.extend(gy_cell.entries.iter().cloned());
            }
            if gx_score == best_score {
                overall_entries.extend(gx_cell.entries.iter().cloned());
            }

            arena.mrna_gap[idx] = gx_cell;
            arena.mirna_gap[idx] = gy_cell;
            arena.overall[idx] = Cell { entries: overall_entries, score: best_score };
        }
    }

    arena
}
