//! Depth-first traceback over the alignment arena.
//!
//! A single column stack is shared across the whole search: a branch
//! pushes its column before descending into a predecessor and pops it on
//! return, so siblings never pay for copying the shared prefix.

use super::matrix::{Arena, AlignmentScore, CellRef, MatrixId};
use super::{Alignment, AlignmentColumn};
use log::warn;

pub(crate) fn collect(arena: &Arena, row: usize, last_col: usize, out: &mut Vec<Alignment>) {
    let root = CellRef { matrix: MatrixId::Overall, row, col: last_col };
    let score = arena.score(root);
    let mut stack = Vec::new();
    visit(arena, root, score, &mut stack, out);
}

fn visit(arena: &Arena, cell: CellRef, score: AlignmentScore, stack: &mut Vec<AlignmentColumn>, out: &mut Vec<Alignment>) {
    let entries = arena.entry(cell);
    if entries.is_empty() {
        warn!("alignment traceback: uninitialized predecessor at {cell:?} -- dropping branch");
        return;
    }
    for entry in entries {
        stack.push(entry.column);
        match entry.predecessor {
            None => {
                let columns: Vec<AlignmentColumn> = stack.iter().rev().copied().collect();
                out.push(Alignment { columns, score });
            }
            Some(predecessor) => visit(arena, predecessor, score, stack, out),
        }
        stack.pop();
    }
}
