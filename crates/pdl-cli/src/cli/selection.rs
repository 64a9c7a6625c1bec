//! Mapping of the lecture selection flags onto listing positions.

use crate::cli::LectureSelection;

/// Lectures to download, 1-based, in download order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selected {
    pub indices: Vec<usize>,
    /// Requested numbers with no lecture behind them.
    pub out_of_range: Vec<usize>,
}

/// Resolves the flags against a listing of `total` lectures.
///
/// An explicit item list wins over start/end and keeps its order, minus
/// duplicates. A range is inclusive on both ends and is cut at `total`.
pub fn select(sel: &LectureSelection, total: usize) -> Selected {
    let exists = |i: usize| (1..=total).contains(&i);
    let mut out = Selected::default();

    if !sel.lecture_items.is_empty() {
        for &i in &sel.lecture_items {
            if !exists(i) {
                out.out_of_range.push(i);
            } else if !out.indices.contains(&i) {
                out.indices.push(i);
            }
        }
        return out;
    }

    let start = sel.lecture_start.unwrap_or(1);
    let end = sel.lecture_end.unwrap_or(total);
    for bound in [start, end] {
        if !exists(bound) && !out.out_of_range.contains(&bound) {
            out.out_of_range.push(bound);
        }
    }
    out.indices = (start.max(1)..=end.min(total)).collect();
    out
}
