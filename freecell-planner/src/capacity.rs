use freecell_common::board::Board;

#[inline]
pub fn count_empty_freecells(board: &Board) -> usize {
    board.freecells.iter().filter(|cell| cell.is_none()).count()
}

#[inline]
pub fn count_empty_columns(board: &Board, exclude: &[usize]) -> usize {
    board
        .columns
        .iter()
        .enumerate()
        .filter(|(idx, column)| column.is_empty() && !exclude.contains(idx))
        .count()
}

/// The standard supermove capacity for moving a run from `src_idx` to
/// `dst_idx`: every idle freecell and every idle column (the source and
/// destination themselves do not count) multiplies the achievable run
/// length.
#[inline]
pub fn max_movable(board: &Board, src_idx: usize, dst_idx: usize) -> usize {
    let empty_freecells = count_empty_freecells(board);
    let empty_columns = count_empty_columns(board, &[src_idx, dst_idx]);
    (empty_freecells + 1) * (empty_columns + 1)
}
