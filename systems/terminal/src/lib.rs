#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Win and loss detection for the Tile Merge board.

use tile_merge_core::{Board, CellIndex, TileValue, BOARD_SIDE, WIN_THRESHOLD};

/// Reports whether any tile reached the default winning value.
#[must_use]
pub fn is_won(board: &Board) -> bool {
    reaches(board, WIN_THRESHOLD)
}

/// Reports whether any tile is at least `threshold`.
#[must_use]
pub fn reaches(board: &Board, threshold: TileValue) -> bool {
    board.cells().iter().flatten().any(|tile| *tile >= threshold)
}

/// Reports whether no move can change the board.
///
/// A board is lost when every cell holds a tile and no two horizontally or
/// vertically adjacent tiles share a value that can still be doubled.
#[must_use]
pub fn is_lost(board: &Board) -> bool {
    board.is_full() && !has_adjacent_pair(board)
}

fn has_adjacent_pair(board: &Board) -> bool {
    (0..BOARD_SIDE).any(|row| {
        (0..BOARD_SIDE).any(|column| {
            let here = tile_at(board, column, row);
            let right = tile_at(board, column + 1, row);
            let below = tile_at(board, column, row + 1);
            here.and_then(TileValue::doubled).is_some() && (here == right || here == below)
        })
    })
}

fn tile_at(board: &Board, column: usize, row: usize) -> Option<TileValue> {
    CellIndex::from_coords(column, row).and_then(|cell| board.get(cell))
}
