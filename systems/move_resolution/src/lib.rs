#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure move resolution for the Tile Merge board.
//!
//! Every line perpendicular to the move direction is read in the order the
//! tiles travel, compacted, merged in a single scan, padded, and written back
//! using the same traversal. The outcome carries the merge records so the
//! renderer never has to infer which cells merged.

use tile_merge_core::{Board, Direction, MergeRecord, TileValue, BOARD_SIDE};

/// Result of sliding a board in one direction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Board after every line was resolved.
    pub board: Board,
    /// Sum of the values produced by merges.
    pub score_gained: u64,
    /// Whether any line changed.
    pub moved: bool,
    /// Output cells produced by merges, in line order.
    pub merges: Vec<MergeRecord>,
}

/// Resolution of a single line expressed in traversal order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineOutcome {
    /// Line content after compaction and merging.
    pub tiles: [Option<TileValue>; BOARD_SIDE],
    /// Sum of the values produced by merges.
    pub score_gained: u64,
    /// Output positions that received a merged tile.
    pub merged: [bool; BOARD_SIDE],
}

/// Slides every tile on `board` toward the edge named by `direction`.
#[must_use]
pub fn resolve_move(board: &Board, direction: Direction) -> MoveOutcome {
    let mut resolved = *board;
    let mut score_gained = 0;
    let mut moved = false;
    let mut merges = Vec::new();

    for line in 0..BOARD_SIDE {
        let before = board.line(direction, line);
        let outcome = resolve_line(before);

        score_gained += outcome.score_gained;
        moved |= outcome.tiles != before;
        merges.extend(
            outcome
                .merged
                .iter()
                .enumerate()
                .filter(|(_, merged)| **merged)
                .map(|(position, _)| MergeRecord {
                    line,
                    position,
                    direction,
                }),
        );
        resolved.set_line(direction, line, outcome.tiles);
    }

    MoveOutcome {
        board: resolved,
        score_gained,
        moved,
        merges,
    }
}

/// Compacts and merges a single line toward position zero.
///
/// Each input tile takes part in at most one merge, and a tile produced by a
/// merge is never merged again within the same call. Two tiles of the largest
/// representable value stay side by side.
#[must_use]
pub fn resolve_line(line: [Option<TileValue>; BOARD_SIDE]) -> LineOutcome {
    let mut dense = line.into_iter().flatten().peekable();
    let mut tiles = [None; BOARD_SIDE];
    let mut merged = [false; BOARD_SIDE];
    let mut score_gained = 0;
    let mut write = 0;

    while let Some(tile) = dense.next() {
        let output = match tile.doubled() {
            Some(combined) if dense.next_if_eq(&tile).is_some() => {
                score_gained += u64::from(combined.get());
                merged[write] = true;
                combined
            }
            _ => tile,
        };
        tiles[write] = Some(output);
        write += 1;
    }

    LineOutcome {
        tiles,
        score_gained,
        merged,
    }
}
