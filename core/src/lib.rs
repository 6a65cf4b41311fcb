#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tile Merge engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! renderers to react to deterministically. Systems consume event streams,
//! query immutable board views, and respond exclusively with new commands.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of cells along each edge of the square board.
pub const BOARD_SIDE: usize = 4;

/// Total number of cells stored by a [`Board`].
pub const CELL_COUNT: usize = BOARD_SIDE * BOARD_SIDE;

/// Tile value that wins the game once any cell reaches it.
pub const WIN_THRESHOLD: TileValue = TileValue(2048);

/// Tiles strictly above this value are presented with the "super" styling.
pub const SUPER_THRESHOLD: TileValue = TileValue(2048);

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Discards the current game and starts a fresh one.
    NewGame,
    /// Slides every tile toward the provided edge of the board.
    Move {
        /// Edge the tiles travel toward.
        direction: Direction,
    },
    /// Restores the most recent snapshot from the undo history.
    Undo,
    /// Places a freshly spawned tile into an empty cell.
    SpawnTile {
        /// Cell receiving the tile.
        cell: CellIndex,
        /// Value assigned to the tile.
        value: TileValue,
    },
    /// Hides the currently displayed win or loss message.
    DismissMessage,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that a new game began on an empty board.
    GameStarted,
    /// Confirms that a move changed the board.
    TilesShifted {
        /// Edge the tiles travelled toward.
        direction: Direction,
        /// Points earned from merges performed by the move.
        score_gained: u64,
        /// Output cells produced by combining two equal tiles.
        merges: Vec<MergeRecord>,
    },
    /// Reports that a move request left the world untouched.
    MoveIgnored {
        /// Direction carried by the ignored request.
        direction: Direction,
        /// Reason the move had no effect.
        reason: MoveRejection,
    },
    /// Confirms that a tile was placed into the board.
    TileSpawned {
        /// Cell that received the tile.
        cell: CellIndex,
        /// Value of the spawned tile.
        value: TileValue,
    },
    /// Reports that a spawn request was rejected.
    SpawnRejected {
        /// Cell requested for the spawn.
        cell: CellIndex,
        /// Specific reason the spawn failed.
        reason: SpawnRejection,
    },
    /// Reports the current score after it changed.
    ScoreChanged {
        /// Score accumulated during the current game.
        score: u64,
    },
    /// Reports that the best score was raised by the current game.
    BestScoreRaised {
        /// New best score that should be persisted.
        best_score: u64,
    },
    /// Announces that a tile reached the winning value for the first time.
    GameWon,
    /// Announces that no further move can change the board.
    GameLost,
    /// Confirms that a snapshot was restored from the undo history.
    UndoApplied {
        /// Undo operations still available in the current game.
        remaining: u32,
    },
    /// Reports that an undo request was rejected.
    UndoRejected {
        /// Specific reason the undo failed.
        reason: UndoRejection,
    },
    /// Confirms that the visible message was hidden.
    MessageDismissed,
}

/// Edges toward which tiles may slide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward row zero.
    Up,
    /// Movement toward the last row.
    Down,
    /// Movement toward column zero.
    Left,
    /// Movement toward the last column.
    Right,
}

impl Direction {
    /// Every direction in a stable order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Maps a position along a line to its absolute board cell.
    ///
    /// `line` selects the column (for vertical moves) or row (for horizontal
    /// moves), and `position` counts from the edge the tiles travel toward.
    /// Position zero is therefore the first cell a sliding tile reaches.
    /// Returns `None` when either coordinate lies outside the board.
    #[must_use]
    pub const fn cell_index(self, line: usize, position: usize) -> Option<CellIndex> {
        if line >= BOARD_SIDE || position >= BOARD_SIDE {
            return None;
        }

        let far = BOARD_SIDE - 1 - position;
        let index = match self {
            Self::Up => position * BOARD_SIDE + line,
            Self::Down => far * BOARD_SIDE + line,
            Self::Left => line * BOARD_SIDE + position,
            Self::Right => line * BOARD_SIDE + far,
        };
        Some(CellIndex(index))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        };
        f.write_str(label)
    }
}

/// Location of a single board cell stored in row-major order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct CellIndex(usize);

impl CellIndex {
    /// Creates a cell index, rejecting values beyond the board.
    #[must_use]
    pub const fn new(index: usize) -> Option<Self> {
        if index < CELL_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Creates a cell index from zero-based column and row coordinates.
    #[must_use]
    pub const fn from_coords(column: usize, row: usize) -> Option<Self> {
        if column < BOARD_SIDE && row < BOARD_SIDE {
            Some(Self(row * BOARD_SIDE + column))
        } else {
            None
        }
    }

    /// Position of the cell within the flat board storage.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }

    /// Zero-based column of the cell.
    #[must_use]
    pub const fn column(&self) -> usize {
        self.0 % BOARD_SIDE
    }

    /// Zero-based row of the cell.
    #[must_use]
    pub const fn row(&self) -> usize {
        self.0 / BOARD_SIDE
    }

    /// Iterates every cell of the board in row-major order.
    pub fn all() -> impl Iterator<Item = CellIndex> {
        (0..CELL_COUNT).map(CellIndex)
    }
}

impl TryFrom<usize> for CellIndex {
    type Error = InvalidCellIndex;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidCellIndex(value))
    }
}

impl From<CellIndex> for usize {
    fn from(cell: CellIndex) -> Self {
        cell.0
    }
}

/// Error produced when decoding a cell index outside the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidCellIndex(usize);

impl fmt::Display for InvalidCellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell index {} lies outside the {CELL_COUNT}-cell board", self.0)
    }
}

impl std::error::Error for InvalidCellIndex {}

/// Value carried by a tile: always a power of two no smaller than two.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TileValue(u32);

impl TileValue {
    /// Smallest tile value, spawned nine times out of ten.
    pub const TWO: TileValue = TileValue(2);

    /// Tile value spawned one time out of ten.
    pub const FOUR: TileValue = TileValue(4);

    /// Creates a tile value, rejecting zero, one, and non powers of two.
    #[must_use]
    pub const fn new(value: u32) -> Option<Self> {
        if value >= 2 && value.is_power_of_two() {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Numeric value of the tile.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Value of the tile produced by merging two tiles of this value.
    ///
    /// Returns `None` for the largest representable tile, which can no
    /// longer merge.
    #[must_use]
    pub const fn doubled(self) -> Option<Self> {
        match self.0.checked_mul(2) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Reports whether the tile exceeds the highest individually styled value.
    #[must_use]
    pub const fn is_super(&self) -> bool {
        self.0 > SUPER_THRESHOLD.0
    }
}

impl TryFrom<u32> for TileValue {
    type Error = InvalidTileValue;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidTileValue(value))
    }
}

impl From<TileValue> for u32 {
    fn from(value: TileValue) -> Self {
        value.0
    }
}

impl fmt::Display for TileValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error produced when a number cannot be used as a tile value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidTileValue(u32);

impl fmt::Display for InvalidTileValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not a power of two of at least 2", self.0)
    }
}

impl std::error::Error for InvalidTileValue {}

/// Fixed-size square grid of tiles stored in row-major order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [Option<TileValue>; CELL_COUNT],
}

impl Board {
    /// Creates a board without any tiles.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            cells: [None; CELL_COUNT],
        }
    }

    /// Builds a board from raw numbers where zero marks an empty cell.
    ///
    /// Returns `None` if any non-zero entry is not a valid tile value.
    #[must_use]
    pub fn from_values(values: [u32; CELL_COUNT]) -> Option<Self> {
        let mut board = Self::empty();
        for (slot, value) in board.cells.iter_mut().zip(values) {
            if value != 0 {
                *slot = Some(TileValue::new(value)?);
            }
        }
        Some(board)
    }

    /// Flattens the board into raw numbers where zero marks an empty cell.
    #[must_use]
    pub fn to_values(&self) -> [u32; CELL_COUNT] {
        let mut values = [0; CELL_COUNT];
        for (value, cell) in values.iter_mut().zip(self.cells) {
            *value = cell.map_or(0, |tile| tile.get());
        }
        values
    }

    /// Tile stored in the provided cell, if any.
    #[must_use]
    pub const fn get(&self, cell: CellIndex) -> Option<TileValue> {
        self.cells[cell.0]
    }

    /// Replaces the content of the provided cell.
    pub fn set(&mut self, cell: CellIndex, tile: Option<TileValue>) {
        self.cells[cell.0] = tile;
    }

    /// Every cell in row-major order.
    #[must_use]
    pub const fn cells(&self) -> &[Option<TileValue>; CELL_COUNT] {
        &self.cells
    }

    /// Iterates the cells that hold no tile.
    pub fn empty_cells(&self) -> impl Iterator<Item = CellIndex> + '_ {
        CellIndex::all().filter(|cell| self.get(*cell).is_none())
    }

    /// Number of tiles currently on the board.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Reports whether every cell holds a tile.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Extracts one line in the traversal order implied by `direction`.
    ///
    /// Position zero of the returned array is the cell nearest the edge the
    /// tiles travel toward. Lines outside the board read as empty.
    #[must_use]
    pub fn line(&self, direction: Direction, line: usize) -> [Option<TileValue>; BOARD_SIDE] {
        let mut values = [None; BOARD_SIDE];
        for (position, slot) in values.iter_mut().enumerate() {
            if let Some(cell) = direction.cell_index(line, position) {
                *slot = self.get(cell);
            }
        }
        values
    }

    /// Writes one line back using the same traversal order as [`Board::line`].
    pub fn set_line(
        &mut self,
        direction: Direction,
        line: usize,
        values: [Option<TileValue>; BOARD_SIDE],
    ) {
        for (position, value) in values.into_iter().enumerate() {
            if let Some(cell) = direction.cell_index(line, position) {
                self.set(cell, value);
            }
        }
    }
}

/// Identifies the output cell of a line that resulted from a merge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MergeRecord {
    /// Row or column that contained the merge.
    pub line: usize,
    /// Output position within the line, counted from the destination edge.
    pub position: usize,
    /// Direction of the move that produced the merge.
    pub direction: Direction,
}

impl MergeRecord {
    /// Absolute board cell holding the merged tile.
    ///
    /// Uses the same traversal formula as line extraction, so the flagged cell
    /// always matches the cell the merged value was written to.
    #[must_use]
    pub const fn cell(&self) -> Option<CellIndex> {
        self.direction.cell_index(self.line, self.position)
    }
}

/// Immutable copy of the session state used to restore earlier turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Snapshot {
    /// Tiles on the board.
    pub board: Board,
    /// Score accumulated during the game.
    pub score: u64,
    /// Whether the game had been lost.
    pub game_over: bool,
    /// Whether the game had been won.
    pub won: bool,
    /// Direction of the move that produced this state, if any.
    pub last_move: Option<Direction>,
}

/// High-level phase of the current game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// Moves are accepted and the winning tile has not appeared yet.
    Playing,
    /// The winning tile appeared; moves are still accepted.
    Won,
    /// No move can change the board; only undo and new game are accepted.
    Lost,
}

/// Message surfaced to the player when the game reaches a milestone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Message {
    /// Shown the first time the winning tile appears.
    Won,
    /// Shown when the board locks up.
    Lost,
}

impl Message {
    /// Player-facing text for the message.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::Won => "You win!",
            Self::Lost => "Game over!",
        }
    }
}

/// Reasons a move request may leave the world untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveRejection {
    /// No tile could slide or merge in the requested direction.
    NoChange,
    /// The game is lost; moves are ignored until a new game starts.
    GameOver,
}

/// Reasons an undo request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UndoRejection {
    /// No snapshot is available to restore.
    HistoryEmpty,
    /// The undo allowance for the current game is used up.
    BudgetExhausted,
}

/// Reasons a spawn request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnRejection {
    /// The board has no empty cell left.
    BoardFull,
    /// The requested cell already holds a tile.
    Occupied,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_value_accepts_only_powers_of_two() {
        assert!(TileValue::new(0).is_none());
        assert!(TileValue::new(1).is_none());
        assert!(TileValue::new(6).is_none());
        assert_eq!(TileValue::new(2), Some(TileValue::TWO));
        assert_eq!(TileValue::new(4096).map(|tile| tile.get()), Some(4096));
    }

    #[test]
    fn doubling_keeps_growing_past_the_win_threshold() {
        let doubled = WIN_THRESHOLD.doubled().expect("room to grow");
        assert_eq!(doubled.get(), 4096);
        assert!(doubled.is_super());
        assert!(!WIN_THRESHOLD.is_super());
    }

    #[test]
    fn largest_tile_cannot_be_doubled() {
        let largest = TileValue::new(1 << 31).expect("valid tile");
        assert_eq!(largest.doubled(), None);
        assert_eq!(
            TileValue::new(1 << 30).and_then(TileValue::doubled),
            Some(largest)
        );
    }

    #[test]
    fn traversal_starts_at_the_destination_edge() {
        let up = Direction::Up.cell_index(1, 0).expect("in bounds");
        assert_eq!((up.column(), up.row()), (1, 0));

        let down = Direction::Down.cell_index(1, 0).expect("in bounds");
        assert_eq!((down.column(), down.row()), (1, 3));

        let left = Direction::Left.cell_index(2, 0).expect("in bounds");
        assert_eq!((left.column(), left.row()), (0, 2));

        let right = Direction::Right.cell_index(2, 0).expect("in bounds");
        assert_eq!((right.column(), right.row()), (3, 2));
    }

    #[test]
    fn traversal_visits_every_cell_once_per_direction() {
        for direction in Direction::ALL {
            let mut seen = [false; CELL_COUNT];
            for line in 0..BOARD_SIDE {
                for position in 0..BOARD_SIDE {
                    let cell = direction.cell_index(line, position).expect("in bounds");
                    assert!(!seen[cell.get()], "{direction} visited {cell:?} twice");
                    seen[cell.get()] = true;
                }
            }
            assert!(seen.iter().all(|visited| *visited));
        }
    }

    #[test]
    fn traversal_rejects_out_of_range_coordinates() {
        assert!(Direction::Left.cell_index(BOARD_SIDE, 0).is_none());
        assert!(Direction::Up.cell_index(0, BOARD_SIDE).is_none());
    }

    #[test]
    fn board_round_trips_through_raw_values() {
        let values = [2, 0, 0, 4, 0, 8, 0, 0, 0, 0, 16, 0, 0, 0, 0, 2048];
        let board = Board::from_values(values).expect("valid board");
        assert_eq!(board.to_values(), values);
        assert_eq!(board.tile_count(), 5);
        assert!(Board::from_values([3; CELL_COUNT]).is_none());
    }

    #[test]
    fn lines_write_back_where_they_were_read() {
        let board = Board::from_values([
            2, 4, 8, 16, //
            0, 0, 0, 0, //
            0, 0, 0, 0, //
            0, 0, 0, 0,
        ])
        .expect("valid board");

        let right = board.line(Direction::Right, 0);
        assert_eq!(
            right.map(|cell| cell.map_or(0, |tile| tile.get())),
            [16, 8, 4, 2]
        );

        let mut copy = Board::empty();
        copy.set_line(Direction::Right, 0, right);
        assert_eq!(copy, board);
    }

    #[test]
    fn merge_record_maps_to_written_cell() {
        let record = MergeRecord {
            line: 3,
            position: 1,
            direction: Direction::Down,
        };
        let cell = record.cell().expect("in bounds");
        assert_eq!((cell.column(), cell.row()), (3, 2));
    }

    #[test]
    fn snapshot_survives_bincode() {
        let snapshot = Snapshot {
            board: Board::from_values([
                2, 0, 0, 0, //
                0, 4, 0, 0, //
                0, 0, 8, 0, //
                0, 0, 0, 16,
            ])
            .expect("valid board"),
            score: 12,
            game_over: false,
            won: false,
            last_move: Some(Direction::Left),
        };

        let bytes = bincode::serialize(&snapshot).expect("serialize");
        let restored: Snapshot = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, snapshot);
    }

    #[test]
    fn invalid_tile_values_are_rejected_when_decoding() {
        let bytes = bincode::serialize(&3_u32).expect("serialize");
        assert!(bincode::deserialize::<TileValue>(&bytes).is_err());
    }
}
