#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Tile Merge.

mod history;

use tile_merge_core::{
    Board, CellIndex, Command, Direction, Event, Message, MoveRejection, Snapshot,
    SpawnRejection, TileValue, UndoRejection, WIN_THRESHOLD,
};
use tile_merge_system_move_resolution::resolve_move;
use tile_merge_system_terminal::{is_lost, reaches};
use tracing::{debug, info};

use self::history::History;

const DEFAULT_UNDO_BUDGET: u32 = 5;
const DEFAULT_HISTORY_CAPACITY: usize = 5;

/// Rule parameters that stay fixed for the lifetime of a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    undo_budget: u32,
    history_capacity: usize,
    win_threshold: TileValue,
}

impl Config {
    /// Creates a configuration with explicit rule parameters.
    #[must_use]
    pub const fn new(undo_budget: u32, history_capacity: usize, win_threshold: TileValue) -> Self {
        Self {
            undo_budget,
            history_capacity,
            win_threshold,
        }
    }

    /// Undo operations granted at the start of every game.
    #[must_use]
    pub const fn undo_budget(&self) -> u32 {
        self.undo_budget
    }

    /// Maximum number of snapshots retained for undo.
    #[must_use]
    pub const fn history_capacity(&self) -> usize {
        self.history_capacity
    }

    /// Tile value that wins the game.
    #[must_use]
    pub const fn win_threshold(&self) -> TileValue {
        self.win_threshold
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_BUDGET, DEFAULT_HISTORY_CAPACITY, WIN_THRESHOLD)
    }
}

/// Represents the authoritative Tile Merge session state.
#[derive(Clone, Debug)]
pub struct World {
    config: Config,
    board: Board,
    score: u64,
    best_score: u64,
    history: History,
    undo_remaining: u32,
    game_over: bool,
    won: bool,
    last_move: Option<Direction>,
    message: Option<Message>,
}

impl World {
    /// Creates a world with an empty board and the provided best score.
    ///
    /// The board stays empty until [`Command::NewGame`] is applied and the
    /// spawning system answers the resulting [`Event::GameStarted`].
    #[must_use]
    pub fn new(config: Config, best_score: u64) -> Self {
        Self {
            config,
            board: Board::empty(),
            score: 0,
            best_score,
            history: History::new(config.history_capacity()),
            undo_remaining: config.undo_budget(),
            game_over: false,
            won: false,
            last_move: None,
            message: None,
        }
    }

    fn reset(&mut self) {
        self.board = Board::empty();
        self.score = 0;
        self.history.clear();
        self.undo_remaining = self.config.undo_budget();
        self.game_over = false;
        self.won = false;
        self.last_move = None;
        self.message = None;
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board,
            score: self.score,
            game_over: self.game_over,
            won: self.won,
            last_move: self.last_move,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.board = snapshot.board;
        self.score = snapshot.score;
        self.game_over = snapshot.game_over;
        self.won = snapshot.won;
        self.last_move = snapshot.last_move;
        self.message = None;
    }

    fn shift(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if self.game_over {
            debug!(%direction, "move ignored after loss");
            out_events.push(Event::MoveIgnored {
                direction,
                reason: MoveRejection::GameOver,
            });
            return;
        }

        let outcome = resolve_move(&self.board, direction);
        if !outcome.moved {
            debug!(%direction, "move left the board unchanged");
            out_events.push(Event::MoveIgnored {
                direction,
                reason: MoveRejection::NoChange,
            });
            return;
        }

        let departed = self.snapshot();
        self.history.push(departed);
        self.board = outcome.board;
        self.score = self.score.saturating_add(outcome.score_gained);
        self.last_move = Some(direction);
        debug!(
            %direction,
            score_gained = outcome.score_gained,
            merges = outcome.merges.len(),
            "tiles shifted"
        );

        out_events.push(Event::TilesShifted {
            direction,
            score_gained: outcome.score_gained,
            merges: outcome.merges,
        });
        if outcome.score_gained > 0 {
            out_events.push(Event::ScoreChanged { score: self.score });
        }
        if self.score > self.best_score {
            self.best_score = self.score;
            out_events.push(Event::BestScoreRaised {
                best_score: self.best_score,
            });
        }

        self.evaluate_terminal_state(out_events);
    }

    fn undo(&mut self, out_events: &mut Vec<Event>) {
        if self.history.is_empty() {
            debug!("undo rejected: history empty");
            out_events.push(Event::UndoRejected {
                reason: UndoRejection::HistoryEmpty,
            });
            return;
        }
        if self.undo_remaining == 0 {
            debug!("undo rejected: budget exhausted");
            out_events.push(Event::UndoRejected {
                reason: UndoRejection::BudgetExhausted,
            });
            return;
        }

        let Some(snapshot) = self.history.pop() else {
            return;
        };
        self.restore(snapshot);
        self.undo_remaining -= 1;
        debug!(remaining = self.undo_remaining, "snapshot restored");

        out_events.push(Event::UndoApplied {
            remaining: self.undo_remaining,
        });
        out_events.push(Event::ScoreChanged { score: self.score });
    }

    fn place_tile(&mut self, cell: CellIndex, value: TileValue, out_events: &mut Vec<Event>) {
        let rejection = if self.board.is_full() {
            Some(SpawnRejection::BoardFull)
        } else if self.board.get(cell).is_some() {
            Some(SpawnRejection::Occupied)
        } else {
            None
        };

        if let Some(reason) = rejection {
            debug!(cell = cell.get(), ?reason, "spawn rejected");
            out_events.push(Event::SpawnRejected { cell, reason });
            return;
        }

        self.board.set(cell, Some(value));
        debug!(cell = cell.get(), value = value.get(), "tile spawned");
        out_events.push(Event::TileSpawned { cell, value });

        self.evaluate_terminal_state(out_events);
    }

    fn evaluate_terminal_state(&mut self, out_events: &mut Vec<Event>) {
        if !self.won && reaches(&self.board, self.config.win_threshold()) {
            self.won = true;
            self.message = Some(Message::Won);
            info!(score = self.score, "winning tile reached");
            out_events.push(Event::GameWon);
        }

        if !self.game_over && is_lost(&self.board) {
            self.game_over = true;
            self.message = Some(Message::Lost);
            info!(score = self.score, "no moves left");
            out_events.push(Event::GameLost);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(Config::default(), 0)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::NewGame => {
            world.reset();
            info!(best_score = world.best_score, "new game started");
            out_events.push(Event::GameStarted);
            out_events.push(Event::ScoreChanged { score: world.score });
        }
        Command::Move { direction } => world.shift(direction, out_events),
        Command::Undo => world.undo(out_events),
        Command::SpawnTile { cell, value } => world.place_tile(cell, value, out_events),
        Command::DismissMessage => {
            if world.message.take().is_some() {
                out_events.push(Event::MessageDismissed);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use tile_merge_core::{Board, Direction, GameStatus, Message, Snapshot};

    use super::World;

    /// Provides read-only access to the board.
    #[must_use]
    pub fn board(world: &World) -> &Board {
        &world.board
    }

    /// Score accumulated during the current game.
    #[must_use]
    pub fn score(world: &World) -> u64 {
        world.score
    }

    /// Highest score observed across games.
    #[must_use]
    pub fn best_score(world: &World) -> u64 {
        world.best_score
    }

    /// Current phase of the game.
    #[must_use]
    pub fn status(world: &World) -> GameStatus {
        if world.game_over {
            GameStatus::Lost
        } else if world.won {
            GameStatus::Won
        } else {
            GameStatus::Playing
        }
    }

    /// Undo operations still available in the current game.
    #[must_use]
    pub fn undo_remaining(world: &World) -> u32 {
        world.undo_remaining
    }

    /// Number of snapshots available to undo.
    #[must_use]
    pub fn history_len(world: &World) -> usize {
        world.history.len()
    }

    /// Reports whether an undo command would currently succeed.
    #[must_use]
    pub fn can_undo(world: &World) -> bool {
        !world.history.is_empty() && world.undo_remaining > 0
    }

    /// Message awaiting dismissal, if any.
    #[must_use]
    pub fn message(world: &World) -> Option<Message> {
        world.message
    }

    /// Direction of the move that produced the current board.
    #[must_use]
    pub fn last_move(world: &World) -> Option<Direction> {
        world.last_move
    }

    /// Captures the restorable portion of the session state.
    #[must_use]
    pub fn snapshot(world: &World) -> Snapshot {
        world.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_merge_core::GameStatus;

    fn cell(index: usize) -> CellIndex {
        CellIndex::new(index).expect("cell on board")
    }

    fn world_with(values: [u32; 16]) -> World {
        let mut world = World::default();
        world.board = Board::from_values(values).expect("valid board");
        world
    }

    #[test]
    fn new_game_clears_everything_but_best_score() {
        let mut world = world_with([2; 16]);
        world.score = 40;
        world.best_score = 90;
        world.undo_remaining = 0;
        world.game_over = true;
        world.won = true;
        world.message = Some(Message::Lost);
        let snapshot = world.snapshot();
        world.history.push(snapshot);

        let mut events = Vec::new();
        apply(&mut world, Command::NewGame, &mut events);

        assert_eq!(events, vec![Event::GameStarted, Event::ScoreChanged { score: 0 }]);
        assert_eq!(query::board(&world), &Board::empty());
        assert_eq!(query::score(&world), 0);
        assert_eq!(query::best_score(&world), 90);
        assert_eq!(query::undo_remaining(&world), 5);
        assert_eq!(query::history_len(&world), 0);
        assert_eq!(query::status(&world), GameStatus::Playing);
        assert_eq!(query::message(&world), None);
    }

    #[test]
    fn successful_move_records_pre_move_snapshot() {
        let mut world = world_with([2, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let before = query::snapshot(&world);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::Move {
                direction: Direction::Left,
            },
            &mut events,
        );

        assert_eq!(query::history_len(&world), 1);
        assert_eq!(query::score(&world), 4);
        assert_eq!(query::last_move(&world), Some(Direction::Left));
        assert_eq!(world.history.pop(), Some(before));
        assert!(matches!(
            events.first(),
            Some(Event::TilesShifted {
                direction: Direction::Left,
                score_gained: 4,
                ..
            })
        ));
        assert!(events.contains(&Event::BestScoreRaised { best_score: 4 }));
    }

    #[test]
    fn unchanged_move_is_a_no_op() {
        let mut world = world_with([2, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let before = query::snapshot(&world);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::Move {
                direction: Direction::Left,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::MoveIgnored {
                direction: Direction::Left,
                reason: MoveRejection::NoChange,
            }]
        );
        assert_eq!(query::snapshot(&world), before);
        assert_eq!(query::history_len(&world), 0);
    }

    #[test]
    fn spawn_into_occupied_cell_is_rejected() {
        let mut world = world_with([2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::SpawnTile {
                cell: cell(0),
                value: TileValue::FOUR,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::SpawnRejected {
                cell: cell(0),
                reason: SpawnRejection::Occupied,
            }]
        );
        assert_eq!(query::board(&world).get(cell(0)), Some(TileValue::TWO));
    }

    #[test]
    fn spawn_on_full_board_is_rejected() {
        let mut world = world_with([2; 16]);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::SpawnTile {
                cell: cell(5),
                value: TileValue::TWO,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::SpawnRejected {
                cell: cell(5),
                reason: SpawnRejection::BoardFull,
            }]
        );
    }

    #[test]
    fn filling_the_last_cell_can_lose_the_game() {
        let mut world = world_with([2, 4, 2, 4, 4, 2, 4, 2, 2, 4, 2, 4, 4, 2, 4, 0]);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::SpawnTile {
                cell: cell(15),
                value: TileValue::TWO,
            },
            &mut events,
        );

        assert_eq!(events.last(), Some(&Event::GameLost));
        assert_eq!(query::status(&world), GameStatus::Lost);
        assert_eq!(query::message(&world), Some(Message::Lost));
    }

    #[test]
    fn dismiss_only_reports_visible_messages() {
        let mut world = World::default();
        let mut events = Vec::new();
        apply(&mut world, Command::DismissMessage, &mut events);
        assert!(events.is_empty());

        world.message = Some(Message::Won);
        apply(&mut world, Command::DismissMessage, &mut events);
        assert_eq!(events, vec![Event::MessageDismissed]);
        assert_eq!(query::message(&world), None);
    }

    #[test]
    fn default_config_matches_house_rules() {
        let config = Config::default();
        assert_eq!(config.undo_budget(), 5);
        assert_eq!(config.history_capacity(), 5);
        assert_eq!(config.win_threshold(), WIN_THRESHOLD);
    }
}
