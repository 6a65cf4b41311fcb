#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded spawning system responsible for emitting new tile commands.
//!
//! The world never rolls dice itself. After a successful move it broadcasts
//! [`Event::TilesShifted`], and after a reset it broadcasts
//! [`Event::GameStarted`]; this system answers with one or two
//! [`Command::SpawnTile`] requests respectively. Seeding the generator makes
//! whole games replayable.

use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tile_merge_core::{Board, CellIndex, Command, Event, TileValue};

/// Probability that a spawned tile is a four rather than a two.
pub const DEFAULT_FOUR_PROBABILITY: f64 = 0.1;

/// Number of tiles placed on the empty board when a game starts.
pub const OPENING_TILES: usize = 2;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    rng_seed: u64,
    four_probability: f64,
}

impl Config {
    /// Creates a new configuration using the provided seed and default odds.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            four_probability: DEFAULT_FOUR_PROBABILITY,
        }
    }

    /// Overrides the probability of spawning a four.
    ///
    /// Values outside `0.0..=1.0` are clamped; non-finite values fall back to
    /// the default.
    #[must_use]
    pub fn with_four_probability(mut self, four_probability: f64) -> Self {
        self.four_probability = if four_probability.is_finite() {
            four_probability.clamp(0.0, 1.0)
        } else {
            DEFAULT_FOUR_PROBABILITY
        };
        self
    }

    /// Seed fed to the deterministic generator.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// Probability of spawning a four.
    #[must_use]
    pub const fn four_probability(&self) -> f64 {
        self.four_probability
    }
}

/// Tile placed by [`Spawning::spawn`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpawnedTile {
    /// Cell that was empty before the spawn.
    pub cell: CellIndex,
    /// Value written into the cell.
    pub value: TileValue,
}

/// Pure system that picks where and what to spawn after board changes.
#[derive(Debug)]
pub struct Spawning {
    rng: ChaCha8Rng,
    four_probability: f64,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            four_probability: config.four_probability,
        }
    }

    /// Consumes events and the current board to emit spawn commands.
    ///
    /// Requests within one batch target distinct cells, so the opening pair
    /// never collides.
    pub fn handle(&mut self, events: &[Event], board: &Board, out: &mut Vec<Command>) {
        let mut scratch = *board;

        for event in events {
            let attempts = match event {
                Event::GameStarted => OPENING_TILES,
                Event::TilesShifted { .. } => 1,
                _ => continue,
            };

            for _ in 0..attempts {
                if let Some(spawned) = self.spawn(&mut scratch) {
                    out.push(Command::SpawnTile {
                        cell: spawned.cell,
                        value: spawned.value,
                    });
                }
            }
        }
    }

    /// Places one tile into a uniformly chosen empty cell of `board`.
    ///
    /// Returns `None` and leaves the board untouched when it is full.
    pub fn spawn(&mut self, board: &mut Board) -> Option<SpawnedTile> {
        let empty: Vec<CellIndex> = board.empty_cells().collect();
        let cell = *empty.choose(&mut self.rng)?;
        let value = self.next_value();
        board.set(cell, Some(value));
        Some(SpawnedTile { cell, value })
    }

    fn next_value(&mut self) -> TileValue {
        if self.rng.gen_bool(self.four_probability) {
            TileValue::FOUR
        } else {
            TileValue::TWO
        }
    }
}
