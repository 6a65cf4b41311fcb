#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Tile Merge adapters.
//!
//! Adapters never read the world directly. After every dispatch they receive
//! a [`RenderSnapshot`] holding the board together with per-cell annotations
//! derived from the events of that dispatch.

use std::{fmt, io::Write};

use anyhow::{Context, Result as AnyResult};
use tile_merge_core::{CellIndex, Direction, Event, GameStatus, TileValue, BOARD_SIDE, CELL_COUNT};
use tile_merge_world::{query, World};

const CELL_WIDTH: usize = 6;

/// Presentation state of a single board cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RenderCell {
    /// Tile occupying the cell, if any.
    pub value: Option<TileValue>,
    /// Whether the tile was spawned during the latest dispatch.
    pub is_new: bool,
    /// Whether the tile was produced by a merge during the latest dispatch.
    pub is_merged: bool,
    /// Whether the tile exceeds the winning threshold.
    pub is_super: bool,
}

impl RenderCell {
    fn marker(&self) -> char {
        if self.is_merged {
            '+'
        } else if self.is_new {
            '*'
        } else {
            ' '
        }
    }
}

/// Everything an adapter needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderSnapshot {
    /// Cells in row-major order.
    pub cells: [RenderCell; CELL_COUNT],
    /// Score of the current game.
    pub score: u64,
    /// Highest score seen so far.
    pub best_score: u64,
    /// Undos left in the current game.
    pub undo_remaining: u32,
    /// Whether an undo request would currently be accepted.
    pub can_undo: bool,
    /// Session status.
    pub status: GameStatus,
    /// Direction of the last successful move.
    pub last_move: Option<Direction>,
    /// Win or loss announcement that has not been dismissed yet.
    pub message: Option<&'static str>,
}

impl RenderSnapshot {
    /// Captures the world after a dispatch that emitted `events`.
    ///
    /// Merge flags come from the merge records carried by
    /// [`Event::TilesShifted`]; spawn flags come from [`Event::TileSpawned`].
    #[must_use]
    pub fn capture(world: &World, events: &[Event]) -> Self {
        let board = query::board(world);
        let mut cells = [RenderCell::default(); CELL_COUNT];
        for cell in CellIndex::all() {
            let value = board.get(cell);
            cells[cell.get()] = RenderCell {
                value,
                is_super: value.is_some_and(|tile| tile.is_super()),
                ..RenderCell::default()
            };
        }

        for event in events {
            match event {
                Event::TilesShifted { merges, .. } => {
                    for cell in merges.iter().filter_map(|record| record.cell()) {
                        cells[cell.get()].is_merged = true;
                    }
                }
                Event::TileSpawned { cell, .. } => cells[cell.get()].is_new = true,
                _ => {}
            }
        }

        Self {
            cells,
            score: query::score(world),
            best_score: query::best_score(world),
            undo_remaining: query::undo_remaining(world),
            can_undo: query::can_undo(world),
            status: query::status(world),
            last_move: query::last_move(world),
            message: query::message(world).map(|message| message.text()),
        }
    }

    /// Returns the cell at `cell`.
    #[must_use]
    pub fn cell(&self, cell: CellIndex) -> &RenderCell {
        &self.cells[cell.get()]
    }
}

impl fmt::Display for RenderSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Score: {}  Best: {}  Undo: {}",
            self.score, self.best_score, self.undo_remaining
        )?;

        let segment = format!("{}+", "-".repeat(CELL_WIDTH + 2));
        let border = format!("+{}", segment.repeat(BOARD_SIDE));
        writeln!(f, "{border}")?;
        for row in self.cells.chunks(BOARD_SIDE) {
            write!(f, "|")?;
            for cell in row {
                match cell.value {
                    Some(tile) => write!(
                        f,
                        " {:>width$}{}|",
                        tile.get(),
                        cell.marker(),
                        width = CELL_WIDTH
                    )?,
                    None => write!(f, " {:>width$} |", "", width = CELL_WIDTH)?,
                }
            }
            writeln!(f)?;
            writeln!(f, "{border}")?;
        }

        if let Some(message) = self.message {
            writeln!(f, "{message}")?;
        }
        Ok(())
    }
}

/// Adapter capable of presenting render snapshots.
pub trait Presenter {
    /// Draws one frame.
    fn present(&mut self, snapshot: &RenderSnapshot) -> AnyResult<()>;
}

/// Presenter that writes plain-text frames to any writer.
#[derive(Debug)]
pub struct TextPresenter<W> {
    writer: W,
}

impl<W: Write> TextPresenter<W> {
    /// Creates a presenter writing into `writer`.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the presenter and returns the writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn present(&mut self, snapshot: &RenderSnapshot) -> AnyResult<()> {
        write!(self.writer, "{snapshot}").context("failed to write frame")?;
        self.writer.flush().context("failed to flush frame")
    }
}
