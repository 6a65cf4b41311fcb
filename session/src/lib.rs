#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Synchronous command dispatcher for Tile Merge.
//!
//! A [`Session`] owns the world, the spawning system, and a best-score store.
//! Each call to [`Session::dispatch`] applies one command, feeds the resulting
//! events through the spawning system until it stops requesting tiles,
//! persists a raised best score, and returns the frame to draw.

use tile_merge_core::{Command, Event};
use tile_merge_persistence::BestScoreStore;
use tile_merge_rendering::RenderSnapshot;
use tile_merge_system_spawning::{self as spawning, Spawning};
use tile_merge_world::{self as world, query, World};
use tracing::{debug, warn};

/// Configuration bundle for every subsystem owned by a session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    world: world::Config,
    spawning: spawning::Config,
}

impl Config {
    /// Creates a configuration from its parts.
    #[must_use]
    pub const fn new(world: world::Config, spawning: spawning::Config) -> Self {
        Self { world, spawning }
    }

    /// Rule parameters for the world.
    #[must_use]
    pub const fn world(&self) -> world::Config {
        self.world
    }

    /// Parameters for the spawning system.
    #[must_use]
    pub const fn spawning(&self) -> spawning::Config {
        self.spawning
    }
}

/// Running game bound to a best-score store.
#[derive(Debug)]
pub struct Session<S> {
    world: World,
    spawning: Spawning,
    store: S,
    frame: RenderSnapshot,
}

impl<S: BestScoreStore> Session<S> {
    /// Loads the best score from `store` and starts the first game.
    ///
    /// A store that cannot be read is treated as holding zero.
    pub fn new(config: Config, store: S) -> Self {
        let best_score = store.load().unwrap_or_else(|error| {
            warn!(%error, "failed to load best score; starting from zero");
            0
        });

        let world = World::new(config.world(), best_score);
        let frame = RenderSnapshot::capture(&world, &[]);
        let mut session = Self {
            world,
            spawning: Spawning::new(config.spawning()),
            store,
            frame,
        };
        let _ = session.dispatch(Command::NewGame);
        session
    }

    /// Applies `command` and every follow-up spawn, returning the new frame.
    pub fn dispatch(&mut self, command: Command) -> RenderSnapshot {
        debug!(?command, "dispatching command");
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);

        let mut pending = events.clone();
        loop {
            let mut commands = Vec::new();
            self.spawning
                .handle(&pending, query::board(&self.world), &mut commands);
            if commands.is_empty() {
                break;
            }

            pending.clear();
            for command in commands {
                world::apply(&mut self.world, command, &mut pending);
            }
            events.extend(pending.iter().cloned());
        }

        self.persist(&events);
        self.frame = RenderSnapshot::capture(&self.world, &events);
        self.frame.clone()
    }

    /// Frame produced by the most recent dispatch.
    #[must_use]
    pub fn frame(&self) -> &RenderSnapshot {
        &self.frame
    }

    /// Read-only access to the world for queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Best-score store backing the session.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&mut self, events: &[Event]) {
        let raised = events.iter().rev().find_map(|event| match event {
            Event::BestScoreRaised { best_score } => Some(*best_score),
            _ => None,
        });

        if let Some(best_score) = raised {
            if let Err(error) = self.store.save(best_score) {
                warn!(%error, best_score, "failed to persist best score");
            }
        }
    }
}
