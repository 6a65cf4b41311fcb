#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that hosts a Tile Merge session in the terminal.

mod config;
mod input;

use std::{
    io::{self, BufRead},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use tile_merge_persistence::FileStore;
use tile_merge_rendering::{Presenter, TextPresenter};
use tile_merge_session::Session;
use tracing::info;
use tracing_subscriber::EnvFilter;

use self::{
    config::FileConfig,
    input::{Input, InputError},
};

const HELP: &str = "keys: w/a/s/d or arrows move, u undo, n new game, c continue, q quit";

/// Play Tile Merge in the terminal.
#[derive(Debug, Parser)]
#[command(name = "tile-merge", version)]
struct Args {
    /// Seed for tile spawning; drawn at random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// File holding the best score.
    #[arg(long, value_name = "PATH")]
    best_score_path: Option<PathBuf>,

    /// Optional TOML configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Entry point for the Tile Merge command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = config::resolve(args.seed, args.best_score_path, file)?;
    info!(
        seed = settings.seed,
        best_score_path = %settings.best_score_path.display(),
        "starting session"
    );

    let mut session = Session::new(settings.session, FileStore::new(settings.best_score_path));
    println!("{HELP}");

    let mut presenter = TextPresenter::new(io::stdout().lock());
    presenter.present(session.frame())?;

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read input")?;
        match input::parse(&line) {
            Ok(Input::Quit) => break,
            Ok(Input::Command(command)) => {
                let frame = session.dispatch(command);
                presenter.present(&frame)?;
            }
            Err(InputError::Empty) => {}
            Err(error) => eprintln!("{error}; {HELP}"),
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}
