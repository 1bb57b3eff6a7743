use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use game_runner::config::Config;
use game_runner::recorder::SessionRecorder;
use game_runner::{autoplay, session};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use twenty48_core::engine::Spawner;
use twenty48_core::game::Game;

#[derive(Debug, Parser)]
#[command(author, version, about = "Play or autoplay a 2048-style merge game")]
struct Cli {
    /// Path to configuration file (defaults apply when omitted)
    #[arg(long, value_name = "FILE", value_parser = clap::value_parser!(PathBuf))]
    config: Option<PathBuf>,

    /// Override the configured RNG seed
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Override the recorder directory
    #[arg(long, value_name = "DIR")]
    db_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Read moves from stdin (left/right/up/down or a/d/w/s, r to reset, q to quit)
    Play,
    /// Play random-policy games in parallel
    Autoplay {
        /// Number of games (overrides config)
        #[arg(long, value_name = "N")]
        games: Option<u32>,
    },
    /// Print the best recorded score
    Best,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut cfg = match &cli.config {
        Some(path) => Config::from_toml(path)?,
        None => Config::default(),
    };
    if cli.seed.is_some() {
        cfg.seed = cli.seed;
    }
    if cli.db_dir.is_some() {
        cfg.recorder.db_dir = cli.db_dir.clone();
    }
    let seed = cfg.seed.unwrap_or_else(rand::random);
    let spawner = Spawner::new(cfg.spawn.low_rank_probability);

    let mut recorder = match &cfg.recorder.db_dir {
        Some(dir) => Some(
            SessionRecorder::new(dir)
                .with_context(|| format!("failed to open recorder at {}", dir.display()))?,
        ),
        None => None,
    };

    match cli.command {
        Cmd::Play => {
            info!("seed {seed}");
            let mut game = Game::with_spawner(cfg.board_size, spawner, StdRng::seed_from_u64(seed));
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            let played = session::run(&mut game, cfg.goal_score, stdin.lock(), &mut stdout)?;
            if let Some(rec) = recorder.as_mut() {
                let first_id = rec.next_run_id()?;
                let runs = session::run_summaries(&played, seed, first_id);
                rec.upsert_runs(&runs)?;
            }
        }
        Cmd::Autoplay { games } => {
            if let Some(n) = games {
                cfg.autoplay.num_games = n;
            }
            cfg.validate()?;
            let first_id = match recorder.as_ref() {
                Some(rec) => rec.next_run_id()?,
                None => 0,
            };
            let runs = autoplay::run_batch(&cfg.autoplay, cfg.board_size, spawner, seed, first_id);
            for r in &runs {
                println!(
                    "game {:>4}  seed {:>20}  moves {:>6}  score {:>8}  max tile {:>6}{}",
                    r.id,
                    r.seed.map_or_else(|| "-".to_string(), |s| s.to_string()),
                    r.moves,
                    r.score,
                    twenty48_core::engine::tile_value(r.highest_rank),
                    if r.over { "" } else { "  (capped)" }
                );
            }
            let best = runs.iter().map(|r| r.score).max().unwrap_or(0);
            let mean = runs.iter().map(|r| r.score as f64).sum::<f64>() / runs.len().max(1) as f64;
            info!("{} game(s): best {best}, mean {mean:.1}", runs.len());
            if let Some(rec) = recorder.as_mut() {
                rec.upsert_runs(&runs)?;
                rec.set_meta("board_size", cfg.board_size.to_string())?;
                rec.set_meta("base_seed", seed.to_string())?;
            }
        }
        Cmd::Best => match recorder.as_ref() {
            Some(rec) => match rec.best_score()? {
                Some(best) => println!("{best}"),
                None => println!("no runs recorded"),
            },
            None => anyhow::bail!("no recorder configured; pass --db-dir or set recorder.db_dir"),
        },
    }
    Ok(())
}
