//! Line-oriented interactive play: one command per input line, the board is
//! printed after every resolved move and on reset.

use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::Result;
use log::warn;
use rand::Rng;
use twenty48_core::engine::{Direction, goal_progress};
use twenty48_core::game::Game;

use crate::recorder::RunSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Reset,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "r" | "reset" => Ok(Command::Reset),
            "q" | "quit" | "exit" => Ok(Command::Quit),
            other => Ok(Command::Move(other.parse()?)),
        }
    }
}

/// One game as seen by the session, closed by reset, quit, or end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayedGame {
    pub moves: u64,
    pub score: u64,
    pub highest_rank: u8,
    pub over: bool,
}

/// Drive `game` from `input` until `quit` or EOF, writing frames to `out`.
pub fn run<R, I, O>(
    game: &mut Game<R>,
    goal_score: u64,
    input: I,
    out: &mut O,
) -> Result<Vec<PlayedGame>>
where
    R: Rng,
    I: BufRead,
    O: Write,
{
    let mut played = Vec::new();
    let mut moves: u64 = 0;
    render(game, goal_score, out)?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let cmd = match line.parse::<Command>() {
            Ok(cmd) => cmd,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };
        match cmd {
            Command::Quit => break,
            Command::Reset => {
                played.push(close(game, moves));
                moves = 0;
                game.reset();
                render(game, goal_score, out)?;
            }
            Command::Move(dir) => match game.play(dir) {
                Ok(turn) if turn.moved => {
                    moves += 1;
                    render(game, goal_score, out)?;
                    if turn.ended {
                        writeln!(out, "Game over. Score: {}", game.score())?;
                    }
                }
                Ok(_) => writeln!(out, "{dir}: nothing moves")?,
                Err(e) => {
                    warn!("rejected {dir}: {e}");
                    writeln!(out, "{e}")?;
                }
            },
        }
    }
    played.push(close(game, moves));
    out.flush()?;
    Ok(played)
}

/// Turn a session's games into recorder rows.
///
/// Games with no moves are skipped and ids stay consecutive from `first_id`.
/// Only the first game starts from `seed`; games after a reset continue the
/// same RNG stream and get no seed.
pub fn run_summaries(played: &[PlayedGame], seed: u64, first_id: u64) -> Vec<RunSummary> {
    played
        .iter()
        .enumerate()
        .filter(|(_, g)| g.moves > 0)
        .zip(first_id..)
        .map(|((i, g), id)| RunSummary {
            id,
            seed: (i == 0).then_some(seed),
            moves: g.moves,
            score: g.score,
            highest_rank: g.highest_rank,
            over: g.over,
        })
        .collect()
}

fn close<R: Rng>(game: &Game<R>, moves: u64) -> PlayedGame {
    PlayedGame {
        moves,
        score: game.score(),
        highest_rank: game.board().highest_rank(),
        over: game.is_over(),
    }
}

fn render<R: Rng, O: Write>(game: &Game<R>, goal_score: u64, out: &mut O) -> Result<()> {
    write!(out, "{}", game.board())?;
    writeln!(
        out,
        "score: {}  goal: {:.1}%",
        game.score(),
        goal_progress(game.score(), goal_score) * 100.0
    )?;
    Ok(())
}
