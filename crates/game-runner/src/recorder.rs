use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

/// Summary for a finished (or capped) game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub id: u64,
    /// `None` when the game did not start from a fresh seed, e.g. after a reset.
    pub seed: Option<u64>,
    pub moves: u64,
    pub score: u64,
    pub highest_rank: u8,
    /// False when the game stopped before reaching a terminal board.
    pub over: bool,
}

/// Session recorder backed by `metadata.db` with `runs` and `session` tables.
///
/// Schema:
/// - runs(id INTEGER PRIMARY KEY, seed BIGINT, moves INT, score INT, highest_rank INT, over INT)
/// - session(meta_key TEXT PRIMARY KEY, meta_value TEXT)
pub struct SessionRecorder {
    session_dir: PathBuf,
    conn: Connection,
}

impl SessionRecorder {
    /// Create or open a session at `dir`, ensure schema exists.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let session_dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&session_dir)
            .with_context(|| format!("failed to create {}", session_dir.display()))?;
        let db_path = session_dir.join("metadata.db");
        let conn = Connection::open(&db_path)
            .with_context(|| format!("failed to open {}", db_path.display()))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS runs (
                id INTEGER PRIMARY KEY,
                seed BIGINT,
                moves INT NOT NULL,
                score INT NOT NULL,
                highest_rank INT NOT NULL,
                over INT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS session (
                meta_key TEXT PRIMARY KEY,
                meta_value TEXT NOT NULL
            );
            "#,
        )
        .context("failed to create schema")?;
        Ok(Self { session_dir, conn })
    }

    /// Insert or update a run summary row.
    pub fn upsert_run(&mut self, r: RunSummary) -> Result<()> {
        self.conn.execute(
            "INSERT INTO runs (id, seed, moves, score, highest_rank, over) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET seed=excluded.seed, moves=excluded.moves, score=excluded.score,
             highest_rank=excluded.highest_rank, over=excluded.over",
            params![
                r.id as i64,
                r.seed.map(|s| s as i64),
                r.moves as i64,
                r.score as i64,
                r.highest_rank as i64,
                r.over
            ],
        )?;
        Ok(())
    }

    /// Write several runs in one transaction.
    pub fn upsert_runs(&mut self, runs: &[RunSummary]) -> Result<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO runs (id, seed, moves, score, highest_rank, over) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(id) DO UPDATE SET seed=excluded.seed, moves=excluded.moves, score=excluded.score,
                 highest_rank=excluded.highest_rank, over=excluded.over",
            )?;
            for r in runs {
                stmt.execute(params![
                    r.id as i64,
                    r.seed.map(|s| s as i64),
                    r.moves as i64,
                    r.score as i64,
                    r.highest_rank as i64,
                    r.over
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Next free run id (one past the current maximum).
    pub fn next_run_id(&self) -> Result<u64> {
        let max: Option<i64> = self
            .conn
            .query_row("SELECT MAX(id) FROM runs", [], |row| row.get(0))?;
        Ok(max.map_or(0, |m| m as u64 + 1))
    }

    /// Highest score across recorded runs.
    pub fn best_score(&self) -> Result<Option<u64>> {
        let best: Option<i64> = self
            .conn
            .query_row("SELECT MAX(score) FROM runs", [], |row| row.get(0))?;
        Ok(best.map(|b| b as u64))
    }

    /// Set a session meta value by key (stored as TEXT).
    pub fn set_meta<K: AsRef<str>, V: AsRef<str>>(&mut self, key: K, value: V) -> Result<()> {
        self.conn.execute(
            "INSERT INTO session (meta_key, meta_value) VALUES (?1, ?2)
             ON CONFLICT(meta_key) DO UPDATE SET meta_value=excluded.meta_value",
            params![key.as_ref(), value.as_ref()],
        )?;
        Ok(())
    }

    pub fn get_meta<K: AsRef<str>>(&self, key: K) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT meta_value FROM session WHERE meta_key = ?1",
                params![key.as_ref()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn get_run(&self, id: u64) -> Result<Option<RunSummary>> {
        let run = self
            .conn
            .query_row(
                "SELECT id, seed, moves, score, highest_rank, over FROM runs WHERE id = ?1",
                params![id as i64],
                |row| {
                    Ok(RunSummary {
                        id: row.get::<_, i64>(0)? as u64,
                        seed: row.get::<_, Option<i64>>(1)?.map(|s| s as u64),
                        moves: row.get::<_, i64>(2)? as u64,
                        score: row.get::<_, i64>(3)? as u64,
                        highest_rank: row.get::<_, i64>(4)? as u8,
                        over: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(run)
    }

    pub fn session_dir(&self) -> &Path {
        &self.session_dir
    }
}
