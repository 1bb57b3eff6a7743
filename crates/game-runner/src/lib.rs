//! Controller and collaborators around `twenty48-core`: TOML config, an
//! interactive text session, batch autoplay and a SQLite run recorder.

pub mod autoplay;
pub mod config;
pub mod recorder;
pub mod session;
