#![warn(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the core subsystems.
///
/// `LexiconMissing` is informational: callers that can do something sensible
/// without the lexicon (the generator, the review loop) treat it as a clean
/// exit rather than a failure.
#[derive(Debug, Error)]
pub enum JrpError {
    /// The WordNet Japan database file does not exist.
    #[error("WordNet Japan database not found at {0}")]
    LexiconMissing(PathBuf),

    /// The WordNet Japan database exists but could not be queried.
    #[error("lexicon query failed: {0}")]
    LexiconQuery(#[source] rusqlite::Error),

    /// A candidate pool came up empty for the requested mode.
    #[error("no candidate words: {0}")]
    PoolEmpty(String),

    /// The phrase store could not be opened or its schema created.
    #[error("failed to open the phrase store: {0}")]
    StoreOpen(#[source] rusqlite::Error),

    /// A write to the phrase store failed.
    #[error("failed to write to the phrase store: {0}")]
    StoreWrite(#[source] rusqlite::Error),

    /// A read from the phrase store failed.
    #[error("failed to read from the phrase store: {0}")]
    StoreRead(#[source] rusqlite::Error),

    /// The controlling terminal could not enter or leave raw mode.
    #[error("failed to configure the terminal: {0}")]
    TerminalOpen(#[source] std::io::Error),

    /// Reading a keypress from the terminal failed.
    #[error("failed to read a keypress: {0}")]
    Keypress(#[source] std::io::Error),

    /// A per-user application directory could not be resolved or created.
    #[error("could not resolve the application directory: {0}")]
    PathResolve(String),

    /// The output writer failed mid-render.
    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),
}
