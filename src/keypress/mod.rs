#![warn(clippy::all, clippy::pedantic)]

//! Single-keypress input with a timeout.
//!
//! The review loop holds the terminal in raw mode only while it is actually
//! waiting for an answer: `open`, one `read_key`, `close`, every prompt.

use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use crate::error::JrpError;

/// One keypress, already reduced to what the review loop cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// A printable key.
    Char(char),
    /// No key arrived before the timeout elapsed.
    Timeout,
    /// A non-printable key (arrows, function keys, ...).
    Other,
}

/// A source of single keypresses.
pub trait KeySource {
    /// Acquire the terminal (or equivalent).
    ///
    /// # Errors
    ///
    /// Returns [`JrpError::TerminalOpen`] when raw mode cannot be entered.
    fn open(&mut self) -> Result<(), JrpError>;

    /// Block until one key is pressed or `timeout` elapses.
    ///
    /// # Errors
    ///
    /// Returns [`JrpError::Keypress`] when the terminal cannot be read.
    fn read_key(&mut self, timeout: Duration) -> Result<KeyInput, JrpError>;

    /// Release the terminal. Must be called on every exit path after a
    /// successful [`KeySource::open`].
    ///
    /// # Errors
    ///
    /// Returns [`JrpError::TerminalOpen`] when raw mode cannot be left.
    fn close(&mut self) -> Result<(), JrpError>;
}

/// The controlling terminal, via crossterm raw mode.
#[derive(Debug, Default)]
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn open(&mut self) -> Result<(), JrpError> {
        enable_raw_mode().map_err(JrpError::TerminalOpen)
    }

    fn read_key(&mut self, timeout: Duration) -> Result<KeyInput, JrpError> {
        let deadline = Instant::now() + timeout;
        // Mouse, resize, and key-release events do not answer the prompt;
        // keep polling until a press arrives or the deadline passes.
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(KeyInput::Timeout);
            }
            if !event::poll(remaining).map_err(JrpError::Keypress)? {
                return Ok(KeyInput::Timeout);
            }
            if let Event::Key(key) = event::read().map_err(JrpError::Keypress)? {
                if key.kind == KeyEventKind::Press {
                    return Ok(match key.code {
                        KeyCode::Char(c) => KeyInput::Char(c),
                        _ => KeyInput::Other,
                    });
                }
            }
        }
    }

    fn close(&mut self) -> Result<(), JrpError> {
        disable_raw_mode().map_err(JrpError::TerminalOpen)
    }
}
