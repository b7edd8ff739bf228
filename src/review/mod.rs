#![warn(clippy::all, clippy::pedantic)]

//! The interactive review loop.
//!
//! One phase = generate one phrase, show it, read one key, act on it. The
//! loop owns nothing global: the lexicon path, the store, the key source,
//! and the output writer are all handed to the constructor.

use std::{io::Write, path::PathBuf, time::Duration};

use colored::Colorize;
use log::debug;

use crate::{
    composer::{self, GenerationOutcome, Mode},
    error::JrpError,
    keypress::{KeyInput, KeySource},
    render,
    store::{BatchStatus, Jrp, JrpStore},
};

/// Options the review loop is entered with.
#[derive(Debug, Clone, Default)]
pub struct ReviewOptions {
    /// Fix the adjective to this written form.
    pub prefix: Option<String>,
    /// Require nouns ending with this written form.
    pub suffix: Option<String>,
    /// Render phrases as plain lines instead of a table.
    pub plain: bool,
    /// Seconds to wait for each answer.
    pub timeout_secs: u64,
}

/// The user's per-phase decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Answer {
    SaveFavoriteContinue,
    SaveFavoriteExit,
    SaveContinue,
    SaveExit,
    SkipContinue,
    SkipExit,
}

impl Answer {
    fn from_key(key: KeyInput) -> Self {
        match key {
            KeyInput::Char('u' | 'U') => Self::SaveFavoriteContinue,
            KeyInput::Char('i' | 'I') => Self::SaveFavoriteExit,
            KeyInput::Char('j' | 'J') => Self::SaveContinue,
            KeyInput::Char('k' | 'K') => Self::SaveExit,
            KeyInput::Char('m' | 'M') => Self::SkipContinue,
            // Any other key, and the timeout sentinel, default to
            // skip-and-exit.
            KeyInput::Char(_) | KeyInput::Timeout | KeyInput::Other => Self::SkipExit,
        }
    }

    fn saves(self) -> bool {
        matches!(
            self,
            Self::SaveFavoriteContinue | Self::SaveFavoriteExit | Self::SaveContinue | Self::SaveExit
        )
    }

    fn favorites(self) -> bool {
        matches!(self, Self::SaveFavoriteContinue | Self::SaveFavoriteExit)
    }

    fn exits(self) -> bool {
        matches!(self, Self::SaveFavoriteExit | Self::SaveExit | Self::SkipExit)
    }
}

/// The interactive review state machine.
pub struct ReviewLoop<'a, K: KeySource, W: Write> {
    wnj_path: PathBuf,
    store: &'a JrpStore,
    keys: K,
    out: W,
    options: ReviewOptions,
}

impl<'a, K: KeySource, W: Write> ReviewLoop<'a, K, W> {
    /// Build a loop over the given collaborators.
    pub fn new(
        wnj_path: PathBuf,
        store: &'a JrpStore,
        keys: K,
        out: W,
        options: ReviewOptions,
    ) -> Self {
        Self {
            wnj_path,
            store,
            keys,
            out,
            options,
        }
    }

    /// Run phases until an exit answer, a terminal failure, or a missing
    /// lexicon ends the loop.
    ///
    /// # Errors
    ///
    /// Bubbles store, terminal, and composer errors; a missing lexicon and
    /// the prefix/suffix conflict are clean exits, not errors.
    pub fn run(&mut self) -> Result<(), JrpError> {
        if self.options.prefix.is_some() && self.options.suffix.is_some() {
            writeln!(
                &mut self.out,
                "{}",
                "Cannot use a prefix and a suffix at the same time.".yellow()
            )
            .map_err(JrpError::Output)?;
            return Ok(());
        }

        let mode = match (&self.options.prefix, &self.options.suffix) {
            (Some(prefix), _) => Mode::WithPrefix(prefix.clone()),
            (_, Some(suffix)) => Mode::WithSuffix(suffix.clone()),
            _ => Mode::Free,
        };

        let mut phase = 1u64;
        loop {
            match composer::generate(&self.wnj_path, 1, &mode)? {
                GenerationOutcome::NoLexicon => {
                    writeln!(
                        &mut self.out,
                        "{}",
                        "WordNet Japan database not found. Run `jrp download` first.".yellow()
                    )
                    .map_err(JrpError::Output)?;
                    return Ok(());
                }
                GenerationOutcome::Success(phrases) | GenerationOutcome::Partial(phrases) => {
                    let Some(phrase) = phrases.into_iter().next() else {
                        return Err(JrpError::PoolEmpty(
                            "the lexicon holds no phrase pairs".to_string(),
                        ));
                    };
                    debug!("phase {phase}: {}", phrase.phrase);
                    self.show(phase, &phrase)?;
                    let answer = self.prompt()?;
                    if self.dispatch(answer, phrase)? {
                        writeln!(&mut self.out, "{}", "See you!".blue())
                            .map_err(JrpError::Output)?;
                        return Ok(());
                    }
                }
            }
            phase += 1;
        }
    }

    fn show(&mut self, phase: u64, phrase: &Jrp) -> Result<(), JrpError> {
        writeln!(&mut self.out, "{}", format!("phase {phase}").blue())
            .map_err(JrpError::Output)?;
        if self.options.plain {
            render::render_plain(&mut self.out, std::slice::from_ref(phrase))
                .map_err(JrpError::Output)?;
        } else {
            render::render_table(
                &mut self.out,
                std::slice::from_ref(phrase),
                render::INTERACTIVE_COLUMNS,
            )
            .map_err(JrpError::Output)?;
        }
        writeln!(
            &mut self.out,
            "u) save+favorite  i) save+favorite+exit  j) save  k) save+exit  m) skip  other) skip+exit"
        )
        .map_err(JrpError::Output)?;
        Ok(())
    }

    fn prompt(&mut self) -> Result<Answer, JrpError> {
        self.keys.open()?;
        let key = self.keys.read_key(Duration::from_secs(self.options.timeout_secs));
        // Raw mode must be released on every path, the error one included.
        let closed = self.keys.close();
        let key = key?;
        closed?;
        Ok(Answer::from_key(key))
    }

    /// Act on an answer. Returns `true` when the loop should terminate.
    fn dispatch(&mut self, answer: Answer, phrase: Jrp) -> Result<bool, JrpError> {
        if answer.saves() {
            let outcome = self.store.save_history(std::slice::from_ref(&phrase))?;
            match outcome.status {
                BatchStatus::All => {
                    // Silent when a favorite message follows anyway.
                    if !answer.favorites() {
                        writeln!(&mut self.out, "{}", "Saved.".green())
                            .map_err(JrpError::Output)?;
                    }
                }
                BatchStatus::None => {
                    writeln!(&mut self.out, "{}", "Already saved.".yellow())
                        .map_err(JrpError::Output)?;
                }
                BatchStatus::NotAll => {
                    writeln!(&mut self.out, "{}", "Some phrases were already saved.".yellow())
                        .map_err(JrpError::Output)?;
                }
            }

            if answer.favorites() {
                let ids: Vec<i64> = outcome.saved.iter().filter_map(|p| p.id).collect();
                let status = self.store.add_favorite_by_ids(&ids)?;
                let message = match status {
                    BatchStatus::All => "Favorited.".green(),
                    BatchStatus::None => "Already favorited.".yellow(),
                    BatchStatus::NotAll => "Some phrases were already favorited.".yellow(),
                };
                writeln!(&mut self.out, "{message}").map_err(JrpError::Output)?;
            }
        } else if answer == Answer::SkipContinue {
            writeln!(&mut self.out, "{}", "Skipped.".yellow()).map_err(JrpError::Output)?;
        }

        Ok(answer.exits())
    }
}
