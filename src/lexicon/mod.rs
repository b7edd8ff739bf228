#![warn(clippy::all, clippy::pedantic)]

//! Read-only access to the WordNet Japan lexicon.
//!
//! The distribution ships a single SQLite file whose `word` table carries
//! one row per written form: `(wordid, lang, lemma, pron, pos)`. Only the
//! Japanese rows matter here, and only two POS families: the adjective
//! family (`a`, which the distribution also uses for adjectival nouns) and
//! nouns (`n`).

use std::path::Path;

use log::debug;
use rusqlite::{Connection, OpenFlags, types::Value};

use crate::error::JrpError;

/// POS codes making up the adjective-like pool.
pub const ADJECTIVE_POS: &[&str] = &["a"];

/// POS codes making up the noun pool.
pub const NOUN_POS: &[&str] = &["n"];

/// One written form from the lexicon.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct LexicalEntry {
    /// The Japanese written form.
    pub lemma: String,
    /// The lexicon's POS tag for this form.
    pub pos: String,
}

/// Restriction on the written form of returned entries.
#[derive(Debug, Clone, Default)]
pub enum SurfaceFilter {
    /// No restriction.
    #[default]
    Any,
    /// The written form equals the given string.
    Exact(String),
    /// The written form starts with the given string.
    Prefix(String),
    /// The written form ends with the given string.
    Suffix(String),
}

/// A read-only connection to the WordNet Japan database.
///
/// Callers must not depend on the ordering of returned entries; it follows
/// SQLite's scan order for the file at hand.
#[derive(Debug)]
pub struct WnjLexicon {
    conn: Connection,
}

impl WnjLexicon {
    /// Open the lexicon at `path` read-only.
    ///
    /// # Errors
    ///
    /// Returns [`JrpError::LexiconMissing`] when the file does not exist and
    /// [`JrpError::LexiconQuery`] when it cannot be opened as a database.
    pub fn open(path: &Path) -> Result<Self, JrpError> {
        if !path.is_file() {
            return Err(JrpError::LexiconMissing(path.to_path_buf()));
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(JrpError::LexiconQuery)?;
        Ok(Self { conn })
    }

    /// List adjective-family entries, optionally restricted by surface form.
    ///
    /// # Errors
    ///
    /// Returns [`JrpError::LexiconQuery`] when the query fails.
    pub fn adjectives(&self, filter: &SurfaceFilter) -> Result<Vec<LexicalEntry>, JrpError> {
        self.list(ADJECTIVE_POS, filter)
    }

    /// List noun entries, optionally restricted by surface form.
    ///
    /// # Errors
    ///
    /// Returns [`JrpError::LexiconQuery`] when the query fails.
    pub fn nouns(&self, filter: &SurfaceFilter) -> Result<Vec<LexicalEntry>, JrpError> {
        self.list(NOUN_POS, filter)
    }

    fn list(&self, pos: &[&str], filter: &SurfaceFilter) -> Result<Vec<LexicalEntry>, JrpError> {
        let placeholders = vec!["?"; pos.len()].join(", ");
        let mut sql = format!(
            "SELECT lemma, pos FROM word WHERE lang = 'jpn' AND pos IN ({placeholders})"
        );
        let mut bind: Vec<Value> = pos.iter().map(|p| Value::from((*p).to_string())).collect();

        match filter {
            SurfaceFilter::Any => {}
            SurfaceFilter::Exact(form) => {
                sql.push_str(" AND lemma = ?");
                bind.push(Value::from(form.clone()));
            }
            SurfaceFilter::Prefix(form) => {
                sql.push_str(" AND lemma LIKE ? ESCAPE '\\'");
                bind.push(Value::from(format!("{}%", escape_like(form))));
            }
            SurfaceFilter::Suffix(form) => {
                sql.push_str(" AND lemma LIKE ? ESCAPE '\\'");
                bind.push(Value::from(format!("%{}", escape_like(form))));
            }
        }

        debug!("lexicon query: {sql}");
        let mut stmt = self.conn.prepare(&sql).map_err(JrpError::LexiconQuery)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(bind), |row| {
                Ok(LexicalEntry {
                    lemma: row.get(0)?,
                    pos: row.get(1)?,
                })
            })
            .map_err(JrpError::LexiconQuery)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(JrpError::LexiconQuery)?);
        }
        Ok(entries)
    }
}

/// Escape `LIKE` metacharacters so user text matches literally.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
