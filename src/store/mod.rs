#![warn(clippy::all, clippy::pedantic)]

//! The phrase history store.
//!
//! A single SQLite file owns all persisted phrases. Every public operation
//! acquires the connection it already holds, runs inside one short-lived
//! transaction, and reports partial success through result buckets rather
//! than errors: skipping a duplicate on save or re-favoriting a favorited
//! row is normal operation, not a failure.

use std::path::Path;

use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::{Connection, Row, params, types::Value};

use crate::error::JrpError;

/// One persisted (or about-to-be-persisted) phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jrp {
    /// Store-assigned row id; `None` until inserted.
    pub id: Option<i64>,
    /// The composed phrase text.
    pub phrase: String,
    /// The prefix the phrase was generated under, if any.
    pub prefix: Option<String>,
    /// The suffix the phrase was generated under, if any.
    pub suffix: Option<String>,
    /// Whether the phrase is favorited.
    pub is_favorited: bool,
    /// When the phrase was composed.
    pub created_at: DateTime<Utc>,
    /// Last favorite/unfavorite transition; equals `created_at` until then.
    pub updated_at: DateTime<Utc>,
}

/// How completely a bulk operation took effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// Every input row took effect.
    All,
    /// No input row took effect (duplicates, or already in the target state).
    None,
    /// Some input rows took effect, or some ids did not exist.
    NotAll,
}

/// Result of a bulk save: the bucket plus the rows actually inserted, with
/// their assigned ids.
#[derive(Debug)]
pub struct SaveOutcome {
    /// How completely the batch was saved.
    pub status: BatchStatus,
    /// The inserted rows, ids filled in.
    pub saved: Vec<Jrp>,
}

/// Row ordering for list and search queries, by id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Order {
    /// Oldest first.
    #[default]
    Asc,
    /// Newest first.
    Desc,
}

/// Restriction on the favorite flag for list and search queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FavoriteFilter {
    /// Favorited and non-favorited rows alike.
    #[default]
    Any,
    /// Only favorited rows.
    Only,
    /// Only non-favorited rows.
    Exclude,
}

/// Options shared by list and search queries.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Maximum number of rows, applied after ordering.
    pub number: Option<usize>,
    /// Ordering by id.
    pub order: Order,
    /// Favorite flag restriction.
    pub favorite: FavoriteFilter,
}

/// How search keywords combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combine {
    /// A row must contain every keyword.
    And,
    /// A row must contain at least one keyword.
    Or,
}

/// A read-write connection to the phrase history database.
pub struct JrpStore {
    conn: Connection,
}

impl JrpStore {
    /// Open (creating on first use) the store at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`JrpError::StoreOpen`] when the file cannot be opened or the
    /// schema cannot be created.
    pub fn open(path: &Path) -> Result<Self, JrpError> {
        let conn = Connection::open(path).map_err(JrpError::StoreOpen)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(JrpError::StoreOpen)?;
        let store = Self { conn };
        store.create_schema()?;
        Ok(store)
    }

    /// Open an in-memory store. Test use only; the schema is identical.
    ///
    /// # Errors
    ///
    /// Returns [`JrpError::StoreOpen`] when the schema cannot be created.
    pub fn open_in_memory() -> Result<Self, JrpError> {
        let conn = Connection::open_in_memory().map_err(JrpError::StoreOpen)?;
        let store = Self { conn };
        store.create_schema()?;
        Ok(store)
    }

    fn create_schema(&self) -> Result<(), JrpError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS jrp (
                    id           INTEGER PRIMARY KEY AUTOINCREMENT,
                    phrase       TEXT NOT NULL,
                    prefix       TEXT,
                    suffix       TEXT,
                    is_favorited INTEGER NOT NULL DEFAULT 0,
                    created_at   TIMESTAMP NOT NULL,
                    updated_at   TIMESTAMP NOT NULL
                );",
            )
            .map_err(JrpError::StoreOpen)
    }

    /// Bulk-insert phrases, silently skipping rows whose
    /// `(phrase, prefix, suffix)` triple is already present — in the table
    /// or earlier in the same batch.
    ///
    /// # Errors
    ///
    /// Returns [`JrpError::StoreWrite`] when the transaction fails.
    pub fn save_history(&self, phrases: &[Jrp]) -> Result<SaveOutcome, JrpError> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(JrpError::StoreWrite)?;

        let mut saved = Vec::new();
        for phrase in phrases {
            let exists: bool = tx
                .query_row(
                    "SELECT EXISTS(
                        SELECT 1 FROM jrp
                        WHERE phrase = ?1 AND prefix IS ?2 AND suffix IS ?3
                    )",
                    params![phrase.phrase, phrase.prefix, phrase.suffix],
                    |row| row.get(0),
                )
                .map_err(JrpError::StoreWrite)?;
            if exists {
                debug!("skipping duplicate phrase: {}", phrase.phrase);
                continue;
            }
            tx.execute(
                "INSERT INTO jrp (phrase, prefix, suffix, is_favorited, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    phrase.phrase,
                    phrase.prefix,
                    phrase.suffix,
                    i64::from(phrase.is_favorited),
                    phrase.created_at,
                    phrase.updated_at,
                ],
            )
            .map_err(JrpError::StoreWrite)?;
            let mut inserted = phrase.clone();
            inserted.id = Some(tx.last_insert_rowid());
            saved.push(inserted);
        }
        tx.commit().map_err(JrpError::StoreWrite)?;

        let status = batch_status(saved.len(), phrases.len(), 0);
        Ok(SaveOutcome { status, saved })
    }

    /// All rows, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`JrpError::StoreRead`] when the query fails.
    pub fn get_all_history(&self) -> Result<Vec<Jrp>, JrpError> {
        self.get_history_with_options(&QueryOptions::default())
    }

    /// Rows ordered by id, optionally limited and filtered by favorite flag.
    ///
    /// # Errors
    ///
    /// Returns [`JrpError::StoreRead`] when the query fails.
    pub fn get_history_with_options(&self, options: &QueryOptions) -> Result<Vec<Jrp>, JrpError> {
        self.query(&[], Combine::Or, options)
    }

    /// Rows whose phrase text contains the keywords, combined with AND
    /// (intersection) or OR (union), then ordered, filtered, and limited
    /// like [`JrpStore::get_history_with_options`].
    ///
    /// # Errors
    ///
    /// Returns [`JrpError::StoreRead`] when the query fails.
    pub fn search_history(
        &self,
        keywords: &[String],
        combine: Combine,
        options: &QueryOptions,
    ) -> Result<Vec<Jrp>, JrpError> {
        self.query(keywords, combine, options)
    }

    fn query(
        &self,
        keywords: &[String],
        combine: Combine,
        options: &QueryOptions,
    ) -> Result<Vec<Jrp>, JrpError> {
        let mut sql = String::from(
            "SELECT id, phrase, prefix, suffix, is_favorited, created_at, updated_at
             FROM jrp WHERE 1=1",
        );
        let mut bind: Vec<Value> = Vec::new();

        if !keywords.is_empty() {
            let clause = keywords
                .iter()
                .map(|_| "phrase LIKE ? ESCAPE '\\'")
                .collect::<Vec<_>>()
                .join(match combine {
                    Combine::And => " AND ",
                    Combine::Or => " OR ",
                });
            sql.push_str(&format!(" AND ({clause})"));
            for keyword in keywords {
                bind.push(Value::from(format!("%{}%", escape_like(keyword))));
            }
        }

        match options.favorite {
            FavoriteFilter::Any => {}
            FavoriteFilter::Only => sql.push_str(" AND is_favorited = 1"),
            FavoriteFilter::Exclude => sql.push_str(" AND is_favorited = 0"),
        }

        sql.push_str(match options.order {
            Order::Asc => " ORDER BY id ASC",
            Order::Desc => " ORDER BY id DESC",
        });

        if let Some(number) = options.number {
            sql.push_str(" LIMIT ?");
            bind.push(Value::from(i64::try_from(number).unwrap_or(i64::MAX)));
        }

        debug!("store query: {sql}");
        let mut stmt = self.conn.prepare(&sql).map_err(JrpError::StoreRead)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(bind), row_to_jrp)
            .map_err(JrpError::StoreRead)?;

        let mut phrases = Vec::new();
        for row in rows {
            phrases.push(row.map_err(JrpError::StoreRead)?);
        }
        Ok(phrases)
    }

    /// Delete the given rows.
    ///
    /// # Errors
    ///
    /// Returns [`JrpError::StoreWrite`] when the transaction fails.
    pub fn remove_history_by_ids(&self, ids: &[i64]) -> Result<BatchStatus, JrpError> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(JrpError::StoreWrite)?;
        let mut removed = 0;
        for id in ids {
            removed += tx
                .execute("DELETE FROM jrp WHERE id = ?1", params![id])
                .map_err(JrpError::StoreWrite)?;
        }
        tx.commit().map_err(JrpError::StoreWrite)?;
        // Ids with no row count as missing, so an unmatched id surfaces as
        // a partial batch instead of "nothing to do".
        Ok(batch_status(removed, ids.len(), ids.len() - removed))
    }

    /// Delete every row.
    ///
    /// # Errors
    ///
    /// Returns [`JrpError::StoreWrite`] when the transaction fails.
    pub fn remove_all_history(&self) -> Result<BatchStatus, JrpError> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(JrpError::StoreWrite)?;
        let removed = tx
            .execute("DELETE FROM jrp", [])
            .map_err(JrpError::StoreWrite)?;
        tx.commit().map_err(JrpError::StoreWrite)?;
        Ok(if removed == 0 {
            BatchStatus::None
        } else {
            BatchStatus::All
        })
    }

    /// Set the favorite flag on the given rows.
    ///
    /// # Errors
    ///
    /// Returns [`JrpError::StoreWrite`] when the transaction fails.
    pub fn add_favorite_by_ids(&self, ids: &[i64]) -> Result<BatchStatus, JrpError> {
        self.set_favorite(ids, true)
    }

    /// Clear the favorite flag on the given rows.
    ///
    /// # Errors
    ///
    /// Returns [`JrpError::StoreWrite`] when the transaction fails.
    pub fn remove_favorite_by_ids(&self, ids: &[i64]) -> Result<BatchStatus, JrpError> {
        self.set_favorite(ids, false)
    }

    /// Clear the favorite flag on every favorited row.
    ///
    /// # Errors
    ///
    /// Returns [`JrpError::StoreWrite`] when the transaction fails.
    pub fn remove_all_favorite(&self) -> Result<BatchStatus, JrpError> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(JrpError::StoreWrite)?;
        let changed = tx
            .execute(
                "UPDATE jrp SET is_favorited = 0, updated_at = ?1 WHERE is_favorited = 1",
                params![Utc::now()],
            )
            .map_err(JrpError::StoreWrite)?;
        tx.commit().map_err(JrpError::StoreWrite)?;
        Ok(if changed == 0 {
            BatchStatus::None
        } else {
            BatchStatus::All
        })
    }

    fn set_favorite(&self, ids: &[i64], target: bool) -> Result<BatchStatus, JrpError> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(JrpError::StoreWrite)?;

        let mut changed = 0;
        let mut missing = 0;
        let now = Utc::now();
        for id in ids {
            let current: Option<bool> = tx
                .query_row(
                    "SELECT is_favorited FROM jrp WHERE id = ?1",
                    params![id],
                    |row| row.get::<_, i64>(0).map(|v| v != 0),
                )
                .map(Some)
                .or_else(|err| match err {
                    rusqlite::Error::QueryReturnedNoRows => Ok(None),
                    other => Err(JrpError::StoreWrite(other)),
                })?;
            match current {
                Option::None => missing += 1,
                Some(state) if state == target => {
                    debug!("id {id} already in target favorite state");
                }
                Some(_) => {
                    tx.execute(
                        "UPDATE jrp SET is_favorited = ?1, updated_at = ?2 WHERE id = ?3",
                        params![i64::from(target), now, id],
                    )
                    .map_err(JrpError::StoreWrite)?;
                    changed += 1;
                }
            }
        }
        tx.commit().map_err(JrpError::StoreWrite)?;
        Ok(batch_status(changed, ids.len(), missing))
    }
}

/// Bucket a bulk operation: `All` when every input took effect, `None` when
/// nothing took effect and nothing was missing, `NotAll` otherwise.
fn batch_status(effective: usize, total: usize, missing: usize) -> BatchStatus {
    if effective == total && total > 0 {
        BatchStatus::All
    } else if effective == 0 && missing == 0 {
        BatchStatus::None
    } else {
        BatchStatus::NotAll
    }
}

fn row_to_jrp(row: &Row<'_>) -> rusqlite::Result<Jrp> {
    Ok(Jrp {
        id: Some(row.get(0)?),
        phrase: row.get(1)?,
        prefix: row.get(2)?,
        suffix: row.get(3)?,
        is_favorited: row.get::<_, i64>(4)? != 0,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// Escape `LIKE` metacharacters so keywords match literally.
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
