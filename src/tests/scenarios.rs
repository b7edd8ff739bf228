#![warn(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use chrono::Utc;
use tempfile::TempDir;

use crate::{
    composer::{self, GenerationOutcome, Mode},
    keypress::{KeyInput, KeySource},
    lexicon::fixtures::build_wnj,
    render,
    review::{ReviewLoop, ReviewOptions},
    store::{BatchStatus, Combine, Jrp, JrpStore, QueryOptions},
};

struct ScriptedKeys(Vec<KeyInput>);

impl KeySource for ScriptedKeys {
    fn open(&mut self) -> Result<(), crate::JrpError> {
        Ok(())
    }

    fn read_key(&mut self, _timeout: std::time::Duration) -> Result<KeyInput, crate::JrpError> {
        Ok(if self.0.is_empty() {
            KeyInput::Timeout
        } else {
            self.0.remove(0)
        })
    }

    fn close(&mut self) -> Result<(), crate::JrpError> {
        Ok(())
    }
}

fn fixture_lexicon(temp_dir: &TempDir) -> PathBuf {
    let path = temp_dir.path().join("wnjpn.db");
    build_wnj(
        &path,
        &[
            ("明るい", "a"),
            ("静かな", "a"),
            ("丸", "a"),
            ("朝", "n"),
            ("犬", "n"),
            ("庭", "n"),
        ],
    );
    path
}

fn raw_phrase(text: &str) -> Jrp {
    let now = Utc::now();
    Jrp {
        id: None,
        phrase: text.to_string(),
        prefix: None,
        suffix: None,
        is_favorited: false,
        created_at: now,
        updated_at: now,
    }
}

/// S1: generating prints phrases but never writes to the history store.
#[test]
fn generating_three_phrases_saves_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let wnj = fixture_lexicon(&temp_dir);
    let store = JrpStore::open(&temp_dir.path().join("jrp.db")).unwrap();

    let outcome = composer::generate(&wnj, 3, &Mode::Free).unwrap();
    let GenerationOutcome::Success(phrases) = outcome else {
        panic!("expected a full generation");
    };
    let mut out = Vec::new();
    render::render_plain(&mut out, &phrases).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().filter(|l| !l.is_empty()).count(), 3);

    assert!(store.get_all_history().unwrap().is_empty());
}

/// S2: one `i` answer saves and favorites exactly one phrase.
#[test]
fn interactive_i_saves_one_favorited_row() {
    let temp_dir = TempDir::new().unwrap();
    let wnj = fixture_lexicon(&temp_dir);
    let store = JrpStore::open(&temp_dir.path().join("jrp.db")).unwrap();

    let mut out = Vec::new();
    let mut review = ReviewLoop::new(
        wnj,
        &store,
        ScriptedKeys(vec![KeyInput::Char('i')]),
        &mut out,
        ReviewOptions {
            timeout_secs: 1,
            ..ReviewOptions::default()
        },
    );
    review.run().unwrap();
    drop(review);

    let rows = store.get_all_history().unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].is_favorited);
    assert!(String::from_utf8(out).unwrap().contains("phase 1"));
}

/// S3: a prefix and a suffix together never generate, save, or prompt.
#[test]
fn conflicting_prefix_and_suffix_terminate_immediately() {
    let temp_dir = TempDir::new().unwrap();
    let wnj = fixture_lexicon(&temp_dir);
    let store = JrpStore::open(&temp_dir.path().join("jrp.db")).unwrap();

    let mut out = Vec::new();
    let mut review = ReviewLoop::new(
        wnj,
        &store,
        ScriptedKeys(vec![]),
        &mut out,
        ReviewOptions {
            prefix: Some("テスト".to_string()),
            suffix: Some("テスト".to_string()),
            timeout_secs: 1,
            plain: false,
        },
    );
    review.run().unwrap();
    drop(review);

    assert!(store.get_all_history().unwrap().is_empty());
    assert!(!String::from_utf8(out).unwrap().contains("phase"));
}

/// S4: an identical row twice in one batch collapses to a single insert.
#[test]
fn duplicate_rows_in_one_save_collapse() {
    let temp_dir = TempDir::new().unwrap();
    let store = JrpStore::open(&temp_dir.path().join("jrp.db")).unwrap();

    let outcome = store
        .save_history(&[raw_phrase("a"), raw_phrase("a")])
        .unwrap();
    assert_eq!(outcome.status, BatchStatus::NotAll);
    assert_eq!(store.get_all_history().unwrap().len(), 1);
}

/// S5: AND search over {αβ, βγ, αγ} finds only αβ.
#[test]
fn and_search_returns_the_intersection() {
    let temp_dir = TempDir::new().unwrap();
    let store = JrpStore::open(&temp_dir.path().join("jrp.db")).unwrap();
    store
        .save_history(&[raw_phrase("αβ"), raw_phrase("βγ"), raw_phrase("αγ")])
        .unwrap();

    let rows = store
        .search_history(
            &["α".to_string(), "β".to_string()],
            Combine::And,
            &QueryOptions::default(),
        )
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].phrase, "αβ");
}

/// S6: clearing all favorites leaves none and reports a full batch.
#[test]
fn remove_all_favorite_clears_every_mark() {
    let temp_dir = TempDir::new().unwrap();
    let store = JrpStore::open(&temp_dir.path().join("jrp.db")).unwrap();
    store
        .save_history(&[
            raw_phrase("a"),
            raw_phrase("b"),
            raw_phrase("c"),
            raw_phrase("d"),
            raw_phrase("e"),
        ])
        .unwrap();
    let ids: Vec<i64> = store
        .get_all_history()
        .unwrap()
        .iter()
        .map(|p| p.id.unwrap())
        .collect();
    store.add_favorite_by_ids(&ids[..2]).unwrap();

    assert_eq!(store.remove_all_favorite().unwrap(), BatchStatus::All);
    let rows = store.get_all_history().unwrap();
    assert_eq!(rows.len(), 5);
    assert!(rows.iter().all(|p| !p.is_favorited));
}

/// Missing lexicon: advisory, clean exit, empty store.
#[test]
fn missing_lexicon_is_advisory_only() {
    let temp_dir = TempDir::new().unwrap();
    let store = JrpStore::open(&temp_dir.path().join("jrp.db")).unwrap();

    let mut out = Vec::new();
    let mut review = ReviewLoop::new(
        temp_dir.path().join("absent.db"),
        &store,
        ScriptedKeys(vec![]),
        &mut out,
        ReviewOptions {
            timeout_secs: 1,
            ..ReviewOptions::default()
        },
    );
    review.run().unwrap();
    drop(review);

    assert!(store.get_all_history().unwrap().is_empty());
    assert!(String::from_utf8(out).unwrap().contains("jrp download"));
}
