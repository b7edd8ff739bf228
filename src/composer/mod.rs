#![warn(clippy::all, clippy::pedantic)]

//! Phrase generation.
//!
//! A phrase pairs one adjective-family written form with one noun. Sampling
//! is uniform over the unique `(adjective, noun)` cross product, without
//! replacement, so a single call never repeats a composed phrase.

use std::{
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

use chrono::Utc;
use log::debug;
use rand::{SeedableRng, rngs::StdRng, seq::index};
use unicode_normalization::UnicodeNormalization;

use crate::{
    error::JrpError,
    lexicon::{LexicalEntry, SurfaceFilter, WnjLexicon},
    store::Jrp,
};

/// Operating configuration for one generation call.
#[derive(Debug, Clone, Default)]
pub enum Mode {
    /// Pair any adjective with any noun.
    #[default]
    Free,
    /// The adjective must equal the given form, falling back to forms that
    /// start with it.
    WithPrefix(String),
    /// The noun must end with the given form, falling back to forms equal
    /// to it.
    WithSuffix(String),
}

/// What a generation call produced, short of an outright failure.
#[derive(Debug)]
pub enum GenerationOutcome {
    /// Exactly the requested number of phrases.
    Success(Vec<Jrp>),
    /// Fewer than requested; the lexicon holds too few unique pairs.
    Partial(Vec<Jrp>),
    /// The WordNet Japan file is absent.
    NoLexicon,
}

impl GenerationOutcome {
    /// The generated phrases, empty for [`GenerationOutcome::NoLexicon`].
    #[must_use]
    pub fn phrases(&self) -> &[Jrp] {
        match self {
            Self::Success(phrases) | Self::Partial(phrases) => phrases,
            Self::NoLexicon => &[],
        }
    }
}

/// Generate `count` random phrases from the lexicon at `wnj_path`.
///
/// The pseudo-random source is seeded from the wall clock at nanosecond
/// resolution on every call.
///
/// # Errors
///
/// Returns [`JrpError::PoolEmpty`] when the mode's candidate pools have no
/// entries and [`JrpError::LexiconQuery`] when the lexicon cannot be read.
pub fn generate(wnj_path: &Path, count: usize, mode: &Mode) -> Result<GenerationOutcome, JrpError> {
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_nanos() & u128::from(u64::MAX)).unwrap_or(0));
    generate_seeded(wnj_path, count, mode, seed)
}

/// Generate with an explicit seed. Output is reproducible for a given seed
/// and lexicon file.
///
/// # Errors
///
/// Same contract as [`generate`].
pub fn generate_seeded(
    wnj_path: &Path,
    count: usize,
    mode: &Mode,
    seed: u64,
) -> Result<GenerationOutcome, JrpError> {
    let lexicon = match WnjLexicon::open(wnj_path) {
        Ok(lexicon) => lexicon,
        Err(JrpError::LexiconMissing(_)) => return Ok(GenerationOutcome::NoLexicon),
        Err(err) => return Err(err),
    };

    let (adjectives, nouns) = candidate_pools(&lexicon, mode)?;
    debug!(
        "sampling {count} of {} x {} candidate pairs (seed {seed})",
        adjectives.len(),
        nouns.len()
    );

    let total = adjectives.len() * nouns.len();
    let drawn = count.min(total);
    let mut rng = StdRng::seed_from_u64(seed);
    let picks = index::sample(&mut rng, total, drawn);

    let now = Utc::now();
    let phrases = picks
        .iter()
        .map(|pair| {
            let adjective = &adjectives[pair / nouns.len()];
            let noun = &nouns[pair % nouns.len()];
            compose(adjective, noun, mode, now)
        })
        .collect();

    if drawn < count {
        Ok(GenerationOutcome::Partial(phrases))
    } else {
        Ok(GenerationOutcome::Success(phrases))
    }
}

fn candidate_pools(
    lexicon: &WnjLexicon,
    mode: &Mode,
) -> Result<(Vec<LexicalEntry>, Vec<LexicalEntry>), JrpError> {
    let (mut adjectives, mut nouns) = match mode {
        Mode::Free => (
            lexicon.adjectives(&SurfaceFilter::Any)?,
            lexicon.nouns(&SurfaceFilter::Any)?,
        ),
        Mode::WithPrefix(form) => {
            let mut adjectives = lexicon.adjectives(&SurfaceFilter::Exact(form.clone()))?;
            if adjectives.is_empty() {
                adjectives = lexicon.adjectives(&SurfaceFilter::Prefix(form.clone()))?;
            }
            (adjectives, lexicon.nouns(&SurfaceFilter::Any)?)
        }
        Mode::WithSuffix(form) => {
            let mut nouns = lexicon.nouns(&SurfaceFilter::Suffix(form.clone()))?;
            if nouns.is_empty() {
                nouns = lexicon.nouns(&SurfaceFilter::Exact(form.clone()))?;
            }
            (lexicon.adjectives(&SurfaceFilter::Any)?, nouns)
        }
    };

    if adjectives.is_empty() {
        return Err(JrpError::PoolEmpty(pool_failure("adjective", mode)));
    }
    if nouns.is_empty() {
        return Err(JrpError::PoolEmpty(pool_failure("noun", mode)));
    }

    // Unique surface forms keep the cross product free of repeats; a stable
    // order keeps seeded output reproducible for a given file.
    adjectives.sort();
    adjectives.dedup_by(|a, b| a.lemma == b.lemma);
    nouns.sort();
    nouns.dedup_by(|a, b| a.lemma == b.lemma);
    Ok((adjectives, nouns))
}

fn pool_failure(pool: &str, mode: &Mode) -> String {
    match mode {
        Mode::Free => format!("the lexicon has no {pool} entries"),
        Mode::WithPrefix(form) => format!("no {pool} entries match the prefix {form:?}"),
        Mode::WithSuffix(form) => format!("no {pool} entries match the suffix {form:?}"),
    }
}

fn compose(
    adjective: &LexicalEntry,
    noun: &LexicalEntry,
    mode: &Mode,
    now: chrono::DateTime<Utc>,
) -> Jrp {
    let text: String = format!("{}{}", linked_form(adjective), noun.lemma)
        .nfc()
        .collect();
    let (prefix, suffix) = match mode {
        Mode::Free => (None, None),
        Mode::WithPrefix(form) => (Some(form.clone()), None),
        Mode::WithSuffix(form) => (None, Some(form.clone())),
    };
    Jrp {
        id: None,
        phrase: text,
        prefix,
        suffix,
        is_favorited: false,
        created_at: now,
        updated_at: now,
    }
}

/// Apply the written-form joining rule to an adjective-family entry.
///
/// Forms already carrying a linking suffix (`い`, `な`, `の`) are used
/// verbatim. Otherwise `pos = 'a'` links with `い`; any other
/// adjective-family code the lexicon carries links with `な`.
fn linked_form(entry: &LexicalEntry) -> String {
    let lemma = &entry.lemma;
    if lemma.ends_with('い') || lemma.ends_with('な') || lemma.ends_with('の') {
        return lemma.clone();
    }
    match entry.pos.as_str() {
        "a" => format!("{lemma}い"),
        _ => format!("{lemma}な"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::fixtures::build_wnj;
    use std::collections::HashSet;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const WORDS: &[(&str, &str)] = &[
        ("赤", "a"),
        ("大きい", "a"),
        ("静かな", "a"),
        ("犬", "n"),
        ("猫", "n"),
        ("海犬", "n"),
        ("歩く", "v"),
    ];

    fn fixture(temp_dir: &TempDir) -> PathBuf {
        let path = temp_dir.path().join("wnjpn.db");
        build_wnj(&path, WORDS);
        path
    }

    fn texts(outcome: &GenerationOutcome) -> Vec<String> {
        outcome.phrases().iter().map(|p| p.phrase.clone()).collect()
    }

    #[test]
    fn fixed_seed_reproduces_the_same_ordered_list() {
        let temp_dir = TempDir::new().unwrap();
        let path = fixture(&temp_dir);

        let first = generate_seeded(&path, 5, &Mode::Free, 42).unwrap();
        let second = generate_seeded(&path, 5, &Mode::Free, 42).unwrap();
        assert_eq!(texts(&first), texts(&second));

        let other_seed = generate_seeded(&path, 5, &Mode::Free, 43).unwrap();
        assert_eq!(other_seed.phrases().len(), 5);
    }

    #[test]
    fn phrases_within_one_call_are_pairwise_distinct() {
        let temp_dir = TempDir::new().unwrap();
        let path = fixture(&temp_dir);

        let outcome = generate_seeded(&path, 9, &Mode::Free, 7).unwrap();
        let phrases = texts(&outcome);
        assert_eq!(phrases.len(), 9);
        let unique: HashSet<_> = phrases.iter().collect();
        assert_eq!(unique.len(), phrases.len());
    }

    #[test]
    fn requesting_more_than_the_lexicon_holds_is_partial() {
        let temp_dir = TempDir::new().unwrap();
        let path = fixture(&temp_dir);

        // 3 adjectives x 3 nouns = 9 unique pairs.
        let outcome = generate_seeded(&path, 10, &Mode::Free, 7).unwrap();
        assert!(matches!(outcome, GenerationOutcome::Partial(_)));
        assert_eq!(outcome.phrases().len(), 9);
    }

    #[test]
    fn prefix_mode_stamps_metadata_and_leads_the_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = fixture(&temp_dir);

        let mode = Mode::WithPrefix("大きい".to_string());
        let outcome = generate_seeded(&path, 3, &mode, 1).unwrap();
        assert!(!outcome.phrases().is_empty());
        for phrase in outcome.phrases() {
            assert_eq!(phrase.prefix.as_deref(), Some("大きい"));
            assert_eq!(phrase.suffix, None);
            assert!(phrase.phrase.starts_with("大きい"), "{}", phrase.phrase);
        }
    }

    #[test]
    fn prefix_mode_falls_back_to_starts_with() {
        let temp_dir = TempDir::new().unwrap();
        let path = fixture(&temp_dir);

        // No adjective equals 大, but 大きい starts with it.
        let mode = Mode::WithPrefix("大".to_string());
        let outcome = generate_seeded(&path, 2, &mode, 1).unwrap();
        for phrase in outcome.phrases() {
            assert!(phrase.phrase.starts_with('大'), "{}", phrase.phrase);
        }
    }

    #[test]
    fn suffix_mode_stamps_metadata_and_ends_the_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = fixture(&temp_dir);

        let mode = Mode::WithSuffix("犬".to_string());
        let outcome = generate_seeded(&path, 4, &mode, 1).unwrap();
        assert!(!outcome.phrases().is_empty());
        for phrase in outcome.phrases() {
            assert_eq!(phrase.suffix.as_deref(), Some("犬"));
            assert_eq!(phrase.prefix, None);
            assert!(phrase.phrase.ends_with('犬'), "{}", phrase.phrase);
        }
    }

    #[test]
    fn unmatched_prefix_is_an_empty_pool_failure() {
        let temp_dir = TempDir::new().unwrap();
        let path = fixture(&temp_dir);

        let mode = Mode::WithPrefix("青".to_string());
        let err = generate_seeded(&path, 1, &mode, 1).unwrap_err();
        assert!(matches!(err, JrpError::PoolEmpty(_)));
    }

    #[test]
    fn absent_lexicon_is_not_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.db");

        let outcome = generate_seeded(&path, 1, &Mode::Free, 1).unwrap();
        assert!(matches!(outcome, GenerationOutcome::NoLexicon));
    }

    #[test]
    fn linking_rule_follows_the_pos_table() {
        let link = |lemma: &str, pos: &str| {
            linked_form(&LexicalEntry {
                lemma: lemma.to_string(),
                pos: pos.to_string(),
            })
        };
        assert_eq!(link("大きい", "a"), "大きい");
        assert_eq!(link("静かな", "a"), "静かな");
        assert_eq!(link("紫の", "a"), "紫の");
        assert_eq!(link("赤", "a"), "赤い");
    }

    #[test]
    fn generated_phrases_carry_matching_timestamps() {
        let temp_dir = TempDir::new().unwrap();
        let path = fixture(&temp_dir);

        let outcome = generate_seeded(&path, 2, &Mode::Free, 3).unwrap();
        for phrase in outcome.phrases() {
            assert_eq!(phrase.created_at, phrase.updated_at);
            assert!(!phrase.is_favorited);
            assert_eq!(phrase.id, None);
        }
    }
}
