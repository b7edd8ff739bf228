#![warn(clippy::all, clippy::pedantic)]

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rusqlite::{Connection, params};
use tempfile::TempDir;

use jrp::composer::{Mode, generate_seeded};

/// Build a WordNet Japan fixture with a realistic number of rows.
fn build_lexicon(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("wnjpn.db");
    let conn = Connection::open(&path).expect("open bench lexicon");
    conn.execute_batch(
        "CREATE TABLE word (
            wordid INTEGER PRIMARY KEY,
            lang   TEXT NOT NULL,
            lemma  TEXT NOT NULL,
            pron   TEXT,
            pos    TEXT NOT NULL
        );",
    )
    .expect("create bench schema");

    let mut id = 1i64;
    for n in 0..500 {
        conn.execute(
            "INSERT INTO word (wordid, lang, lemma, pron, pos) VALUES (?1, 'jpn', ?2, NULL, 'a')",
            params![id, format!("形容詞{n}")],
        )
        .expect("insert adjective");
        id += 1;
    }
    for n in 0..2000 {
        conn.execute(
            "INSERT INTO word (wordid, lang, lemma, pron, pos) VALUES (?1, 'jpn', ?2, NULL, 'n')",
            params![id, format!("名詞{n}")],
        )
        .expect("insert noun");
        id += 1;
    }
    path
}

fn bench_phrase_generation(c: &mut Criterion) {
    let dir = TempDir::new().expect("bench tempdir");
    let path = build_lexicon(&dir);

    let mut group = c.benchmark_group("phrase_generation");

    group.bench_function("one_free_phrase", |b| {
        b.iter(|| generate_seeded(black_box(&path), 1, &Mode::Free, 7));
    });

    group.bench_function("ten_free_phrases", |b| {
        b.iter(|| generate_seeded(black_box(&path), 10, &Mode::Free, 7));
    });

    group.bench_function("prefix_fallback", |b| {
        let mode = Mode::WithPrefix("形容詞1".to_string());
        b.iter(|| generate_seeded(black_box(&path), 10, &mode, 7));
    });

    group.finish();
}

criterion_group!(benches, bench_phrase_generation);
criterion_main!(benches);
