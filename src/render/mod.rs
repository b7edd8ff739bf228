#![warn(clippy::all, clippy::pedantic)]

//! Phrase list presentation: plain lines or a left-aligned table.

use std::io::{self, Write};

use chrono::{DateTime, Local, Utc};
use unicode_width::UnicodeWidthStr;

use crate::store::Jrp;

/// A renderable table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Id,
    Phrase,
    Prefix,
    Suffix,
    Favorited,
    CreatedAt,
    UpdatedAt,
}

/// Columns shown by the interactive review table.
pub const INTERACTIVE_COLUMNS: &[Column] = &[
    Column::Phrase,
    Column::Prefix,
    Column::Suffix,
    Column::CreatedAt,
];

/// Columns shown by history and favorite listings.
pub const HISTORY_COLUMNS: &[Column] = &[
    Column::Id,
    Column::Phrase,
    Column::Prefix,
    Column::Suffix,
    Column::Favorited,
    Column::CreatedAt,
    Column::UpdatedAt,
];

impl Column {
    fn header(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Phrase => "phrase",
            Self::Prefix => "prefix",
            Self::Suffix => "suffix",
            Self::Favorited => "favorited",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }

    fn cell(self, phrase: &Jrp) -> String {
        match self {
            Self::Id => phrase.id.map_or(String::new(), |id| id.to_string()),
            Self::Phrase => phrase.phrase.clone(),
            Self::Prefix => phrase.prefix.clone().unwrap_or_default(),
            Self::Suffix => phrase.suffix.clone().unwrap_or_default(),
            Self::Favorited => if phrase.is_favorited { "*" } else { "" }.to_string(),
            Self::CreatedAt => format_time(phrase.created_at),
            Self::UpdatedAt => format_time(phrase.updated_at),
        }
    }
}

/// Format a timestamp for display, in local time.
#[must_use]
pub fn format_time(time: DateTime<Utc>) -> String {
    let local: DateTime<Local> = time.into();
    local.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Write one line per phrase, each followed by a blank line.
///
/// # Errors
///
/// Propagates writer failures.
pub fn render_plain<W: Write>(out: &mut W, phrases: &[Jrp]) -> io::Result<()> {
    for phrase in phrases {
        writeln!(out, "{}", phrase.phrase)?;
        writeln!(out)?;
    }
    Ok(())
}

/// Write a left-aligned table with a header row. Cells are padded by
/// display width, so CJK text keeps its columns.
///
/// # Errors
///
/// Propagates writer failures.
pub fn render_table<W: Write>(out: &mut W, phrases: &[Jrp], columns: &[Column]) -> io::Result<()> {
    let mut widths: Vec<usize> = columns
        .iter()
        .map(|c| UnicodeWidthStr::width(c.header()))
        .collect();
    let rows: Vec<Vec<String>> = phrases
        .iter()
        .map(|phrase| columns.iter().map(|c| c.cell(phrase)).collect())
        .collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(UnicodeWidthStr::width(cell.as_str()));
        }
    }

    let header: Vec<String> = columns.iter().map(|c| c.header().to_string()).collect();
    write_row(out, &header, &widths)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(out, &rule, &widths)?;
    for row in &rows {
        write_row(out, row, &widths)?;
    }
    Ok(())
}

fn write_row<W: Write>(out: &mut W, cells: &[String], widths: &[usize]) -> io::Result<()> {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        let pad = width.saturating_sub(UnicodeWidthStr::width(cell.as_str()));
        line.push_str(&" ".repeat(pad));
    }
    writeln!(out, "{}", line.trim_end())
}
