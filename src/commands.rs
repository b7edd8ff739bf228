#![warn(clippy::all, clippy::pedantic)]

use std::io;

use anyhow::{Context, Result};
use clap::CommandFactory;
use colored::Colorize;
use log::debug;

use crate::{
    cli::{Cli, Commands, FavoriteCommands, HistoryCommands, ListingArgs},
    composer::{self, GenerationOutcome, Mode},
    download,
    keypress::TerminalKeys,
    paths, render,
    review::{ReviewLoop, ReviewOptions},
    store::{BatchStatus, Combine, FavoriteFilter, Jrp, JrpStore, Order, QueryOptions},
};

/// Dispatch a parsed command line.
///
/// # Errors
///
/// Returns any error the executed subcommand surfaces; `main` prints it in
/// red and exits 1.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None => generate(cli.generation_count()),
        Some(Commands::Interactive {
            prefix,
            suffix,
            plain,
            timeout,
        }) => interactive(prefix, suffix, plain, timeout),
        Some(Commands::History { command }) => match command {
            HistoryCommands::Show { listing } => show(&listing, FavoriteFilter::Any),
            HistoryCommands::Search {
                and,
                listing,
                keywords,
            } => search(&listing, &keywords, and, FavoriteFilter::Any),
            HistoryCommands::Remove { all, ids } => history_remove(all, &ids),
            HistoryCommands::Favorite { ids } => history_favorite(&ids),
            HistoryCommands::Unfavorite { all, ids } => unfavorite(all, &ids),
        },
        Some(Commands::Favorite { command }) => match command {
            FavoriteCommands::Show { listing } => show(&listing, FavoriteFilter::Only),
            FavoriteCommands::Search {
                and,
                listing,
                keywords,
            } => search(&listing, &keywords, and, FavoriteFilter::Only),
            FavoriteCommands::Remove { all, ids } => unfavorite(all, &ids),
        },
        Some(Commands::Download) => {
            let target = paths::wnj_db_path()?;
            download::ensure_wnj_db(&target)
        }
        Some(Commands::Version) => {
            println!("jrp {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(Commands::Completion { shell }) => {
            let mut command = Cli::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut io::stdout());
            Ok(())
        }
    }
}

/// Generate and print phrases without saving them.
fn generate(count: u64) -> Result<()> {
    let wnj_path = paths::wnj_db_path()?;
    let count = usize::try_from(count).context("phrase count out of range")?;

    match composer::generate(&wnj_path, count, &Mode::Free)? {
        GenerationOutcome::NoLexicon => {
            println!("{}", download_advisory());
            Ok(())
        }
        GenerationOutcome::Partial(phrases) => {
            render::render_plain(&mut io::stdout(), &phrases)?;
            println!(
                "{}",
                format!(
                    "The lexicon only holds {} unique phrases; asked for {count}.",
                    phrases.len()
                )
                .yellow()
            );
            Ok(())
        }
        GenerationOutcome::Success(phrases) => {
            render::render_plain(&mut io::stdout(), &phrases)?;
            Ok(())
        }
    }
}

/// Enter the review loop on the real terminal.
fn interactive(
    prefix: Option<String>,
    suffix: Option<String>,
    plain: bool,
    timeout: u64,
) -> Result<()> {
    let wnj_path = paths::wnj_db_path()?;
    let store = open_store()?;
    let options = ReviewOptions {
        prefix,
        suffix,
        plain,
        timeout_secs: timeout,
    };
    debug!("entering the review loop (timeout {timeout}s)");
    let mut review = ReviewLoop::new(wnj_path, &store, TerminalKeys, io::stdout(), options);
    review.run()?;
    Ok(())
}

fn show(listing: &ListingArgs, favorite: FavoriteFilter) -> Result<()> {
    let store = open_store()?;
    let phrases = store.get_history_with_options(&query_options(listing, favorite))?;
    print_listing(listing, &phrases)
}

fn search(
    listing: &ListingArgs,
    keywords: &[String],
    and: bool,
    favorite: FavoriteFilter,
) -> Result<()> {
    let store = open_store()?;
    let combine = if and { Combine::And } else { Combine::Or };
    let phrases = store.search_history(keywords, combine, &query_options(listing, favorite))?;
    print_listing(listing, &phrases)
}

fn history_remove(all: bool, ids: &[i64]) -> Result<()> {
    let store = open_store()?;
    if all {
        let status = store.remove_all_history()?;
        report(status, "Removed all saved phrases.", "Nothing to remove.");
        return Ok(());
    }
    if ids.is_empty() {
        println!("{}", "Nothing to remove. Pass ids or --all.".yellow());
        return Ok(());
    }
    let status = store.remove_history_by_ids(ids)?;
    report_batch(
        status,
        "Removed.",
        "No such phrases.",
        "Some ids were not found.",
    );
    Ok(())
}

fn history_favorite(ids: &[i64]) -> Result<()> {
    let store = open_store()?;
    let status = store.add_favorite_by_ids(ids)?;
    report_batch(
        status,
        "Favorited.",
        "Already favorited.",
        "Some phrases were already favorited or missing.",
    );
    Ok(())
}

fn unfavorite(all: bool, ids: &[i64]) -> Result<()> {
    let store = open_store()?;
    if all {
        let status = store.remove_all_favorite()?;
        report(status, "Unfavorited all phrases.", "No favorited phrases.");
        return Ok(());
    }
    if ids.is_empty() {
        println!("{}", "Nothing to unfavorite. Pass ids or --all.".yellow());
        return Ok(());
    }
    let status = store.remove_favorite_by_ids(ids)?;
    report_batch(
        status,
        "Unfavorited.",
        "Not favorited.",
        "Some phrases were not favorited or missing.",
    );
    Ok(())
}

fn open_store() -> Result<JrpStore> {
    let path = paths::jrp_db_path()?;
    Ok(JrpStore::open(&path)?)
}

fn query_options(listing: &ListingArgs, favorite: FavoriteFilter) -> QueryOptions {
    QueryOptions {
        number: listing.number,
        order: if listing.desc { Order::Desc } else { Order::Asc },
        favorite,
    }
}

fn print_listing(listing: &ListingArgs, phrases: &[Jrp]) -> Result<()> {
    if phrases.is_empty() {
        println!("{}", "No phrases found.".yellow());
        return Ok(());
    }
    if listing.plain {
        render::render_plain(&mut io::stdout(), phrases)?;
    } else {
        render::render_table(&mut io::stdout(), phrases, render::HISTORY_COLUMNS)?;
    }
    Ok(())
}

/// Report an all-or-nothing operation.
fn report(status: BatchStatus, done: &str, nothing: &str) {
    match status {
        BatchStatus::All | BatchStatus::NotAll => println!("{}", done.green()),
        BatchStatus::None => println!("{}", nothing.yellow()),
    }
}

/// Report a per-id bulk operation.
fn report_batch(status: BatchStatus, all: &str, none: &str, not_all: &str) {
    match status {
        BatchStatus::All => println!("{}", all.green()),
        BatchStatus::None => println!("{}", none.yellow()),
        BatchStatus::NotAll => println!("{}", not_all.yellow()),
    }
}

/// The advisory shown whenever the lexicon file is absent.
#[must_use]
pub fn download_advisory() -> colored::ColoredString {
    "WordNet Japan database not found. Run `jrp download` first.".yellow()
}
