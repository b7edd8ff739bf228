#![warn(clippy::all, clippy::pedantic)]

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Default seconds to wait for an answer in interactive mode.
pub const DEFAULT_PROMPT_TIMEOUT_SECS: u64 = 30;

#[derive(Parser)]
#[command(name = "jrp", author, version, about = "Generate Japanese random phrases", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Number of phrases to generate
    #[arg(short = 'n', long = "number", default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub number: u64,

    /// Number of phrases to generate (alternative to --number)
    #[arg(value_name = "COUNT", value_parser = clap::value_parser!(u64).range(1..))]
    pub count: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Review phrases one at a time and decide what to keep
    #[command(visible_alias = "i")]
    Interactive {
        /// Fix the adjective to this written form
        #[arg(short, long)]
        prefix: Option<String>,

        /// Require nouns ending with this written form
        #[arg(short, long)]
        suffix: Option<String>,

        /// Print phrases as plain lines instead of a table
        #[arg(short = 'P', long)]
        plain: bool,

        /// Seconds to wait for each answer
        #[arg(short, long, default_value_t = DEFAULT_PROMPT_TIMEOUT_SECS)]
        timeout: u64,
    },
    /// Browse and manage saved phrases
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
    /// Browse and manage favorited phrases
    Favorite {
        #[command(subcommand)]
        command: FavoriteCommands,
    },
    /// Download the WordNet Japan database
    Download,
    /// Print the version
    Version,
    /// Emit a shell completion script to stdout
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Args)]
pub struct ListingArgs {
    /// Maximum number of rows to show
    #[arg(short, long)]
    pub number: Option<usize>,

    /// Newest rows first
    #[arg(short, long)]
    pub desc: bool,

    /// Print phrases as plain lines instead of a table
    #[arg(short = 'P', long)]
    pub plain: bool,
}

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// Show saved phrases
    Show {
        #[command(flatten)]
        listing: ListingArgs,
    },
    /// Search saved phrases by keyword
    Search {
        /// Match rows containing every keyword instead of any
        #[arg(short, long)]
        and: bool,

        #[command(flatten)]
        listing: ListingArgs,

        /// Keywords to look for in the phrase text
        #[arg(required = true, value_name = "KEYWORD")]
        keywords: Vec<String>,
    },
    /// Delete saved phrases
    Remove {
        /// Delete every saved phrase
        #[arg(short = 'A', long, conflicts_with = "ids")]
        all: bool,

        /// Ids of the phrases to delete
        #[arg(value_name = "ID")]
        ids: Vec<i64>,
    },
    /// Mark saved phrases as favorites
    Favorite {
        /// Ids of the phrases to favorite
        #[arg(required = true, value_name = "ID")]
        ids: Vec<i64>,
    },
    /// Clear the favorite mark from saved phrases
    Unfavorite {
        /// Clear the mark from every favorited phrase
        #[arg(short = 'A', long, conflicts_with = "ids")]
        all: bool,

        /// Ids of the phrases to unfavorite
        #[arg(value_name = "ID")]
        ids: Vec<i64>,
    },
}

#[derive(Subcommand)]
pub enum FavoriteCommands {
    /// Show favorited phrases
    Show {
        #[command(flatten)]
        listing: ListingArgs,
    },
    /// Search favorited phrases by keyword
    Search {
        /// Match rows containing every keyword instead of any
        #[arg(short, long)]
        and: bool,

        #[command(flatten)]
        listing: ListingArgs,

        /// Keywords to look for in the phrase text
        #[arg(required = true, value_name = "KEYWORD")]
        keywords: Vec<String>,
    },
    /// Clear the favorite mark from favorited phrases
    Remove {
        /// Clear the mark from every favorited phrase
        #[arg(short = 'A', long, conflicts_with = "ids")]
        all: bool,

        /// Ids of the phrases to unfavorite
        #[arg(value_name = "ID")]
        ids: Vec<i64>,
    },
}

impl Cli {
    /// The requested generation count; the positional wins over the flag.
    #[must_use]
    pub fn generation_count(&self) -> u64 {
        self.count.unwrap_or(self.number)
    }
}
