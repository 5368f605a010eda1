use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use swipedeck_core::config::UndoInvalidation;
use swipedeck_core::{SwipeAction, TargetKind};

#[derive(Parser)]
#[command(name = "swipedeck")]
#[command(about = "Record swipes and inspect what the next deck will hide")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// CLI profile name
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,

    /// Act as this user instead of the profile's actor
    #[arg(long, global = true, value_name = "ID")]
    pub actor: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a swipe on a listing or profile
    Swipe {
        /// Target ID
        target: String,
        #[arg(long, value_enum)]
        kind: KindArg,
        #[arg(long, value_enum)]
        action: ActionArg,
        /// Deck category the candidate came from
        #[arg(long, value_name = "HINT")]
        category: Option<String>,
    },
    /// Undo the most recent pass
    Undo,
    /// Show targets the next deck will exclude
    Excluded {
        #[arg(long, value_enum)]
        kind: KindArg,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the next deck of candidates
    Deck {
        #[arg(long, value_enum)]
        kind: KindArg,
        /// Number of candidates to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Count recent and expired swipes
    Status {
        #[arg(long, value_enum)]
        kind: KindArg,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete swipes that have left the exclusion window
    Purge {
        #[arg(long, value_enum)]
        kind: KindArg,
    },
    /// Manage the local candidate catalog
    Entity {
        #[command(subcommand)]
        command: EntityCommands,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Sync local replica with remote Turso database
    Sync,
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum EntityCommands {
    /// Add a candidate
    Add {
        #[arg(long, value_enum)]
        kind: KindArg,
        /// Use this ID instead of generating one
        #[arg(long)]
        id: Option<String>,
    },
    /// Mark a candidate as modified now
    Touch {
        id: String,
        #[arg(long, value_enum)]
        kind: KindArg,
    },
    /// Remove a candidate
    Remove {
        id: String,
        #[arg(long, value_enum)]
        kind: KindArg,
    },
    /// List candidates
    List {
        #[arg(long, value_enum)]
        kind: KindArg,
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update profile config
    Init {
        /// Profile name to initialize
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
        /// Acting user ID
        #[arg(long, value_name = "ID")]
        actor: Option<String>,
        /// Exclusion window in hours
        #[arg(long, value_name = "HOURS")]
        window_hours: Option<u32>,
        /// Which likes cancel a pending undo
        #[arg(long, value_enum)]
        undo_scope: Option<UndoScopeArg>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum KindArg {
    Listing,
    Profile,
}

impl From<KindArg> for TargetKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Listing => Self::Listing,
            KindArg::Profile => Self::Profile,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ActionArg {
    #[value(alias = "right")]
    Like,
    #[value(alias = "left")]
    Pass,
    View,
}

impl From<ActionArg> for SwipeAction {
    fn from(value: ActionArg) -> Self {
        match value {
            ActionArg::Like => Self::Like,
            ActionArg::Pass => Self::Pass,
            ActionArg::View => Self::View,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum UndoScopeArg {
    AnyLike,
    SameTarget,
}

impl From<UndoScopeArg> for UndoInvalidation {
    fn from(value: UndoScopeArg) -> Self {
        match value {
            UndoScopeArg::AnyLike => Self::AnyLike,
            UndoScopeArg::SameTarget => Self::SameTarget,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
