use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "flatnotes", bin_name = "flatnotes", version = get_version())]
#[command(about = "Markdown notes in nested folders, stored as flat files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (defaults to $FLATNOTES_HOME, then the platform data dir)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub dir: Option<PathBuf>,

    /// Verbose logging to stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count, help_heading = "Options")]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the folder tree
    #[command(alias = "ls", display_order = 1)]
    Tree {
        /// Show a flat list of keys containing this text instead
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Create a note
    #[command(alias = "n", display_order = 2)]
    New {
        /// Category to create it in (e.g. Study/Java)
        #[arg(long = "in", value_name = "CATEGORY", default_value = "")]
        category: String,

        /// Name words (joined with spaces; defaults to the configured name)
        #[arg(trailing_var_arg = true)]
        name: Vec<String>,
    },

    /// Print a note
    #[command(alias = "v", display_order = 3)]
    View { key: String },

    /// Edit a note in $EDITOR, then sync its name from the heading
    #[command(alias = "e", display_order = 4)]
    Edit { key: String },

    /// Replace a note's content (from --file or stdin), syncing its name from the heading
    #[command(display_order = 5)]
    Save {
        key: String,

        /// Read content from this file instead of stdin
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Mood tag to record in the note's metadata
        #[arg(short, long)]
        mood: Option<String>,
    },

    /// Rename a note and rewrite its heading
    #[command(display_order = 10)]
    Rename {
        key: String,

        /// New name words (joined with spaces)
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Move a note to another category, keeping its name
    #[command(alias = "mv", display_order = 11)]
    Move {
        key: String,

        /// Destination category (root when omitted)
        #[arg(long, value_name = "CATEGORY", default_value = "")]
        to: String,
    },

    /// Rename a category and every note inside it
    #[command(display_order = 12)]
    RenameFolder {
        /// Category path (e.g. Study/Java)
        category: String,
        name: String,
    },

    /// Move a category under another one
    #[command(display_order = 13)]
    MoveFolder {
        /// Category path (e.g. Study/Java)
        category: String,

        /// New parent category (root when omitted)
        #[arg(long, value_name = "CATEGORY", default_value = "")]
        to: String,
    },

    /// Delete a note
    #[command(alias = "delete", display_order = 14)]
    Rm { key: String },

    /// Delete a category
    #[command(display_order = 15)]
    Rmdir {
        category: String,

        /// Also delete every note inside it
        #[arg(short, long)]
        recursive: bool,
    },

    /// Show a note's metadata
    #[command(display_order = 20)]
    Info { key: String },

    /// Record a review and schedule the next one
    #[command(display_order = 21)]
    Review { key: String },

    /// Import text files as notes
    #[command(display_order = 30)]
    Import {
        /// Paths to files or directories to import
        #[arg(required = true, num_args = 1..)]
        paths: Vec<PathBuf>,

        /// Category to import into
        #[arg(long = "in", value_name = "CATEGORY", default_value = "")]
        category: String,
    },

    /// Check and fix data inconsistencies
    #[command(display_order = 31)]
    Doctor,

    /// Print the file path of one or more notes
    #[command(display_order = 32)]
    Path {
        #[arg(required = true, num_args = 1..)]
        keys: Vec<String>,
    },

    /// Get or set configuration
    #[command(display_order = 33)]
    Config {
        /// Configuration key (e.g., note_ext)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}
