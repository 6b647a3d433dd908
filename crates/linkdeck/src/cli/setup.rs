use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "linkdeck", bin_name = "linkdeck", version)]
#[command(about = "Keep your links as printable QR cards", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// User whose links are used ("guest" saves nothing)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub user: Option<String>,

    /// Message language: en or th
    #[arg(long, global = true, help_heading = "Options")]
    pub lang: Option<String>,

    /// Where links and linkdeck.toml live
    #[arg(
        long,
        global = true,
        env = "LINKDECK_DATA_DIR",
        value_name = "DIR",
        help_heading = "Options"
    )]
    pub data_dir: Option<PathBuf>,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Link(LinkCommands),

    #[command(flatten)]
    Data(DataCommands),

    #[command(flatten)]
    Misc(MiscCommands),
}

#[derive(Subcommand, Debug)]
pub enum LinkCommands {
    /// Add a link
    #[command(alias = "a", display_order = 1)]
    Add {
        /// The URL; https:// is added when missing, http:// is refused
        url: String,

        /// Display name
        #[arg(short, long, default_value = "")]
        name: String,

        /// Free-text language label, e.g. Thai
        #[arg(short, long, default_value = "")]
        language: String,
    },

    /// List links
    #[command(alias = "ls", display_order = 2)]
    List {
        /// Case-insensitive search over name, language and URL
        #[arg(short, long)]
        search: Option<String>,

        /// Only links with this language label
        #[arg(short, long)]
        language: Option<String>,

        /// Sort order
        #[arg(short, long, default_value = "newest", value_parser = ["newest", "oldest", "name"])]
        order: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Edit links
    #[command(alias = "e", display_order = 3)]
    Edit {
        /// Indexes or id prefixes of the links (e.g. 1 3 5f2c)
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        language: Option<String>,

        #[arg(long)]
        url: Option<String>,
    },

    /// Delete links
    #[command(alias = "rm", display_order = 4)]
    Delete {
        /// Indexes or id prefixes of the links (e.g. 1 3 5f2c)
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Show language labels with their link counts
    #[command(display_order = 5)]
    Languages,

    /// Render QR cards
    #[command(subcommand, display_order = 6)]
    Card(CardCommands),
}

#[derive(Subcommand, Debug)]
pub enum CardCommands {
    /// Render a card for any URL, without saving a link
    Render {
        url: String,

        /// Title printed above the QR code
        #[arg(short, long, default_value = "")]
        title: String,

        #[command(flatten)]
        options: CardArgs,
    },

    /// Render cards for saved links
    Export {
        /// Indexes or id prefixes of the links (e.g. 1 2 3)
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,

        #[command(flatten)]
        options: CardArgs,
    },
}

#[derive(Args, Debug, Default)]
pub struct CardArgs {
    /// What to do with the card
    #[arg(short, long, default_value = "download", value_parser = ["download", "copy", "share", "preview"])]
    pub action: String,

    /// small, medium or large
    #[arg(long)]
    pub size: Option<String>,

    /// portrait or landscape
    #[arg(long)]
    pub orientation: Option<String>,

    /// Font family, or "builtin"
    #[arg(long)]
    pub font: Option<String>,

    /// Directory downloaded cards are saved in
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Write the preview page but do not open it
    #[arg(long)]
    pub no_open: bool,
}

#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Import links from CSV, TSV or JSON
    #[command(subcommand, display_order = 20)]
    Import(ImportCommands),

    /// Export links as CSV, JSON or a printable list
    #[command(display_order = 21)]
    Export {
        #[arg(short, long, default_value = "csv", value_parser = ["csv", "json", "print"])]
        format: String,

        /// Write to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Indexes of the links - if omitted, exports all
        #[arg(required = false, num_args = 0..)]
        indexes: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ImportCommands {
    /// Show what would be imported
    Preview {
        /// File to read; stdin when omitted
        file: Option<PathBuf>,
    },

    /// Import the valid rows
    Commit {
        /// File to read; stdin when omitted
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum MiscCommands {
    /// Show configuration
    #[command(subcommand, display_order = 30)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective settings
    Show,

    /// Print a commented linkdeck.toml with every default
    Template,

    /// Print the data directory
    Path,
}
