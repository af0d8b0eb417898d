use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "memento")]
#[command(about = "Maintain and exercise a Memento personal site")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Local copy of the site
    #[arg(
        long,
        global = true,
        value_name = "DIR",
        env = "MEMENTO_SITE_DIR",
        default_value = "."
    )]
    pub site: PathBuf,

    /// Read resources from a deployed site instead of the local directory
    #[arg(long, global = true, value_name = "URL", env = "MEMENTO_BASE_URL")]
    pub base_url: Option<String>,

    /// Site layout config (JSON); built-in layout when omitted
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a Base64 credential record for login-config.json
    EncodeUser {
        /// Plain username
        #[arg(long)]
        username: String,
        /// Plain password
        #[arg(long)]
        password: String,
    },
    /// Validate the login config and both catalogs
    Check,
    /// Inspect the reading notes
    Notes {
        #[command(subcommand)]
        command: NotesCommands,
    },
    /// Inspect the photo gallery
    Photos {
        #[command(subcommand)]
        command: PhotosCommands,
    },
    /// Walk through login, navigation, theme and logout against the site
    Walk {
        /// Plain username to log in with
        #[arg(long)]
        username: String,
        /// Plain password to log in with
        #[arg(long)]
        password: String,
        /// Persistent store file (defaults to the user config directory)
        #[arg(long, value_name = "PATH", env = "MEMENTO_STATE_PATH")]
        state: Option<PathBuf>,
    },
    /// Show the persisted login flag and theme preferences
    Status {
        /// Persistent store file (defaults to the user config directory)
        #[arg(long, value_name = "PATH", env = "MEMENTO_STATE_PATH")]
        state: Option<PathBuf>,
    },
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
pub enum NotesCommands {
    /// List catalog entries with their display titles
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render one note to HTML
    Show {
        /// File name as listed in the notes catalog
        file: String,
    },
}

#[derive(Subcommand)]
pub enum PhotosCommands {
    /// List categories and the cards of one category
    List {
        /// Category to render (first category when omitted)
        #[arg(long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
