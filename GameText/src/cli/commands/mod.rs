use clap::Subcommand;
use std::path::PathBuf;

pub mod fetch;
pub mod strings;

#[derive(Subcommand)]
pub enum Commands {
    /// Print every record of a .str or .csf file
    Dump {
        /// String file
        path: PathBuf,

        /// Print records sorted by label instead of file order
        #[arg(short, long)]
        sorted: bool,

        /// Maximum records to print
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Look up one label in a string file
    Get {
        /// String file
        path: PathBuf,

        /// Label (case-insensitive)
        label: String,
    },

    /// List labels starting with a prefix (case-sensitive)
    Prefix {
        /// String file
        path: PathBuf,

        /// Label prefix, e.g. "GUI:"
        prefix: String,
    },

    /// Convert between .str and .csf (format chosen by extension)
    Convert {
        /// Source file
        #[arg(short, long)]
        source: PathBuf,

        /// Destination file
        #[arg(short, long)]
        destination: PathBuf,

        /// Language id written to the CSF header
        #[arg(long, default_value = "0")]
        language_id: u32,
    },

    /// Show string file statistics
    Stats {
        /// String files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Load a game's string tables the way the game does and fetch labels
    Fetch {
        /// Game root directory
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// JSON text config (defaults used when absent)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the configured language
        #[arg(long)]
        language: Option<String>,

        /// Map string file to layer over the main table
        #[arg(short, long)]
        map: Option<String>,

        /// Labels to fetch
        #[arg(required = true)]
        labels: Vec<String>,
    },
}

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Dump { path, sorted, limit } => strings::dump(path, *sorted, *limit),
            Commands::Get { path, label } => strings::get(path, label),
            Commands::Prefix { path, prefix } => strings::prefix(path, prefix),
            Commands::Convert {
                source,
                destination,
                language_id,
            } => strings::convert(source, destination, *language_id),
            Commands::Stats { paths } => strings::stats(paths),
            Commands::Fetch {
                root,
                config,
                language,
                map,
                labels,
            } => fetch::execute(
                root,
                config.as_deref(),
                language.as_deref(),
                map.as_deref(),
                labels,
            ),
        }
    }
}
