use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// evaldraft: merge reviewer comments into a draft evaluation opinion
#[derive(Parser, Debug, Clone)]
#[command(name = "evaldraft", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,

    /// Path to config file (default: ./evaldraft.toml if present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Token overlap (Jaccard) at or above which two opinions are merged
    #[arg(long, global = true)]
    pub threshold: Option<f64>,

    /// UTF-8 byte budget for the final opinion
    #[arg(long, global = true)]
    pub byte_limit: Option<usize>,

    /// Phrase that must appear verbatim in the draft (repeatable or comma-separated)
    #[arg(long, global = true, value_delimiter = ',')]
    pub require: Vec<String>,

    /// Keyword whose sentences survive compression first (repeatable or comma-separated)
    #[arg(long, global = true, value_delimiter = ',')]
    pub keep: Vec<String>,

    /// Draft sections with the configured hosted model, falling back on failure
    #[arg(long, global = true)]
    pub use_model: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Aggregate an opinion sheet into a draft
    Draft {
        /// Opinion sheet (TOML, or JSON with a .json extension)
        sheet: PathBuf,

        /// Write the draft text to this file
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Compress the draft to the byte budget before printing/writing
        #[arg(long)]
        compress: bool,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compress an existing draft text to the byte budget
    Compress {
        /// Draft text file, or `-` for stdin
        input: String,

        /// Write the compressed text to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// List mandatory phrases missing from a draft text
    Check {
        /// Draft text file, or `-` for stdin
        input: String,
    },
}
