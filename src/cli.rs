// src/cli.rs

use crate::constants::{DEFAULT_WORKERS, MAX_CHARS_PER_FILE};
use clap::{Parser, Subcommand};

/// Classifies loose documents with a language model and files them into category folders.
///
/// docsort scans a single directory (non-recursively), extracts a short text excerpt
/// from each PDF, Word document, image (via OCR) or text file, asks the model for a
/// category and a clean filename, and prints the resulting plan. Nothing is renamed
/// unless --apply is given; every applied run writes an audit log that `docsort undo`
/// can reverse.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory to organize.
    #[arg(default_value = ".")]
    pub directory: String,

    // --- Classifier Options ---
    /// Chat model used for classification (defaults to $DOCSORT_MODEL or gpt-4o-mini).
    #[arg(short = 'M', long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Comma-separated category vocabulary offered to the model. `other` is always added.
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    pub categories: Option<Vec<String>>,

    // --- Planning Options ---
    /// Number of files classified concurrently.
    #[arg(short = 'w', long, value_name = "N", default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Maximum characters of extracted text sent to the model per file.
    #[arg(long, value_name = "N", default_value_t = MAX_CHARS_PER_FILE)]
    pub max_chars: usize,

    /// Skip files larger than this size (e.g., "20M", "512k").
    #[arg(short = 'm', long, value_name = "BYTES")]
    pub max_size: Option<String>,

    // --- Execution Control ---
    /// Rename files according to the plan and write the audit log. Without this flag
    /// the run is a dry run and nothing on disk changes.
    #[arg(short = 'a', long, action = clap::ArgAction::SetTrue)]
    pub apply: bool,

    /// File name of the audit log written into the directory.
    #[arg(long, value_name = "NAME")]
    pub audit_log: Option<String>,

    // --- Output ---
    /// Print the plan as JSON instead of a table.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub json: bool,

    /// Enable debug logging.
    #[arg(short = 'v', long, action = clap::ArgAction::SetTrue)]
    pub verbose: bool,
}

/// Subcommands that replace the default plan/apply run.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reverse the renames recorded in a directory's audit log.
    Undo {
        /// Directory that was organized.
        #[arg(default_value = ".")]
        directory: String,

        /// File name of the audit log to read.
        #[arg(long, value_name = "NAME")]
        audit_log: Option<String>,
    },

    #[cfg(feature = "web")]
    /// Start the web UI.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value_t = 8501)]
        port: u16,

        /// Do not open the browser automatically.
        #[arg(long)]
        no_open: bool,
    },
}
