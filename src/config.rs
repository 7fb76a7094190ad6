use std::path::PathBuf;

use clap::{Parser, Subcommand};
use paper_storage_local::default_store_dir;

/// Command-line configuration for paper-docx.
#[derive(Parser, Debug, Clone)]
#[command(name = "paper-docx")]
#[command(about = "Assemble academic paper drafts into formatted DOCX documents")]
pub struct Config {
    /// Directory holding the saved draft and format configuration
    #[arg(long, global = true, env = "PAPER_DOCX_STORE_DIR")]
    pub store_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Config {
    pub fn store_dir(&self) -> PathBuf {
        self.store_dir.clone().unwrap_or_else(default_store_dir)
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Export a paper to DOCX
    Export {
        /// Paper JSON; the saved draft is used when omitted
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Format configuration JSON; the saved configuration is used when omitted
        #[arg(long, short)]
        format: Option<PathBuf>,

        /// Directory to write the document into
        #[arg(long, short, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Run the pre-export checks and print errors and warnings
    Validate {
        #[arg(long, short)]
        input: Option<PathBuf>,
    },

    /// Print the numbering outline of the paper body
    Outline {
        #[arg(long, short)]
        input: Option<PathBuf>,
    },

    /// Manage the saved format configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Manage the saved draft
    #[command(subcommand)]
    Draft(DraftCommand),
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Print the active configuration
    Show,

    /// Write the active configuration as pretty JSON
    Export {
        /// Output file; stdout when omitted
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Validate a configuration file and make it active
    Import { path: PathBuf },

    /// Restore the built-in configuration
    Reset,
}

#[derive(Subcommand, Debug, Clone)]
pub enum DraftCommand {
    /// Save a paper JSON file as the draft
    Save { path: PathBuf },

    /// Print the saved draft
    Show,

    /// Delete the saved draft
    Clear,

    /// Append a personal-info item to the draft
    AddInfo { label: String, value: String },

    /// Append a footnote to the draft and print its id
    AddFootnote { content: String },

    /// Delete a footnote from the draft
    DeleteFootnote { id: u32 },
}
