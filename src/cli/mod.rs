pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "eddy")]
#[command(about = "Digest and summarize Reddit discussion threads", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a thread and print its digest
    Digest {
        /// Thread URL or share link
        url: String,

        /// Print the digest as JSON
        #[arg(long)]
        json: bool,

        /// Skip the language-model summary
        #[arg(long)]
        no_summary: bool,
    },
    /// Print the canonical data endpoint for a URL without fetching it
    Resolve {
        /// Thread URL or share link
        url: String,

        /// Skip the live redirect probe for share links
        #[arg(long)]
        offline: bool,
    },
}
