use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rewrite a single subtitle or script file
    Rewrite {
        /// Input .srt or .txt file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (defaults to the prefixed name next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for the prefixed output file
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Tone filler selection: fixed, seeded or random
        #[arg(long)]
        tone: Option<String>,

        /// Seed for seeded tone selection
        #[arg(long)]
        seed: Option<u64>,

        /// Print the rewrite report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rewrite every .srt/.txt file in a directory tree
    Batch {
        /// Input directory containing script files
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Output directory (defaults to the input directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Tone filler selection: fixed, seeded or random
        #[arg(long)]
        tone: Option<String>,

        /// Seed for seeded tone selection
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show how each line of a file is classified
    Classify {
        /// Input .srt or .txt file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Write the built-in rule tables to a configuration file
    InitConfig {
        /// Output configuration file
        #[arg(short, long, default_value = "config.toml")]
        output: PathBuf,
    },
}
