use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "breathe")]
#[command(about = "A guided-breathing coach for the terminal")]
#[command(long_about = "breathe - A guided-breathing coach for the terminal

Cycles an animated orb through timed inhale, hold and exhale phases defined
by a breathing technique, with an optional bell at each phase change.

QUICK START:
  breathe                    Open the interactive orb
  breathe list               Show available techniques
  breathe run box -c 6       Run box breathing for six cycles, headless
  breathe duration relax-478 How long a session takes

TECHNIQUES:
  Built-in techniques can be replaced with a JSON file given by --techniques,
  `session.techniques_file` in ~/.breathe/config.yaml, or
  ~/.breathe/techniques.json.

For more information on a specific command, run:
  breathe <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output (default),
    /// or 'json' for machine-readable output suitable for scripting.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// JSON file with technique definitions
    #[arg(long, global = true, env = "BREATHE_TECHNIQUES", value_name = "PATH")]
    pub techniques: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List available techniques
    ///
    /// Shows each technique's id, name, ratio, default cycles and total
    /// duration.
    ///
    /// # Examples
    ///
    ///   breathe list
    ///   breathe ls -o json
    #[command(alias = "ls")]
    List,

    /// Show a technique's steps
    ///
    /// # Examples
    ///
    ///   breathe show box
    Show {
        /// Technique id
        id: String,
    },

    /// Print how long a session takes
    ///
    /// Duration is cycles × the sum of step lengths, shown as MM:SS with
    /// seconds truncated. Cycle counts below one are treated as one.
    ///
    /// # Examples
    ///
    ///   breathe duration box
    ///   breathe duration box --cycles 10
    Duration {
        /// Technique id
        id: String,

        /// Number of cycles (defaults to the technique's own)
        #[arg(short, long, allow_negative_numbers = true)]
        cycles: Option<i64>,
    },

    /// Run a session without the interactive UI
    ///
    /// Prints each phase as it starts and a summary at the end. A bell
    /// rings at each phase change unless --mute is given.
    ///
    /// # Examples
    ///
    ///   breathe run
    ///   breathe run relax-478 --cycles 8
    ///   breathe run box --mute -o json
    Run(RunArgs),

    /// Open the interactive orb (default)
    Tui(TuiArgs),

    /// Generate shell completions
    ///
    /// # Examples
    ///
    ///   breathe completions zsh > ~/.zsh/completions/_breathe
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Default)]
pub struct RunArgs {
    /// Technique id (defaults to config, then the first technique)
    pub technique: Option<String>,

    /// Number of cycles (defaults to the technique's own)
    #[arg(short, long, allow_negative_numbers = true)]
    pub cycles: Option<i64>,

    /// Don't ring the bell
    #[arg(long)]
    pub mute: bool,
}

#[derive(Args, Default)]
pub struct TuiArgs {
    /// Technique to select on startup
    pub technique: Option<String>,

    /// Start muted
    #[arg(long)]
    pub mute: bool,
}
