use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about = "RICE prioritization console for the data platform roadmap")]
pub struct Cli {
    /// Path to the config file (defaults to $ROADMAP_CONFIG or the user config dir)
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Name used as author of chat messages
    #[clap(long)]
    pub planner: Option<String>,

    /// Start without the sample backlog
    #[clap(long)]
    pub empty: bool,

    /// Enable debug logging
    #[clap(long, short = 'v')]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive planning session (default)
    Shell,

    /// Print views of the seeded roadmap and exit
    Report {
        /// Which view to print
        #[clap(long, value_enum, default_value = "all")]
        view: ReportView,
    },

    /// Run the AI strategic analysis on the seeded backlog
    Analyze,

    /// Write a starter config file
    InitConfig {
        /// Where to write it (defaults to the user config dir)
        #[clap(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[clap(long)]
        force: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportView {
    Backlog,
    Matrix,
    Workload,
    Timeline,
    Links,
    Org,
    All,
}
