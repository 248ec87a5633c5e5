use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gitweek")]
#[command(about = "Weekly and period work reports from multi-repository git history")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, help = "Path to config file (default: {root}/config.json)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Reports root directory (default: ~/.gitweek)")]
    pub root: Option<PathBuf>,

    #[arg(long, help = "Author pattern matched against commit name or email")]
    pub author: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate and store the weekly report
    Weekly {
        #[arg(long, help = "Report on the previous week")]
        last: bool,

        #[arg(
            long,
            value_name = "YYYY-MM-DD",
            conflicts_with = "last",
            help = "Report on the week starting at this Monday"
        )]
        monday: Option<String>,

        #[arg(
            long = "supplement",
            value_name = "TEXT",
            help = "Extra free-text item for the report (repeatable)"
        )]
        supplement: Vec<String>,

        #[arg(long, help = "Output the report as JSON")]
        json: bool,
    },
    /// Generate and store a report over an arbitrary period
    Period {
        #[arg(
            long,
            value_name = "YYYY-MM-DD",
            required_unless_present = "half_year",
            help = "Start date of the period (ends today)"
        )]
        start: Option<String>,

        #[arg(long, conflicts_with = "start", help = "Report on the past six months")]
        half_year: bool,

        #[arg(
            long = "supplement",
            value_name = "TEXT",
            help = "Extra free-text item for the report (repeatable)"
        )]
        supplement: Vec<String>,

        #[arg(long, help = "Output the report as JSON")]
        json: bool,
    },
    /// Manage tracked repositories
    Repos {
        #[command(subcommand)]
        action: RepoAction,
    },
    /// List stored reports
    List {
        #[arg(long, help = "List period reports instead of weekly reports")]
        periods: bool,
    },
}

#[derive(Subcommand)]
pub enum RepoAction {
    /// Track a repository under the given name
    Add { name: String, path: PathBuf },
    /// Stop tracking a repository
    Remove { name: String },
    /// Show tracked repositories
    List,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Weekly {
                last,
                monday,
                supplement,
                json,
            } => crate::report::exec_weekly(self.common, last, monday, supplement, json),
            Commands::Period {
                start,
                half_year,
                supplement,
                json,
            } => crate::report::exec_period(self.common, start, half_year, supplement, json),
            Commands::Repos { action } => crate::repos::exec(self.common, action),
            Commands::List { periods } => crate::repos::exec_list(self.common, periods),
        }
    }
}
