use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, ValueHint};
use relay_logging::LogDestination;

#[derive(Parser, Debug)]
#[command(
    name = "formrelay",
    version,
    about = "Submit a page's analyze and run-stage forms in the background"
)]
pub struct Cli {
    /// Page description (RON).
    #[arg(long, value_hint = ValueHint::FilePath, default_value = "page.ron")]
    pub page: PathBuf,

    #[arg(long, value_enum, default_value_t = LogTarget::Terminal)]
    pub log: LogTarget,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Submit forms by id; all submissions run concurrently
    Submit {
        #[arg(required = true)]
        forms: Vec<u32>,
        /// Button that triggered the submissions, overriding each form's default
        #[arg(long)]
        submitter: Option<u32>,
        /// Give up after this many seconds without a response
        #[arg(long, default_value_t = 120)]
        wait_secs: u64,
    },
    /// List the page's forms and whether they are intercepted
    Forms,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}
