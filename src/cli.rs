use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "runlog")]
#[command(about = "Show logs and scheduler events of the latest deployed training run")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// App directory holding mlt.json and the deploy record
    #[arg(short = 'C', long, default_value = ".", global = true)]
    pub app_dir: PathBuf,

    /// Namespace (overrides the app config)
    #[arg(short = 'n', long, global = true)]
    pub namespace: Option<String>,

    /// kubectl binary
    #[arg(long, default_value = "kubectl", global = true)]
    pub kubectl: String,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Tail logs from the pods of the latest run
    Logs {
        /// Only return logs newer than a relative duration like 5s, 2m, or 3h
        #[arg(long, default_value = "1m")]
        since: String,

        /// Pod discovery and readiness attempts
        #[arg(long, default_value_t = 5)]
        retries: u32,

        /// kubetail binary
        #[arg(long, default_value = "kubetail")]
        kubetail: String,
    },
    /// Show scheduler events for the latest run
    Events {
        /// Keep streaming new events
        #[arg(short, long)]
        watch: bool,
    },
}
