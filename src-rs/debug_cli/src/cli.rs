use clap::{Parser, Subcommand};

use crate::models::CLIConfig;

/// Terminal client for the browser-tasks API
#[derive(Parser, Debug)]
#[command(name = "browser-tasks-cli", version, about)]
pub struct Args {
    /// Base URL of the browser-tasks server
    #[arg(long = "base", env = "BROWSER_TASKS_URL", default_value = "http://localhost:8000")]
    pub base_url: String,

    /// Seconds between status polls
    #[arg(long, env = "BROWSER_TASKS_POLL_SECS", default_value_t = 2)]
    pub interval: u64,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Submit a task and follow it until it settles
    Submit {
        /// Natural-language instruction for the browser agent
        task: Vec<String>,

        /// Return right after submission instead of polling
        #[arg(long)]
        no_follow: bool,
    },
    /// List all tasks, newest first
    List,
    /// Show one task
    Get { id: String },
    /// Poll a task until it settles
    Watch { id: String },
    /// Mark a task as paused
    Pause { id: String },
    /// Mark a task as running again
    Resume { id: String },
    /// Mark a task as stopped
    Stop { id: String },
}

pub fn parse_config() -> (CLIConfig, Option<Command>) {
    let args = Args::parse();
    into_config(args)
}

fn into_config(args: Args) -> (CLIConfig, Option<Command>) {
    let follow = !matches!(args.command, Some(Command::Submit { no_follow: true, .. }));
    let config = CLIConfig {
        base_url: args.base_url,
        interval_secs: args.interval.max(1),
        follow,
    };
    (config, args.command)
}
