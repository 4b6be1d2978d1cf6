mod cli;
mod client;
mod models;
mod poll;
mod repl;
mod render;

use std::process::ExitCode;

use cli::Command;
use client::HTTPClient;
use repl::REPL;

fn main() -> ExitCode {
    let (config, command) = cli::parse_config();
    let client = match HTTPClient::new(&config.base_url) {
        Ok(client) => client,
        Err(err) => {
            render::error(&err.to_string());
            return ExitCode::FAILURE;
        }
    };

    let ok = match command {
        None => {
            REPL::new(config, client).run();
            true
        }
        Some(Command::Submit { task, .. }) => {
            let task = task.join(" ");
            if task.trim().is_empty() {
                render::error("task description is required");
                return ExitCode::FAILURE;
            }
            repl::submit(&client, &config, &task)
        }
        Some(Command::List) => repl::list(&client),
        Some(Command::Get { id }) => repl::show(&client, &id),
        Some(Command::Watch { id }) => repl::watch(&client, &config, &id),
        Some(Command::Pause { id }) => repl::relabel(&client, &id, "pause"),
        Some(Command::Resume { id }) => repl::relabel(&client, &id, "resume"),
        Some(Command::Stop { id }) => repl::relabel(&client, &id, "stop"),
    };
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
