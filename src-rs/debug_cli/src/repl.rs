use std::io;
use std::time::Duration;

use crate::client::{ClientError, HTTPClient};
use crate::models::CLIConfig;
use crate::{poll, render};

pub struct REPL {
    pub config: CLIConfig,
    pub client: HTTPClient,
}

impl REPL {
    pub fn new(config: CLIConfig, client: HTTPClient) -> Self {
        Self { config, client }
    }

    pub fn run(&mut self) {
        render::banner(&self.config);
        loop {
            render::prompt();
            let mut line = String::new();
            match io::stdin().read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('/') {
                if self.handle_command(&line) {
                    break;
                }
                continue;
            }
            submit(&self.client, &self.config, &line);
        }
    }

    fn handle_command(&mut self, line: &str) -> bool {
        let (cmd, rest) = split_command(line);
        match cmd {
            "exit" | "quit" => return true,
            "help" => render::help(),
            "tasks" => {
                list(&self.client);
            }
            "task" => with_id(rest, |id| show(&self.client, id)),
            "watch" => with_id(rest, |id| watch(&self.client, &self.config, id)),
            "pause" | "resume" | "stop" => with_id(rest, |id| relabel(&self.client, id, cmd)),
            "follow" => {
                if rest.is_empty() {
                    self.config.follow = !self.config.follow;
                    render::info(&format!("follow: {}", self.config.follow));
                } else if let Some(flag) = parse_on_off(rest) {
                    self.config.follow = flag;
                    render::info(&format!("follow: {}", self.config.follow));
                } else {
                    render::error("invalid follow flag");
                }
            }
            "interval" => match rest.parse::<u64>() {
                Ok(secs) if secs > 0 => {
                    self.config.interval_secs = secs;
                    render::info("interval updated");
                }
                _ => render::info(&format!("interval: {}s", self.config.interval_secs)),
            },
            "base" => {
                if rest.is_empty() {
                    render::info(&format!("base: {}", self.config.base_url));
                } else {
                    match HTTPClient::new(rest) {
                        Ok(client) => {
                            self.config.base_url = client.base_url.clone();
                            self.client = client;
                            render::info("base url updated");
                        }
                        Err(err) => render::error(&err.to_string()),
                    }
                }
            }
            "config" => render::config(&self.config),
            _ => render::info("unknown command, type /help"),
        }
        false
    }
}

/// The helpers below report failures on stderr and return whether the call succeeded.
pub fn submit(client: &HTTPClient, config: &CLIConfig, task: &str) -> bool {
    match client.create_task(task) {
        Ok(created) => {
            render::created(&created);
            !config.follow || watch(client, config, &created.id)
        }
        Err(err) => failed(&err),
    }
}

pub fn watch(client: &HTTPClient, config: &CLIConfig, id: &str) -> bool {
    let interval = Duration::from_secs(config.interval_secs);
    let on_retry = |err: &ClientError| render::info(&format!("poll failed, retrying: {}", err));
    match poll::follow(client, id, interval, render::status, on_retry) {
        Ok(info) => {
            render::result(&info);
            true
        }
        Err(err) => failed(&err),
    }
}

pub fn list(client: &HTTPClient) -> bool {
    match client.list_tasks() {
        Ok(tasks) => {
            render::tasks(&tasks);
            true
        }
        Err(err) => failed(&err),
    }
}

pub fn show(client: &HTTPClient, id: &str) -> bool {
    match client.get_task(id) {
        Ok(info) => {
            render::task(&info);
            true
        }
        Err(err) => failed(&err),
    }
}

pub fn relabel(client: &HTTPClient, id: &str, action: &str) -> bool {
    match client.relabel(id, action) {
        Ok(resp) => {
            render::info(&resp.message);
            true
        }
        Err(err) => failed(&err),
    }
}

fn failed(err: &ClientError) -> bool {
    render::error(&err.to_string());
    false
}

fn with_id<F: FnOnce(&str) -> bool>(rest: &str, run: F) {
    if rest.is_empty() {
        render::error("task id required");
    } else {
        run(rest);
    }
}

fn split_command(line: &str) -> (&str, &str) {
    let mut parts = line.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("").trim_start_matches('/');
    let rest = parts.next().unwrap_or("").trim();
    (cmd, rest)
}

fn parse_on_off(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "1" | "yes" => Some(true),
        "off" | "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
