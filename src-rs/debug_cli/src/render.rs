use std::io::{self, Write};

use crate::models::{CLIConfig, CreatedTask, TaskInfo};

pub fn banner(cfg: &CLIConfig) {
    println!("Browser Tasks Debug CLI");
    println!("API: {}  Poll: {}s", cfg.base_url, cfg.interval_secs);
    println!("Describe what the browser should do, or type /help for commands.");
}

pub fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

pub fn help() {
    println!("Commands:");
    println!("  <text>                 Submit a task and follow it");
    println!("  /help                  Show commands");
    println!("  /exit | /quit          Exit");
    println!("  /tasks                 List tasks");
    println!("  /task <id>             Show a task");
    println!("  /watch <id>            Follow a task until it settles");
    println!("  /pause <id>            Mark a task paused");
    println!("  /resume <id>           Mark a task running");
    println!("  /stop <id>             Mark a task stopped");
    println!("  /follow [on|off]       Toggle following after submit");
    println!("  /interval <secs>       Set poll interval");
    println!("  /base <url>            Update base URL");
    println!("  /config                Show current config");
}

pub fn created(task: &CreatedTask) {
    println!("[{}] {} - {}", task.status, task.id, task.task);
    if let Some(message) = &task.message {
        println!("{}", message);
    }
}

pub fn status(info: &TaskInfo) {
    match info.steps {
        Some(steps) => println!("status: {} ({} steps)", info.status, steps),
        None => println!("status: {}", info.status),
    }
}

pub fn result(info: &TaskInfo) {
    println!("result> {}", info.result_text());
}

pub fn task(info: &TaskInfo) {
    println!("id:        {}", info.id);
    println!("status:    {}", info.status);
    if let Some(task) = &info.task {
        println!("task:      {}", task);
    }
    if let Some(started) = &info.started_at {
        println!("started:   {}", started);
    }
    if let Some(completed) = &info.completed_at {
        println!("completed: {}", completed);
    }
    if let Some(steps) = info.steps {
        println!("steps:     {}", steps);
    }
    if let Some(urls) = &info.urls_visited {
        for url in urls {
            println!("  visited  {}", url);
        }
    }
    if let Some(actions) = &info.actions {
        println!("actions:   {}", actions.join(" -> "));
    }
    if let Some(output) = &info.output {
        println!("output:    {}", output);
    }
    if let Some(error) = &info.error {
        println!("error:     {}", error);
    }
}

pub fn tasks(tasks: &[TaskInfo]) {
    if tasks.is_empty() {
        println!("no tasks");
        return;
    }
    for task in tasks {
        println!(
            "[{}] {} - {}",
            task.status,
            task.id,
            task.task.clone().unwrap_or_default()
        );
    }
}

pub fn config(cfg: &CLIConfig) {
    println!("config:");
    println!("  base: {}", cfg.base_url);
    println!("  interval: {}s", cfg.interval_secs);
    println!("  follow: {}", cfg.follow);
}

pub fn info(msg: &str) {
    println!("{}", msg);
}

pub fn error(msg: &str) {
    eprintln!("error: {}", msg);
}
