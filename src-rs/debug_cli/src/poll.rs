use std::thread;
use std::time::Duration;

use crate::client::{ClientError, HTTPClient};
use crate::models::TaskInfo;

/// Consecutive transient failures tolerated before `follow` gives up.
const MAX_POLL_FAILURES: usize = 10;

/// Polls `id` every `interval` until it reaches a terminal status. `on_change` sees every
/// snapshot whose status or step count differs from the previous one; `on_retry` sees transient
/// errors that are polled through.
pub fn follow<F, R>(
    client: &HTTPClient,
    id: &str,
    interval: Duration,
    on_change: F,
    on_retry: R,
) -> Result<TaskInfo, ClientError>
where
    F: FnMut(&TaskInfo),
    R: FnMut(&ClientError),
{
    follow_with(|| client.get_task(id), interval, on_change, on_retry)
}

fn follow_with<G, F, R>(
    mut fetch: G,
    interval: Duration,
    mut on_change: F,
    mut on_retry: R,
) -> Result<TaskInfo, ClientError>
where
    G: FnMut() -> Result<TaskInfo, ClientError>,
    F: FnMut(&TaskInfo),
    R: FnMut(&ClientError),
{
    let mut last: Option<(String, Option<usize>)> = None;
    let mut failures = 0;
    loop {
        match fetch() {
            Ok(info) => {
                failures = 0;
                let marker = (info.status.clone(), info.steps);
                if last.as_ref() != Some(&marker) {
                    on_change(&info);
                    last = Some(marker);
                }
                if info.is_terminal() {
                    return Ok(info);
                }
            }
            Err(err) if err.is_transient() && failures + 1 < MAX_POLL_FAILURES => {
                failures += 1;
                on_retry(&err);
            }
            Err(err) => return Err(err),
        }
        thread::sleep(interval);
    }
}
