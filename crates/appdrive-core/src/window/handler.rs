use std::time::Instant;

use tracing::{debug, info, warn};

use super::errors::WindowError;
use super::registry::WindowRegistry;
use super::types::{WaitOptions, WindowInfo, WindowQuery};

/// Generic polling function that retries until the check yields a value or
/// the timeout elapses.
///
/// The check runs once immediately. Between attempts the loop sleeps for the
/// retry interval, clamped to the time remaining, so the call returns within
/// `timeout` plus the duration of one check. Errors from the check are not
/// retried and propagate immediately.
pub(crate) fn poll_until<T, E, F>(options: &WaitOptions, mut check: F) -> Result<Option<T>, E>
where
    F: FnMut() -> Result<Option<T>, E>,
{
    let start = Instant::now();
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        if let Some(found) = check()? {
            debug!(event = "core.poll.found", attempts = attempts);
            return Ok(Some(found));
        }

        let elapsed = start.elapsed();
        if elapsed >= options.timeout() {
            debug!(event = "core.poll.timed_out", attempts = attempts);
            return Ok(None);
        }

        let remaining = options.timeout() - elapsed;
        std::thread::sleep(options.retry_interval().min(remaining));
    }
}

/// Take a fresh snapshot of all windows matching the query (ready or not)
pub fn find_windows(
    registry: &dyn WindowRegistry,
    query: &WindowQuery,
) -> Result<Vec<WindowInfo>, WindowError> {
    let windows = registry.list_windows()?;
    Ok(windows.into_iter().filter(|w| query.matches(w)).collect())
}

/// Count windows currently matching the query
pub fn count_windows(registry: &dyn WindowRegistry, query: &WindowQuery) -> Result<usize, WindowError> {
    let count = find_windows(registry, query)?.len();
    info!(
        event = "core.window.count_completed",
        query = %query,
        count = count
    );
    Ok(count)
}

/// Find the first ready window matching the query, without waiting
pub fn find_ready_window(
    registry: &dyn WindowRegistry,
    query: &WindowQuery,
) -> Result<Option<WindowInfo>, WindowError> {
    Ok(find_windows(registry, query)?
        .into_iter()
        .find(WindowInfo::is_ready))
}

/// Wait for a window matching the query to become ready.
///
/// Returns `Ok(None)` when the timeout elapses without a ready window; a
/// window that is listed but not yet interactive does not count. Errors are
/// reserved for failures to query the registry at all.
pub fn wait_for_window(
    registry: &dyn WindowRegistry,
    query: &WindowQuery,
    options: &WaitOptions,
) -> Result<Option<WindowInfo>, WindowError> {
    info!(
        event = "core.window.wait_started",
        query = %query,
        registry = registry.name(),
        timeout_ms = options.timeout().as_millis() as u64,
        retry_interval_ms = options.retry_interval().as_millis() as u64
    );

    let result = poll_until(options, || find_ready_window(registry, query))?;

    match &result {
        Some(window) => info!(
            event = "core.window.wait_completed",
            query = %query,
            window_id = window.id()
        ),
        None => warn!(
            event = "core.window.wait_timeout",
            query = %query,
            timeout_ms = options.timeout().as_millis() as u64
        ),
    }

    Ok(result)
}

/// Like [`wait_for_window`], but a timeout is an error.
///
/// For callers that cannot continue without the window.
pub fn require_window(
    registry: &dyn WindowRegistry,
    query: &WindowQuery,
    options: &WaitOptions,
) -> Result<WindowInfo, WindowError> {
    wait_for_window(registry, query, options)?.ok_or_else(|| WindowError::WaitTimeout {
        query: query.to_string(),
        timeout_ms: options.timeout().as_millis() as u64,
    })
}

/// Wait until no window matches the query.
///
/// Any matching window counts, ready or not. Returns `Ok(true)` once the
/// window list has no match and `Ok(false)` if matches remain at timeout.
pub fn wait_for_window_closed(
    registry: &dyn WindowRegistry,
    query: &WindowQuery,
    options: &WaitOptions,
) -> Result<bool, WindowError> {
    info!(
        event = "core.window.wait_closed_started",
        query = %query,
        timeout_ms = options.timeout().as_millis() as u64
    );

    let gone = poll_until(options, || {
        let remaining = find_windows(registry, query)?;
        Ok::<_, WindowError>(remaining.is_empty().then_some(()))
    })?
    .is_some();

    if gone {
        info!(event = "core.window.wait_closed_completed", query = %query);
    } else {
        warn!(
            event = "core.window.wait_closed_timeout",
            query = %query,
            timeout_ms = options.timeout().as_millis() as u64
        );
    }

    Ok(gone)
}
