use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::WaitConfig;

/// Snapshot of a live OS window.
///
/// This is a reference to a window owned by another process, not ownership of
/// it. Snapshots go stale as soon as they are taken; wait functions re-query
/// the registry on every poll instead of holding on to one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowInfo {
    id: u32,
    title: String,
    app_name: String,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    is_minimized: bool,
    interactive: bool,
    pid: Option<u32>,
}

impl WindowInfo {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u32,
        title: String,
        app_name: String,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        is_minimized: bool,
        interactive: bool,
        pid: Option<u32>,
    ) -> Self {
        Self {
            id,
            title,
            app_name,
            x,
            y,
            width,
            height,
            is_minimized,
            interactive,
            pid,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }
    pub fn title(&self) -> &str {
        &self.title
    }
    pub fn app_name(&self) -> &str {
        &self.app_name
    }
    pub fn x(&self) -> i32 {
        self.x
    }
    pub fn y(&self) -> i32 {
        self.y
    }
    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        self.height
    }
    pub fn is_minimized(&self) -> bool {
        self.is_minimized
    }
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// A window is ready when it exists, accepts input, is not minimized
    /// and has a non-empty frame. Presence in the window list alone is not
    /// enough.
    pub fn is_ready(&self) -> bool {
        self.interactive && !self.is_minimized && self.width > 0 && self.height > 0
    }
}

/// How a window title is compared against a query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleMatch {
    /// Title must equal the query exactly
    #[default]
    Exact,
    /// Title must contain the query, ignoring case
    Contains,
}

impl TitleMatch {
    pub fn as_str(&self) -> &'static str {
        match self {
            TitleMatch::Exact => "exact",
            TitleMatch::Contains => "contains",
        }
    }
}

/// Which windows a lookup targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowQuery {
    title: String,
    #[serde(default)]
    title_match: TitleMatch,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    app: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pid: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<u32>,
}

impl WindowQuery {
    /// Match windows whose title equals `title` exactly
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            title_match: TitleMatch::Exact,
            app: None,
            pid: None,
            id: None,
        }
    }

    /// Match windows whose title contains `title`, ignoring case
    pub fn title_contains(title: impl Into<String>) -> Self {
        Self {
            title_match: TitleMatch::Contains,
            ..Self::title(title)
        }
    }

    /// Restrict to windows whose app name contains `app`, ignoring case
    pub fn with_app(mut self, app: impl Into<String>) -> Self {
        self.app = Some(app.into());
        self
    }

    /// Restrict to windows owned by `pid`
    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = Some(pid);
        self
    }

    /// Restrict to one specific window
    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn title_text(&self) -> &str {
        &self.title
    }

    pub fn title_match(&self) -> TitleMatch {
        self.title_match
    }

    pub fn app(&self) -> Option<&str> {
        self.app.as_deref()
    }

    pub fn pid_filter(&self) -> Option<u32> {
        self.pid
    }

    /// Check whether a window satisfies this query (readiness not considered)
    pub fn matches(&self, window: &WindowInfo) -> bool {
        let title_ok = match self.title_match {
            TitleMatch::Exact => window.title() == self.title,
            TitleMatch::Contains => window
                .title()
                .to_lowercase()
                .contains(&self.title.to_lowercase()),
        };
        if !title_ok {
            return false;
        }

        if let Some(ref app) = self.app
            && !window
                .app_name()
                .to_lowercase()
                .contains(&app.to_lowercase())
        {
            return false;
        }

        if let Some(id) = self.id
            && window.id() != id
        {
            return false;
        }

        match self.pid {
            Some(pid) => window.pid() == Some(pid),
            None => true,
        }
    }
}

impl std::fmt::Display for WindowQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}'", self.title)?;
        if let Some(ref app) = self.app {
            write!(f, " in app '{}'", app)?;
        }
        if let Some(pid) = self.pid {
            write!(f, " (pid {})", pid)?;
        }
        if let Some(id) = self.id {
            write!(f, " (id {})", id)?;
        }
        Ok(())
    }
}

const SETTLE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Timeout and retry interval for a polling wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    timeout: Duration,
    retry_interval: Duration,
}

impl WaitOptions {
    /// A zero retry interval is bumped to 1ms so polling never spins.
    pub fn new(timeout: Duration, retry_interval: Duration) -> Self {
        Self {
            timeout,
            retry_interval: retry_interval.max(Duration::from_millis(1)),
        }
    }

    pub fn from_millis(timeout_ms: u64, retry_interval_ms: u64) -> Self {
        Self::new(
            Duration::from_millis(timeout_ms),
            Duration::from_millis(retry_interval_ms),
        )
    }

    /// Same retry interval, different timeout
    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    /// The short wait that follows an interaction: the configured settle
    /// time, polled at least every 100ms.
    pub fn settle(config: &WaitConfig) -> Self {
        Self::new(
            config.settle(),
            config.retry_interval().min(SETTLE_POLL_INTERVAL),
        )
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retry_interval(&self) -> Duration {
        self.retry_interval
    }
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self::from(&WaitConfig::default())
    }
}

impl From<&WaitConfig> for WaitOptions {
    fn from(config: &WaitConfig) -> Self {
        Self::new(config.timeout(), config.retry_interval())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(title: &str, app: &str, pid: Option<u32>) -> WindowInfo {
        WindowInfo::new(
            7,
            title.to_string(),
            app.to_string(),
            0,
            0,
            400,
            300,
            false,
            true,
            pid,
        )
    }

    #[test]
    fn test_exact_match_is_case_sensitive() {
        let query = WindowQuery::title("Regular");
        assert!(query.matches(&window("Regular", "app", None)));
        assert!(!query.matches(&window("regular", "app", None)));
        assert!(!query.matches(&window("Regular Window", "app", None)));
    }

    #[test]
    fn test_contains_match_ignores_case() {
        let query = WindowQuery::title_contains("reference");
        assert!(query.matches(&window(
            "Multi-Window Reference Application",
            "app",
            None
        )));
        assert!(!query.matches(&window("Calculator", "app", None)));
    }

    #[test]
    fn test_app_and_pid_filters() {
        let query = WindowQuery::title("Main").with_app("calc").with_pid(42);
        assert!(query.matches(&window("Main", "gnome-calculator", Some(42))));
        assert!(!query.matches(&window("Main", "gnome-calculator", Some(43))));
        assert!(!query.matches(&window("Main", "gnome-calculator", None)));
        assert!(!query.matches(&window("Main", "terminal", Some(42))));
    }

    #[test]
    fn test_id_filter() {
        assert!(WindowQuery::title("A").with_id(7).matches(&window("A", "app", None)));
        assert!(!WindowQuery::title("A").with_id(8).matches(&window("A", "app", None)));
        assert_eq!(WindowQuery::title("A").with_id(8).to_string(), "'A' (id 8)");
    }

    #[test]
    fn test_ready_requires_interactive_unminimized_and_sized() {
        let ready = window("A", "app", None);
        assert!(ready.is_ready());

        let not_interactive = WindowInfo::new(1, "A".into(), "app".into(), 0, 0, 400, 300, false, false, None);
        assert!(!not_interactive.is_ready());

        let minimized = WindowInfo::new(1, "A".into(), "app".into(), 0, 0, 400, 300, true, true, None);
        assert!(!minimized.is_ready());

        let zero_size = WindowInfo::new(1, "A".into(), "app".into(), 0, 0, 0, 300, false, true, None);
        assert!(!zero_size.is_ready());
    }

    #[test]
    fn test_query_display() {
        let query = WindowQuery::title("Regular").with_app("flutter").with_pid(9);
        assert_eq!(query.to_string(), "'Regular' in app 'flutter' (pid 9)");
    }

    #[test]
    fn test_wait_options_zero_interval_is_clamped() {
        let options = WaitOptions::from_millis(100, 0);
        assert_eq!(options.retry_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_wait_options_from_config() {
        let config = WaitConfig {
            timeout_ms: Some(250),
            retry_interval_ms: Some(50),
            ..Default::default()
        };
        let options = WaitOptions::from(&config);
        assert_eq!(options.timeout(), Duration::from_millis(250));
        assert_eq!(options.retry_interval(), Duration::from_millis(50));
    }

    #[test]
    fn test_settle_options_poll_quickly() {
        let options = WaitOptions::settle(&WaitConfig::default());
        assert_eq!(options.timeout(), Duration::from_secs(2));
        assert_eq!(options.retry_interval(), Duration::from_millis(100));
    }
}
