use appdrive_core::control::ControlInfo;
use appdrive_core::scenario::ScenarioReport;
use appdrive_core::window::WindowInfo;

pub fn print_windows_table(windows: &[WindowInfo]) {
    WindowTable::new(windows).print(windows);
}

struct WindowTable {
    id_width: usize,
    title_width: usize,
    app_width: usize,
    pid_width: usize,
    size_width: usize,
    state_width: usize,
}

impl WindowTable {
    fn new(windows: &[WindowInfo]) -> Self {
        let title_width = windows
            .iter()
            .map(|w| w.title().chars().count())
            .max()
            .unwrap_or(16)
            .clamp(5, 50); // Between "Title" header min and reasonable terminal width max
        let app_width = windows
            .iter()
            .map(|w| w.app_name().chars().count())
            .max()
            .unwrap_or(12)
            .clamp(3, 24);

        Self {
            id_width: 10,
            title_width,
            app_width,
            pid_width: 8,
            size_width: 11,
            state_width: 9,
        }
    }

    fn widths(&self) -> [usize; 6] {
        [
            self.id_width,
            self.title_width,
            self.app_width,
            self.pid_width,
            self.size_width,
            self.state_width,
        ]
    }

    fn print(&self, windows: &[WindowInfo]) {
        let widths = self.widths();
        println!("{}", border('┌', '┬', '┐', &widths));
        println!(
            "{}",
            row(&["ID", "Title", "App", "PID", "Size", "State"], &widths)
        );
        println!("{}", border('├', '┼', '┤', &widths));
        for window in windows {
            let pid = window.pid().map_or("-".to_string(), |p| p.to_string());
            let size = format!("{}x{}", window.width(), window.height());
            let state = if window.is_minimized() {
                "minimized"
            } else if window.is_ready() {
                "ready"
            } else {
                "busy"
            };
            println!(
                "{}",
                row(
                    &[
                        &window.id().to_string(),
                        window.title(),
                        window.app_name(),
                        &pid,
                        &size,
                        state,
                    ],
                    &widths,
                )
            );
        }
        println!("{}", border('└', '┴', '┘', &widths));
    }
}

pub fn print_controls_table(controls: &[ControlInfo]) {
    let text_width = controls
        .iter()
        .map(|c| c.title().or(c.value()).unwrap_or("").chars().count())
        .max()
        .unwrap_or(16)
        .clamp(4, 40);
    let widths = [12, text_width, 20, 11, 7];

    println!("{}", border('┌', '┬', '┐', &widths));
    println!(
        "{}",
        row(&["Role", "Text", "Value", "Position", "Enabled"], &widths)
    );
    println!("{}", border('├', '┼', '┤', &widths));
    for control in controls {
        let role = control.role().to_string();
        let position = format!("{},{}", control.x(), control.y());
        let enabled = if control.enabled() { "yes" } else { "no" };
        println!(
            "{}",
            row(
                &[
                    &role,
                    control.title().unwrap_or(""),
                    control.value().unwrap_or(""),
                    &position,
                    enabled,
                ],
                &widths,
            )
        );
    }
    println!("{}", border('└', '┴', '┘', &widths));
}

pub fn print_scenario_report(report: &ScenarioReport) {
    let verdict = if report.passed { "PASSED" } else { "FAILED" };
    println!("Scenario '{}': {}", report.name, verdict);
    println!("  Started: {}", report.started_at);
    println!("  Duration: {}ms", report.duration_ms);

    let step_width = report
        .steps
        .iter()
        .map(|s| s.description.chars().count())
        .max()
        .unwrap_or(16)
        .clamp(4, 50);
    let widths = [3, step_width, 6, 8];

    println!("{}", border('┌', '┬', '┐', &widths));
    println!("{}", row(&["#", "Step", "Result", "Time"], &widths));
    println!("{}", border('├', '┼', '┤', &widths));
    for step in &report.steps {
        let result = if step.passed { "ok" } else { "FAIL" };
        println!(
            "{}",
            row(
                &[
                    &(step.index + 1).to_string(),
                    &step.description,
                    result,
                    &format!("{}ms", step.duration_ms),
                ],
                &widths,
            )
        );
    }
    println!("{}", border('└', '┴', '┘', &widths));

    if let Some(failed) = report.failed_step() {
        match failed.error_code {
            Some(code) => println!("  Failure: {} [{}]", failed.message, code),
            None => println!("  Failure: {}", failed.message),
        }
    }
    if report.skipped > 0 {
        println!("  Skipped: {} step(s)", report.skipped);
    }

    let teardown = &report.teardown;
    let termination = teardown
        .termination
        .map_or("failed".to_string(), |t| t.to_string());
    println!(
        "  Teardown: pid {} {}, window {:?}{}",
        teardown.pid,
        termination,
        teardown.window_close,
        if teardown.still_running {
            " (STILL RUNNING)"
        } else {
            ""
        }
    );
}

fn border(left: char, mid: char, right: char, widths: &[usize]) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{}{}{}", left, segments.join(&mid.to_string()), right)
}

fn row(cells: &[&str], widths: &[usize]) -> String {
    let cells: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!(" {} ", truncate(cell, *width)))
        .collect();
    format!("│{}│", cells.join("│"))
}

/// Truncate a string to a maximum display width, adding "..." if truncated.
///
/// Uses character count (not byte count) so multi-byte titles are safe.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_len)
    }
}
