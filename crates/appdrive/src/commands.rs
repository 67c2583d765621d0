use std::path::PathBuf;

use clap::ArgMatches;
use serde::Serialize;
use tracing::{error, info, warn};

use appdrive_core::config::DriveConfig;
use appdrive_core::control::list_controls;
use appdrive_core::desktop::Desktop;
use appdrive_core::events;
use appdrive_core::scenario::{load_scenario, run_scenario};
use appdrive_core::window::{
    WaitOptions, WindowInfo, WindowQuery, count_windows, find_ready_window, find_windows,
    wait_for_window, wait_for_window_closed,
};

use crate::table;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    events::log_app_startup();

    match matches.subcommand() {
        Some(("list", sub_matches)) => handle_list_command(sub_matches),
        Some(("wait", sub_matches)) => handle_wait_command(sub_matches),
        Some(("count", sub_matches)) => handle_count_command(sub_matches),
        Some(("run", sub_matches)) => handle_run_command(sub_matches),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}

/// Load the (already validated) config hierarchy, reporting failures the
/// same way for every command
fn load_config() -> Result<DriveConfig, Box<dyn std::error::Error>> {
    match DriveConfig::load_hierarchy() {
        Ok(config) => Ok(config),
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            error!(event = "cli.config_load_failed", error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

fn title_query(title: &str, contains: bool) -> WindowQuery {
    if contains {
        WindowQuery::title_contains(title)
    } else {
        WindowQuery::title(title)
    }
}

fn handle_list_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        Some(("windows", sub_matches)) => handle_list_windows(sub_matches),
        Some(("controls", sub_matches)) => handle_list_controls(sub_matches),
        _ => {
            error!(event = "cli.list_subcommand_unknown");
            Err("Unknown list subcommand".into())
        }
    }
}

fn handle_list_windows(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    let title_filter = matches.get_one::<String>("title");

    info!(
        event = "cli.list_windows_started",
        json_output = json_output,
        title_filter = ?title_filter
    );

    let desktop = Desktop::native();
    // An empty substring matches every window
    let query = WindowQuery::title_contains(title_filter.map(String::as_str).unwrap_or(""));

    match find_windows(desktop.windows(), &query) {
        Ok(windows) => {
            if json_output {
                println!("{}", serde_json::to_string_pretty(&windows)?);
            } else if windows.is_empty() {
                print_no_windows_message(title_filter);
            } else {
                println!("Visible windows:");
                table::print_windows_table(&windows);
            }

            info!(event = "cli.list_windows_completed", count = windows.len());
            Ok(())
        }
        Err(e) => {
            eprintln!("Failed to list windows: {}", e);
            error!(event = "cli.list_windows_failed", error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

fn print_no_windows_message(title_filter: Option<&String>) {
    if let Some(title) = title_filter {
        info!(event = "cli.list_windows_title_filter_empty", title = title);
        println!("No windows found for title filter.");
    } else {
        println!("No visible windows found.");
    }
}

fn handle_list_controls(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let title = matches
        .get_one::<String>("window")
        .ok_or("Window argument is required")?;
    let contains = matches.get_flag("contains");
    let json_output = matches.get_flag("json");

    info!(
        event = "cli.list_controls_started",
        window = title,
        contains = contains,
        json_output = json_output
    );

    let desktop = Desktop::native();
    let query = title_query(title, contains);

    let window = match find_ready_window(desktop.windows(), &query) {
        Ok(Some(window)) => window,
        Ok(None) => {
            eprintln!("No ready window matches {}", query);
            error!(event = "cli.list_controls_window_missing", query = %query);
            return Err(format!("No ready window matches {}", query).into());
        }
        Err(e) => {
            eprintln!("Failed to list windows: {}", e);
            error!(event = "cli.list_controls_failed", error = %e);
            events::log_app_error(&e);
            return Err(e.into());
        }
    };

    match list_controls(desktop.controls(), &window) {
        Ok(controls) => {
            if json_output {
                println!("{}", serde_json::to_string_pretty(&controls)?);
            } else if controls.is_empty() {
                println!("No controls found in '{}'.", window.title());
            } else {
                println!("Controls in '{}':", window.title());
                table::print_controls_table(&controls);
            }

            info!(event = "cli.list_controls_completed", count = controls.len());
            Ok(())
        }
        Err(e) => {
            eprintln!("Failed to list controls: {}", e);
            error!(event = "cli.list_controls_failed", error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

#[derive(Serialize)]
struct WaitOutput<'a> {
    query: String,
    found: bool,
    gone: bool,
    timeout_ms: u64,
    elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    window: Option<&'a WindowInfo>,
}

fn handle_wait_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let title = matches
        .get_one::<String>("title")
        .ok_or("Title argument is required")?;
    let contains = matches.get_flag("contains");
    let gone = matches.get_flag("gone");
    let json_output = matches.get_flag("json");

    let config = load_config()?;
    let timeout_ms = matches
        .get_one::<u64>("timeout")
        .copied()
        .unwrap_or_else(|| config.wait.timeout().as_millis() as u64);
    let interval_ms = matches
        .get_one::<u64>("interval")
        .copied()
        .unwrap_or_else(|| config.wait.retry_interval().as_millis() as u64);

    info!(
        event = "cli.wait_started",
        title = title,
        contains = contains,
        gone = gone,
        timeout_ms = timeout_ms,
        interval_ms = interval_ms
    );

    let desktop = Desktop::native();
    let query = title_query(title, contains);
    let options = WaitOptions::from_millis(timeout_ms, interval_ms);
    let start = std::time::Instant::now();

    let outcome = if gone {
        wait_for_window_closed(desktop.windows(), &query, &options).map(|closed| (closed, None))
    } else {
        wait_for_window(desktop.windows(), &query, &options).map(|window| (window.is_some(), window))
    };

    let (satisfied, window) = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Failed to wait for window: {}", e);
            error!(event = "cli.wait_failed", error = %e);
            events::log_app_error(&e);
            return Err(e.into());
        }
    };
    let elapsed_ms = start.elapsed().as_millis() as u64;

    if json_output {
        let output = WaitOutput {
            query: query.to_string(),
            found: !gone && satisfied,
            gone: gone && satisfied,
            timeout_ms,
            elapsed_ms,
            window: window.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        match (gone, satisfied, &window) {
            (false, true, Some(w)) => {
                println!("Window ready: {} (id {}, {}ms)", w.title(), w.id(), elapsed_ms)
            }
            (true, true, _) => println!("No window matches {} ({}ms)", query, elapsed_ms),
            (false, _, _) => println!("Timed out after {}ms waiting for {}", timeout_ms, query),
            (true, false, _) => println!(
                "Timed out after {}ms waiting for {} to close",
                timeout_ms, query
            ),
        }
    }

    if satisfied {
        info!(event = "cli.wait_completed", elapsed_ms = elapsed_ms);
        Ok(())
    } else {
        warn!(event = "cli.wait_timed_out", timeout_ms = timeout_ms);
        std::process::exit(1);
    }
}

#[derive(Serialize)]
struct CountOutput {
    query: String,
    count: usize,
}

fn handle_count_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let title = matches
        .get_one::<String>("title")
        .ok_or("Title argument is required")?;
    let contains = matches.get_flag("contains");
    let json_output = matches.get_flag("json");

    info!(event = "cli.count_started", title = title, contains = contains);

    let desktop = Desktop::native();
    let query = title_query(title, contains);

    match count_windows(desktop.windows(), &query) {
        Ok(count) => {
            if json_output {
                let output = CountOutput {
                    query: query.to_string(),
                    count,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("{}", count);
            }

            info!(event = "cli.count_completed", count = count);
            Ok(())
        }
        Err(e) => {
            eprintln!("Failed to count windows: {}", e);
            error!(event = "cli.count_failed", error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

fn handle_run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let path = matches
        .get_one::<String>("scenario")
        .map(PathBuf::from)
        .ok_or("Scenario argument is required")?;
    let json_output = matches.get_flag("json");

    info!(
        event = "cli.run_started",
        path = %path.display(),
        json_output = json_output
    );

    let scenario = match load_scenario(&path) {
        Ok(scenario) => scenario,
        Err(e) => {
            eprintln!("Failed to load scenario: {}", e);
            error!(event = "cli.run_load_failed", error = %e);
            events::log_app_error(&e);
            return Err(e.into());
        }
    };
    let config = load_config()?;
    let desktop = Desktop::native();

    match run_scenario(&desktop, &scenario, &config) {
        Ok(report) => {
            if json_output {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                table::print_scenario_report(&report);
            }

            info!(
                event = "cli.run_completed",
                passed = report.passed,
                steps = report.steps.len(),
                skipped = report.skipped
            );

            if !report.passed {
                std::process::exit(1);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Scenario '{}' failed: {}", scenario.display_name(), e);
            error!(event = "cli.run_failed", error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_query_exact_and_contains() {
        assert_eq!(title_query("Calculator", false), WindowQuery::title("Calculator"));
        assert_eq!(
            title_query("calc", true),
            WindowQuery::title_contains("calc")
        );
    }

    #[test]
    fn test_wait_output_serializes_without_window() {
        let output = WaitOutput {
            query: "'Calculator'".to_string(),
            found: false,
            gone: false,
            timeout_ms: 100,
            elapsed_ms: 101,
            window: None,
        };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["found"], false);
        assert_eq!(json["timeout_ms"], 100);
        assert!(json.get("window").is_none());
    }
}
