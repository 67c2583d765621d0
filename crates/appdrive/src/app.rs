use clap::{Arg, ArgAction, Command};

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .help("Output in JSON format")
        .action(ArgAction::SetTrue)
}

fn contains_arg() -> Arg {
    Arg::new("contains")
        .long("contains")
        .short('c')
        .help("Match the title as a case-insensitive substring")
        .action(ArgAction::SetTrue)
}

pub fn build_cli() -> Command {
    Command::new("appdrive")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Launch, wait on and script external GUI applications")
        .long_about(
            "appdrive starts a desktop application as a child process, waits for its windows \
             to become interactive, drives them with clicks and key sequences, and tears the \
             process down again. Scenario files script a whole session.",
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        // List subcommand
        .subcommand(
            Command::new("list")
                .about("List desktop state")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("windows")
                        .about("List all visible windows")
                        .arg(json_arg())
                        .arg(
                            Arg::new("title")
                                .long("title")
                                .short('t')
                                .help("Only windows whose title contains this text"),
                        ),
                )
                .subcommand(
                    Command::new("controls")
                        .about("List the accessibility controls of a ready window")
                        .arg(
                            Arg::new("window")
                                .help("Title of the window to inspect")
                                .required(true),
                        )
                        .arg(contains_arg())
                        .arg(json_arg()),
                ),
        )
        // Wait subcommand
        .subcommand(
            Command::new("wait")
                .about("Wait for a window to become ready (or to go away with --gone)")
                .arg(
                    Arg::new("title")
                        .help("Window title to wait for")
                        .required(true),
                )
                .arg(
                    Arg::new("timeout")
                        .long("timeout")
                        .help("Timeout in milliseconds (default from config)")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("interval")
                        .long("interval")
                        .help("Retry interval in milliseconds (default from config)")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(contains_arg())
                .arg(
                    Arg::new("gone")
                        .long("gone")
                        .help("Wait until no matching window exists")
                        .action(ArgAction::SetTrue),
                )
                .arg(json_arg()),
        )
        // Count subcommand
        .subcommand(
            Command::new("count")
                .about("Count windows matching a title")
                .arg(
                    Arg::new("title")
                        .help("Window title to count")
                        .required(true),
                )
                .arg(contains_arg())
                .arg(json_arg()),
        )
        // Run subcommand
        .subcommand(
            Command::new("run")
                .about("Run a scenario file")
                .arg(
                    Arg::new("scenario")
                        .help("Path to the scenario TOML file")
                        .required(true),
                )
                .arg(json_arg()),
        )
}
