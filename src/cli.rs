//! Command-line entrypoint for the binding generator.

use crate::build_system::Flag;
use crate::build_system::build::{audit, generate};
use crate::generator_messages::display_messages::{print_formatted_error, print_generator_messages};
use crate::rules::Rules;
use crate::settings::{CONFIG_FILE_NAME, Config};
use saying::say;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    // Generates the bindings for the project in the given directory
    Generate(PathBuf),

    // Checks the ownership table and rewrite tables against the schema without writing anything
    Audit(PathBuf),

    Help,
}

pub fn start_cli() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    // No command generates in the current directory
    let command = if args.len() < 2 {
        Command::Generate(PathBuf::from("."))
    } else {
        match get_command(&args[1..]) {
            Ok(command) => command,
            Err(e) => {
                say!(Red e);
                print_help(true);
                return ExitCode::FAILURE;
            }
        }
    };

    let flags = get_flags(&args);

    let dir = match command {
        Command::Help => {
            print_help(false);
            return ExitCode::SUCCESS;
        }
        Command::Generate(ref dir) | Command::Audit(ref dir) => dir.to_owned(),
    };

    let config = match Config::load(&dir) {
        Ok(config) => config,
        Err(e) => {
            print_formatted_error(e);
            return ExitCode::FAILURE;
        }
    };

    let rules = match Rules::builtin() {
        Ok(rules) => rules,
        Err(e) => {
            print_formatted_error(e);
            return ExitCode::FAILURE;
        }
    };

    let messages = match command {
        Command::Audit(_) => audit(&config, &rules),
        _ => generate(&config, &rules, &flags),
    };

    let failed = messages.has_errors();
    print_generator_messages(messages, !flags.contains(&Flag::DisableWarnings));

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn get_command(args: &[String]) -> Result<Command, String> {
    let command = args.first().map(String::as_str);

    if let Some(unknown) = args
        .iter()
        .find(|arg| arg.starts_with("--") && arg.as_str() != "--help" && !is_known_flag(arg))
    {
        return Err(format!("Unknown flag: '{unknown}'"));
    }

    // The first non-flag argument after the command is the project directory
    let dir = || {
        args.iter()
            .skip(1)
            .find(|arg| !arg.starts_with("--"))
            .map_or_else(|| PathBuf::from("."), PathBuf::from)
    };

    match command {
        Some("help") | Some("--help") | Some("-h") => Ok(Command::Help),
        Some("generate") => Ok(Command::Generate(dir())),
        Some("audit") => Ok(Command::Audit(dir())),

        // Flags alone still generate in the current directory
        Some(flag) if flag.starts_with("--") => Ok(Command::Generate(dir())),

        Some(other) => Err(format!("Invalid command: '{other}'")),
        None => Ok(Command::Generate(PathBuf::from("."))),
    }
}

fn is_known_flag(arg: &str) -> bool {
    matches!(arg, "--hide-warnings" | "--hide-timers" | "--dry-run")
}

fn get_flags(args: &[String]) -> Vec<Flag> {
    let mut flags = Vec::new();

    for arg in args {
        match arg.as_str() {
            "--hide-warnings" => flags.push(Flag::DisableWarnings),
            "--hide-timers" => flags.push(Flag::DisableTimers),
            "--dry-run" => flags.push(Flag::NoOutputFiles),
            _ => {}
        }
    }

    flags
}

fn print_help(commands_only: bool) {
    if !commands_only {
        say!(Bright Black "------------------------------------");
        say!(Green Bold "gdbindgen - Godot extension binding generator");
        say!("Usage: ", Bold "<command>", Italic " <dir>");
        say!(Dark "Reads extension_api.json and ", CONFIG_FILE_NAME, " from <dir> (default: current directory)");
    }
    say!(Green Bold "\nCommands:");
    say!("  generate <dir>    - Generates the bindings (default command)");
    say!("  audit <dir>       - Checks the ownership table against the schema");
    say!("  help              - Shows this message");

    say!(Green Bold "\nFlags:");
    say!("  --hide-warnings");
    say!("  --hide-timers");
    say!("  --dry-run         - Runs every check but writes no files");
}

#[cfg(test)]
#[path = "tests/cli_tests.rs"]
mod tests;
