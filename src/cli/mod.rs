//! Command line definition for the `chronicler` binary.

mod dispatch;

use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, Command};

pub use dispatch::{CheckParams, ExportParams};

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("chronicler")
        .about("Compile Chronicler story projects into ChoiceScript")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(verbose_arg())
        .subcommand(export_command())
        .subcommand(check_command())
}

/// Write one script per scene into `<DIR>/scenes/`.
pub fn export_command() -> Command {
    Command::new("export")
        .about("Compile every scene into <DIR>/scenes/<scene>.txt")
        .arg(project_arg())
        .arg(
            Arg::new("out_dir")
                .short('o')
                .long("out")
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .help("Output directory (defaults to the project's directory)"),
        )
        .arg(config_arg())
        .arg(
            Arg::new("indent")
                .long("indent")
                .value_name("N|tab")
                .help("Indentation unit: a number of spaces or 'tab'"),
        )
        .arg(
            Arg::new("max_depth")
                .long("max-depth")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Maximum nesting of inlined bubbles"),
        )
}

/// Load and repair a project, then report what export would do.
pub fn check_command() -> Command {
    Command::new("check")
        .about("Load a project, repair dangling links and report labels and unreachable bubbles")
        .arg(project_arg())
        .arg(config_arg())
}

/// Project file (positional).
fn project_arg() -> Arg {
    Arg::new("project")
        .value_name("PROJECT")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Project file")
}

/// Compile options file (-c/--config).
fn config_arg() -> Arg {
    Arg::new("config")
        .short('c')
        .long("config")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("JSON file with compile options")
}

/// Log verbosity (-v, repeatable).
fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .long("verbose")
        .action(ArgAction::Count)
        .global(true)
        .help("Increase log verbosity (-v info, -vv debug, -vvv trace)")
}
