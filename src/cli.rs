//! Command-line argument parsing for the keymap tool
//!
//! Options are processed in argument order and can be repeated: each `-p`
//! or `-s` acts on the most recently selected device, so
//! `evmap -d a.yaml -p -d b.yaml -s 1122=A` dumps one table and edits
//! another.

use std::path::PathBuf;

use clap::parser::ValueSource;
use clap::{ArgAction, ArgMatches, CommandFactory, Parser};

/// Manipulate evdev keycode tables
#[derive(Parser, Debug)]
#[command(
    name = "evmap",
    version,
    about = "Inspect and rewrite evdev scancode-to-keycode tables",
    after_help = "Options are processed in order and can be repeated."
)]
pub struct CliArgs {
    /// Select the input device table
    #[arg(short = 'd', value_name = "DEVICE")]
    pub device: Vec<PathBuf>,

    /// Print the current map (columns: index scancode keycode key_name)
    //
    // Each occurrence must be stored as its own value so the op plan can
    // recover where in the argument list it appeared.
    #[arg(
        short = 'p',
        action = ArgAction::Append,
        num_args = 0,
        default_missing_value = "true"
    )]
    pub print: Vec<bool>,

    /// Change the mapping for a scancode (key names work too; use 0x0 for RESERVED)
    #[arg(short = 's', value_name = "[IDX:]SCANCODE=KEYCODE")]
    pub set: Vec<String>,
}

/// One action from the command line, in argument order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    SelectDevice(PathBuf),
    PrintMap,
    SetKey(String),
}

/// Parse the process arguments into an ordered op plan
pub fn parse_ops() -> Result<Vec<Op>, String> {
    let matches = CliArgs::command().get_matches();
    plan(&matches)
}

/// Interleave `-d`/`-p`/`-s` occurrences back into argument order and
/// validate the combination
pub fn plan(matches: &ArgMatches) -> Result<Vec<Op>, String> {
    let mut ops: Vec<(usize, Op)> = Vec::new();

    if let (Some(indices), Some(values)) = (
        matches.indices_of("device"),
        matches.get_many::<PathBuf>("device"),
    ) {
        for (index, path) in indices.zip(values) {
            ops.push((index, Op::SelectDevice(path.clone())));
        }
    }
    if matches.value_source("print") == Some(ValueSource::CommandLine) {
        if let Some(indices) = matches.indices_of("print") {
            for index in indices {
                ops.push((index, Op::PrintMap));
            }
        }
    }
    if let (Some(indices), Some(values)) =
        (matches.indices_of("set"), matches.get_many::<String>("set"))
    {
        for (index, expr) in indices.zip(values) {
            ops.push((index, Op::SetKey(expr.clone())));
        }
    }

    ops.sort_by_key(|(index, _)| *index);
    let ops: Vec<Op> = ops.into_iter().map(|(_, op)| op).collect();

    if !ops
        .iter()
        .any(|op| matches!(op, Op::PrintMap | Op::SetKey(_)))
    {
        return Err("nothing to do: give -p and/or -s at least once".to_string());
    }
    let first_action = ops
        .iter()
        .position(|op| matches!(op, Op::PrintMap | Op::SetKey(_)));
    let first_device = ops.iter().position(|op| matches!(op, Op::SelectDevice(_)));
    match (first_action, first_device) {
        (Some(action), Some(device)) if device < action => {}
        _ => return Err("no device opened: -d must come before -p and -s".to_string()),
    }

    Ok(ops)
}
