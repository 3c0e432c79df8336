use std::process;

use anyhow::anyhow;
use clap::{arg, ArgAction, ArgMatches, Command};
use yansi::Color::{Green, Red};
use yansi::Paint;

use rexc::Compiler;

use crate::commands::compile_pattern;
use crate::help;

pub fn matches() -> Command {
    super::command("match")
        .about("Check whether inputs match a pattern")
        .long_about(help::MATCH_LONG_HELP)
        .arg(arg!(<PATTERN>).help("Pattern to match"))
        .arg(
            arg!(<INPUT>)
                .help("Strings to match against the pattern")
                .num_args(1..)
                .action(ArgAction::Append),
        )
        // Keep options sorted alphabetically by their long name.
        // For instance, --bar goes before --foo.
        .arg(
            arg!(-d --"define")
                .help("Define a macro")
                .value_name("NAME=EXPANSION")
                .value_parser(macro_parser)
                .action(ArgAction::Append),
        )
}

pub fn exec_match(args: &ArgMatches) -> anyhow::Result<()> {
    let pattern = args.get_one::<String>("PATTERN").unwrap();
    let inputs = args.get_many::<String>("INPUT").unwrap();

    let compiler = Compiler::new().macros(
        args.get_many::<(String, String)>("define")
            .into_iter()
            .flatten()
            .cloned(),
    );

    let automaton = compile_pattern(compiler, pattern)?;
    let table = automaton.dfa().table();

    let mut all_match = true;

    for input in inputs {
        if table.is_match(input.as_bytes()) {
            println!("{} {}", "match".paint(Green).bold(), input);
        } else {
            all_match = false;
            println!("{} {}", "no match".paint(Red).bold(), input);
        }
    }

    if !all_match {
        process::exit(1)
    }

    Ok(())
}

/// Parses the arguments to the `--define` option, which have the form
/// `NAME=EXPANSION`.
fn macro_parser(option: &str) -> Result<(String, String), anyhow::Error> {
    let (name, expansion) = option.split_once('=').ok_or(anyhow!(
        "the equal sign is missing, use the syntax NAME=EXPANSION (example: {}=[0-9])",
        option
    ))?;

    Ok((name.to_string(), expansion.to_string()))
}
