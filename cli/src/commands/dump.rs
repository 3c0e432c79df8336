use std::path::PathBuf;

use clap::{arg, ArgGroup, ArgMatches, Command};

use rexc::re::{dfa, thompson};
use rexc::{Actions, Compiler};

use crate::commands::{existing_path_parser, read_rules, report_error};
use crate::help;

pub fn dump() -> Command {
    super::command("dump")
        .about("Show the automaton built for a rule file or pattern")
        .long_about(help::DUMP_LONG_HELP)
        .arg(
            arg!([RULES_FILE])
                .help("Path to a rule file")
                .value_parser(existing_path_parser),
        )
        // Keep options sorted alphabetically by their long name.
        // For instance, --bar goes before --foo.
        .arg(arg!(--"ast").help("Print the syntax tree"))
        .arg(arg!(--"nfa").help("Print the non-deterministic automaton"))
        .arg(
            arg!(-p --"pattern" <PATTERN>)
                .help("Dump a pattern instead of a rule file"),
        )
        .group(
            ArgGroup::new("input")
                .args(["RULES_FILE", "pattern"])
                .required(true),
        )
}

pub fn exec_dump(args: &ArgMatches) -> anyhow::Result<()> {
    let (compiler, expression, origin) =
        match args.get_one::<PathBuf>("RULES_FILE") {
            Some(path) => {
                let rules = read_rules(path)?;
                (
                    Compiler::new().macros(rules.names()),
                    rules.expression(),
                    path.to_string_lossy().to_string(),
                )
            }
            None => (
                Compiler::new(),
                args.get_one::<String>("pattern").cloned().unwrap_or_default(),
                "pattern".to_string(),
            ),
        };

    let mut actions = Actions::new();

    let ast = compiler
        .parse(&expression, &mut actions)
        .or_else(|err| report_error(err, &expression, &origin))?;

    if args.get_flag("ast") {
        let mut output = String::new();
        ascii_tree::write_tree(&mut output, &ast.ascii_tree())?;
        println!("{}", output);
    }

    let nfa = thompson::Compiler::new().compile(&ast);

    if args.get_flag("nfa") {
        println!("{}", nfa);
    }

    print!("{}", dfa::Builder::new().build(&nfa));

    for idx in 0..actions.len() as u32 {
        if let Some(text) = actions.get(idx) {
            println!("@{}: {{{}}}", idx, text);
        }
    }

    Ok(())
}
