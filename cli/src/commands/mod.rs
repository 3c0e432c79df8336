mod compile;
mod dump;
mod matches;

pub use compile::*;
pub use dump::*;
pub use matches::*;

use std::fs;
use std::io::stderr;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use clap::{arg, command, crate_authors, Command};
use crossterm::tty::IsTty;
use log::*;

use rexc::compiler::report::ReportBuilder;
use rexc::{Automaton, Compiler, RuleFile};

use crate::{commands, help, APP_HELP_TEMPLATE};

pub fn command(name: &'static str) -> Command {
    Command::new(name).help_template(
        r#"{about-with-newline}
{usage-heading}
  {usage}

{all-args}
"#,
    )
}

pub fn cli() -> Command {
    command!()
        .author(crate_authors!("\n")) // requires `cargo` feature
        .arg_required_else_help(true)
        .arg(
            arg!(-C --config <CONFIG_FILE> "Config file")
                .value_parser(existing_path_parser)
                .long_help(help::CONFIG_FILE),
        )
        .help_template(APP_HELP_TEMPLATE)
        .subcommand_required(true)
        .subcommands(vec![
            commands::compile(),
            commands::dump(),
            commands::matches(),
        ])
}

/// Parses a path and makes sure that it exists.
fn existing_path_parser(input: &str) -> Result<PathBuf, anyhow::Error> {
    let path = PathBuf::from(input);
    if path.try_exists()? {
        Ok(path)
    } else {
        Err(anyhow!("file not found"))
    }
}

/// Reads and parses a rule file.
pub fn read_rules(path: &Path) -> Result<RuleFile, anyhow::Error> {
    let src = fs::read_to_string(path)
        .with_context(|| format!("can not read `{}`", path.display()))?;

    let rules = RuleFile::parse(&src)
        .with_context(|| format!("invalid rule file `{}`", path.display()))?;

    info!(
        "`{}` has {} rules and {} names",
        path.display(),
        rules.rules().len(),
        rules.names().count()
    );

    Ok(rules)
}

/// Compiles every rule in a rule file. Syntax errors are printed as reports
/// pointing to the offending part of the combined expression.
pub fn compile_rules(
    rules: &RuleFile,
    origin: &str,
) -> Result<Automaton, anyhow::Error> {
    let expression = rules.expression();
    Compiler::new()
        .compile_rules(rules)
        .or_else(|err| report_error(err, &expression, origin))
}

/// Compiles a single pattern given in the command line.
pub fn compile_pattern(
    compiler: Compiler,
    pattern: &str,
) -> Result<Automaton, anyhow::Error> {
    compiler
        .compile(pattern)
        .or_else(|err| report_error(err, pattern, "pattern"))
}

/// Prints syntax errors as a report with a snippet of `src`, and returns an
/// error for the caller to propagate.
pub fn report_error<T>(
    err: rexc::Error,
    src: &str,
    origin: &str,
) -> Result<T, anyhow::Error> {
    match err {
        rexc::Error::Syntax(err) => {
            eprintln!(
                "{}",
                ReportBuilder::new()
                    .with_colors(stderr().is_tty())
                    .origin(origin)
                    .syntax_error(src, &err)
            );
            bail!("the expression is not valid")
        }
        err => Err(err.into()),
    }
}
