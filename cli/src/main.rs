mod commands;
mod config;
mod help;

#[cfg(test)]
mod tests;

use std::path::PathBuf;
use std::{io, panic, process};

use anyhow::anyhow;
use clap::ArgMatches;
use crossterm::tty::IsTty;
use yansi::Color::Red;
use yansi::Paint;

use crate::commands::cli;
use crate::config::{load_config_from_file, Config};

const APP_HELP_TEMPLATE: &str = r#"rexc {version}, a compiler for regular expressions with actions.

{author-with-newline}
{before-help}{usage-heading}
  {usage}

{all-args}{after-help}
"#;

const EXIT_ERROR: i32 = 1;

/// Name of the config file looked up in the home directory.
const CONFIG_FILE: &str = ".rexc.toml";

fn main() -> anyhow::Result<()> {
    // Reports and match results are colored. Windows terminals need ANSI
    // support turned on explicitly.
    if let Err(err) = enable_ansi_support::enable_ansi_support() {
        eprintln!("could not enable ANSI support: {}", err)
    }

    #[cfg(feature = "logging")]
    env_logger::init();

    // Generated file paths and match results are often piped into other
    // tools, which shouldn't receive escape codes.
    if !io::stdout().is_tty() {
        yansi::disable();
    }

    let args = cli().get_matches_from(wild::args());

    // A panic means a broken invariant in the compiler. Exit with the same
    // code as any other failure so that build scripts stop.
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        default_hook(info);
        process::exit(EXIT_ERROR);
    }));

    let config = load_config(&args)?;

    let result = match args.subcommand() {
        Some(("compile", args)) => commands::exec_compile(args, config.codegen),
        Some(("dump", args)) => commands::exec_dump(args),
        Some(("match", args)) => commands::exec_match(args),
        _ => unreachable!(),
    };

    if let Err(err) = result {
        match err.source() {
            Some(source) => {
                eprintln!("{} {}: {}", "error:".paint(Red).bold(), err, source)
            }
            None => eprintln!("{} {}", "error:".paint(Red).bold(), err),
        }
        process::exit(EXIT_ERROR);
    }

    Ok(())
}

/// Loads the file given with `--config`, which must be valid. Otherwise
/// tries `~/.rexc.toml`, falling back to the defaults if it's missing or
/// invalid.
fn load_config(args: &ArgMatches) -> anyhow::Result<Config> {
    if let Some(path) = args.get_one::<PathBuf>("config") {
        return load_config_from_file(path).map_err(|err| {
            anyhow!("invalid config file `{}`: {}", path.display(), err)
        });
    }

    let config = home::home_dir()
        .filter(|home| !home.as_os_str().is_empty())
        .and_then(|home| load_config_from_file(&home.join(CONFIG_FILE)).ok())
        .unwrap_or_default();

    Ok(config)
}
