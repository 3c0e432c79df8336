use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{arg, value_parser, ArgMatches, Command};

use crate::commands::{compile_rules, existing_path_parser, read_rules};
use crate::config::CodeGenConfig;
use crate::help;

pub fn compile() -> Command {
    super::command("compile")
        .about("Generate C code from a rule file")
        .long_about(help::COMPILE_LONG_HELP)
        .arg(
            arg!(<RULES_FILE>)
                .help("Path to a rule file")
                .value_parser(existing_path_parser),
        )
        // Keep options sorted alphabetically by their long name.
        // For instance, --bar goes before --foo.
        .arg(
            arg!(--"no-increments")
                .help("Always assign the next state instead of using `state++`"),
        )
        .arg(
            arg!(-o --"output-dir" <OUTPUT_DIR>)
                .help("Directory where the generated files are written")
                .value_parser(value_parser!(PathBuf)),
        )
}

pub fn exec_compile(
    args: &ArgMatches,
    config: CodeGenConfig,
) -> anyhow::Result<()> {
    let rules_path = args.get_one::<PathBuf>("RULES_FILE").unwrap();

    let output_dir = args
        .get_one::<PathBuf>("output-dir")
        .cloned()
        .or(config.output_dir)
        .unwrap_or_else(|| parent_dir(rules_path));

    let rules = read_rules(rules_path)?;
    let automaton = compile_rules(&rules, &rules_path.to_string_lossy())?;

    let code = rules
        .codegen()
        .increments(config.increments && !args.get_flag("no-increments"))
        .file_stem(&format!("{}{}", config.file_prefix, rules.prefix()))
        .generate(&automaton);

    fs::create_dir_all(&output_dir).with_context(|| {
        format!("can not create directory `{}`", output_dir.display())
    })?;

    for (file_name, content) in [
        (code.header_file_name(), code.header()),
        (code.body_file_name(), code.body()),
    ] {
        let path = output_dir.join(file_name);
        fs::write(&path, content)
            .with_context(|| format!("can not write `{}`", path.display()))?;
        println!("{}", path.display());
    }

    Ok(())
}

/// Directory that contains `path`. For a bare file name, that's the current
/// directory.
fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
