pub const CONFIG_FILE: &str = r#"Config file for rexc

Specifies a config file which controls the behavior of rexc. If config file is not
specified, ${HOME}/.rexc.toml is used. If it does not exist the default options are
applied.

Supported options:

[codegen]
file_prefix = "lex_"    # Generated files are named <file_prefix><prefix>.{h,c}
increments = true       # Use `state++` for transitions to the next state
output_dir = "out"      # Where generated files are written"#;

pub const COMPILE_LONG_HELP: &str = r#"Generate C code from a rule file

Reads a rule file, compiles all its rules into a single automaton, and writes
a C header and body that implement it. By default, files are written in the
same directory as the rule file.

A rule file looks like this:

%prefix example
#include <stdio.h>
%names
digit = [0-9]
%rule
digit+ { puts("number"); } ';'"#;

pub const DUMP_LONG_HELP: &str = r#"Show the automaton built for a rule file or pattern

The DFA is printed one state per line. Accepting states are marked with `*`,
and each transition shows the bytes it consumes, the actions it fires in
brackets, and its target state.

Examples:

rexc dump file.rex
rexc dump --ast --nfa --pattern "'0x'[0-9a-f]+""#;

pub const MATCH_LONG_HELP: &str = r#"Check whether inputs match a pattern

Each input is matched against the whole pattern, partial matches don't count.
Action blocks in the pattern are accepted, but they are not executed. The exit
code is 0 when every input matches, and 1 otherwise.

Examples:

rexc match '\d{1,3}(\.\d{1,3}){3}' 192.168.0.1 10.0.0.1000"#;
