/*! Reads rule files.

A rule file bundles one or more patterns together with the C code that
surrounds the generated lexer. It has three sections:

```text
%prefix example
%args struct context *ctx
#include <stdio.h>
static char buffer[128];
%names
digit = [0-9]
letter = [A-Fa-f]
%rule
# A comment.
letter (digit | letter)+ {
    ctx->count++;
}
'\r'
%rule
digit{1,5} ','
```

- The header goes up to the first `%names` or `%rule` line. It contains the
  `%prefix` directive, which is required, and the optional `%args` and
  `%state` directives. Every other line is C code copied verbatim to the
  output.

- The optional `%names` section defines macros, one per line, as
  `name = expansion`.

- Each `%rule` line starts a new rule, which runs until the next `%rule` or
  the end of the file. Rules can span multiple lines, and so can their action
  blocks. Outside action blocks, lines starting with `#` are comments.

The rules are compiled as a single pattern that is the alternation of all of
them, see [`RuleFile::expression`].
*/

use indexmap::IndexMap;
use itertools::Itertools;
use thiserror::Error;

use crate::codegen::CodeGen;


const PREFIX: &str = "%prefix";
const ARGS: &str = "%args";
const STATE: &str = "%state";
const NAMES: &str = "%names";
const RULE: &str = "%rule";

/// Errors found while reading a rule file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("missing `%prefix` directive")]
    MissingPrefix,

    #[error("invalid prefix `{prefix}` at line {line}")]
    InvalidPrefix { prefix: String, line: usize },

    #[error("duplicate `{directive}` directive at line {line}")]
    DuplicateDirective { directive: String, line: usize },

    #[error("unknown directive `{directive}` at line {line}")]
    UnknownDirective { directive: String, line: usize },

    #[error("syntax error in name definition at line {line}")]
    InvalidName { line: usize },

    #[error("unterminated action block starting at line {line}")]
    UnterminatedAction { line: usize },

    #[error("no rules found")]
    NoRules,
}

/// A parsed rule file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleFile {
    prefix: String,
    args: Option<String>,
    state: Option<String>,
    header: Vec<String>,
    names: IndexMap<String, String>,
    rules: Vec<String>,
}

impl RuleFile {
    /// Parses the content of a rule file.
    pub fn parse(src: &str) -> Result<Self, Error> {
        let mut lines = src.lines().enumerate().map(|(i, l)| (i + 1, l));

        let mut prefix = None;
        let mut args = None;
        let mut state = None;
        let mut header = Vec::new();
        let mut names = IndexMap::new();
        let mut rules = Vec::new();

        // Header, up to the start of the next section.
        let mut section = None;

        for (line_no, line) in lines.by_ref() {
            if line.starts_with(NAMES) || line.starts_with(RULE) {
                section = Some(line);
                break;
            }
            let Some(directive) = line.strip_prefix('%') else {
                header.push(line.to_string());
                continue;
            };
            let (name, value) = match directive.split_once(char::is_whitespace)
            {
                Some((name, value)) => (name, value.trim()),
                None => (directive.trim_end(), ""),
            };
            let slot = match name {
                "prefix" => &mut prefix,
                "args" => &mut args,
                "state" => &mut state,
                _ => {
                    return Err(Error::UnknownDirective {
                        directive: format!("%{}", name),
                        line: line_no,
                    })
                }
            };
            if slot.is_some() {
                return Err(Error::DuplicateDirective {
                    directive: format!("%{}", name),
                    line: line_no,
                });
            }
            if name == "prefix" && !is_identifier(value) {
                return Err(Error::InvalidPrefix {
                    prefix: value.to_string(),
                    line: line_no,
                });
            }
            *slot = Some(value.to_string());
        }

        let prefix = prefix.ok_or(Error::MissingPrefix)?;

        if section.is_some_and(|s| s.starts_with(NAMES)) {
            section = None;
            for (line_no, line) in lines.by_ref() {
                let line = line.trim();
                if line.starts_with(RULE) {
                    section = Some(line);
                    break;
                }
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                let (name, expansion) = line
                    .split_once('=')
                    .map(|(n, e)| (n.trim(), e.trim()))
                    .filter(|(n, _)| is_identifier(n))
                    .ok_or(Error::InvalidName { line: line_no })?;

                names.insert(name.to_string(), expansion.to_string());
            }
        }

        if section.is_some() {
            let mut scanner = RuleScanner::default();
            let mut rule = String::new();

            for (line_no, line) in lines {
                if line.trim() == RULE {
                    scanner.finish()?;
                    push_rule(&mut rules, &mut rule);
                    continue;
                }
                if scanner.depth == 0 && line.trim_start().starts_with('#') {
                    continue;
                }
                scanner.scan(line, line_no);
                rule.push_str(line);
                rule.push('\n');
            }

            scanner.finish()?;
            push_rule(&mut rules, &mut rule);
        }

        if rules.is_empty() {
            return Err(Error::NoRules);
        }

        Ok(Self { prefix, args, state, header, names, rules })
    }

    /// The name used for the generated functions, types and files.
    pub fn prefix(&self) -> &str {
        self.prefix.as_str()
    }

    /// Extra parameters for the lex function, as C declarations.
    pub fn args(&self) -> Option<&str> {
        self.args.as_deref()
    }

    /// The C lvalue that holds the state of the lexer, when it's provided by
    /// the caller.
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// The lines of C code in the header section, without directives.
    pub fn header(&self) -> impl Iterator<Item = &str> {
        self.header.iter().map(|s| s.as_str())
    }

    /// Macros defined in the `%names` section, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Text of each rule, without comments.
    pub fn rules(&self) -> &[String] {
        self.rules.as_slice()
    }

    /// Returns the pattern that matches any of the rules, that is
    /// `(rule1)|(rule2)|...`.
    pub fn expression(&self) -> String {
        self.rules.iter().map(|rule| format!("({})", rule)).join("|")
    }

    /// Returns a code generator configured with the prefix, arguments and
    /// state variable declared in this file.
    pub fn codegen(&self) -> CodeGen {
        let mut codegen = CodeGen::new(&self.prefix);
        if let Some(args) = &self.args {
            codegen = codegen.extra_args(args);
        }
        if let Some(state) = &self.state {
            codegen = codegen.state_var(state);
        }
        codegen
    }
}

fn push_rule(rules: &mut Vec<String>, rule: &mut String) {
    if !rule.trim().is_empty() {
        rules.push(rule.trim_end().to_string());
    }
    rule.clear();
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Tracks action blocks across the lines of a rule, so that lines starting
/// with `#` inside an action are kept as C code instead of being dropped as
/// comments.
///
/// Braces are counted the same way the pattern parser does: braces inside
/// quoted strings and classes, or escaped with a backslash, don't count. A
/// `{` followed by a digit or a comma is a repetition, not an action.
#[derive(Default)]
struct RuleScanner {
    depth: usize,
    action_line: usize,
}

impl RuleScanner {
    fn scan(&mut self, line: &str, line_no: usize) {
        let bytes = line.as_bytes();
        let mut quote = None;
        let mut in_class = false;
        let mut i = 0;

        while let Some(&c) = bytes.get(i) {
            i += 1;
            if let Some(q) = quote {
                match c {
                    b'\\' => i += 1,
                    c if c == q => quote = None,
                    _ => {}
                }
            } else if self.depth > 0 {
                match c {
                    b'"' | b'\'' => quote = Some(c),
                    b'{' => self.depth += 1,
                    b'}' => self.depth -= 1,
                    _ => {}
                }
            } else if in_class {
                match c {
                    b'\\' => i += 1,
                    b']' => in_class = false,
                    _ => {}
                }
            } else {
                match c {
                    b'\\' => i += 1,
                    b'"' | b'\'' => quote = Some(c),
                    b'[' => in_class = true,
                    b'{' if !matches!(
                        bytes.get(i),
                        Some(b'0'..=b'9') | Some(b',')
                    ) =>
                    {
                        self.depth = 1;
                        self.action_line = line_no;
                    }
                    _ => {}
                }
            }
        }
    }

    /// Checks that every action block is closed, and resets the scanner for
    /// the next rule.
    fn finish(&mut self) -> Result<(), Error> {
        if self.depth > 0 {
            return Err(Error::UnterminatedAction { line: self.action_line });
        }
        *self = Self::default();
        Ok(())
    }
}
