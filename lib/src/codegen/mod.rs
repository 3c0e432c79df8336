/*! Generates C code for an automaton.

The generated code is a header and a body. Together they implement a lexer
function that consumes one byte per call and returns one of three values:

- `P_ACCEPT`: the byte completed a match. The actions attached to the
  transition were run. The state doesn't change, call `P_reset()` before
  looking for the next match.
- `P_CONTINUE`: the byte was consumed and the match is still in progress.
- `P_FAIL`: the byte can't be part of a match. The state is set back to the
  initial state.

`P` is the prefix given to [`CodeGen::new`]. Transitions become `if`
statements inside a `switch` on the current state. The bytes of each
transition are grouped into ranges and individual values, see
[`crate::re::dfa::TransitionSet`].
*/

use itertools::Itertools;
use log::*;

use crate::compiler::Automaton;
use crate::re::dfa::{StateId, TransitionSet, INITIAL};


const INDENT: &str = "    ";

/// The output of [`CodeGen::generate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedCode {
    stem: String,
    header: String,
    body: String,
}

impl GeneratedCode {
    /// Content of the header file.
    pub fn header(&self) -> &str {
        self.header.as_str()
    }

    /// Content of the body file.
    pub fn body(&self) -> &str {
        self.body.as_str()
    }

    /// Name of the header file, `<stem>.h`.
    pub fn header_file_name(&self) -> String {
        format!("{}.h", self.stem)
    }

    /// Name of the body file, `<stem>.c`.
    pub fn body_file_name(&self) -> String {
        format!("{}.c", self.stem)
    }
}

/// Generates C code for an [`Automaton`].
#[derive(Clone, Debug)]
pub struct CodeGen {
    prefix: String,
    extra_args: Option<String>,
    state_var: Option<String>,
    increments: bool,
    file_stem: Option<String>,
}

impl CodeGen {
    /// Creates a code generator that names everything after `prefix`.
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            extra_args: None,
            state_var: None,
            increments: true,
            file_stem: None,
        }
    }

    /// Extra parameters for the lex function, as C declarations. They go
    /// after the `token` parameter.
    pub fn extra_args(mut self, args: &str) -> Self {
        self.extra_args = Some(args.to_string());
        self
    }

    /// Uses `lvalue` as the state variable instead of declaring one. The
    /// caller is responsible for its storage.
    pub fn state_var(mut self, lvalue: &str) -> Self {
        self.state_var = Some(lvalue.to_string());
        self
    }

    /// Emits `state++` for transitions to the state that follows the current
    /// one. Enabled by default.
    pub fn increments(mut self, yes: bool) -> Self {
        self.increments = yes;
        self
    }

    /// Name of the generated files without extension. By default it's
    /// `lex_<prefix>`.
    pub fn file_stem(mut self, stem: &str) -> Self {
        self.file_stem = Some(stem.to_string());
        self
    }

    /// Generates the header and body for `automaton`.
    pub fn generate(&self, automaton: &Automaton) -> GeneratedCode {
        let stem = self
            .file_stem
            .clone()
            .unwrap_or_else(|| format!("lex_{}", self.prefix));

        let header = self.header(automaton, &stem);
        let body = self.body(automaton, &stem);

        GeneratedCode { stem, header, body }
    }

    fn state(&self) -> String {
        match &self.state_var {
            Some(lvalue) => lvalue.clone(),
            None => format!("{}_state", self.prefix),
        }
    }

    fn state_tag(&self, id: StateId) -> String {
        format!("{}_STATE_{}", self.prefix, id)
    }

    fn prototype(&self) -> String {
        let p = &self.prefix;
        match &self.extra_args {
            Some(args) => {
                format!("{p}_action_t {p}_lex(unsigned char token, {args})")
            }
            None => format!("{p}_action_t {p}_lex(unsigned char token)"),
        }
    }

    fn header(&self, automaton: &Automaton, stem: &str) -> String {
        let p = &self.prefix;
        let guard = format!("{}_H", include_guard(stem));
        let mut out = String::new();

        out.push_str(&format!("#ifndef {guard}\n#define {guard}\n\n"));

        let mut includes = automaton.actions().header_includes().peekable();
        if includes.peek().is_some() {
            for line in includes {
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
        }

        out.push_str(&format!(
            "typedef enum {{{p}_ACCEPT, {p}_CONTINUE, {p}_FAIL}} {p}_action_t;\n\n"
        ));

        out.push_str("typedef enum {\n");
        for id in stored_states(automaton) {
            out.push_str(&format!("{INDENT}{} = {},\n", self.state_tag(id), id));
        }
        out.push_str(&format!("}} {p}_state_t;\n\n"));

        if self.state_var.is_none() {
            out.push_str(&format!("extern {p}_state_t {p}_state;\n\n"));
        }

        out.push_str(&format!("{};\n\n", self.prototype()));

        out.push_str(&format!(
            "#define {p}_reset() ({} = {})\n\n",
            self.state(),
            self.state_tag(INITIAL)
        ));

        out.push_str("#endif\n");
        out
    }

    fn body(&self, automaton: &Automaton, stem: &str) -> String {
        let p = &self.prefix;
        let state = self.state();
        let mut out = String::new();

        out.push_str(&format!("#include \"{stem}.h\"\n\n"));

        let mut lines = automaton.actions().header_body().peekable();
        if lines.peek().is_some() {
            for line in lines {
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
        }

        if self.state_var.is_none() {
            out.push_str(&format!("{p}_state_t {p}_state;\n\n"));
        }

        out.push_str(&format!("{} {{\n", self.prototype()));
        out.push_str(&format!("{INDENT}switch ({state}) {{\n"));

        let mut cases = 0;
        for id in stored_states(automaton) {
            cases += 1;
            out.push_str(&format!("{INDENT}case {}:\n", self.state_tag(id)));
            for set in automaton.dfa().transition_sets(id) {
                self.transition(&mut out, automaton, id, &set);
            }
            out.push_str(&format!("{INDENT}{INDENT}break;\n"));
        }

        out.push_str(&format!("{INDENT}}}\n"));
        out.push_str(&format!(
            "{INDENT}{state} = {};\n",
            self.state_tag(INITIAL)
        ));
        out.push_str(&format!("{INDENT}return {p}_FAIL;\n"));
        out.push_str("}\n");

        debug!("generated lexer `{}_lex` with {} cases", p, cases);

        out
    }

    fn transition(
        &self,
        out: &mut String,
        automaton: &Automaton,
        source: StateId,
        set: &TransitionSet,
    ) {
        let p = &self.prefix;
        let indent = INDENT.repeat(3);

        out.push_str(&format!("{INDENT}{INDENT}if ({}) {{\n", condition(set)));

        if !set.actions.is_empty() {
            let text = automaton.actions().text(&set.actions);
            out.push_str(&format!("{indent}{{{}}}\n", text));
        }

        if set.accept {
            out.push_str(&format!("{indent}return {p}_ACCEPT;\n"));
        } else {
            if self.increments && set.target == source + 1 {
                out.push_str(&format!("{indent}{}++;\n", self.state()));
            } else {
                out.push_str(&format!(
                    "{indent}{} = {};\n",
                    self.state(),
                    self.state_tag(set.target)
                ));
            }
            out.push_str(&format!("{indent}return {p}_CONTINUE;\n"));
        }

        out.push_str(&format!("{INDENT}{INDENT}}}\n"));
    }
}

/// The states that get a tag in the state enum and a case in the switch.
/// Accepting states are never stored in the state variable, except for the
/// initial state.
fn stored_states(automaton: &Automaton) -> impl Iterator<Item = StateId> + '_ {
    automaton
        .dfa()
        .states()
        .iter()
        .enumerate()
        .filter(|(id, state)| *id as StateId == INITIAL || !state.accept())
        .map(|(id, _)| id as StateId)
}

/// Returns the C condition that checks whether `token` is one of the bytes
/// in `set`.
fn condition(set: &TransitionSet) -> String {
    let terms: Vec<String> = set
        .ranges
        .iter()
        .map(|r| {
            format!(
                "token >= {} && token <= {}",
                c_byte(*r.start()),
                c_byte(*r.end())
            )
        })
        .chain(set.points.iter().map(|b| format!("token == {}", c_byte(*b))))
        .collect();

    match terms.as_slice() {
        [term] => term.clone(),
        _ => terms.iter().map(|t| format!("({})", t)).join(" || "),
    }
}

/// Returns the C literal for a byte.
fn c_byte(b: u8) -> String {
    match b {
        b'\'' => r"'\''".to_string(),
        b'\\' => r"'\\'".to_string(),
        0x20..=0x7e => format!("'{}'", b as char),
        _ => format!("0x{:02x}", b),
    }
}

/// Turns a file stem into an identifier suitable for an include guard.
fn include_guard(stem: &str) -> String {
    stem.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect()
}
