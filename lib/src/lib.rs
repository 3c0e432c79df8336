/*! A compiler for regular expressions with embedded actions.

`rexc` takes an extended regular expression dialect (character classes,
bounded repetitions, named macros and embedded action blocks) and compiles it
into a deterministic finite automaton. The automaton can be emitted as a
standalone C state machine that consumes one byte at a time and runs the
actions attached to the transitions it takes.

There are two main types in this crate: [`Compiler`] and [`CodeGen`]. A
compiler takes a pattern and produces an [`Automaton`], and the code
generator turns the automaton into a C header and body. Rule files, which
bundle several patterns together with their C prelude, are read with
[`RuleFile`].

# Example

```rust
# use rexc;
// Compile a pattern with an action attached after the digits.
let automaton = rexc::Compiler::new()
    .define_macro("digit", "[0-9]")
    .compile("digit+ { count++; } ';'")
    .unwrap();

// Full-string matching, without running any action.
assert!(automaton.dfa().table().is_match(b"123;"));

// Generate C code.
let code = rexc::CodeGen::new("num").generate(&automaton);

assert!(code.body().contains("count++;"));
```
*/

use std::fmt::{Display, Formatter};
use std::ops::Range;

pub use codegen::CodeGen;
pub use codegen::GeneratedCode;
pub use compiler::compile;
pub use compiler::Actions;
pub use compiler::Automaton;
pub use compiler::Compiler;
pub use compiler::Error;
pub use rules::RuleFile;

pub mod codegen;
pub mod compiler;
pub mod re;
pub mod rules;

/// A span of text within a pattern, as a range of byte offsets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span(pub Range<usize>);

impl Display for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}..{}]", self.start(), self.end())
    }
}

impl Span {
    /// Offset within the pattern (in bytes) where the span starts.
    #[inline]
    pub fn start(&self) -> usize {
        self.0.start
    }

    /// Offset within the pattern (in bytes) where the span ends.
    #[inline]
    pub fn end(&self) -> usize {
        self.0.end
    }

    /// Returns the span as a range of byte offsets.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.0.clone()
    }
}
