/*! This module parses regular expressions and turns them into automata.

The pipeline goes strictly left to right:

```text
regex text ──parser──> Ast ──thompson──> Nfa ──dfa::Builder──> Dfa
```

The [`parser`] normalizes the extended syntax (macros, classes, bounded
repetitions, quoted strings and action blocks) into a flat token stream,
reorders it into postfix with a [shunting-yard][1] pass and folds it into an
[`ast::Ast`]. The [`thompson`] module builds a non-deterministic automaton
with the [Thompson's construction][2] algorithm, and [`dfa`] determinizes it
with the powerset construction, folds the action symbols into real byte
transitions and renumbers what remains.

Every stage works with [`Symbol`]s. A symbol is either a byte from the fixed
256-byte alphabet, or an action symbol that means "fire action N here, without
consuming any input". Action symbols only live until the DFA is folded, the
final [`dfa::Dfa`] has byte transitions only.

[1]: https://en.wikipedia.org/wiki/Shunting_yard_algorithm
[2]: https://en.wikipedia.org/wiki/Thompson%27s_construction
*/

use std::fmt::{Debug, Display, Formatter};

pub mod alphabet;
pub mod ast;
pub mod dfa;
pub mod parser;
pub mod thompson;

/// Number of symbols in the byte alphabet.
pub const ALPHABET_LEN: usize = 256;

/// A member of the extended alphabet used by the automata.
///
/// Bytes sort before actions, and actions sort by their index in the action
/// registry. This is the order in which the DFA builder explores symbols.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    /// A literal byte.
    Byte(u8),
    /// Fire the action with the given registry index, consuming nothing.
    Action(u32),
}

impl Symbol {
    /// Returns true if this is an action symbol.
    #[inline]
    pub fn is_action(&self) -> bool {
        matches!(self, Symbol::Action(_))
    }

    /// Returns the byte if this is a byte symbol.
    #[inline]
    pub fn as_byte(&self) -> Option<u8> {
        match self {
            Symbol::Byte(b) => Some(*b),
            Symbol::Action(_) => None,
        }
    }
}

impl From<u8> for Symbol {
    fn from(value: u8) -> Self {
        Symbol::Byte(value)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Byte(b) => write!(f, "{}", byte_repr(*b)),
            Symbol::Action(idx) => write!(f, "@{}", idx),
        }
    }
}

/// Returns a human-readable representation of a byte, quoted when it is
/// printable ASCII and as `\xNN` otherwise.
pub(crate) fn byte_repr(b: u8) -> String {
    if (0x20..=0x7e).contains(&b) {
        format!("'{}'", b as char)
    } else {
        format!("\\x{:02x}", b)
    }
}
