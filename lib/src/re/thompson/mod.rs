/*! Non-deterministic finite automata built with the [Thompson's
construction][1] algorithm.

The [`Compiler`] walks an [`crate::re::ast::Ast`] once and applies one fixed
fragment shape per node kind. The resulting [`Nfa`] is a flat list of states
where state 0 is the overall initial state and state 1 the overall final
state. Each state has labeled transitions, keyed by [`Symbol`], and direct
(epsilon) transitions that don't consume any input.

[1]: https://en.wikipedia.org/wiki/Thompson%27s_construction
*/

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::re::Symbol;

pub use compiler::Compiler;

mod compiler;


/// Index of a state within an [`Nfa`].
pub type StateId = u32;

/// The overall initial state.
pub const INITIAL: StateId = 0;

/// The overall final state.
pub const FINAL: StateId = 1;

/// A state in a [`Nfa`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NfaState {
    labeled: BTreeMap<Symbol, BTreeSet<StateId>>,
    direct: BTreeSet<StateId>,
}

impl NfaState {
    /// Transitions that consume a symbol.
    pub fn labeled(&self) -> &BTreeMap<Symbol, BTreeSet<StateId>> {
        &self.labeled
    }

    /// Transitions that don't consume anything.
    pub fn direct(&self) -> &BTreeSet<StateId> {
        &self.direct
    }
}

/// A non-deterministic finite automaton.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nfa {
    states: Vec<NfaState>,
}

impl Default for Nfa {
    fn default() -> Self {
        Self::new()
    }
}

impl Nfa {
    /// Creates an automaton with only the initial and final states.
    pub fn new() -> Self {
        Self { states: vec![NfaState::default(), NfaState::default()] }
    }

    /// Adds a new state and returns its id.
    pub(crate) fn add_state(&mut self) -> StateId {
        self.states.push(NfaState::default());
        (self.states.len() - 1) as StateId
    }

    pub(crate) fn add_labeled(
        &mut self,
        from: StateId,
        symbol: Symbol,
        to: StateId,
    ) {
        self.states[from as usize]
            .labeled
            .entry(symbol)
            .or_default()
            .insert(to);
    }

    pub(crate) fn add_direct(&mut self, from: StateId, to: StateId) {
        self.states[from as usize].direct.insert(to);
    }

    #[inline]
    pub fn state(&self, id: StateId) -> &NfaState {
        &self.states[id as usize]
    }

    #[inline]
    pub fn states(&self) -> &[NfaState] {
        self.states.as_slice()
    }

    /// Number of states in the automaton.
    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always false, an automaton has at least the initial and final states.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Returns every symbol used in some labeled transition, in ascending
    /// order.
    pub fn symbols(&self) -> BTreeSet<Symbol> {
        self.states
            .iter()
            .flat_map(|state| state.labeled.keys().copied())
            .collect()
    }
}

impl Display for Nfa {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (id, state) in self.states.iter().enumerate() {
            write!(f, "{}", id)?;
            if id as StateId == FINAL {
                write!(f, " (final)")?;
            }
            write!(f, ":")?;

            let edges = state
                .labeled
                .iter()
                .map(|(symbol, targets)| {
                    format!("{} -> {}", symbol, targets.iter().join(", "))
                })
                .chain(
                    (!state.direct.is_empty()).then(|| {
                        format!("ε -> {}", state.direct.iter().join(", "))
                    }),
                )
                .join(" | ");

            if !edges.is_empty() {
                write!(f, " {}", edges)?;
            }

            writeln!(f)?;
        }
        Ok(())
    }
}
