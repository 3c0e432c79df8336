/*! Deterministic finite automata.

A [`Dfa`] is produced from a [`crate::re::thompson::Nfa`] by [`Builder`],
which runs the powerset construction over the extended alphabet (bytes plus
action symbols), folds the action symbols into byte transitions, prunes the
states that are no longer reachable and renumbers the remaining ones.

After renumbering, state 0 is the initial state and state ids are dense.
The reject state is implicit: its id is equal to the number of states, it
has no transitions, and any byte without a transition leads to it.

Accepting is a property of transitions. A transition whose target is an
accepting state is an accepting transition, it fires its actions and ends
the match without further input.
*/

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::re::byte_repr;

pub use builder::Builder;
pub use compact::TransitionSet;
pub use table::{Outcome, Stepper, TransitionTable};

mod builder;
mod compact;
mod fold;
mod table;


/// Index of a state within a [`Dfa`].
pub type StateId = u32;

/// Indexes of the actions fired by a transition, in ascending order.
pub type ActionSet = BTreeSet<u32>;

/// The initial state is always state 0.
pub const INITIAL: StateId = 0;

/// A transition that consumes one byte.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    target: StateId,
    actions: ActionSet,
    accept: bool,
}

impl Transition {
    #[inline]
    pub fn target(&self) -> StateId {
        self.target
    }

    /// Actions fired when this transition is taken.
    #[inline]
    pub fn actions(&self) -> &ActionSet {
        &self.actions
    }

    /// True if the target state is an accepting state.
    #[inline]
    pub fn accept(&self) -> bool {
        self.accept
    }
}

/// A state in a [`Dfa`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct State {
    accept: bool,
    transitions: BTreeMap<u8, Transition>,
}

impl State {
    #[inline]
    pub fn accept(&self) -> bool {
        self.accept
    }

    /// Outgoing transitions, keyed by byte. Bytes that are not in the map
    /// lead to the reject state.
    #[inline]
    pub fn transitions(&self) -> &BTreeMap<u8, Transition> {
        &self.transitions
    }
}

/// A deterministic finite automaton with byte transitions only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dfa {
    states: Vec<State>,
}

impl Dfa {
    #[inline]
    pub fn states(&self) -> &[State] {
        self.states.as_slice()
    }

    #[inline]
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id as usize]
    }

    /// Number of states, not including the reject state.
    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always false, the initial state always exists.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Id of the reject state.
    #[inline]
    pub fn reject(&self) -> StateId {
        self.states.len() as StateId
    }

    /// Returns the transitions of a state grouped by target and action set,
    /// with the bytes of each group split into ranges and points.
    pub fn transition_sets(&self, id: StateId) -> Vec<TransitionSet> {
        compact::compact(self.state(id))
    }

    /// Returns a dense transition table for this automaton.
    pub fn table(&self) -> TransitionTable {
        TransitionTable::new(self)
    }

    /// Returns a stepper positioned at the initial state.
    pub fn stepper(&self) -> Stepper<'_> {
        Stepper::new(self)
    }
}

impl Display for Dfa {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "initial state: {}", INITIAL)?;
        for id in 0..self.len() as StateId {
            write!(f, "{}", id)?;
            if self.state(id).accept {
                write!(f, "*")?;
            }
            write!(f, ":")?;

            let sets = self
                .transition_sets(id)
                .iter()
                .map(|set| {
                    let mut s = set
                        .ranges
                        .iter()
                        .map(|r| {
                            format!(
                                "[{}-{}]",
                                byte_repr(*r.start()),
                                byte_repr(*r.end())
                            )
                        })
                        .chain(set.points.iter().map(|b| byte_repr(*b)))
                        .join(" ");
                    s.push_str(" -> ");
                    if !set.actions.is_empty() {
                        s.push_str(&format!(
                            "[{}] ",
                            set.actions.iter().join(", ")
                        ));
                    }
                    s.push_str(&set.target.to_string());
                    if set.accept {
                        s.push('*');
                    }
                    s
                })
                .join(" | ");

            if !sets.is_empty() {
                write!(f, " {}", sets)?;
            }

            writeln!(f)?;
        }
        Ok(())
    }
}
