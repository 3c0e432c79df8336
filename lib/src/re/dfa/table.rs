use crate::re::dfa::{Dfa, StateId, INITIAL};
use crate::re::ALPHABET_LEN;

/// A dense transition table with one row of 256 targets per state.
///
/// The table includes a row for the reject state, where every byte leads
/// back to the reject state. Cells with no transition in the automaton hold
/// the id of the reject state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionTable {
    cells: Vec<StateId>,
    accept: Vec<bool>,
    reject: StateId,
}

impl TransitionTable {
    pub(super) fn new(dfa: &Dfa) -> Self {
        let reject = dfa.reject();
        let rows = dfa.len() + 1;

        let mut cells = vec![reject; rows * ALPHABET_LEN];
        let mut accept = vec![false; rows];

        for (id, state) in dfa.states().iter().enumerate() {
            accept[id] = state.accept();
            for (b, transition) in state.transitions() {
                cells[id * ALPHABET_LEN + *b as usize] = transition.target();
            }
        }

        Self { cells, accept, reject }
    }

    /// Returns the state reached from `state` after consuming `byte`.
    #[inline]
    pub fn next(&self, state: StateId, byte: u8) -> StateId {
        self.cells[state as usize * ALPHABET_LEN + byte as usize]
    }

    #[inline]
    pub fn is_accept(&self, state: StateId) -> bool {
        self.accept[state as usize]
    }

    #[inline]
    pub fn reject(&self) -> StateId {
        self.reject
    }

    /// Number of rows, including the one for the reject state.
    #[inline]
    pub fn rows(&self) -> usize {
        self.accept.len()
    }

    /// Returns true if the automaton accepts the whole `input`.
    pub fn is_match(&self, input: &[u8]) -> bool {
        let mut state = INITIAL;
        for b in input {
            state = self.next(state, *b);
            if state == self.reject {
                return false;
            }
        }
        self.is_accept(state)
    }
}

/// Result of feeding one byte to a [`Stepper`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The byte completed a match.
    Accept,
    /// The byte was consumed, the match is still in progress.
    Continue,
    /// No match is possible. The stepper is back at the initial state.
    Fail,
}

/// Runs an automaton one byte at a time, with the same semantics as the
/// generated C code.
///
/// An accepting transition fires its actions and returns
/// [`Outcome::Accept`] without moving from the current state, the caller
/// must call [`Stepper::reset`] before looking for another match. A byte
/// without a transition returns [`Outcome::Fail`] and moves back to the
/// initial state.
pub struct Stepper<'a> {
    dfa: &'a Dfa,
    state: StateId,
}

impl<'a> Stepper<'a> {
    pub fn new(dfa: &'a Dfa) -> Self {
        Self { dfa, state: INITIAL }
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> StateId {
        self.state
    }

    /// Moves back to the initial state.
    pub fn reset(&mut self) {
        self.state = INITIAL;
    }

    /// Consumes one byte. The actions of the transition taken are passed to
    /// `on_action` in ascending order before this function returns.
    pub fn step<F>(&mut self, byte: u8, mut on_action: F) -> Outcome
    where
        F: FnMut(u32),
    {
        let Some(transition) =
            self.dfa.state(self.state).transitions().get(&byte)
        else {
            self.state = INITIAL;
            return Outcome::Fail;
        };

        for action in transition.actions() {
            on_action(*action);
        }

        if transition.accept() {
            Outcome::Accept
        } else {
            self.state = transition.target();
            Outcome::Continue
        }
    }
}
