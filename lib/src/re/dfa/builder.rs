use std::collections::{BTreeMap, BTreeSet};

use bitvec::vec::BitVec;
use log::*;
use rustc_hash::FxHashMap;

use crate::re::dfa::{fold, ActionSet, Dfa, State, StateId, Transition};
use crate::re::thompson::{self, Nfa};
use crate::re::Symbol;

/// A transition in the automaton produced by the powerset construction,
/// before action symbols are folded away.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct RawTransition {
    pub target: usize,
    pub actions: ActionSet,
}

/// A state in the automaton produced by the powerset construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(super) struct RawState {
    pub accept: bool,
    pub transitions: BTreeMap<Symbol, RawTransition>,
    /// Actions fired when the state is entered. Added to every transition
    /// targeting this state when the automaton is finalized.
    pub entry_actions: ActionSet,
}

impl RawState {
    fn new(accept: bool) -> Self {
        Self { accept, ..Default::default() }
    }
}

/// Builds a [`Dfa`] out of a [`Nfa`].
#[derive(Default)]
pub struct Builder {}

impl Builder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {}
    }

    /// Determinizes `nfa`, folds its action symbols and returns the
    /// automaton pruned of unreachable states.
    pub fn build(&self, nfa: &Nfa) -> Dfa {
        let mut states = self.determinize(nfa);
        let subsets = states.len();

        fold::fold(&mut states);

        let dfa = finalize(states);

        debug!(
            "DFA has {} states after the powerset construction and {} after \
             folding actions",
            subsets,
            dfa.len()
        );

        dfa
    }

    /// Runs the powerset construction. The returned states are in discovery
    /// order, the first one is the initial state.
    pub(super) fn determinize(&self, nfa: &Nfa) -> Vec<RawState> {
        let alphabet = nfa.symbols();

        debug!(
            "extended alphabet has {} bytes and {} actions",
            alphabet.iter().filter(|s| !s.is_action()).count(),
            alphabet.iter().filter(|s| s.is_action()).count(),
        );

        let closures = epsilon_closures(nfa);
        let moves = extended_transitions(nfa, &closures);

        let initial = closures[thompson::INITIAL as usize].clone();

        let mut states = vec![RawState::new(is_accepting(&initial))];
        let mut ids: FxHashMap<Vec<thompson::StateId>, usize> =
            FxHashMap::default();
        let mut keys = vec![initial.clone()];

        ids.insert(initial, 0);

        let mut worklist = vec![0];

        while let Some(id) = worklist.pop() {
            let mut next: BTreeMap<Symbol, BTreeSet<thompson::StateId>> =
                BTreeMap::new();

            for member in &keys[id] {
                for (symbol, targets) in &moves[*member as usize] {
                    next.entry(*symbol).or_default().extend(targets);
                }
            }

            for (symbol, targets) in next {
                let key: Vec<thompson::StateId> = targets.into_iter().collect();
                let target = match ids.get(&key) {
                    Some(target) => *target,
                    None => {
                        let target = states.len();
                        states.push(RawState::new(is_accepting(&key)));
                        ids.insert(key.clone(), target);
                        keys.push(key);
                        worklist.push(target);
                        target
                    }
                };
                states[id].transitions.insert(
                    symbol,
                    RawTransition { target, actions: ActionSet::new() },
                );
            }
        }

        states
    }
}

/// A subset of NFA states is accepting if it contains the overall final
/// state.
fn is_accepting(key: &[thompson::StateId]) -> bool {
    key.binary_search(&thompson::FINAL).is_ok()
}

/// Computes the epsilon closure of every state in `nfa`. Each closure is a
/// sorted list of state ids that includes the state itself.
fn epsilon_closures(nfa: &Nfa) -> Vec<Vec<thompson::StateId>> {
    let mut visited: BitVec = BitVec::repeat(false, nfa.len());
    let mut stack = Vec::new();
    let mut closures = Vec::with_capacity(nfa.len());

    for id in 0..nfa.len() as thompson::StateId {
        let mut closure = Vec::new();

        stack.push(id);

        while let Some(s) = stack.pop() {
            if visited[s as usize] {
                continue;
            }
            visited.set(s as usize, true);
            closure.push(s);
            stack.extend(nfa.state(s).direct().iter().copied());
        }

        for s in &closure {
            visited.set(*s as usize, false);
        }

        closure.sort_unstable();
        closures.push(closure);
    }

    closures
}

/// For every state and every symbol it has a labeled transition for,
/// computes the states reachable by taking that transition and then any
/// number of direct transitions.
fn extended_transitions(
    nfa: &Nfa,
    closures: &[Vec<thompson::StateId>],
) -> Vec<BTreeMap<Symbol, Vec<thompson::StateId>>> {
    nfa.states()
        .iter()
        .map(|state| {
            state
                .labeled()
                .iter()
                .map(|(symbol, targets)| {
                    let reachable: BTreeSet<thompson::StateId> = targets
                        .iter()
                        .flat_map(|t| closures[*t as usize].iter().copied())
                        .collect();
                    (*symbol, reachable.into_iter().collect())
                })
                .collect()
        })
        .collect()
}

/// Drops the states that are not reachable from the initial state and
/// renumbers the remaining ones in depth-first order, starting with the
/// initial state as 0.
fn finalize(states: Vec<RawState>) -> Dfa {
    let mut ids: Vec<Option<StateId>> = vec![None; states.len()];
    let mut order = Vec::new();
    let mut stack = vec![0_usize];

    while let Some(s) = stack.pop() {
        if ids[s].is_some() {
            continue;
        }
        ids[s] = Some(order.len() as StateId);
        order.push(s);
        // Reversed, so that targets of lower symbols are numbered first.
        for transition in states[s].transitions.values().rev() {
            if ids[transition.target].is_none() {
                stack.push(transition.target);
            }
        }
    }

    let new_id = |old: usize| match ids[old] {
        Some(id) => id,
        None => unreachable!("transition to unreachable state {}", old),
    };

    let states = order
        .iter()
        .map(|old| {
            let state = &states[*old];
            let transitions = state
                .transitions
                .iter()
                .map(|(symbol, transition)| {
                    let Symbol::Byte(b) = symbol else {
                        unreachable!("action symbol {} left after folding", symbol)
                    };
                    let target = &states[transition.target];
                    let mut actions = transition.actions.clone();
                    actions.extend(&target.entry_actions);
                    (
                        *b,
                        Transition {
                            target: new_id(transition.target),
                            actions,
                            accept: target.accept,
                        },
                    )
                })
                .collect();
            State { accept: state.accept, transitions }
        })
        .collect();

    Dfa { states }
}
