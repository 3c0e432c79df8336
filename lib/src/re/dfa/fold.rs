/*! Folding of action symbols into byte transitions.

After the powerset construction some transitions are labeled with action
symbols, which don't consume input. This pass removes all of them while
keeping both the accepted language and the set of actions fired along every
path. States are visited in discovery order, and each one is processed until
it has no action transitions left. For every action transition `s -@a-> t`
one of these rules applies:

- Collapse: when `s` has no other transition, isn't the initial state, isn't
  accepting and `t` is not `s` itself, every transition in the automaton
  that targets `s` is redirected to `t`, and gets `a` added to its actions.
  `s` becomes unreachable.

- Inline: otherwise, the action transition is removed from `s` and every
  transition of `t` is copied into `s` with `a` added to its actions. If `t`
  is accepting and `s` is not, `s` becomes accepting and `a` fires when `s`
  is entered.

Inlining the same action and target twice into the same state is skipped,
which guarantees termination when action transitions form cycles.

When an inlined copy uses the same symbol as an existing transition of `s`
but goes somewhere else, both targets are replaced by a union state that
accepts what either of them accepts. Union states are created on demand,
one per distinct set of original states, and are folded like any other
state. The merged transition fires the actions of both.
*/

use std::collections::btree_map::Entry;
use std::collections::{BTreeSet, VecDeque};

use log::*;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::re::dfa::builder::{RawState, RawTransition};
use crate::re::dfa::ActionSet;
use crate::re::Symbol;

/// Folds every action transition in `states`. The first state is the
/// initial state. Union states may be appended at the end.
pub(super) fn fold(states: &mut Vec<RawState>) {
    let mut folder = Folder::new(states);
    folder.run();

    debug!(
        "folded {} action transitions, {} union states created",
        folder.folded, folder.unions_created
    );
}

struct Folder<'a> {
    states: &'a mut Vec<RawState>,
    collapsed: Vec<bool>,
    /// The original states that each state stands for. A union state
    /// stands for every state it was merged from.
    members: Vec<BTreeSet<usize>>,
    unions: FxHashMap<BTreeSet<usize>, usize>,
    /// Union states whose transitions haven't been filled in yet, with the
    /// two states they merge.
    pending: VecDeque<(usize, usize, usize)>,
    folded: usize,
    unions_created: usize,
}

impl<'a> Folder<'a> {
    fn new(states: &'a mut Vec<RawState>) -> Self {
        let len = states.len();
        Self {
            states,
            collapsed: vec![false; len],
            members: (0..len).map(|id| BTreeSet::from([id])).collect(),
            unions: FxHashMap::default(),
            pending: VecDeque::new(),
            folded: 0,
            unions_created: 0,
        }
    }

    fn run(&mut self) {
        let mut id = 0;

        // Union states are appended while folding, so the length is
        // checked on every iteration.
        while id < self.states.len() {
            if !self.collapsed[id] {
                self.fold_state(id);
            }
            id += 1;
        }
    }

    fn fold_state(&mut self, id: usize) {
        let mut inlined: FxHashSet<(u32, usize)> = FxHashSet::default();

        while let Some((symbol, action, transition)) =
            first_action_transition(&self.states[id])
        {
            self.folded += 1;

            let mut actions = transition.actions.clone();
            actions.insert(action);

            let target = transition.target;

            if can_collapse(&self.states[id], id, target) {
                self.collapse(id, target, &actions);
                return;
            }

            self.states[id].transitions.remove(&symbol);

            if !inlined.insert((action, target)) {
                continue;
            }

            self.inline(id, target, &actions);
        }
    }

    /// Redirects every transition that targets `id` to `target`, adding
    /// `actions` to them.
    fn collapse(&mut self, id: usize, target: usize, actions: &ActionSet) {
        for (other, state) in self.states.iter_mut().enumerate() {
            if other == id || self.collapsed[other] {
                continue;
            }
            for t in state.transitions.values_mut() {
                if t.target == id {
                    t.target = target;
                    t.actions.extend(actions);
                }
            }
        }
        self.collapsed[id] = true;
    }

    /// Copies the transitions of `target` into `id`, adding `actions` to
    /// each copy.
    fn inline(&mut self, id: usize, target: usize, actions: &ActionSet) {
        let copies: Vec<(Symbol, RawTransition)> = self.states[target]
            .transitions
            .iter()
            .map(|(symbol, t)| {
                let mut copy = t.clone();
                copy.actions.extend(actions);
                (*symbol, copy)
            })
            .collect();

        for (symbol, copy) in copies {
            self.merge_transition(id, symbol, copy);
        }

        if self.states[target].accept && !self.states[id].accept {
            self.states[id].accept = true;
            self.states[id].entry_actions.extend(actions);
        }

        self.fill_unions();
    }

    /// Adds a transition to `id`. If `id` already has a transition on the
    /// same symbol to a different state, the two targets are merged.
    fn merge_transition(
        &mut self,
        id: usize,
        symbol: Symbol,
        copy: RawTransition,
    ) {
        let existing = match self.states[id].transitions.get(&symbol) {
            None => {
                self.states[id].transitions.insert(symbol, copy);
                return;
            }
            Some(existing) => existing.clone(),
        };

        let target = if existing.target == copy.target {
            existing.target
        } else {
            if existing.actions != copy.actions {
                warn!(
                    "transitions on {} in state {} fire different actions, \
                     the actions of both are merged",
                    symbol, id
                );
            }
            self.union(existing.target, copy.target)
        };

        if let Entry::Occupied(mut entry) =
            self.states[id].transitions.entry(symbol)
        {
            let t = entry.get_mut();
            t.target = target;
            t.actions.extend(copy.actions);
        }
    }

    /// Returns the state that accepts the union of what `a` and `b` accept,
    /// creating it if needed. A new state is empty until
    /// [`Folder::fill_unions`] runs.
    fn union(&mut self, a: usize, b: usize) -> usize {
        let key: BTreeSet<usize> =
            self.members[a].union(&self.members[b]).copied().collect();

        if let Some(id) = self.unions.get(&key) {
            return *id;
        }

        let id = self.states.len();

        self.states.push(RawState::default());
        self.collapsed.push(false);
        self.members.push(key.clone());
        self.unions.insert(key, id);
        self.pending.push_back((id, a, b));
        self.unions_created += 1;

        id
    }

    /// Fills every pending union state with the transitions, accept flag and
    /// entry actions of the states it merges. This runs once an inlining
    /// step is complete, when every state accepts what it accepted before
    /// folding started.
    ///
    /// Conflicts found while copying create more union states. They are
    /// filled in creation order, so the states they merge are always filled
    /// before them.
    fn fill_unions(&mut self) {
        while let Some((id, a, b)) = self.pending.pop_front() {
            let accept = self.states[a].accept || self.states[b].accept;
            let entry_actions: ActionSet = self.states[a]
                .entry_actions
                .union(&self.states[b].entry_actions)
                .copied()
                .collect();

            let copies: Vec<(Symbol, RawTransition)> = self.states[a]
                .transitions
                .iter()
                .chain(self.states[b].transitions.iter())
                .map(|(symbol, t)| (*symbol, t.clone()))
                .collect();

            self.states[id].accept = accept;
            self.states[id].entry_actions = entry_actions;

            for (symbol, copy) in copies {
                self.merge_transition(id, symbol, copy);
            }
        }
    }
}

/// Returns the first transition of `state` labeled with an action symbol.
fn first_action_transition(
    state: &RawState,
) -> Option<(Symbol, u32, RawTransition)> {
    // Actions sort after every byte.
    let (symbol, transition) =
        state.transitions.range(Symbol::Action(0)..).next()?;

    match symbol {
        Symbol::Action(action) => Some((*symbol, *action, transition.clone())),
        Symbol::Byte(_) => None,
    }
}

fn can_collapse(state: &RawState, id: usize, target: usize) -> bool {
    state.transitions.len() == 1 && id != 0 && !state.accept && target != id
}
