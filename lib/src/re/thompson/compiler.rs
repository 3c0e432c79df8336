use log::*;

use crate::re::ast::Ast;
use crate::re::thompson::{Nfa, StateId, FINAL, INITIAL};

/// Builds a [`Nfa`] from an [`Ast`].
///
/// Each node is built between an initial and a final state received from its
/// parent. A node applies its own rule first, creating whatever fresh states
/// it needs, and only then are its children built between the states it
/// chose for them:
///
/// - `Literal`: a labeled transition from initial to final.
/// - `Empty`: a direct transition from initial to final.
/// - `Alternate`: both children share the same initial and final states.
/// - `Concat`: a new middle state becomes the final state of the left child
///   and the initial state of the right one.
/// - `Closure`: an entry state `e` and a body state `b` are added, with
///   direct transitions initial → `e`, `e` → `b` and `e` → final. The child
///   is built from `b` back to `e`, closing the loop.
///
/// The tree is traversed with an explicit stack, deeply nested trees don't
/// overflow the call stack.
#[derive(Default)]
pub struct Compiler {}

impl Compiler {
    /// Creates a new compiler.
    pub fn new() -> Self {
        Self {}
    }

    /// Builds the automaton for `ast`.
    pub fn compile(&self, ast: &Ast) -> Nfa {
        let mut nfa = Nfa::new();
        let mut stack: Vec<(&Ast, StateId, StateId)> =
            vec![(ast, INITIAL, FINAL)];

        while let Some((node, init, fin)) = stack.pop() {
            match node {
                Ast::Literal(symbol) => nfa.add_labeled(init, *symbol, fin),
                Ast::Empty => nfa.add_direct(init, fin),
                Ast::Alternate(lhs, rhs) => {
                    stack.push((rhs, init, fin));
                    stack.push((lhs, init, fin));
                }
                Ast::Concat(lhs, rhs) => {
                    let middle = nfa.add_state();
                    stack.push((rhs, middle, fin));
                    stack.push((lhs, init, middle));
                }
                Ast::Closure(child) => {
                    let entry = nfa.add_state();
                    let body = nfa.add_state();
                    nfa.add_direct(init, entry);
                    nfa.add_direct(entry, body);
                    nfa.add_direct(entry, fin);
                    stack.push((child, body, entry));
                }
            }
        }

        debug!("NFA has {} states", nfa.len());

        nfa
    }
}
