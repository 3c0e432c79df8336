/*! Compiles patterns into automata.

The [`Compiler`] runs the whole pipeline: it parses the pattern, builds the
NFA, determinizes it and folds the actions away. The result is an
[`Automaton`], which bundles the final [`Dfa`] together with the [`Actions`]
registry that the parser filled with the text of every action block.
*/

use std::time::Instant;

use indexmap::IndexMap;
use log::*;
use thiserror::Error;

use crate::re::ast::Ast;
use crate::re::dfa::{self, Dfa};
use crate::re::parser::{self, Parser};
use crate::re::thompson;
use crate::rules::{self, RuleFile};

pub use actions::Actions;

mod actions;
pub mod report;

#[cfg(test)]
mod tests;

/// Errors returned while compiling.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The pattern is not a valid regular expression.
    #[error(transparent)]
    Syntax(#[from] parser::Error),

    /// The rule file is malformed.
    #[error(transparent)]
    Rules(#[from] rules::Error),
}

/// Compiles a pattern that doesn't use macros.
///
/// ```
/// let automaton = rexc::compile("'0x'[0-9a-f]+").unwrap();
/// assert!(automaton.dfa().table().is_match(b"0x1f"));
/// ```
pub fn compile(pattern: &str) -> Result<Automaton, Error> {
    Compiler::new().compile(pattern)
}

/// A compiled pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Automaton {
    dfa: Dfa,
    actions: Actions,
}

impl Automaton {
    #[inline]
    pub fn dfa(&self) -> &Dfa {
        &self.dfa
    }

    /// The actions referenced by the transitions of the automaton.
    #[inline]
    pub fn actions(&self) -> &Actions {
        &self.actions
    }

    /// Returns the number of states in the automaton.
    #[inline]
    pub fn len(&self) -> usize {
        self.dfa.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dfa.is_empty()
    }
}

/// Compiles patterns into [`Automaton`]s.
#[derive(Clone, Debug, Default)]
pub struct Compiler {
    macros: IndexMap<String, String>,
}

impl Compiler {
    /// Creates a new compiler with no macros defined.
    pub fn new() -> Self {
        Self { macros: IndexMap::new() }
    }

    /// Defines every macro in `macros`. A macro that was already defined is
    /// replaced.
    pub fn macros<I, K, V>(mut self, macros: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.macros
            .extend(macros.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Defines a macro. Occurrences of `name` in patterns are replaced with
    /// `expansion`, which is parsed as a single term.
    pub fn define_macro(mut self, name: &str, expansion: &str) -> Self {
        self.macros.insert(name.to_string(), expansion.to_string());
        self
    }

    /// Compiles `pattern`.
    pub fn compile(&self, pattern: &str) -> Result<Automaton, Error> {
        self.compile_with_actions(pattern, Actions::new())
    }

    /// Compiles every rule in `rules` as a single automaton.
    ///
    /// The macros defined in the rule file are added to the ones already
    /// defined in this compiler, and the header lines of the file are kept
    /// in the action registry for the code generator.
    pub fn compile_rules(&self, rules: &RuleFile) -> Result<Automaton, Error> {
        let compiler = self.clone().macros(rules.names());

        let mut actions = Actions::new();
        actions.set_header(rules.header());

        compiler.compile_with_actions(&rules.expression(), actions)
    }

    /// Parses `pattern` into a syntax tree without building any automaton.
    /// The action blocks found in the pattern are added to `actions`.
    pub fn parse(
        &self,
        pattern: &str,
        actions: &mut Actions,
    ) -> Result<Ast, Error> {
        Ok(Parser::new().macros(&self.macros).parse(pattern, actions)?)
    }

    fn compile_with_actions(
        &self,
        pattern: &str,
        mut actions: Actions,
    ) -> Result<Automaton, Error> {
        let start = Instant::now();

        let ast = self.parse(pattern, &mut actions)?;
        let nfa = thompson::Compiler::new().compile(&ast);
        let dfa = dfa::Builder::new().build(&nfa);

        info!(
            "compiled pattern with {} AST nodes into {} NFA states and {} DFA \
             states",
            ast.len(),
            nfa.len(),
            dfa.len()
        );

        info!("compilation time: {:?}", Instant::elapsed(&start));

        Ok(Automaton { dfa, actions })
    }
}
