/*! Abstract syntax tree for regular expressions.

The tree is produced by [`crate::re::parser::Parser`] and consumed by
[`crate::re::thompson::Compiler`]. It is immutable once built. Bounded
repetitions are already desugared when the tree is built, so every copy of a
repeated sub-expression is its own, structurally independent subtree.
*/

use ::ascii_tree::Tree;
use ::ascii_tree::Tree::{Leaf, Node};

use crate::re::Symbol;

/// A node in the syntax tree of a regular expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Ast {
    /// Matches a single symbol.
    Literal(Symbol),
    /// Matches the empty string.
    Empty,
    /// Matches the left side followed by the right side.
    Concat(Box<Ast>, Box<Ast>),
    /// Matches either the left or the right side.
    Alternate(Box<Ast>, Box<Ast>),
    /// Matches zero or more repetitions of the child.
    Closure(Box<Ast>),
}

impl Ast {
    pub fn byte(b: u8) -> Self {
        Ast::Literal(Symbol::Byte(b))
    }

    pub fn action(idx: u32) -> Self {
        Ast::Literal(Symbol::Action(idx))
    }

    pub fn concat(lhs: Ast, rhs: Ast) -> Self {
        Ast::Concat(Box::new(lhs), Box::new(rhs))
    }

    pub fn alternate(lhs: Ast, rhs: Ast) -> Self {
        Ast::Alternate(Box::new(lhs), Box::new(rhs))
    }

    pub fn closure(child: Ast) -> Self {
        Ast::Closure(Box::new(child))
    }

    /// Returns the number of nodes in the tree.
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            match node {
                Ast::Literal(_) | Ast::Empty => {}
                Ast::Concat(lhs, rhs) | Ast::Alternate(lhs, rhs) => {
                    stack.push(rhs);
                    stack.push(lhs);
                }
                Ast::Closure(child) => stack.push(child),
            }
        }
        count
    }

    /// Always false, a tree has at least one node.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns a representation of the tree as an ASCII tree.
    pub fn ascii_tree(&self) -> Tree {
        match self {
            Ast::Literal(symbol) => Leaf(vec![symbol.to_string()]),
            Ast::Empty => Leaf(vec!["empty".to_string()]),
            Ast::Concat(lhs, rhs) => Node(
                "concat".to_string(),
                vec![lhs.ascii_tree(), rhs.ascii_tree()],
            ),
            Ast::Alternate(lhs, rhs) => Node(
                "alternate".to_string(),
                vec![lhs.ascii_tree(), rhs.ascii_tree()],
            ),
            Ast::Closure(child) => {
                Node("closure".to_string(), vec![child.ascii_tree()])
            }
        }
    }
}
