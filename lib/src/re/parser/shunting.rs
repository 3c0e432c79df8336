use crate::re::ast::Ast;
use crate::re::parser::{Error, Token, TokenKind};
use crate::Span;

impl TokenKind {
    /// Priority of binary operators. Higher binds tighter.
    fn priority(&self) -> u8 {
        match self {
            TokenKind::Or => 0,
            TokenKind::Concat => 1,
            _ => 2,
        }
    }
}

/// Reorders the infix token stream into postfix order.
///
/// Operands and the postfix closure go straight to the output. A binary
/// operator pops every operator with the same or higher priority before it's
/// pushed, which makes both binary operators left-associative. Parenthesis
/// only exist in the infix stream, the postfix stream has none.
pub(super) fn to_postfix(tokens: Vec<Token>) -> Result<Vec<Token>, Error> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();

    for token in tokens {
        match token.kind {
            TokenKind::Symbol(_) | TokenKind::Empty | TokenKind::Closure => {
                output.push(token)
            }
            TokenKind::Open => stack.push(token),
            TokenKind::Close => loop {
                match stack.pop() {
                    Some(top) if top.kind == TokenKind::Open => break,
                    Some(top) => output.push(top),
                    None => {
                        return Err(Error::UnbalancedParens { span: token.span })
                    }
                }
            },
            TokenKind::Or | TokenKind::Concat => {
                let priority = token.kind.priority();
                while let Some(top) = stack.last() {
                    if top.kind == TokenKind::Open
                        || top.kind.priority() < priority
                    {
                        break;
                    }
                    output.extend(stack.pop());
                }
                stack.push(token);
            }
        }
    }

    while let Some(top) = stack.pop() {
        if top.kind == TokenKind::Open {
            return Err(Error::UnbalancedParens { span: top.span });
        }
        output.push(top);
    }

    Ok(output)
}

/// Folds a postfix token stream into a tree.
pub(super) fn fold(postfix: Vec<Token>) -> Result<Ast, Error> {
    let mut stack: Vec<(Ast, Span)> = Vec::new();

    for token in postfix {
        let missing_operand =
            || Error::MalformedExpression { span: token.span.clone() };

        let node = match token.kind {
            TokenKind::Symbol(symbol) => Ast::Literal(symbol),
            TokenKind::Empty => Ast::Empty,
            TokenKind::Closure => {
                let (child, _) = stack.pop().ok_or_else(missing_operand)?;
                Ast::closure(child)
            }
            TokenKind::Concat | TokenKind::Or => {
                let (rhs, _) = stack.pop().ok_or_else(missing_operand)?;
                let (lhs, _) = stack.pop().ok_or_else(missing_operand)?;
                if token.kind == TokenKind::Concat {
                    Ast::concat(lhs, rhs)
                } else {
                    Ast::alternate(lhs, rhs)
                }
            }
            TokenKind::Open | TokenKind::Close => {
                unreachable!("parenthesis in postfix stream")
            }
        };

        stack.push((node, token.span));
    }

    match stack.len() {
        // An empty pattern matches the empty string.
        0 => Ok(Ast::Empty),
        1 => Ok(stack.pop().map(|(ast, _)| ast).unwrap_or(Ast::Empty)),
        _ => Err(Error::MalformedExpression { span: stack[1].1.clone() }),
    }
}
