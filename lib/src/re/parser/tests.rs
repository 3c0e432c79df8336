use indexmap::IndexMap;
use pretty_assertions::assert_eq;

use super::{Error, Parser};
use crate::compiler::Actions;
use crate::re::ast::Ast;
use crate::re::Symbol;
use crate::Span;

fn parse(pattern: &str) -> Result<Ast, Error> {
    Parser::new().parse(pattern, &mut Actions::new())
}

fn a() -> Ast {
    Ast::byte(b'a')
}

/// Returns the literals in the tree, from left to right.
fn literals(ast: &Ast) -> Vec<Symbol> {
    let mut result = Vec::new();
    let mut stack = vec![ast];
    while let Some(node) = stack.pop() {
        match node {
            Ast::Literal(symbol) => result.push(*symbol),
            Ast::Empty => {}
            Ast::Concat(lhs, rhs) | Ast::Alternate(lhs, rhs) => {
                stack.push(rhs);
                stack.push(lhs);
            }
            Ast::Closure(child) => stack.push(child),
        }
    }
    result
}

#[test]
fn implicit_concatenation() {
    assert_eq!(parse("a b").unwrap(), Ast::concat(a(), Ast::byte(b'b')));
    assert_eq!(parse("'ab'").unwrap(), Ast::concat(a(), Ast::byte(b'b')));
    assert_eq!(
        parse("a'b'(c)").unwrap(),
        Ast::concat(Ast::concat(a(), Ast::byte(b'b')), Ast::byte(b'c'))
    );
}

#[test]
fn precedence() {
    assert_eq!(
        parse("'ab'|c*").unwrap(),
        Ast::alternate(
            Ast::concat(a(), Ast::byte(b'b')),
            Ast::closure(Ast::byte(b'c'))
        )
    );

    assert_eq!(
        parse("a|b|c").unwrap(),
        Ast::alternate(
            Ast::alternate(a(), Ast::byte(b'b')),
            Ast::byte(b'c')
        )
    );

    assert_eq!(
        parse("(a|b)c").unwrap(),
        Ast::concat(Ast::alternate(a(), Ast::byte(b'b')), Ast::byte(b'c'))
    );
}

#[test]
fn whitespace_is_ignored() {
    assert_eq!(parse(" a\t|\n b ").unwrap(), parse("a|b").unwrap());
    assert_eq!(
        parse("' '").unwrap(),
        Ast::byte(b' '),
        "whitespace inside quotes is significant"
    );
}

#[test]
fn classes() {
    assert_eq!(
        parse("[a-c]").unwrap(),
        Ast::alternate(
            Ast::alternate(a(), Ast::byte(b'b')),
            Ast::byte(b'c')
        )
    );

    // A trailing `-` is a literal.
    assert_eq!(parse("[a-]").unwrap(), Ast::alternate(Ast::byte(b'-'), a()));

    // Members are sorted and deduplicated.
    assert_eq!(parse("[cbaa]").unwrap(), parse("[a-c]").unwrap());

    let negated = parse("[^a-c]").unwrap();
    let symbols = literals(&negated);

    assert_eq!(symbols.len(), 253);
    assert!(!symbols.contains(&Symbol::Byte(b'a')));
    assert!(!symbols.contains(&Symbol::Byte(b'b')));
    assert!(!symbols.contains(&Symbol::Byte(b'c')));

    assert_eq!(literals(&parse("[\\d]").unwrap()).len(), 10);
    assert_eq!(literals(&parse("[^\\D]").unwrap()).len(), 10);
    assert_eq!(literals(&parse(".").unwrap()).len(), 255);
    assert_eq!(parse("[\\x41-\\x43]").unwrap(), parse("[ABC]").unwrap());
}

#[test]
fn escapes() {
    assert_eq!(
        literals(&parse(r"'\x61\n\r\t\cJ\e\''").unwrap()),
        vec![
            Symbol::Byte(b'a'),
            Symbol::Byte(b'\n'),
            Symbol::Byte(b'\r'),
            Symbol::Byte(b'\t'),
            Symbol::Byte(0x0a),
            Symbol::Byte(0x1b),
            Symbol::Byte(b'\''),
        ]
    );

    assert_eq!(parse(r"\.").unwrap(), Ast::byte(b'.'));
    assert_eq!(parse(r"\x00").unwrap(), Ast::byte(0));
    assert_eq!(literals(&parse(r"\w").unwrap()).len(), 63);
    assert_eq!(literals(&parse(r"\S").unwrap()).len(), 254);
}

#[test]
fn repetitions() {
    assert_eq!(
        parse("a{2,4}").unwrap(),
        Ast::alternate(
            Ast::alternate(
                Ast::concat(a(), a()),
                Ast::concat(Ast::concat(a(), a()), a())
            ),
            Ast::concat(Ast::concat(Ast::concat(a(), a()), a()), a())
        )
    );

    assert_eq!(parse("a{0,}").unwrap(), parse("a*").unwrap());
    assert_eq!(parse("a{,}").unwrap(), parse("a*").unwrap());
    assert_eq!(parse("a{3,3}").unwrap(), parse("a a a").unwrap());
    assert_eq!(parse("a{3}").unwrap(), parse("a a a").unwrap());
    assert_eq!(parse("a{1}").unwrap(), a());
    assert_eq!(parse("a+").unwrap(), Ast::concat(a(), Ast::closure(a())));
    assert_eq!(parse("a?").unwrap(), Ast::alternate(Ast::Empty, a()));
    assert_eq!(parse("a{,1}").unwrap(), parse("a?").unwrap());
    assert_eq!(parse("a{0}").unwrap(), Ast::Empty);
    assert_eq!(
        parse("b a{0}").unwrap(),
        Ast::concat(Ast::byte(b'b'), Ast::Empty)
    );
    assert_eq!(
        parse("a{2,}").unwrap(),
        Ast::concat(Ast::concat(a(), a()), Ast::closure(a()))
    );

    // Repetitions apply to the whole group or string.
    assert_eq!(
        parse("'ab'{2}").unwrap(),
        parse("('ab')('ab')").unwrap()
    );
    assert_eq!(
        parse("(a|b){2}").unwrap(),
        parse("(a|b)(a|b)").unwrap()
    );

    // Repetition of a repetition.
    assert_eq!(parse("a{2}{2}").unwrap(), parse("(a a)(a a)").unwrap());
    assert_eq!(parse("a**").unwrap(), Ast::closure(Ast::closure(a())));
}

#[test]
fn empty() {
    assert_eq!(parse("").unwrap(), Ast::Empty);
    assert_eq!(parse("()").unwrap(), Ast::Empty);
    assert_eq!(parse("''").unwrap(), Ast::Empty);
}

#[test]
fn actions() {
    let mut actions = Actions::new();
    let ast = Parser::new().parse("a{b}", &mut actions).unwrap();

    assert_eq!(ast, Ast::concat(a(), Ast::action(0)));
    assert_eq!(actions.len(), 1);
    assert_eq!(actions.get(0), Some("b"));

    let mut actions = Actions::new();
    let ast = Parser::new()
        .parse("x{ if (c == '}') { n++; } } y{ s = \"{\"; }", &mut actions)
        .unwrap();

    assert_eq!(
        ast,
        Ast::concat(
            Ast::concat(
                Ast::concat(Ast::byte(b'x'), Ast::action(0)),
                Ast::byte(b'y')
            ),
            Ast::action(1)
        )
    );
    assert_eq!(actions.get(0), Some(" if (c == '}') { n++; } "));
    assert_eq!(actions.get(1), Some(" s = \"{\"; "));
}

#[test]
fn macros() {
    let mut macros = IndexMap::new();
    macros.insert("digit".to_string(), "[0-9]".to_string());
    macros.insert("number".to_string(), "digit+".to_string());
    macros.insert("a".to_string(), "'xyz'".to_string());

    let parse_with_macros = |pattern| {
        Parser::new().macros(&macros).parse(pattern, &mut Actions::new())
    };

    assert_eq!(
        parse_with_macros("number").unwrap(),
        parse("[0-9]+").unwrap()
    );

    // A macro is a single term.
    assert_eq!(
        parse_with_macros("digit{2}").unwrap(),
        parse("[0-9][0-9]").unwrap()
    );

    // Macros shadow single letters.
    assert_eq!(parse_with_macros("a").unwrap(), parse("'xyz'").unwrap());
}

#[test]
fn recursive_macros() {
    let mut macros = IndexMap::new();
    macros.insert("foo".to_string(), "'x' bar".to_string());
    macros.insert("bar".to_string(), "foo?".to_string());

    assert_eq!(
        Parser::new()
            .macros(&macros)
            .parse("'a' foo", &mut Actions::new())
            .unwrap_err(),
        Error::RecursiveMacro { name: "foo".to_string(), span: Span(4..7) }
    );
}

#[test]
fn errors() {
    assert_eq!(
        parse("foo").unwrap_err(),
        Error::UnknownMacro { name: "foo".to_string(), span: Span(0..3) }
    );

    assert_eq!(
        parse("[b-a]").unwrap_err(),
        Error::BackwardRange {
            first: "'b'".to_string(),
            last: "'a'".to_string(),
            span: Span(1..4)
        }
    );

    assert_eq!(
        parse("[a]{4").unwrap_err(),
        Error::MissingBrace { span: Span(3..5) }
    );

    assert_eq!(
        parse("(a").unwrap_err(),
        Error::UnbalancedParens { span: Span(0..1) }
    );

    assert_eq!(
        parse("a)").unwrap_err(),
        Error::UnbalancedParens { span: Span(1..2) }
    );

    assert_eq!(
        parse("*a").unwrap_err(),
        Error::NothingToRepeat { span: Span(0..1) }
    );

    assert_eq!(
        parse("a|{2}").unwrap_err(),
        Error::NothingToRepeat { span: Span(2..5) }
    );

    assert_eq!(
        parse("[abc").unwrap_err(),
        Error::UnterminatedClass { span: Span(0..4) }
    );

    assert_eq!(
        parse("a{3,2}").unwrap_err(),
        Error::InvalidRepetition { span: Span(1..6) }
    );

    assert_eq!(
        parse(r"'\xZZ'").unwrap_err(),
        Error::InvalidEscape { span: Span(1..5) }
    );

    assert_eq!(
        parse("a|").unwrap_err(),
        Error::MalformedExpression { span: Span(1..2) }
    );

    assert_eq!(parse("[]").unwrap_err(), Error::EmptyClass { span: Span(0..2) });

    assert_eq!(
        parse("]").unwrap_err(),
        Error::UnexpectedChar { ch: ']', span: Span(0..1) }
    );

    assert_eq!(
        parse("é").unwrap_err(),
        Error::UnexpectedChar { ch: 'é', span: Span(0..2) }
    );

    assert_eq!(
        parse("'abc").unwrap_err(),
        Error::UnexpectedEnd { span: Span(0..4) }
    );

    assert_eq!(
        parse("a{ x = 1;").unwrap_err(),
        Error::UnexpectedEnd { span: Span(1..9) }
    );
}

#[test]
fn repetition_limits() {
    assert!(parse("a{1000}").is_ok());

    assert_eq!(
        parse("a{100000000}").unwrap_err(),
        Error::TooManyRepetitions { span: Span(1..12) }
    );

    assert_eq!(
        parse("a{2,1001}").unwrap_err(),
        Error::TooManyRepetitions { span: Span(1..9) }
    );

    // Doesn't fit in 32 bits.
    assert_eq!(
        parse("a{99999999999}").unwrap_err(),
        Error::TooManyRepetitions { span: Span(1..13) }
    );

    assert_eq!(
        parse("(a{1000}){1000}").unwrap_err(),
        Error::PatternTooLarge { span: Span(9..15) }
    );
}
