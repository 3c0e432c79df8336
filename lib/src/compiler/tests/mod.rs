use pretty_assertions::assert_eq;

use crate::compiler::report::ReportBuilder;
use crate::re::dfa::{ActionSet, Outcome};
use crate::re::parser;
use crate::rules::{self, RuleFile};
use crate::{compile, Compiler, Error, Span};

#[test]
fn compile_pattern() {
    let automaton = compile("'abc'").unwrap();

    assert_eq!(automaton.len(), 4);
    assert!(automaton.actions().is_empty());
    assert!(automaton.dfa().table().is_match(b"abc"));
    assert!(!automaton.dfa().table().is_match(b"ab"));
}

#[test]
fn macros() {
    let automaton = Compiler::new()
        .define_macro("digit", "[0-9]")
        .define_macro("number", "digit+")
        .compile("number '.' number")
        .unwrap();

    let table = automaton.dfa().table();

    assert!(table.is_match(b"12.5"));
    assert!(!table.is_match(b"12."));
    assert!(!table.is_match(b"number.number"));

    let automaton = Compiler::new()
        .macros([("hex", "[0-9a-f]"), ("byte", "hex{2}")])
        .compile("byte+")
        .unwrap();

    assert!(automaton.dfa().table().is_match(b"0aff"));
    assert!(!automaton.dfa().table().is_match(b"0af"));
}

#[test]
fn macros_are_replaced() {
    let automaton = Compiler::new()
        .define_macro("x", "'a'")
        .define_macro("x", "'b'")
        .compile("x")
        .unwrap();

    assert!(automaton.dfa().table().is_match(b"b"));
    assert!(!automaton.dfa().table().is_match(b"a"));
}

#[test]
fn actions() {
    let automaton = compile("a{ one(); }b{ two(); }").unwrap();
    let actions = automaton.actions();

    assert_eq!(actions.len(), 2);
    assert_eq!(actions.get(0), Some(" one(); "));
    assert_eq!(actions.get(1), Some(" two(); "));
    assert_eq!(
        actions.text(&ActionSet::from([1, 0])),
        " one();  two(); ".to_string()
    );

    let mut fired = Vec::new();
    let mut stepper = automaton.dfa().stepper();

    assert_eq!(stepper.step(b'a', |a| fired.push(a)), Outcome::Continue);
    assert_eq!(stepper.step(b'b', |a| fired.push(a)), Outcome::Accept);
    assert_eq!(fired, vec![0, 1]);
}

#[test]
fn syntax_errors() {
    assert_eq!(
        compile("a{3,2}").err(),
        Some(Error::Syntax(parser::Error::InvalidRepetition { span: Span(1..6) }))
    );

    assert_eq!(
        compile("foo").err(),
        Some(Error::Syntax(parser::Error::UnknownMacro {
            name: "foo".to_string(),
            span: Span(0..3)
        }))
    );

    assert_eq!(
        compile("(a").err(),
        Some(Error::Syntax(parser::Error::UnbalancedParens { span: Span(0..1) }))
    );
}

#[test]
fn compile_rules() {
    let rules = RuleFile::parse(
        r#"%prefix p
#include <ctype.h>
int count;
%names
digit = [0-9]
%rule
digit+ { count++; } ';'
%rule
'end'
"#,
    )
    .unwrap();

    let automaton = Compiler::new().compile_rules(&rules).unwrap();
    let table = automaton.dfa().table();

    assert!(table.is_match(b"12;"));
    assert!(table.is_match(b"end"));
    assert!(!table.is_match(b"12"));

    assert_eq!(automaton.actions().get(0), Some(" count++; "));
    assert_eq!(
        automaton.actions().header_includes().collect::<Vec<_>>(),
        vec!["#include <ctype.h>"]
    );
    assert_eq!(
        automaton.actions().header_body().collect::<Vec<_>>(),
        vec!["int count;"]
    );
}

#[test]
fn compiler_macros_and_rule_names() {
    let rules =
        RuleFile::parse("%prefix p\n%names\nb = 'y'\n%rule\na b\n").unwrap();

    let automaton = Compiler::new()
        .define_macro("a", "'x'")
        .define_macro("b", "'z'")
        .compile_rules(&rules)
        .unwrap();

    // Names in the rule file override the ones in the compiler.
    assert!(automaton.dfa().table().is_match(b"xy"));
    assert!(!automaton.dfa().table().is_match(b"xz"));
}

#[test]
fn rule_errors_convert() {
    let err: Error = RuleFile::parse("%prefix p\n").unwrap_err().into();

    assert_eq!(err, Error::Rules(rules::Error::NoRules));
    assert_eq!(err.to_string(), "no rules found");
}

#[test]
fn reports() {
    let pattern = "a{3,2}";
    let Err(Error::Syntax(err)) = compile(pattern) else {
        panic!("`{}` should fail", pattern)
    };

    let report = ReportBuilder::new().origin("test.rex").syntax_error(pattern, &err);

    assert!(report.contains("error[E007]: invalid repetition"));
    assert!(report.contains("test.rex"));
    assert!(report.contains("a{3,2}"));
    assert!(report.contains("^^^^^ the upper bound is lower than the lower bound"));

    let pattern = "digit";
    let Err(Error::Syntax(err)) = compile(pattern) else {
        panic!("`{}` should fail", pattern)
    };

    let report = ReportBuilder::new().syntax_error(pattern, &err);

    assert!(report.contains("error[E010]: unknown macro `digit`"));
    assert!(report.contains("`digit` is not defined"));
    assert!(report.contains("note: sequences of letters are macro references"));
}
