use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

#[test]
fn cli_compile() {
    let temp_dir = TempDir::new().unwrap();

    Command::cargo_bin("rexc")
        .unwrap()
        .arg("compile")
        .arg("src/tests/testdata/numbers.rex")
        .arg("--output-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("lex_num.h"))
        .stdout(predicate::str::contains("lex_num.c"));

    temp_dir
        .child("lex_num.h")
        .assert(predicate::str::contains("#include <stdio.h>"))
        .assert(predicate::str::contains(
            "num_action_t num_lex(unsigned char token);",
        ));

    temp_dir
        .child("lex_num.c")
        .assert(predicate::str::contains("static int count;"))
        .assert(predicate::str::contains("{ count++; }"))
        .assert(predicate::str::contains("num_state++;"));
}

#[test]
fn cli_compile_no_increments() {
    let temp_dir = TempDir::new().unwrap();

    Command::cargo_bin("rexc")
        .unwrap()
        .arg("compile")
        .arg("--no-increments")
        .arg("-o")
        .arg(temp_dir.path())
        .arg("src/tests/testdata/numbers.rex")
        .assert()
        .success();

    temp_dir
        .child("lex_num.c")
        .assert(predicate::str::contains("num_state = num_STATE_1;"))
        .assert(predicate::str::contains("num_state++;").not());
}

#[test]
fn cli_compile_with_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.child("config.toml");
    let output_dir = temp_dir.child("out");

    config_file
        .write_str(&format!(
            "[codegen]\nfile_prefix = \"gen_\"\noutput_dir = {:?}\n",
            output_dir.path().to_string_lossy()
        ))
        .unwrap();

    Command::cargo_bin("rexc")
        .unwrap()
        .arg("--config")
        .arg(config_file.path())
        .arg("compile")
        .arg("src/tests/testdata/numbers.rex")
        .assert()
        .success();

    output_dir.child("gen_num.h").assert(predicate::path::exists());
    output_dir.child("gen_num.c").assert(predicate::path::exists());
}

#[test]
fn cli_invalid_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.child("config.toml");

    config_file.write_str("[codegen]\nindent = 4\n").unwrap();

    Command::cargo_bin("rexc")
        .unwrap()
        .arg("--config")
        .arg(config_file.path())
        .arg("match")
        .arg("a")
        .arg("a")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config file"))
        .stderr(predicate::str::contains("unknown field"));
}

#[test]
fn cli_compile_no_rules() {
    Command::cargo_bin("rexc")
        .unwrap()
        .arg("compile")
        .arg("src/tests/testdata/no_rules.rex")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "invalid rule file `src/tests/testdata/no_rules.rex`: no rules found",
        ));
}

#[test]
fn cli_compile_syntax_error() {
    Command::cargo_bin("rexc")
        .unwrap()
        .arg("compile")
        .arg("src/tests/testdata/bad_pattern.rex")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error[E007]: invalid repetition"))
        .stderr(predicate::str::contains("src/tests/testdata/bad_pattern.rex"))
        .stderr(predicate::str::contains("error: the expression is not valid"));
}

#[test]
fn cli_dump_pattern() {
    Command::cargo_bin("rexc")
        .unwrap()
        .arg("dump")
        .arg("--pattern")
        .arg("a{x}")
        .assert()
        .success()
        .stdout("initial state: 0\n0: 'a' -> [0] 1*\n1*:\n@0: {x}\n");
}

#[test]
fn cli_dump_ast_and_nfa() {
    Command::cargo_bin("rexc")
        .unwrap()
        .arg("dump")
        .arg("--ast")
        .arg("--nfa")
        .arg("-p")
        .arg("'ab'")
        .assert()
        .success()
        .stdout(predicate::str::contains(" concat\n ├─ 'a'\n └─ 'b'\n"))
        .stdout(predicate::str::contains("0: 'a' -> 2\n1 (final):\n2: 'b' -> 1\n"))
        .stdout(predicate::str::contains("initial state: 0\n"));
}

#[test]
fn cli_dump_rules() {
    Command::cargo_bin("rexc")
        .unwrap()
        .arg("dump")
        .arg("src/tests/testdata/numbers.rex")
        .assert()
        .success()
        .stdout(predicate::str::contains("initial state: 0\n0: ['0'-'9'] -> 1 | 'e' -> "))
        .stdout(predicate::str::contains("@0: { count++; }\n"));
}

#[test]
fn cli_dump_requires_input() {
    Command::cargo_bin("rexc").unwrap().arg("dump").assert().failure();
}

#[test]
fn cli_match() {
    Command::cargo_bin("rexc")
        .unwrap()
        .arg("match")
        .arg(r"\d{1,3}(\.\d{1,3}){3}")
        .arg("192.168.0.255")
        .arg("10.0.0.1")
        .assert()
        .success()
        .stdout("match 192.168.0.255\nmatch 10.0.0.1\n");
}

#[test]
fn cli_no_match() {
    Command::cargo_bin("rexc")
        .unwrap()
        .arg("match")
        .arg(r"\d{1,3}(\.\d{1,3}){3}")
        .arg("192.168.0.255")
        .arg("192.168.0.2555x")
        .assert()
        .code(1)
        .stdout("match 192.168.0.255\nno match 192.168.0.2555x\n");
}

#[test]
fn cli_match_with_macros() {
    Command::cargo_bin("rexc")
        .unwrap()
        .arg("match")
        .arg("--define")
        .arg("hex=[0-9a-f]")
        .arg("'0x' hex+")
        .arg("0x1f")
        .assert()
        .success()
        .stdout("match 0x1f\n");
}

#[test]
fn cli_match_syntax_error() {
    Command::cargo_bin("rexc")
        .unwrap()
        .arg("match")
        .arg("foo")
        .arg("foo")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error[E010]: unknown macro `foo`"));
}
