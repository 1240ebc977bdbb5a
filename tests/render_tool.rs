use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const ADD: &str = "#' Add two numbers
#'
#' @description Adds two numbers $B{container(rocker/r-ver); volume(/data:/data); command(Rscript add.R $x $y)}
#' @param x first number $B{type(integer); !}
#' @param y second number $B{type(integer); value(0)}
#' @author Alice, Bob
#' @return the sum $B{data(sum, txt, Sum)}
#' @export
add <- function(x, y) {
  x + y
}
";

fn r_file() -> NamedTempFile {
    let mut input = NamedTempFile::new().unwrap();
    write!(input, "{}", ADD).unwrap();
    input
}

#[test]
fn render_xml_by_default() {
    let input = r_file();
    Command::cargo_bin("baryon")
        .unwrap()
        .arg(input.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<tool>"))
        .stdout(predicate::str::contains("<person name=\"Bob\"/>"))
        .stdout(predicate::str::contains("<data name=\"sum\" format=\"txt\" label=\"Sum\"/>"))
        .stdout(predicate::str::contains("<command>Rscript add.R $x $y</command>"));
}

#[test]
fn render_bash() {
    let input = r_file();
    Command::cargo_bin("baryon")
        .unwrap()
        .arg(input.path())
        .args(["--mode", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("#!/bin/bash\n"))
        .stdout(predicate::str::contains("y='0'\n"))
        .stdout(predicate::str::ends_with(
            "docker run --rm -v \"/data:/data\" rocker/r-ver Rscript add.R $x $y\n",
        ));
}

#[test]
fn render_python_from_stdin() {
    Command::cargo_bin("baryon")
        .unwrap()
        .args(["-", "-m", "python"])
        .write_stdin(ADD)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("#!/usr/bin/env python3\n\"\"\"Adds two numbers\"\"\"\n"))
        .stdout(predicate::str::contains(
            "Rscript add.R {arguments['x']} {arguments['y']}\", shell=True, check=True)",
        ));
}

#[test]
fn render_untyped_param_fails() {
    Command::cargo_bin("baryon")
        .unwrap()
        .args(["--mode", "bash"])
        .write_stdin("#' @description T $B{command(run)}\n#' @param a.b help text\n")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Unknown type"));
}

#[test]
fn strict_params_reject_unknown_instructions() {
    let input = "#' @description T $B{command(run $x)}\n#' @param x help $B{type(text); sparkle}\n";
    Command::cargo_bin("baryon")
        .unwrap()
        .args(["--mode", "bash"])
        .write_stdin(input)
        .assert()
        .success();
    Command::cargo_bin("baryon")
        .unwrap()
        .args(["--mode", "bash", "--strict-params"])
        .write_stdin(input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("sparkle"));
}

#[test]
fn bash_param_named_arg_keeps_its_value() {
    let output = Command::cargo_bin("baryon")
        .unwrap()
        .args(["--mode", "bash"])
        .write_stdin("#' @description T $B{command(echo got=$arg)}\n#' @param arg a value $B{type(integer);!}\n")
        .output()
        .unwrap();
    assert!(output.status.success());

    let mut script = NamedTempFile::new().unwrap();
    script.write_all(&output.stdout).unwrap();
    Command::new("bash")
        .arg(script.path())
        .args(["--arg=5", "--verbose=1"])
        .assert()
        .success()
        .stdout("got=5\n");
}

#[test]
fn params_that_are_no_shell_variables_are_rejected() {
    for param in ["x,y", "PATH"] {
        Command::cargo_bin("baryon")
            .unwrap()
            .args(["--mode", "bash"])
            .write_stdin(format!(
                "#' @description T $B{{command(ls)}}\n#' @param {} help $B{{type(text)}}\n",
                param
            ))
            .assert()
            .failure()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("Invalid param: field \"name\""));
    }
}
