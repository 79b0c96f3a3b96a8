//! Exit-code and output contract of the `tridet` binary.
//!
//! Every case runs on a host without the accelerator: the backend is
//! either forced to the software double or auto-resolves to it.

use std::process::{Command, Output};
use tridet_driver::RoccCoprocessor;

fn tridet(args: &[&str]) -> Output {
    tridet_env(args, &[])
}

fn tridet_env(args: &[&str], envs: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tridet"));
    cmd.args(args);
    for (key, value) in envs {
        cmd.env(key, value);
    }
    cmd.output().expect("binary should spawn")
}

#[test]
fn test_scenario_verification_exits_zero() {
    for name in ["counting", "mixed-sign"] {
        let out = tridet(&["verify", "--scenario", name, "--coprocessor", "software"]);
        let stdout = String::from_utf8_lossy(&out.stdout);
        assert_eq!(out.status.code(), Some(0), "{name}: {stdout}");
        assert!(stdout.contains("PASS"), "{name}: {stdout}");
    }
}

#[test]
fn test_explicit_vectors_exit_zero() {
    let out = tridet(&[
        "verify",
        "--sub",
        "2",
        "--diag",
        "3,7",
        "--super",
        "4",
        "--coprocessor",
        "software",
    ]);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(out.status.code(), Some(0), "{stdout}");
    // det [[3,4],[2,7]] = 21 − 8
    assert!(stdout.contains("13"), "{stdout}");
}

#[test]
fn test_busy_polls_reaches_the_double() {
    // Auto falls back to the double on hosts without the accelerator and
    // must honor the knob the same way the forced double does.
    let mut modes = vec!["software"];
    if !RoccCoprocessor::available() {
        modes.push("auto");
    }
    for mode in modes {
        let out = tridet_env(
            &[
                "verify",
                "--scenario",
                "counting",
                "--coprocessor",
                mode,
                "--busy-polls",
                "7",
            ],
            &[("RUST_LOG", "tridet_driver=debug")],
        );
        let stdout = String::from_utf8_lossy(&out.stdout);
        assert_eq!(out.status.code(), Some(0), "{mode}: {stdout}");
        // 7 BUSY responses, then the terminal code on the eighth query.
        assert!(
            stdout.contains("terminal status after 8 polls"),
            "{mode}: {stdout}"
        );
    }
}

#[test]
fn test_unknown_scenario_exits_two() {
    let out = tridet(&["verify", "--scenario", "nonsense"]);
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("unknown scenario"), "{stderr}");
}

#[test]
fn test_inconsistent_vectors_exit_two() {
    let out = tridet(&[
        "verify",
        "--sub",
        "1,2,3",
        "--diag",
        "3,7",
        "--super",
        "4",
        "--coprocessor",
        "software",
    ]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn test_scenarios_lists_builtins() {
    let out = tridet(&["scenarios"]);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout.contains("counting"), "{stdout}");
    assert!(stdout.contains("mixed-sign"), "{stdout}");
}
