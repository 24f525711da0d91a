//! End-to-end tests for `reload`.
#![cfg(unix)]

use predicates::prelude::*;
use std::fs;

mod common;
use common::{TestEnv, canonical};

#[test]
fn test_reload_replays_exact_command_and_directory() {
    let env = TestEnv::new();
    env.command()
        .arg("expand")
        .arg(env.project_file("src/inner/thing.rs"))
        .assert()
        .success();

    env.command()
        .arg("reload")
        .arg("rustexpand:[expanded] thing.rs")
        .assert()
        .success()
        .stdout(predicate::str::contains("[expanded] thing.rs"));

    let invocations = env.invocations();
    assert_eq!(invocations.len(), 2);
    assert_eq!(invocations[0], invocations[1]);
    assert_eq!(invocations[1].1, "expand inner::thing");
    assert_eq!(canonical(&invocations[1].0), env.canonical_project());
}

#[test]
fn test_reload_accepts_bare_label() {
    let env = TestEnv::new();
    env.command()
        .arg("crate")
        .arg(env.project_file("src/main.rs"))
        .assert()
        .success();

    env.command()
        .arg("reload")
        .arg("[expanded-crate] demo")
        .assert()
        .success();

    assert_eq!(env.invocations().len(), 2);
}

#[test]
fn test_reload_unknown_identifier_spawns_nothing() {
    let env = TestEnv::new();

    env.command()
        .arg("reload")
        .arg("rustexpand:[expanded] ghost.rs")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No cached expansion"));

    assert!(env.invocations().is_empty());
}

#[test]
fn test_reload_rejects_foreign_scheme() {
    let env = TestEnv::new();

    env.command()
        .arg("reload")
        .arg("file:/proj/src/main.rs")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a rustexpand document"));
}

#[test]
fn test_reload_without_argument_uses_sole_entry() {
    let env = TestEnv::new();
    env.command()
        .arg("expand")
        .arg(env.project_file("src/inner/thing.rs"))
        .assert()
        .success();

    env.command().arg("reload").assert().success();
    assert_eq!(env.invocations().len(), 2);
}

#[test]
fn test_reload_without_argument_is_ambiguous_with_many_entries() {
    let env = TestEnv::new();
    env.command()
        .arg("expand")
        .arg(env.project_file("src/inner/thing.rs"))
        .assert()
        .success();
    env.command()
        .arg("crate")
        .arg(env.project_file("src/main.rs"))
        .assert()
        .success();

    env.command()
        .arg("reload")
        .assert()
        .failure()
        .stderr(predicate::str::contains("rustexpand list"));

    // Only the two original expansions ran
    assert_eq!(env.invocations().len(), 2);
}

#[test]
fn test_reload_picks_up_source_changes() {
    let env = TestEnv::new();
    env.command()
        .arg("expand")
        .arg(env.project_file("src/inner/thing.rs"))
        .assert()
        .success();

    // The stub starts reporting different output, as a recompiled crate would
    env.stub_cargo(
        "#!/bin/sh\n\
         printf '%s|%s\\n' \"$PWD\" \"$*\" >> \"__LOG__\"\n\
         echo 'fn expanded_v2() {}'\n",
    );

    env.command()
        .arg("reload")
        .arg("[expanded] thing.rs")
        .assert()
        .success();

    let text = fs::read_to_string(&env.rendered_files()[0]).unwrap();
    assert!(text.contains("fn expanded_v2() {}"));
    assert!(!text.contains("fn expanded() {}"));
}
