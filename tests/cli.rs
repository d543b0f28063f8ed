// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Exit-code checks against the compiled binary. None of these reach the
//! network: servers run with `--no-tunnel` on an ephemeral loopback port.

use std::fs;
use std::process::Command;

fn secure_serve() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_secure-serve"));
    command.env_remove("SECURE_SERVE_KEYS");
    command
}

#[test]
fn empty_file_exits_non_zero_before_serving() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.txt");
    fs::write(&path, "").unwrap();

    let out = secure_serve()
        .args(["serve", "--port", "0"])
        .arg(&path)
        .output()
        .unwrap();

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("file content was empty"), "stderr: {stderr}");
    assert!(!stderr.contains("listening"), "stderr: {stderr}");
    assert!(out.stdout.is_empty());
}

#[test]
fn missing_file_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let out = secure_serve()
        .args(["serve", "--no-tunnel", "--port", "0"])
        .arg(dir.path().join("missing.txt"))
        .output()
        .unwrap();

    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
}

#[test]
fn missing_target_argument_exits_non_zero() {
    let out = secure_serve().arg("serve").output().unwrap();
    assert!(!out.status.success());
    assert!(!out.stderr.is_empty());
}

#[test]
fn fetch_without_keys_exits_non_zero() {
    let out = secure_serve()
        .args(["fetch", "http://127.0.0.1:9/get"])
        .output()
        .unwrap();
    assert!(!out.status.success());
}

#[test]
fn no_tunnel_ignores_tunnel_host_from_env() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.txt");
    fs::write(&path, "").unwrap();

    let out = secure_serve()
        .env("SECURE_SERVE_TUNNEL_HOST", "https://lt.example")
        .args(["serve", "--no-tunnel", "--port", "0"])
        .arg(&path)
        .output()
        .unwrap();

    // Rejected for the empty file, not for the argument combination.
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(!stderr.contains("cannot be used with"), "stderr: {stderr}");
    assert!(stderr.contains("file content was empty"), "stderr: {stderr}");
}

#[cfg(unix)]
#[test]
fn sigterm_stops_server_cleanly() {
    use std::io::{BufRead, BufReader, Read};
    use std::process::Stdio;
    use std::thread;
    use std::time::{Duration, Instant};

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hello.txt");
    fs::write(&path, "hello world").unwrap();

    let mut child = secure_serve()
        .env_remove("RUST_LOG")
        .env_remove("LOG_FORMAT")
        .args(["serve", "--no-tunnel", "--port", "0", "-a"])
        .arg(&path)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    // Instructions are printed once the server is accepting.
    let stdout = child.stdout.take().unwrap();
    let mut lines = BufReader::new(stdout).lines();
    let published = lines
        .by_ref()
        .map(|line| line.unwrap())
        .find(|line| line.contains("/get"));
    assert!(published.is_some(), "server never printed instructions");

    thread::sleep(Duration::from_millis(200));
    let killed = Command::new("kill")
        .args(["-TERM", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(killed.success());

    let deadline = Instant::now() + Duration::from_secs(10);
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break status;
        }
        if Instant::now() > deadline {
            child.kill().unwrap();
            panic!("server did not exit after SIGTERM");
        }
        thread::sleep(Duration::from_millis(50));
    };
    assert!(status.success(), "exit status: {status:?}");

    let mut stderr = String::new();
    child.stderr.take().unwrap().read_to_string(&mut stderr).unwrap();
    assert!(stderr.contains("listening"), "stderr: {stderr}");
    assert!(!stderr.contains('\u{1b}'), "ANSI escapes in piped stderr: {stderr:?}");
}
