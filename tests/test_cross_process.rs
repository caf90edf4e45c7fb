// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Cross-process tests: drive the `demo_sem` binary against semaphores opened
// in the test process.

#![cfg(unix)]

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::os::unix::process::ExitStatusExt;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use libsem::{OpenFlags, OwnedSemaphore, SemaphoreHandle, SharedSemaphore};

const DEMO: &str = env!("CARGO_BIN_EXE_demo_sem");

static COUNTER: AtomicUsize = AtomicUsize::new(0);

fn unique_name(prefix: &str) -> String {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}_xproc_{}_{n}", std::process::id())
}

#[test]
fn post_from_other_process() {
    let name = unique_name("post");
    SemaphoreHandle::clear_storage(&name);

    let owner = OwnedSemaphore::create(&name, 0).expect("create");
    let status = Command::new(DEMO)
        .args(["post", name.as_str(), "2"])
        .status()
        .expect("spawn demo_sem");
    assert!(status.success());

    assert!(owner.try_wait_for(Duration::from_secs(1)).expect("first"));
    assert!(owner.try_wait_for(Duration::from_secs(1)).expect("second"));
    assert!(!owner.try_wait().expect("exactly two posts"));
}

#[test]
fn wait_in_other_process_acquires() {
    let name = unique_name("wait_ok");
    SemaphoreHandle::clear_storage(&name);

    let owner = OwnedSemaphore::create(&name, 1).expect("create");
    let out = Command::new(DEMO)
        .args(["wait", name.as_str(), "1000"])
        .output()
        .expect("spawn demo_sem");
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("acquired"));

    assert!(!owner.try_wait().expect("child consumed the count"));
}

#[test]
fn wait_in_other_process_times_out() {
    let name = unique_name("wait_timeout");
    SemaphoreHandle::clear_storage(&name);

    let _owner = OwnedSemaphore::create(&name, 0).expect("create");
    let out = Command::new(DEMO)
        .args(["wait", name.as_str(), "50"])
        .output()
        .expect("spawn demo_sem");
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stdout).contains("timeout"));
}

#[test]
fn unlink_from_other_process() {
    let name = unique_name("unlink");
    SemaphoreHandle::clear_storage(&name);

    // Not an owning value: the child removes the name.
    let handle = SemaphoreHandle::open_or_create(&name, OpenFlags::CreateOrOpen, 0o666, 0)
        .expect("create");
    let status = Command::new(DEMO)
        .args(["unlink", name.as_str()])
        .status()
        .expect("spawn demo_sem");
    assert!(status.success());

    let err = SharedSemaphore::open_existing(&name).expect_err("name removed");
    assert!(err.is_not_found());
    handle.post().expect("local handle still valid");
}

#[test]
fn post_to_missing_name_fails() {
    let name = unique_name("missing");
    SemaphoreHandle::clear_storage(&name);

    let out = Command::new(DEMO)
        .args(["post", name.as_str()])
        .output()
        .expect("spawn demo_sem");
    assert_eq!(out.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&out.stderr).contains("sem_open failed"));
}

#[test]
fn owner_aborts_when_its_name_was_already_unlinked() {
    let name = unique_name("abort");
    SemaphoreHandle::clear_storage(&name);

    let mut child = Command::new(DEMO)
        .args(["create", name.as_str()])
        .env("RUST_LOG", "error")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn demo_sem");

    // The banner is printed once the semaphore exists.
    let mut banner = String::new();
    let stdout = child.stdout.take().expect("stdout");
    BufReader::new(stdout).read_line(&mut banner).expect("read banner");
    assert!(banner.contains("created"), "unexpected banner: {banner}");

    SemaphoreHandle::unlink(&name).expect("unlink behind the owner's back");

    let mut stdin = child.stdin.take().expect("stdin");
    stdin.write_all(b"\n").expect("press enter");
    drop(stdin);

    let out = child.wait_with_output().expect("wait for demo_sem");
    assert_eq!(out.status.signal(), Some(libc::SIGABRT));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("failed to unlink owned semaphore"),
        "stderr was: {stderr}"
    );
}

#[test]
fn owner_releases_on_stdin_error() {
    let name = unique_name("stdin_err");
    SemaphoreHandle::clear_storage(&name);

    // Reading from a directory fails with EISDIR.
    let dir = File::open(env!("CARGO_MANIFEST_DIR")).expect("open manifest dir");
    let out = Command::new(DEMO)
        .args(["create", name.as_str()])
        .env("RUST_LOG", "warn")
        .stdin(Stdio::from(dir))
        .output()
        .expect("spawn demo_sem");

    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("reading stdin failed"), "stderr was: {stderr}");

    let err = SharedSemaphore::open_existing(&name).expect_err("owner unlinked on exit");
    assert!(err.is_not_found());
}
