// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Named semaphore demo.
//
// Usage:
//   demo_sem create <name> [count]      (owner — unlinks the name on exit)
//   demo_sem post   <name> [n]
//   demo_sem wait   <name> [timeout_ms]
//   demo_sem unlink <name>
//
// Run `create` in one terminal, then `wait` / `post` from others. The owner
// holds the semaphore until Enter is pressed on its stdin.
// Set RUST_LOG=debug to see open/unlink events.

use std::io::BufRead;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use libsem::{OwnedSemaphore, SemaphoreHandle, SharedSemaphore};
use tracing_subscriber::EnvFilter;

fn usage() -> ExitCode {
    eprintln!("usage: demo_sem create <name> [count]");
    eprintln!("       demo_sem post   <name> [n]");
    eprintln!("       demo_sem wait   <name> [timeout_ms]");
    eprintln!("       demo_sem unlink <name>");
    ExitCode::from(2)
}

fn parse_arg<T: std::str::FromStr>(arg: Option<&String>, default: T, what: &str) -> Option<T> {
    match arg {
        None => Some(default),
        Some(s) => match s.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                eprintln!("demo_sem: invalid {what}: {s}");
                None
            }
        },
    }
}

fn do_create(name: &str, count: u32) -> libsem::Result<()> {
    let sem = OwnedSemaphore::create(name, count)?;
    println!("created '{}' with count {count}; press Enter to unlink and exit", sem.name());
    let mut line = String::new();
    if let Err(e) = std::io::stdin().lock().read_line(&mut line) {
        tracing::warn!(name, error = %e, "reading stdin failed, releasing semaphore");
    }
    Ok(())
}

fn do_post(name: &str, n: u32) -> libsem::Result<()> {
    let sem = SharedSemaphore::open_existing(name)?;
    sem.post_n(n)?;
    println!("posted {n} to '{name}'");
    Ok(())
}

fn do_wait(name: &str, timeout_ms: Option<u64>) -> libsem::Result<bool> {
    let sem = SharedSemaphore::open_existing(name)?;
    let start = Instant::now();
    let acquired = match timeout_ms {
        Some(ms) => sem.try_wait_for(Duration::from_millis(ms))?,
        None => {
            sem.wait()?;
            true
        }
    };
    let elapsed = start.elapsed();
    if acquired {
        println!("acquired '{name}' after {} ms", elapsed.as_millis());
    } else {
        println!("timeout on '{name}' after {} ms", elapsed.as_millis());
    }
    Ok(acquired)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        return usage();
    }
    let name = args[2].as_str();

    let result = match args[1].as_str() {
        "create" => match parse_arg(args.get(3), 0u32, "count") {
            Some(count) => do_create(name, count).map(|()| true),
            None => return usage(),
        },
        "post" => match parse_arg(args.get(3), 1u32, "post count") {
            Some(n) => do_post(name, n).map(|()| true),
            None => return usage(),
        },
        "wait" => match args.get(3) {
            None => do_wait(name, None),
            Some(_) => match parse_arg(args.get(3), 0u64, "timeout") {
                Some(ms) => do_wait(name, Some(ms)),
                None => return usage(),
            },
        },
        "unlink" => SemaphoreHandle::unlink(name).map(|()| true),
        other => {
            eprintln!("unknown mode: {other}");
            return usage();
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("demo_sem: {e}");
            ExitCode::from(3)
        }
    }
}
