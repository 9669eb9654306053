// tests/deadlock.rs

//! Regression tests for the drain-before-wait ordering and for draining both
//! pipes concurrently. Each run is guarded by a timeout so a regression
//! fails instead of hanging the suite.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use pawnexec::{Command, DrainStrategy, ExecConfig, Outcome, execute_with};
use pawnexec_test_utils::init_tracing;
use pawnexec_test_utils::scripts::{Script, interleaved_body, interleaved_expected};

const GUARD: Duration = Duration::from_secs(60);

fn run_guarded(command: Command, config: ExecConfig) -> Outcome {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(execute_with(&command, &config));
    });
    rx.recv_timeout(GUARD)
        .expect("execution did not finish; drain is deadlocked")
        .expect("execution failed")
}

#[test]
fn interleaved_output_beyond_pipe_capacity_completes() {
    init_tracing();

    // ~136 KiB per stream, written alternately line by line.
    let (lines, width) = (2000, 60);
    let script = Script::new("interleaved.sh", &interleaved_body(lines, width)).unwrap();

    for strategy in [DrainStrategy::Threads, DrainStrategy::Poll] {
        let config = ExecConfig::default().with_drain_strategy(strategy);
        let out = run_guarded(script.command(), config)
            .into_output()
            .expect("normal exit");

        assert_eq!(out.exit_code, 0);
        assert_eq!(out.stdout, interleaved_expected("out", lines, width), "{strategy:?}");
        assert_eq!(out.stderr, interleaved_expected("err", lines, width), "{strategy:?}");
    }
}

#[test]
fn filling_stderr_before_touching_stdout_completes() {
    init_tracing();

    // A drainer that finishes stdout before reading stderr never sees
    // stdout's EOF here: the child is stuck writing stderr.
    let cmd = Command::new("sh")
        .arg("-c")
        .arg("yes e | head -c 500000 >&2; echo done");

    for strategy in [DrainStrategy::Threads, DrainStrategy::Poll] {
        let config = ExecConfig::default().with_drain_strategy(strategy);
        let out = run_guarded(cmd.clone(), config).into_output().expect("normal exit");

        assert_eq!(out.stdout, b"done\n");
        assert_eq!(out.stderr.len(), 500_000);
    }
}

#[test]
fn tiny_chunks_still_capture_everything() {
    let config = ExecConfig::default()
        .with_drain_strategy(DrainStrategy::Poll)
        .with_chunk_size(3)
        .unwrap();
    let cmd = Command::new("sh").arg("-c").arg("yes ab | head -c 100000");

    let out = run_guarded(cmd, config).into_output().expect("normal exit");
    assert_eq!(out.stdout.len(), 100_000);
    assert!(out.stdout.starts_with(b"ab\nab\n"));
}
