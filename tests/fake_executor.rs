// tests/fake_executor.rs

//! Host-side code written against `dyn Executor`, exercised with the fake and
//! with the real executor.

use pawnexec::{Command, Executor, Outcome, PosixExecutor};
use pawnexec_test_utils::fake_executor::FakeExecutor;
use pawnexec_test_utils::init_tracing;

/// What a host tool might do: ask git for the current branch.
fn current_branch(executor: &dyn Executor) -> Option<String> {
    let cmd = Command::new("git").args(["rev-parse", "--abbrev-ref", "HEAD"]);
    match executor.execute(&cmd).ok()? {
        Outcome::Exited(out) if out.success() => Some(out.stdout_str().trim().to_string()),
        _ => None,
    }
}

#[test]
fn fake_records_commands_and_replays_outcomes() {
    init_tracing();

    let fake = FakeExecutor::new()
        .reply_exit(0, "main\n", "")
        .reply_exit(128, "", "fatal: not a git repository")
        .reply(Outcome::Signaled { signal: 15 });

    assert_eq!(current_branch(&fake), Some("main".to_string()));
    assert_eq!(current_branch(&fake), None);
    assert_eq!(current_branch(&fake), None);

    let executed = fake.executed();
    assert_eq!(executed.len(), 3);
    assert_eq!(executed[0].argv(), ["git", "rev-parse", "--abbrev-ref", "HEAD"]);
}

#[test]
fn fake_defaults_to_clean_exit_once_replies_run_out() {
    let fake = FakeExecutor::new();
    let outcome = fake.execute(&Command::new("anything")).unwrap();
    assert!(outcome.success());

    fake.execute_detached(&Command::new("daemon")).unwrap();
    assert_eq!(fake.detached()[0].program(), "daemon");
}

#[test]
fn real_executor_behind_the_same_trait() {
    let executor: Box<dyn Executor> = Box::new(PosixExecutor::default());
    let outcome = executor
        .execute(&Command::new("sh").args(["-c", "echo via trait"]))
        .unwrap();
    assert_eq!(outcome.into_output().unwrap().stdout_str(), "via trait\n");
}
