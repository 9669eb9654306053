// tests/capture_property.rs

use std::io::Write;

use proptest::prelude::*;
use tempfile::NamedTempFile;

use pawnexec::{Command, DrainStrategy, ExecConfig, execute_with};

fn strategy() -> impl Strategy<Value = DrainStrategy> {
    prop::sample::select(vec![DrainStrategy::Threads, DrainStrategy::Poll])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn arbitrary_bytes_come_back_exactly(
        data in proptest::collection::vec(any::<u8>(), 0..200_000),
        drain in strategy(),
        to_stderr in any::<bool>(),
    ) {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&data).unwrap();
        file.flush().unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let script = if to_stderr { "cat \"$1\" >&2" } else { "cat \"$1\"" };
        let cmd = Command::new("sh").args(["-c", script, "sh", path.as_str()]);
        let config = ExecConfig::default().with_drain_strategy(drain);

        let out = execute_with(&cmd, &config).unwrap().into_output().unwrap();
        prop_assert_eq!(out.exit_code, 0);
        if to_stderr {
            prop_assert!(out.stdout.is_empty());
            prop_assert_eq!(out.stderr, data);
        } else {
            prop_assert!(out.stderr.is_empty());
            prop_assert_eq!(out.stdout, data);
        }
    }
}
