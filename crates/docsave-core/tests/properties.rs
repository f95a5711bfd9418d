//! Property tests for saving.

use std::fs;

use proptest::prelude::*;

use docsave_core::{DocumentSaver, ErrorReporter, LocalWriteStrategy, NoProgress, SaverConfig};
use docsave_model::TargetLocation;

fn strategy() -> impl Strategy<Value = LocalWriteStrategy> {
    prop_oneof![
        Just(LocalWriteStrategy::AtomicReplace),
        Just(LocalWriteStrategy::InPlace),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Saving the same document twice leaves exactly its bytes, however the
    /// buffer size splits them.
    #[test]
    fn save_is_idempotent(
        bytes in proptest::collection::vec(any::<u8>(), 0..4096),
        buffer_size in 1usize..512,
        local_strategy in strategy(),
    ) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.bin");
        let config = SaverConfig {
            buffer_size,
            local_strategy,
            poll_interval_ms: 1,
            ..SaverConfig::default()
        };
        let saver = DocumentSaver::new(config, ErrorReporter::headless());
        let target = TargetLocation::local(&path);

        let first = saver.save(&bytes, &target, &mut NoProgress).unwrap();
        let second = saver.save(&bytes, &target, &mut NoProgress).unwrap();

        prop_assert!(first.summary().unwrap().created);
        prop_assert!(!second.summary().unwrap().created);
        prop_assert_eq!(second.summary().unwrap().bytes_written, bytes.len() as u64);
        prop_assert_eq!(fs::read(&path).unwrap(), bytes);
    }
}
