//! End-to-end tests across store, synchronizer and gateway.

use std::collections::BTreeSet;
use std::sync::Arc;

use proptest::prelude::*;

use crate::config::limits::LimitsConfig;
use crate::gateway::QueryGateway;
use crate::store::{FileWordStore, MemoryWordStore, WordStore};
use crate::sync::IndexSynchronizer;
use crate::tests::{word_list_strategy, TestFixture};

async fn open_file_stack(fixture: &TestFixture) -> (IndexSynchronizer, QueryGateway) {
    let store: Arc<dyn WordStore> = Arc::new(FileWordStore::open(fixture.path(), false).await.unwrap());
    let sync = IndexSynchronizer::bootstrap_default(store).await.unwrap();
    let gateway = QueryGateway::new(sync.index(), LimitsConfig::default());
    (sync, gateway)
}

#[tokio::test]
async fn test_words_survive_restart() {
    let fixture = TestFixture::new().unwrap();

    {
        let (sync, _gateway) = open_file_stack(&fixture).await;
        for word in ["apple", "app", "apply", "bat", "ball", "Apple"] {
            sync.apply_write(word).await.unwrap();
        }
        assert_eq!(sync.word_count(), 5);
    }

    let (sync, gateway) = open_file_stack(&fixture).await;
    assert_eq!(sync.word_count(), 5);
    assert_eq!(
        gateway.query("ap", None).suggestions,
        vec!["app", "apple", "apply"]
    );
    assert_eq!(gateway.query("ba", None).suggestions, vec!["ball", "bat"]);
}

#[tokio::test]
async fn test_rejected_write_is_not_persisted() {
    let fixture = TestFixture::new().unwrap();

    {
        let (sync, _) = open_file_stack(&fixture).await;
        assert!(sync.apply_write("   ").await.is_err());
        assert!(sync.apply_write(&"x".repeat(65)).await.is_err());
        sync.apply_write("kept").await.unwrap();
    }

    let (sync, gateway) = open_file_stack(&fixture).await;
    assert_eq!(sync.word_count(), 1);
    assert_eq!(gateway.query("", None).suggestions, vec!["kept"]);
}

fn run<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_every_written_word_is_suggested_by_its_prefixes(words in word_list_strategy()) {
        let (sync, gateway) = run(async {
            let store = Arc::new(MemoryWordStore::new());
            let sync = IndexSynchronizer::bootstrap_default(store).await.unwrap();
            for word in &words {
                sync.apply_write(word).await.unwrap();
            }
            let gateway = QueryGateway::new(sync.index(), LimitsConfig::default());
            (sync, gateway)
        });

        let distinct: BTreeSet<&str> = words.iter().map(String::as_str).collect();
        prop_assert_eq!(sync.word_count(), distinct.len());

        for word in &distinct {
            let chars: Vec<char> = word.chars().collect();
            let prefix: String = chars[..chars.len().min(2)].iter().collect();
            let result = gateway.query(&prefix, Some(100));

            prop_assert!(result.suggestions.iter().all(|s| s.starts_with(&prefix)));
            let mut sorted = result.suggestions.clone();
            sorted.sort();
            prop_assert_eq!(&sorted, &result.suggestions);

            let expected: Vec<&str> = distinct
                .iter()
                .copied()
                .filter(|w| w.starts_with(&prefix))
                .take(100)
                .collect();
            prop_assert_eq!(result.suggestions, expected);
        }
    }
}
