//! Scenario (spec §8.6): dropping a vault mid-batch-embed without calling
//! `flush` leaves every memory row intact on reopen, and every row's
//! embedding state is internally consistent — complete or cleanly absent,
//! never a half-written vector.

use std::sync::Arc;

use engram_core::config::VaultConfig;
use engram::{RememberOptions, Vault};
use engram_test_support::FakeEmbedder;

const EMBED_DIMENSIONS: usize = 16;

#[tokio::test]
async fn reopening_after_an_unflushed_drop_loses_no_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vault.db");

    {
        let mut config = VaultConfig::default();
        config.db_path = path.to_string_lossy().to_string();
        let vault = Vault::open(config, Some(Arc::new(FakeEmbedder::new(EMBED_DIMENSIONS))), None)
            .await
            .unwrap();

        for i in 0..100 {
            vault
                .remember(format!("memory number {i} about a routine status update"), RememberOptions::new())
                .await
                .unwrap();
        }
        // Dropped here without `flush` — some embeddings may still be
        // in-flight on the background worker.
    }

    let mut config = VaultConfig::default();
    config.db_path = path.to_string_lossy().to_string();
    let vault = Vault::open(config, None, None).await.unwrap();

    let export = vault.export().unwrap();
    assert_eq!(export.memories.len(), 100);
    for memory in &export.memories {
        match &memory.embedding {
            Some(vector) => {
                assert!(!memory.embedding_failed);
                assert_eq!(vector.len(), EMBED_DIMENSIONS);
            }
            None => {
                // Either never processed, or processed and failed — both
                // are valid post-crash states; an absent embedding must
                // never silently claim success.
            }
        }
    }
}
