//! Runs one decode session per supplied slot and publishes the results.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;

use super::adapter::DecoderEngineAdapter;
use super::error::DecodeError;
use super::session::{DecodeOutcome, SlotFailure, TrackDecodeSession};
use crate::playback::PlaybackBufferRegistry;
use crate::slot::SlotId;

/// Where a slot's raw bytes come from.
#[async_trait]
pub trait ByteSource: Send + Sync {
    async fn load(&self) -> anyhow::Result<Bytes>;
}

/// Bytes that are already in memory.
#[async_trait]
impl ByteSource for Bytes {
    async fn load(&self) -> anyhow::Result<Bytes> {
        Ok(self.clone())
    }
}

/// A file on the local file system.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ByteSource for FileSource {
    async fn load(&self) -> anyhow::Result<Bytes> {
        let data = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read '{}'", self.path.display()))?;
        Ok(Bytes::from(data))
    }
}

/// One batch entry. `None` means nothing was selected for the slot.
pub type SlotInput = (SlotId, Option<Box<dyn ByteSource>>);

/// Per-slot outcomes, covering exactly the slots that had input.
pub type BatchResult = BTreeMap<SlotId, DecodeOutcome>;

pub struct BatchDecodeCoordinator {
    adapter: Arc<DecoderEngineAdapter>,
    registry: Arc<PlaybackBufferRegistry>,
    parallel: bool,
}

impl BatchDecodeCoordinator {
    pub fn new(adapter: Arc<DecoderEngineAdapter>, registry: Arc<PlaybackBufferRegistry>) -> Self {
        Self {
            adapter,
            registry,
            parallel: true,
        }
    }

    /// Decode slots one after another instead of concurrently.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Convenience for in-memory buffers.
    pub async fn run_bytes<I>(&self, inputs: I) -> BatchResult
    where
        I: IntoIterator<Item = (SlotId, Option<Bytes>)>,
    {
        let inputs = inputs.into_iter().map(|(slot, bytes)| {
            (slot, bytes.map(|b| Box::new(b) as Box<dyn ByteSource>))
        });
        self.run(inputs).await
    }

    /// Decode every slot that has a source, then update the registry.
    ///
    /// Slots without a source are skipped and do not appear in the result.
    /// If a slot is listed twice the last source wins.
    pub async fn run<I>(&self, inputs: I) -> BatchResult
    where
        I: IntoIterator<Item = SlotInput>,
    {
        let supplied: BTreeMap<SlotId, Box<dyn ByteSource>> = inputs
            .into_iter()
            .filter_map(|(slot, source)| source.map(|s| (slot, s)))
            .collect();

        log::info!(
            "Decode batch: {} slot(s), {}",
            supplied.len(),
            if self.parallel { "parallel" } else { "sequential" }
        );

        let results = if self.parallel {
            self.run_parallel(supplied).await
        } else {
            let mut results = BatchResult::new();
            for (slot, source) in supplied {
                let outcome = decode_slot(slot, source, self.adapter.clone()).await;
                results.insert(slot, outcome);
            }
            results
        };

        self.publish(&results).await;
        results
    }

    async fn run_parallel(&self, supplied: BTreeMap<SlotId, Box<dyn ByteSource>>) -> BatchResult {
        let handles: Vec<_> = supplied
            .into_iter()
            .map(|(slot, source)| {
                let adapter = self.adapter.clone();
                (slot, tokio::spawn(decode_slot(slot, source, adapter)))
            })
            .collect();

        let mut results = BatchResult::new();
        for (slot, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    // Only a panicking byte source can get here
                    log::error!("[{}] decode task failed: {}", slot, e);
                    DecodeOutcome::Failure(SlotFailure {
                        slot,
                        error: DecodeError::Source(format!("task failed: {}", e)),
                    })
                }
            };
            results.insert(slot, outcome);
        }
        results
    }

    /// Successes replace the slot's buffer; failures clear it, so the
    /// registry never holds audio from an older submission.
    async fn publish(&self, results: &BatchResult) {
        for (slot, outcome) in results {
            match outcome {
                DecodeOutcome::Success(decoded) => {
                    self.registry.register(*slot, decoded.buffer.clone()).await;
                }
                DecodeOutcome::Failure(_) => {
                    if self.registry.remove(*slot).await.is_some() {
                        log::info!("[{}] previous buffer dropped after failed decode", slot);
                    }
                }
            }
        }
    }
}

async fn decode_slot(
    slot: SlotId,
    source: Box<dyn ByteSource>,
    adapter: Arc<DecoderEngineAdapter>,
) -> DecodeOutcome {
    let bytes = match source.load().await {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("[{}] {:#}", slot, e);
            return DecodeOutcome::Failure(SlotFailure {
                slot,
                error: DecodeError::Source(format!("{:#}", e)),
            });
        }
    };
    TrackDecodeSession::new(slot, adapter).run(bytes).await
}
