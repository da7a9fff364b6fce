//! Decode of a single slot: engine → normalizer → outcome.

use std::any::Any;
use std::sync::Arc;

use bytes::Bytes;

use super::adapter::DecoderEngineAdapter;
use super::error::DecodeError;
use super::format::{DecodedTrack, NormalizedBuffer};
use super::normalize::normalize;
use crate::slot::SlotId;

/// A successful decode, with the playback-ready buffer derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSlot {
    pub track: DecodedTrack,
    pub buffer: Arc<NormalizedBuffer>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlotFailure {
    pub slot: SlotId,
    pub error: DecodeError,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DecodeOutcome {
    Success(DecodedSlot),
    Failure(SlotFailure),
}

impl DecodeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DecodeOutcome::Success(_))
    }

    pub fn error(&self) -> Option<&DecodeError> {
        match self {
            DecodeOutcome::Success(_) => None,
            DecodeOutcome::Failure(f) => Some(&f.error),
        }
    }

    pub fn decoded(&self) -> Option<&DecodedSlot> {
        match self {
            DecodeOutcome::Success(d) => Some(d),
            DecodeOutcome::Failure(_) => None,
        }
    }
}

pub struct TrackDecodeSession {
    slot: SlotId,
    adapter: Arc<DecoderEngineAdapter>,
}

impl TrackDecodeSession {
    pub fn new(slot: SlotId, adapter: Arc<DecoderEngineAdapter>) -> Self {
        Self { slot, adapter }
    }

    pub fn slot(&self) -> SlotId {
        self.slot
    }

    /// Run the decode on a blocking worker. Engine errors and engine panics
    /// both come back as `DecodeOutcome::Failure`.
    pub async fn run(self, bytes: Bytes) -> DecodeOutcome {
        let slot = self.slot;
        let adapter = self.adapter;
        log::debug!("[{}] decoding {} bytes ({})", slot, bytes.len(), adapter.convention());

        let joined = tokio::task::spawn_blocking(move || {
            let track = adapter.decode(&bytes)?;
            let buffer = normalize(&track.samples, track.format.sample_rate);
            Ok::<_, DecodeError>(DecodedSlot {
                track,
                buffer: Arc::new(buffer),
            })
        })
        .await;

        let result = match joined {
            Ok(result) => result,
            Err(e) if e.is_panic() => Err(DecodeError::Payload(format!(
                "decoder engine panicked: {}",
                panic_message(e.into_panic().as_ref())
            ))),
            Err(e) => Err(DecodeError::Payload(format!("decode task failed: {}", e))),
        };

        match result {
            Ok(decoded) => {
                log::info!(
                    "[{}] decoded {} samples @ {}Hz, {}ch",
                    slot,
                    decoded.track.samples.len(),
                    decoded.track.format.sample_rate,
                    decoded.track.format.channels,
                );
                DecodeOutcome::Success(decoded)
            }
            Err(error) => {
                log::warn!("[{}] {}", slot, error);
                DecodeOutcome::Failure(SlotFailure { slot, error })
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
