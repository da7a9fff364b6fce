use std::sync::Arc;

use super::registry::PlaybackBufferRegistry;
use super::sink::{PlaybackHandle, PlaybackSink};
use crate::slot::SlotId;

#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    /// Playback requested for a slot without a successful decode
    #[error("no audio buffer for {0}")]
    NoBuffer(SlotId),
    #[error("{slot}: sink error: {message}")]
    Sink { slot: SlotId, message: String },
}

/// Plays registered buffers on demand through one shared sink.
pub struct PlaybackEngine {
    registry: Arc<PlaybackBufferRegistry>,
    sink: Arc<dyn PlaybackSink>,
}

impl PlaybackEngine {
    pub fn new(registry: Arc<PlaybackBufferRegistry>, sink: Arc<dyn PlaybackSink>) -> Self {
        Self { registry, sink }
    }

    /// Start playing `slot` and return without waiting for it to finish.
    ///
    /// Playing one slot never stops another; the registry is only read.
    pub async fn play(&self, slot: SlotId) -> Result<PlaybackHandle, PlaybackError> {
        let buffer = self
            .registry
            .lookup(slot)
            .await
            .ok_or(PlaybackError::NoBuffer(slot))?;

        log::info!("[{}] play via {} ({} samples)", slot, self.sink.name(), buffer.len());

        self.sink
            .start(slot, buffer)
            .map_err(|e| PlaybackError::Sink {
                slot,
                message: format!("{:#}", e),
            })
    }
}
