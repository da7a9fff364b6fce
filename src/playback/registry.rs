use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::decode::NormalizedBuffer;
use crate::slot::SlotId;

/// Ready-to-play buffers keyed by slot.
///
/// Owned by the application session and shared by reference. Holds at most
/// one buffer per slot; the latest registration wins.
#[derive(Default)]
pub struct PlaybackBufferRegistry {
    buffers: RwLock<HashMap<SlotId, Arc<NormalizedBuffer>>>,
}

impl PlaybackBufferRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `buffer` for `slot`, replacing whatever was there.
    pub async fn register(&self, slot: SlotId, buffer: Arc<NormalizedBuffer>) {
        log::debug!("[{}] registered {} samples @ {}Hz", slot, buffer.len(), buffer.sample_rate);
        self.buffers.write().await.insert(slot, buffer);
    }

    /// Absence is normal: the slot was never decoded, or its last decode failed.
    pub async fn lookup(&self, slot: SlotId) -> Option<Arc<NormalizedBuffer>> {
        self.buffers.read().await.get(&slot).cloned()
    }

    pub async fn remove(&self, slot: SlotId) -> Option<Arc<NormalizedBuffer>> {
        self.buffers.write().await.remove(&slot)
    }

    /// Registered slots, in slot order.
    pub async fn slots(&self) -> Vec<SlotId> {
        let mut slots: Vec<SlotId> = self.buffers.read().await.keys().copied().collect();
        slots.sort();
        slots
    }

    /// Drop every buffer (shutdown).
    pub async fn clear(&self) {
        self.buffers.write().await.clear();
    }
}
