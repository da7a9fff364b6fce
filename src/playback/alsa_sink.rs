//! Live playback through ALSA, one PCM connection per playback instance.

use std::sync::Arc;

use anyhow::Result;

use super::alsa_device;
use super::sink::{PlaybackHandle, PlaybackSink};
use crate::decode::NormalizedBuffer;
use crate::slot::SlotId;

/// Consecutive failed recoveries before the rest of a buffer is dropped.
const MAX_RECOVERY_RETRIES: u32 = 3;

pub struct AlsaSink {
    device: String,
    period_size: Option<usize>,
}

impl AlsaSink {
    /// `period_size` of 0 lets ALSA decide.
    pub fn new(device: &str, period_size: usize) -> Self {
        Self {
            device: device.to_string(),
            period_size: if period_size > 0 { Some(period_size) } else { None },
        }
    }
}

fn play_buffer(
    device: &str,
    period_size: Option<usize>,
    slot: SlotId,
    buffer: &NormalizedBuffer,
) -> Result<()> {
    let (pcm, params) = alsa_device::open_playback(device, buffer.sample_rate, period_size)?;
    let io = pcm.io_f32()?;

    log::info!(
        "[{}] playback started: {} samples, rate={}, period={}",
        slot,
        buffer.len(),
        params.sample_rate,
        params.period_size,
    );

    // Write with a retry loop to handle short writes and XRUN recovery
    let total_frames = buffer.samples.len();
    let mut frames_written = 0;
    let mut retry_count = 0u32;

    while frames_written < total_frames {
        match io.writei(&buffer.samples[frames_written..]) {
            Ok(n) => {
                frames_written += n;
                retry_count = 0;
            }
            Err(e) => {
                log::warn!("[{}] ALSA XRUN or error: {}, recovering...", slot, e);
                retry_count += 1;

                if let Err(e2) = pcm.prepare() {
                    anyhow::bail!("Failed to recover PCM playback: {}", e2);
                }

                if retry_count >= MAX_RECOVERY_RETRIES {
                    log::error!(
                        "[{}] Max recovery retries ({}) reached. Dropping {} unwritten frames.",
                        slot,
                        retry_count,
                        total_frames - frames_written
                    );
                    break;
                }
            }
        }
    }

    // Let the device play out what was queued before closing
    pcm.drain()?;
    log::info!("[{}] playback finished", slot);
    Ok(())
}

impl PlaybackSink for AlsaSink {
    fn start(&self, slot: SlotId, buffer: Arc<NormalizedBuffer>) -> Result<PlaybackHandle> {
        let device = self.device.clone();
        let period_size = self.period_size;
        PlaybackHandle::spawn(slot, self.device.clone(), move || {
            play_buffer(&device, period_size, slot, &buffer)
        })
    }

    fn name(&self) -> &str {
        "alsa"
    }
}
