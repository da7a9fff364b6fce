//! Output sinks for decoded buffers.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::thread;

use anyhow::Result;
use tokio::sync::oneshot;

use crate::config::Config;
use crate::decode::NormalizedBuffer;
use crate::slot::SlotId;

/// A shared audio destination.
///
/// Every call to `start` gets its own connection to the destination, so
/// concurrent playbacks are independent and mix in the destination.
pub trait PlaybackSink: Send + Sync {
    /// Begin playing `buffer` and return immediately.
    fn start(&self, slot: SlotId, buffer: Arc<NormalizedBuffer>) -> Result<PlaybackHandle>;

    fn name(&self) -> &str;
}

/// A running playback instance. Dropping it detaches the playback.
pub struct PlaybackHandle {
    slot: SlotId,
    target: String,
    done: oneshot::Receiver<Result<()>>,
}

impl PlaybackHandle {
    /// Run `job` on a dedicated OS thread, reporting its result to the handle.
    pub fn spawn<F>(slot: SlotId, target: impl Into<String>, job: F) -> Result<Self>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        thread::Builder::new()
            .name(format!("play-{}", slot))
            .spawn(move || {
                let result = job();
                if let Err(e) = &result {
                    log::error!("[{}] playback error: {:#}", slot, e);
                }
                let _ = tx.send(result);
            })?;

        Ok(Self {
            slot,
            target: target.into(),
            done: rx,
        })
    }

    pub fn slot(&self) -> SlotId {
        self.slot
    }

    /// Device name or output file of this playback.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Wait for playback to run to completion.
    pub async fn wait(self) -> Result<()> {
        match self.done.await {
            Ok(result) => result,
            Err(_) => anyhow::bail!("playback thread for {} exited without reporting", self.slot),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    Wav,
    Alsa,
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkKind::Wav => f.write_str("wav"),
            SinkKind::Alsa => f.write_str("alsa"),
        }
    }
}

impl FromStr for SinkKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wav" => Ok(SinkKind::Wav),
            "alsa" => Ok(SinkKind::Alsa),
            other => Err(format!("Unsupported sink: {}", other)),
        }
    }
}

/// Factory function: create the sink named by the configuration.
pub fn create_sink(config: &Config) -> Result<Arc<dyn PlaybackSink>> {
    match config.sink {
        SinkKind::Wav => Ok(Arc::new(super::wav_sink::WavSink::new(&config.out_dir))),
        #[cfg(feature = "alsa")]
        SinkKind::Alsa => Ok(Arc::new(super::alsa_sink::AlsaSink::new(
            &config.device,
            config.period_size,
        ))),
        #[cfg(not(feature = "alsa"))]
        SinkKind::Alsa => anyhow::bail!("ALSA playback not available: rebuild with --features alsa"),
    }
}
