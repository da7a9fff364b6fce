//! Renders each playback to a mono 32-bit float WAV file.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};

use super::sink::{PlaybackHandle, PlaybackSink};
use crate::decode::NormalizedBuffer;
use crate::slot::SlotId;

pub struct WavSink {
    out_dir: PathBuf,
    counter: AtomicUsize,
}

impl WavSink {
    pub fn new(out_dir: impl AsRef<Path>) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_path_buf(),
            counter: AtomicUsize::new(0),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

fn write_wav(path: &Path, buffer: &NormalizedBuffer) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: buffer.sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create '{}'", path.display()))?;
    for &sample in &buffer.samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

impl PlaybackSink for WavSink {
    fn start(&self, slot: SlotId, buffer: Arc<NormalizedBuffer>) -> Result<PlaybackHandle> {
        std::fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("Failed to create '{}'", self.out_dir.display()))?;

        // Same slot played twice gets two files
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let path = self.out_dir.join(format!("{}-{}.wav", slot, n));
        let target = path.display().to_string();

        PlaybackHandle::spawn(slot, target, move || {
            write_wav(&path, &buffer)?;
            log::info!(
                "[{}] rendered {} samples @ {}Hz to {}",
                slot,
                buffer.len(),
                buffer.sample_rate,
                path.display()
            );
            Ok(())
        })
    }

    fn name(&self) -> &str {
        "wav"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn renders_readable_wav() {
        let dir = tempfile::tempdir().unwrap();
        let sink = WavSink::new(dir.path().join("out"));
        let buffer = Arc::new(NormalizedBuffer {
            sample_rate: 8000,
            samples: vec![0.0, 0.5, -1.0, 0.25],
        });

        let handle = sink.start(SlotId::Bass, buffer).unwrap();
        let path = PathBuf::from(handle.target());
        handle.wait().await.unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 8000);
        assert_eq!(reader.spec().channels, 1);
        let samples: Vec<f32> = reader.samples::<f32>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![0.0, 0.5, -1.0, 0.25]);
    }

    #[tokio::test]
    async fn concurrent_playbacks_get_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let sink = WavSink::new(dir.path());
        let buffer = Arc::new(NormalizedBuffer {
            sample_rate: 22050,
            samples: vec![0.1; 16],
        });

        let a = sink.start(SlotId::HiHat, buffer.clone()).unwrap();
        let b = sink.start(SlotId::HiHat, buffer).unwrap();
        assert_ne!(a.target(), b.target());

        a.wait().await.unwrap();
        b.wait().await.unwrap();
    }
}
