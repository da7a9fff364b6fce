//! Passive data produced by a decode.

use serde::Serialize;

/// Format metadata reported by the decoder engine for one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormatDescriptor {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Channel count
    pub channels: u16,
    /// Number of PCM samples the engine expects to produce, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pcm_samples: Option<usize>,
}

impl FormatDescriptor {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
            pcm_samples: None,
        }
    }

    pub fn with_pcm_samples(mut self, samples: usize) -> Self {
        self.pcm_samples = Some(samples);
        self
    }
}

/// Signed 16-bit PCM as returned by the engine.
pub type RawPcmSamples = Vec<i16>;

/// A fully decoded track: format plus raw samples.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTrack {
    pub format: FormatDescriptor,
    pub samples: RawPcmSamples,
}

impl DecodedTrack {
    /// First `n` samples, for previews.
    pub fn preview(&self, n: usize) -> &[i16] {
        &self.samples[..n.min(self.samples.len())]
    }

    /// Duration in seconds. Samples are interleaved across channels.
    pub fn duration_secs(&self) -> f64 {
        let rate = self.format.sample_rate as f64 * self.format.channels as f64;
        if rate == 0.0 {
            return 0.0;
        }
        self.samples.len() as f64 / rate
    }
}

/// Floating point samples in [-1.0, 1.0), ready for a playback sink.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedBuffer {
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

impl NormalizedBuffer {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
