//! playback - Buffer registry and output sinks
//!
//! Decoded slots live in the [`PlaybackBufferRegistry`] until a newer decode
//! replaces them. [`PlaybackEngine`] plays them through a [`PlaybackSink`]:
//! ALSA for live output, or WAV files when no sound device is wanted.

#[cfg(feature = "alsa")]
mod alsa_device;
#[cfg(feature = "alsa")]
mod alsa_sink;
mod engine;
mod registry;
mod sink;
mod wav_sink;

#[cfg(feature = "alsa")]
pub use alsa_sink::AlsaSink;
pub use engine::{PlaybackEngine, PlaybackError};
pub use registry::PlaybackBufferRegistry;
pub use sink::{create_sink, PlaybackHandle, PlaybackSink, SinkKind};
pub use wav_sink::WavSink;
