//! decode - XA decode orchestration
//!
//! The decoder engine itself is an external component reached through the
//! [`XaEngine`] trait. This module drives it per slot, turns its PCM into
//! playback-ready floats and keeps one bad file from spoiling a batch.

mod adapter;
mod batch;
mod engine;
mod error;
mod format;
mod normalize;
mod session;
#[cfg(feature = "xadec")]
mod xadec;

pub use adapter::{CallingConvention, DecoderEngineAdapter};
pub use batch::{BatchDecodeCoordinator, BatchResult, ByteSource, FileSource, SlotInput};
pub use engine::{default_factory, factory, EngineError, EngineFactory, XaEngine};
pub use error::{DecodeError, DecodeErrorKind};
pub use format::{DecodedTrack, FormatDescriptor, NormalizedBuffer, RawPcmSamples};
pub use normalize::{normalize, normalize_sample};
pub use session::{DecodeOutcome, DecodedSlot, SlotFailure, TrackDecodeSession};
#[cfg(feature = "xadec")]
pub use xadec::XadecEngine;
