//! xa_preview - decode XA audio files and preview-play them
//!
//! The XA decompression itself is done by an external engine; this crate
//! drives it per slot, isolates failures across a batch, and keeps decoded
//! buffers ready for playback.

pub mod app;
pub mod config;
pub mod decode;
pub mod playback;
pub mod report;
pub mod slot;

pub use slot::SlotId;
