//! Test doubles: a fake XA engine and a recording sink.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::Result;
use bytes::{BufMut, Bytes, BytesMut};

use xa_preview::decode::{
    factory, CallingConvention, DecoderEngineAdapter, EngineError, EngineFactory,
    FormatDescriptor, NormalizedBuffer, RawPcmSamples, XaEngine,
};
use xa_preview::playback::{PlaybackHandle, PlaybackSink};
use xa_preview::SlotId;

pub const MAGIC: u32 = 0x3144_574b;
pub const HEADER_LEN: usize = 16;

/// Build a buffer the fake engine accepts: a 16-byte header followed by the
/// samples stored as little-endian i16.
pub fn xa_bytes(sample_rate: u16, channels: u8, samples: &[i16]) -> Bytes {
    let mut buf = BytesMut::with_capacity(HEADER_LEN + samples.len() * 2);
    buf.put_u32_le(MAGIC);
    buf.put_u16_le(sample_rate);
    buf.put_u8(channels);
    buf.put_u8(4);
    buf.put_u32_le(samples.len() as u32);
    buf.put_u32_le(0);
    for s in samples {
        buf.put_i16_le(*s);
    }
    buf.freeze()
}

/// A short drum hit: decaying ramp across the full i16 range.
pub fn drum_hit(len: usize) -> Vec<i16> {
    (0..len)
        .map(|i| {
            let t = i as f32 / len as f32;
            let v = (1.0 - t) * if i % 2 == 0 { 32767.0 } else { -32768.0 };
            v as i16
        })
        .collect()
}

/// Stands in for the native engine. Understands only the layout written by
/// [`xa_bytes`].
#[derive(Default)]
pub struct FakeEngine {
    format: Option<FormatDescriptor>,
}

impl FakeEngine {
    fn parse_header(bytes: &[u8]) -> Result<FormatDescriptor, EngineError> {
        if bytes.len() < HEADER_LEN {
            return Err(EngineError::Header(format!(
                "buffer too short for XA header: {} bytes",
                bytes.len()
            )));
        }
        let magic = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if magic != MAGIC {
            return Err(EngineError::Header(format!("Invalid XA header magic: {:X}", magic)));
        }
        let rate = u16::from_le_bytes([bytes[4], bytes[5]]) as u32;
        let channels = bytes[6] as u16;
        if channels != 1 && channels != 2 {
            return Err(EngineError::Header(format!(
                "Invalid number of channels: {}",
                channels
            )));
        }
        let samples = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize;
        Ok(FormatDescriptor::new(rate, channels).with_pcm_samples(samples))
    }
}

impl XaEngine for FakeEngine {
    fn read_header(&mut self, bytes: &[u8]) -> Result<FormatDescriptor, EngineError> {
        Self::parse_header(bytes)
    }

    fn decode(&mut self, bytes: &[u8]) -> Result<RawPcmSamples, EngineError> {
        let format = Self::parse_header(bytes)?;
        let expected = format.pcm_samples.unwrap_or(0);
        let payload = &bytes[HEADER_LEN..];
        if payload.len() < expected * 2 {
            return Err(EngineError::Payload(format!(
                "unexpected end of stream: {} of {} payload bytes",
                payload.len(),
                expected * 2
            )));
        }
        let pcm = payload[..expected * 2]
            .chunks_exact(2)
            .map(|c| i16::from_le_bytes([c[0], c[1]]))
            .collect();
        self.format = Some(format);
        Ok(pcm)
    }

    fn get_format(&self) -> Result<FormatDescriptor, EngineError> {
        self.format.ok_or(EngineError::FormatUnavailable)
    }
}

/// Panics on any decode, like a native engine hitting an internal assert.
pub struct PanickingEngine;

impl XaEngine for PanickingEngine {
    fn read_header(&mut self, bytes: &[u8]) -> Result<FormatDescriptor, EngineError> {
        FakeEngine::parse_header(bytes)
    }

    fn decode(&mut self, _bytes: &[u8]) -> Result<RawPcmSamples, EngineError> {
        panic!("Invalid factor: 7");
    }

    fn get_format(&self) -> Result<FormatDescriptor, EngineError> {
        Err(EngineError::FormatUnavailable)
    }
}

pub fn fake_factory() -> EngineFactory {
    factory(FakeEngine::default)
}

pub fn adapter(convention: CallingConvention) -> Arc<DecoderEngineAdapter> {
    Arc::new(DecoderEngineAdapter::new(fake_factory(), convention))
}

/// Records every playback instead of making sound.
#[derive(Default)]
pub struct RecordingSink {
    pub played: Mutex<Vec<(SlotId, Arc<NormalizedBuffer>)>>,
    pub fail: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            played: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn played_slots(&self) -> Vec<SlotId> {
        self.played.lock().unwrap().iter().map(|(s, _)| *s).collect()
    }
}

impl PlaybackSink for RecordingSink {
    fn start(&self, slot: SlotId, buffer: Arc<NormalizedBuffer>) -> Result<PlaybackHandle> {
        if self.fail {
            anyhow::bail!("device busy");
        }
        self.played.lock().unwrap().push((slot, buffer));
        PlaybackHandle::spawn(slot, "recording", || Ok(()))
    }

    fn name(&self) -> &str {
        "recording"
    }
}
