//! Drives one engine instance through a complete track decode.
//!
//! The engine exposes two ways of getting at a track: parse the header first
//! and then decode, or decode and then query the format. Which one is used is
//! a configuration choice; callers only ever see a [`DecodedTrack`] or a
//! [`DecodeError`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::engine::{EngineError, EngineFactory};
use super::error::DecodeError;
use super::format::{DecodedTrack, FormatDescriptor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallingConvention {
    /// `read_header` → `decode`
    #[default]
    HeaderFirst,
    /// `decode` → `get_format`
    DecodeThenQuery,
}

impl fmt::Display for CallingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallingConvention::HeaderFirst => f.write_str("header-first"),
            CallingConvention::DecodeThenQuery => f.write_str("decode-then-query"),
        }
    }
}

impl FromStr for CallingConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "header-first" | "header_first" => Ok(CallingConvention::HeaderFirst),
            "decode-then-query" | "decode_then_query" => Ok(CallingConvention::DecodeThenQuery),
            other => Err(format!("Unsupported calling convention: {}", other)),
        }
    }
}

/// Engine errors raised while parsing the header are always header errors,
/// whatever the engine called them.
fn header_error(e: EngineError) -> DecodeError {
    DecodeError::Header(e.to_string())
}

fn classify(e: EngineError) -> DecodeError {
    match e {
        EngineError::Header(m) => DecodeError::Header(m),
        EngineError::Payload(m) => DecodeError::Payload(m),
        EngineError::FormatUnavailable => DecodeError::Payload(e.to_string()),
    }
}

pub struct DecoderEngineAdapter {
    factory: EngineFactory,
    convention: CallingConvention,
}

impl DecoderEngineAdapter {
    pub fn new(factory: EngineFactory, convention: CallingConvention) -> Self {
        Self {
            factory,
            convention,
        }
    }

    pub fn convention(&self) -> CallingConvention {
        self.convention
    }

    /// Decode one complete XA buffer with a fresh engine instance.
    ///
    /// Blocking; run it off the async runtime. Never returns a partial track.
    pub fn decode(&self, bytes: &[u8]) -> Result<DecodedTrack, DecodeError> {
        let mut engine = (self.factory)();

        let (format, samples) = match self.convention {
            CallingConvention::HeaderFirst => {
                let format = engine.read_header(bytes).map_err(header_error)?;
                validate_header(&format)?;
                let samples = engine.decode(bytes).map_err(classify)?;
                (format, samples)
            }
            CallingConvention::DecodeThenQuery => {
                let samples = engine.decode(bytes).map_err(classify)?;
                // A decode that succeeded must be able to describe itself
                let format = engine
                    .get_format()
                    .map_err(|e| DecodeError::Payload(format!("format query failed: {}", e)))?;
                validate_header(&format)?;
                (format, samples)
            }
        };

        validate_length(&format, samples.len())?;

        Ok(DecodedTrack { format, samples })
    }
}

fn validate_header(format: &FormatDescriptor) -> Result<(), DecodeError> {
    if format.sample_rate == 0 {
        return Err(DecodeError::Header("sample rate is zero".to_string()));
    }
    if format.channels == 0 {
        return Err(DecodeError::Header("channel count is zero".to_string()));
    }
    Ok(())
}

fn validate_length(format: &FormatDescriptor, produced: usize) -> Result<(), DecodeError> {
    if let Some(expected) = format.pcm_samples {
        if produced < expected {
            return Err(DecodeError::Payload(format!(
                "unexpected end of stream: decoded {} of {} samples",
                produced, expected
            )));
        }
    }
    Ok(())
}
