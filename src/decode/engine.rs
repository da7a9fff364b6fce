//! Contract of the external XA decoder engine.

use std::sync::Arc;

use super::format::{FormatDescriptor, RawPcmSamples};

/// Failure reported by the engine itself, before the adapter classifies it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Header parse failure: short buffer, bad magic, unsupported encoding
    #[error("{0}")]
    Header(String),
    /// Corrupt compressed payload or unexpected end of stream
    #[error("{0}")]
    Payload(String),
    /// `get_format` called without a prior successful `decode`
    #[error("format not available before a successful decode")]
    FormatUnavailable,
}

/// A decoder engine instance.
///
/// Engines are stateful: `get_format` reports the format of the last
/// successful `decode` on the same instance. A fresh instance is created for
/// every track.
pub trait XaEngine: Send {
    /// Parse and validate the header of a complete XA buffer.
    fn read_header(&mut self, bytes: &[u8]) -> Result<FormatDescriptor, EngineError>;

    /// Decode a complete XA buffer (header included) into PCM.
    fn decode(&mut self, bytes: &[u8]) -> Result<RawPcmSamples, EngineError>;

    /// Format of the most recent successful `decode`.
    fn get_format(&self) -> Result<FormatDescriptor, EngineError>;
}

/// Creates engine instances on demand. Shared across concurrent sessions.
pub type EngineFactory = Arc<dyn Fn() -> Box<dyn XaEngine> + Send + Sync>;

/// Wrap a constructor closure into an [`EngineFactory`].
pub fn factory<E, F>(make: F) -> EngineFactory
where
    E: XaEngine + 'static,
    F: Fn() -> E + Send + Sync + 'static,
{
    Arc::new(move || Box::new(make()) as Box<dyn XaEngine>)
}

/// The engine compiled into this binary, if any.
pub fn default_factory() -> Option<EngineFactory> {
    #[cfg(feature = "xadec")]
    {
        Some(factory(super::xadec::XadecEngine::new))
    }
    #[cfg(not(feature = "xadec"))]
    {
        None
    }
}
