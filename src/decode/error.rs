use serde::Serialize;

/// Why a slot failed to decode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Malformed or unsupported format metadata
    #[error("header error: {0}")]
    Header(String),
    /// Corrupt compressed payload or unexpected end of stream
    #[error("decode error: {0}")]
    Payload(String),
    /// The slot's bytes could not be acquired
    #[error("source error: {0}")]
    Source(String),
}

/// Error kind without the message, for reports and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeErrorKind {
    Header,
    Decode,
    Source,
}

impl DecodeError {
    pub fn kind(&self) -> DecodeErrorKind {
        match self {
            DecodeError::Header(_) => DecodeErrorKind::Header,
            DecodeError::Payload(_) => DecodeErrorKind::Decode,
            DecodeError::Source(_) => DecodeErrorKind::Source,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            DecodeError::Header(m) | DecodeError::Payload(m) | DecodeError::Source(m) => m,
        }
    }
}
