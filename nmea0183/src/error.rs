use thiserror::Error;

/// Reasons a framed message is not a valid NMEA 0183 sentence
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("empty sentence")]
    Empty,

    #[error("sentence is not valid ASCII text")]
    NotText,

    #[error("sentence does not start with '$' or '!'")]
    MissingStartMarker,

    #[error("invalid address field '{0}'")]
    InvalidAddress(String),

    #[error("sentence has no '*' checksum separator")]
    MissingChecksum,

    #[error("invalid checksum field '{0}'")]
    InvalidChecksum(String),

    #[error("checksum mismatch: expected {expected:02X}, computed {computed:02X}")]
    ChecksumMismatch { expected: u8, computed: u8 },

    /// Rejection reported by a custom decoder
    #[error("{0}")]
    Rejected(String),
}

/// Errors published on the listener's error channel
#[derive(Debug, Error)]
pub enum ListenError {
    /// A complete message was framed but could not be decoded
    #[error("line: {line} nmea: {source}")]
    Decode {
        line: String,
        #[source]
        source: DecodeError,
    },
}

impl ListenError {
    /// Raw text of the offending message
    pub fn line(&self) -> &str {
        match self {
            ListenError::Decode { line, .. } => line,
        }
    }
}
