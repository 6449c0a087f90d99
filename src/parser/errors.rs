use crate::parser::network::Network;
use thiserror::Error;

///
/// Every failure that can occur while decoding blk files.
///
/// Decoding errors carry the buffer offset at which the failing
/// field started, so that corrupt files can be inspected by hand.
///
#[derive(Error, Debug)]
pub enum OpError {
    /// fewer bytes remain than a fixed-size field requires
    #[error("truncated input at offset {offset}: need {needed} bytes, {remaining} remaining")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// a varint-decoded length points past the end of the buffer
    #[error("invalid length {length} at offset {offset}: only {remaining} bytes remaining")]
    InvalidLength {
        offset: usize,
        length: u64,
        remaining: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("hex error: {0}")]
    Hex(#[from] bitcoin_hashes::hex::Error),

    #[error("unknown network magic number {0:#010x}")]
    UnknownNetwork(u32),

    /// block framed with a magic number other than the configured network's
    #[error("expected {expected} magic number, found {found:#010x}")]
    WrongNetwork { expected: Network, found: u32 },

    /// header-declared block span disagrees with the bytes actually decoded
    #[error("block size mismatch: header declares {declared} bytes, decoded {consumed}")]
    SizeMismatch { declared: u64, consumed: u64 },

    #[error("not found: {0}")]
    NotFound(String),
}

impl OpError {
    ///
    /// Whether this error was raised by the decoder
    /// rather than by the file system or hex input.
    ///
    pub fn is_decode_error(&self) -> bool {
        !matches!(
            self,
            OpError::Io(_) | OpError::Hex(_) | OpError::NotFound(_)
        )
    }
}

pub type OpResult<T> = Result<T, OpError>;
