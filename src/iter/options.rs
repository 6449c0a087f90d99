use crate::parser::network::Network;
use serde::{Deserialize, Serialize};

/// bytes mapped at a time unless a single block needs more
pub const DEFAULT_WINDOW_SIZE: usize = 8 * 1024 * 1024;

///
/// What the reader does when the data stops decoding.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadMode {
    /// a decode failure ends the stream like end-of-file
    Lenient,
    /// a decode failure is yielded once as an error, then the stream ends
    Strict,
}

impl Default for ReadMode {
    fn default() -> Self {
        ReadMode::Lenient
    }
}

///
/// Configuration of a `BlockReader`.
///
/// I/O failures are always surfaced, whatever the mode.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderOptions {
    pub mode: ReadMode,
    pub window_size: usize,
    /// require each block to decode to exactly `block_size + 8` bytes
    pub check_block_size: bool,
    /// reject blocks framed with another network's magic number (`WrongNetwork`)
    pub network: Option<Network>,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        ReaderOptions::lenient()
    }
}

impl ReaderOptions {
    pub fn lenient() -> Self {
        ReaderOptions {
            mode: ReadMode::Lenient,
            window_size: DEFAULT_WINDOW_SIZE,
            check_block_size: false,
            network: None,
        }
    }

    pub fn strict() -> Self {
        ReaderOptions {
            mode: ReadMode::Strict,
            window_size: DEFAULT_WINDOW_SIZE,
            check_block_size: true,
            network: None,
        }
    }

    pub fn with_mode(mut self, mode: ReadMode) -> Self {
        self.mode = mode;
        self
    }

    /// zero is bumped to one byte
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size.max(1);
        self
    }

    pub fn with_check_block_size(mut self, check: bool) -> Self {
        self.check_block_size = check;
        self
    }

    pub fn with_network(mut self, network: Network) -> Self {
        self.network = Some(network);
        self
    }

    #[inline]
    pub fn is_strict(&self) -> bool {
        self.mode == ReadMode::Strict
    }
}
