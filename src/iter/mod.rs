//!
//! This module defines the infrastructure for streaming blocks out of blk files
//!

mod iter_block;
mod options;
mod source;

pub use iter_block::BlockReader;
pub use options::{ReadMode, ReaderOptions, DEFAULT_WINDOW_SIZE};
