//!
//! This module defines how to parse binary data on disk to Block structs defined in proto.
//!

/// locate blk.dat files of a blocks directory
pub mod blk_file;

/// error handling
pub mod errors;

/// the magic numbers framing each block
pub mod network;

/// various formats of blockchain data representation
pub mod proto;

/// bounds-checked binary cursor and structured decoders
pub mod reader;

/// compact size integers
pub mod varint;

/// serialize decoded blocks back to bytes
pub mod writer;

#[cfg(test)]
pub(crate) mod test_utils;
