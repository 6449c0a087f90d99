//!
//! Crates APIs, essential structs, functions, methods are all here!
//!
//! Blocks are streamed from a single file with `BlockReader`, or from a
//! whole `blocks` directory with `BlkFile`.
//!
//! # Example
//!
//! ```rust,no_run
//! use blk_reader::{BlkFile, ReaderOptions};
//! use std::path::Path;
//!
//! let blocks = BlkFile::new(Path::new("/Users/me/bitcoin/blocks")).unwrap();
//!
//! let mut n_tx = 0;
//! for block in blocks.iter_blocks(ReaderOptions::strict()) {
//!     n_tx += block.unwrap().transactions.len();
//! }
//! ```
//!

use bitcoin_hashes::hex::FromHex;
use std::path::Path;

// re-exports
pub use crate::iter::{BlockReader, ReadMode, ReaderOptions};
pub use crate::parser::blk_file::BlkFile;
pub use crate::parser::errors::{OpError, OpResult};
pub use crate::parser::network::Network;
pub use crate::parser::proto::{
    Block, BlockHeader, LockTime, Transaction, TransactionInput, TransactionOutput,
};
pub use crate::parser::reader::{
    decode_block, decode_block_header, decode_transaction, BinaryCursor, BlockchainRead,
};
pub use crate::parser::writer::BlockchainWrite;
pub use bitcoin_hashes::sha256d;

///
/// Decode a single block given as hex, framing included.
///
#[inline]
pub fn parse_block_hex(block_hex: &str) -> OpResult<Block> {
    let raw = Vec::<u8>::from_hex(block_hex.trim())?;
    let (block, _) = decode_block(&raw, 0)?;
    Ok(block)
}

///
/// Decode a single transaction given as hex.
///
#[inline]
pub fn parse_transaction_hex(tx_hex: &str) -> OpResult<Transaction> {
    let raw = Vec::<u8>::from_hex(tx_hex.trim())?;
    let (tx, _) = decode_transaction(&raw, 0)?;
    Ok(tx)
}

///
/// Read every block of a blk file, failing on the first error.
///
/// Holds all blocks in memory, prefer `BlockReader` for large files.
///
pub fn read_blocks(path: &Path) -> OpResult<Vec<Block>> {
    BlockReader::with_options(path, ReaderOptions::strict())?.collect()
}
