//!
//! ## Decoded Block Types
//!
//! Plain owned values produced by the decoder.
//! - `Block`: a `BlockHeader` plus its transactions.
//! - `Transaction`: inputs, outputs, version and lock time.
//! - `TransactionInput` / `TransactionOutput`.
//!
//! Variable-length fields (scripts) are copied out of the source
//! buffer, so decoded values stay valid after the reader moves on.
//! Hashes are kept in the internal byte order found on disk;
//! the `*_hex` methods give the usual reversed rendering.
//!

/// block and block header
pub mod block;

/// transaction, inputs and outputs
pub mod transaction;

pub use block::{Block, BlockHeader};
pub use transaction::{LockTime, Transaction, TransactionInput, TransactionOutput};
