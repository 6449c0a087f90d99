//!
//! # Introduction
//!
//! This library decodes the raw block files (`blkNNNNN.dat`) written
//! by Bitcoin Core.
//!
//! Files are read through a memory-mapped window that slides forward
//! block by block, so arbitrarily large files are streamed without
//! being loaded into memory.
//!
//! Decoding is purely structural: nothing is validated beyond the
//! byte stream being long enough and well formed.
//!
//! # Example
//!
//! ```rust,no_run
//! use blk_reader::{BlockReader, ReaderOptions};
//! use std::path::Path;
//!
//! let path = Path::new("/Users/me/bitcoin/blocks/blk00000.dat");
//!
//! // stop quietly at a truncated tail
//! let reader = BlockReader::open(path).unwrap();
//!
//! // or report it
//! let reader = BlockReader::with_options(path, ReaderOptions::strict()).unwrap();
//! ```
//!

pub(crate) mod api;
pub mod iter;
pub mod parser;

#[doc(inline)]
pub use crate::api::*;
