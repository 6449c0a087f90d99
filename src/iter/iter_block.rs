use crate::iter::options::{ReadMode, ReaderOptions};
use crate::iter::source::{InMemory, MappedFile, Source};
use crate::parser::errors::{OpError, OpResult};
use crate::parser::proto::block::{Block, BlockHeader};
use crate::parser::reader::{decode_block, BinaryCursor};
use log::{debug, warn};
use std::fs::File;
use std::iter::FusedIterator;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    Positioned,
    Exhausted,
}

///
/// Forward-only iterator over the blocks of a blk file.
///
/// Each call to `next()` decodes one block at the current offset and
/// advances by the block's `total_size()`. The stream ends at end of
/// data, at a zero magic number (pre-allocated padding), or at the first
/// failure. How the failure is reported depends on `ReaderOptions::mode`:
/// a lenient reader ends silently on decode errors, a strict reader
/// yields the error once. I/O errors are yielded in both modes.
///
/// The reader owns its file and mapping, and releases both as soon as
/// it is exhausted or dropped.
///
/// # Example
///
/// ```rust,no_run
/// use blk_reader::BlockReader;
/// use std::path::Path;
///
/// let reader = BlockReader::open(Path::new("/Users/me/bitcoin/blocks/blk00000.dat")).unwrap();
/// for block in reader {
///     let block = block.unwrap();
///     println!("{} {}", block.header.block_hash(), block.transactions.len());
/// }
/// ```
///
pub struct BlockReader {
    source: Box<dyn Source + Send>,
    offset: u64,
    options: ReaderOptions,
    state: ReaderState,
}

impl BlockReader {
    /// open with lenient defaults
    pub fn open(path: &Path) -> OpResult<BlockReader> {
        BlockReader::with_options(path, ReaderOptions::default())
    }

    pub fn with_options(path: &Path, options: ReaderOptions) -> OpResult<BlockReader> {
        let file = File::open(path)?;
        let source = MappedFile::new(file, options.window_size)?;
        debug!("opened {} ({} bytes)", path.display(), source.len());
        Ok(BlockReader::from_source(Box::new(source), options))
    }

    /// stream blocks out of a buffer already in memory
    pub fn from_bytes(data: Vec<u8>, options: ReaderOptions) -> BlockReader {
        BlockReader::from_source(Box::new(InMemory::new(data)), options)
    }

    fn from_source(source: Box<dyn Source + Send>, options: ReaderOptions) -> BlockReader {
        BlockReader {
            source,
            offset: 0,
            options,
            state: ReaderState::Positioned,
        }
    }

    /// offset of the next block to decode
    #[inline]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.state == ReaderState::Exhausted
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    fn exhaust(&mut self) {
        self.state = ReaderState::Exhausted;
        self.source.release();
    }

    /// `Ok(None)` on a clean end of data
    fn decode_next(&mut self) -> OpResult<Option<Block>> {
        if self.offset >= self.source.len() {
            return Ok(None);
        }

        let framing = self
            .source
            .window(self.offset, BlockHeader::FRAMING_SIZE)?;
        let mut cursor = BinaryCursor::new(framing);
        let magic = cursor.read_u32()?;
        if magic == 0 {
            debug!("zero padding at offset {}", self.offset);
            return Ok(None);
        }
        let block_size = cursor.read_u32()?;
        if let Some(network) = self.options.network {
            if magic != network.magic() {
                return Err(OpError::WrongNetwork {
                    expected: network,
                    found: magic,
                });
            }
        }

        let total_size = block_size as u64 + BlockHeader::FRAMING_SIZE as u64;
        let window = self.source.window(self.offset, total_size as usize)?;
        // decode within the declared span only, whatever the window holds beyond it
        let span = &window[..window.len().min(total_size as usize)];
        let (block, consumed) = decode_block(span, 0)?;
        if self.options.check_block_size && consumed as u64 != total_size {
            return Err(OpError::SizeMismatch {
                declared: total_size,
                consumed: consumed as u64,
            });
        }
        self.offset += block.total_size();
        Ok(Some(block))
    }
}

impl Iterator for BlockReader {
    type Item = OpResult<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_exhausted() {
            return None;
        }
        match self.decode_next() {
            Ok(Some(block)) => Some(Ok(block)),
            Ok(None) => {
                debug!("end of blocks at offset {}", self.offset);
                self.exhaust();
                None
            }
            Err(e) => {
                self.exhaust();
                if e.is_decode_error() && self.options.mode == ReadMode::Lenient {
                    warn!("stopped at offset {}: {}", self.offset, e);
                    None
                } else {
                    Some(Err(e))
                }
            }
        }
    }
}

impl FusedIterator for BlockReader {}
