use crate::parser::errors::{OpError, OpResult};
use crate::parser::proto::block::{Block, BlockHeader};
use crate::parser::proto::transaction::{Transaction, TransactionInput, TransactionOutput};
use crate::parser::varint;
use byteorder::{ByteOrder, LittleEndian};

// smallest possible encodings, used to bound pre-allocation
const MIN_TX_IN_SIZE: usize = 32 + 4 + 1 + 4;
const MIN_TX_OUT_SIZE: usize = 8 + 1;
const MIN_TX_SIZE: usize = 4 + 1 + 1 + 4;

///
/// Bounds-checked sequential reader over a byte buffer.
///
/// Every read advances the offset by the bytes consumed,
/// or fails without moving it.
///
#[derive(Debug, Clone)]
pub struct BinaryCursor<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> BinaryCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        BinaryCursor::at(buf, 0)
    }

    pub fn at(buf: &'a [u8], offset: usize) -> Self {
        BinaryCursor { buf, offset }
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.offset)
    }

    #[inline]
    fn take(&mut self, n: usize) -> OpResult<&'a [u8]> {
        let remaining = self.remaining();
        if remaining < n {
            return Err(OpError::TruncatedInput {
                offset: self.offset,
                needed: n,
                remaining,
            });
        }
        let slice = &self.buf[self.offset..self.offset + n];
        self.offset += n;
        Ok(slice)
    }

    #[inline]
    pub fn read_u8(&mut self) -> OpResult<u8> {
        Ok(self.take(1)?[0])
    }

    #[inline]
    pub fn read_u16(&mut self) -> OpResult<u16> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    #[inline]
    pub fn read_u32(&mut self) -> OpResult<u32> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    #[inline]
    pub fn read_u64(&mut self) -> OpResult<u64> {
        Ok(LittleEndian::read_u64(self.take(8)?))
    }

    #[inline]
    pub fn read_i64(&mut self) -> OpResult<i64> {
        Ok(LittleEndian::read_i64(self.take(8)?))
    }

    /// 32 raw bytes, no byte order conversion
    #[inline]
    pub fn read_hash(&mut self) -> OpResult<[u8; 32]> {
        let mut arr = [0u8; 32];
        arr.copy_from_slice(self.take(32)?);
        Ok(arr)
    }

    /// borrowed view of the next `len` bytes
    #[inline]
    pub fn read_bytes(&mut self, len: usize) -> OpResult<&'a [u8]> {
        self.take(len)
    }

    #[inline]
    pub fn read_varint(&mut self) -> OpResult<u64> {
        let (value, offset) = varint::decode(self.buf, self.offset)?;
        self.offset = offset;
        Ok(value)
    }

    ///
    /// A varint length followed by that many bytes.
    ///
    /// A length running past the end of the buffer is reported as
    /// `InvalidLength` rather than `TruncatedInput`.
    ///
    pub fn read_var_bytes(&mut self) -> OpResult<Vec<u8>> {
        let start = self.offset;
        let length = self.read_varint()?;
        let remaining = self.remaining();
        if length > remaining as u64 {
            self.offset = start;
            return Err(OpError::InvalidLength {
                offset: start,
                length,
                remaining,
            });
        }
        Ok(self.take(length as usize)?.to_vec())
    }
}

///
/// Structured decoders built on top of primitive little-endian reads.
///
pub trait BlockchainRead {
    fn read_u32(&mut self) -> OpResult<u32>;

    fn read_u64(&mut self) -> OpResult<u64>;

    fn read_hash(&mut self) -> OpResult<[u8; 32]>;

    fn read_varint(&mut self) -> OpResult<u64>;

    fn read_var_bytes(&mut self) -> OpResult<Vec<u8>>;

    fn remaining(&self) -> usize;

    /// framing and consensus header, 88 bytes
    fn read_block_header(&mut self) -> OpResult<BlockHeader> {
        Ok(BlockHeader {
            magic_number: self.read_u32()?,
            block_size: self.read_u32()?,
            version: self.read_u32()?,
            previous_hash: self.read_hash()?,
            merkle_hash: self.read_hash()?,
            timestamp: self.read_u32()?,
            bits: self.read_u32()?,
            nonce: self.read_u32()?,
        })
    }

    /// coinbase inputs share this layout
    fn read_tx_in(&mut self) -> OpResult<TransactionInput> {
        Ok(TransactionInput {
            previous_output_hash: self.read_hash()?,
            previous_output_index: self.read_u32()?,
            signature_script: self.read_var_bytes()?,
            sequence_number: self.read_u32()?,
        })
    }

    fn read_tx_out(&mut self) -> OpResult<TransactionOutput> {
        Ok(TransactionOutput {
            value: self.read_u64()?,
            locking_script: self.read_var_bytes()?,
        })
    }

    fn read_transaction(&mut self) -> OpResult<Transaction> {
        let version = self.read_u32()?;

        let input_count = self.read_varint()?;
        let mut inputs = Vec::with_capacity(capacity(input_count, self.remaining(), MIN_TX_IN_SIZE));
        for _ in 0..input_count {
            inputs.push(self.read_tx_in()?);
        }

        let output_count = self.read_varint()?;
        let mut outputs =
            Vec::with_capacity(capacity(output_count, self.remaining(), MIN_TX_OUT_SIZE));
        for _ in 0..output_count {
            outputs.push(self.read_tx_out()?);
        }

        Ok(Transaction {
            version,
            inputs,
            outputs,
            lock_time: self.read_u32()?,
        })
    }

    fn read_block(&mut self) -> OpResult<Block> {
        let header = self.read_block_header()?;
        let tx_count = self.read_varint()?;
        let mut transactions = Vec::with_capacity(capacity(tx_count, self.remaining(), MIN_TX_SIZE));
        for _ in 0..tx_count {
            transactions.push(self.read_transaction()?);
        }
        Ok(Block {
            header,
            transactions,
        })
    }
}

impl BlockchainRead for BinaryCursor<'_> {
    #[inline]
    fn read_u32(&mut self) -> OpResult<u32> {
        BinaryCursor::read_u32(self)
    }

    #[inline]
    fn read_u64(&mut self) -> OpResult<u64> {
        BinaryCursor::read_u64(self)
    }

    #[inline]
    fn read_hash(&mut self) -> OpResult<[u8; 32]> {
        BinaryCursor::read_hash(self)
    }

    #[inline]
    fn read_varint(&mut self) -> OpResult<u64> {
        BinaryCursor::read_varint(self)
    }

    #[inline]
    fn read_var_bytes(&mut self) -> OpResult<Vec<u8>> {
        BinaryCursor::read_var_bytes(self)
    }

    #[inline]
    fn remaining(&self) -> usize {
        BinaryCursor::remaining(self)
    }
}

/// a corrupt count must not trigger a huge allocation
#[inline]
fn capacity(count: u64, remaining: usize, min_size: usize) -> usize {
    count.min((remaining / min_size) as u64) as usize
}

///
/// Decode one block starting at `offset`, returning it together with
/// the offset right after the last decoded transaction.
///
pub fn decode_block(buf: &[u8], offset: usize) -> OpResult<(Block, usize)> {
    let mut cursor = BinaryCursor::at(buf, offset);
    let block = cursor.read_block()?;
    Ok((block, cursor.offset()))
}

pub fn decode_block_header(buf: &[u8], offset: usize) -> OpResult<(BlockHeader, usize)> {
    let mut cursor = BinaryCursor::at(buf, offset);
    let header = cursor.read_block_header()?;
    Ok((header, cursor.offset()))
}

pub fn decode_transaction(buf: &[u8], offset: usize) -> OpResult<(Transaction, usize)> {
    let mut cursor = BinaryCursor::at(buf, offset);
    let tx = cursor.read_transaction()?;
    Ok((tx, cursor.offset()))
}
