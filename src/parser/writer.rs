use crate::parser::proto::block::{Block, BlockHeader};
use crate::parser::proto::transaction::{Transaction, TransactionInput, TransactionOutput};
use crate::parser::varint;
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{self, Write};

///
/// Serialization into the on-disk format, the mirror of `BlockchainRead`.
///
pub trait BlockchainWrite: Write {
    #[inline]
    fn write_varint(&mut self, n: u64) -> io::Result<()> {
        self.write_all(&varint::encode(n))
    }

    #[inline]
    fn write_var_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.write_varint(bytes.len() as u64)?;
        self.write_all(bytes)
    }

    /// the 80 hashed bytes, without framing
    fn write_consensus_header(&mut self, header: &BlockHeader) -> io::Result<()> {
        self.write_u32::<LittleEndian>(header.version)?;
        self.write_all(&header.previous_hash)?;
        self.write_all(&header.merkle_hash)?;
        self.write_u32::<LittleEndian>(header.timestamp)?;
        self.write_u32::<LittleEndian>(header.bits)?;
        self.write_u32::<LittleEndian>(header.nonce)
    }

    fn write_block_header(&mut self, header: &BlockHeader) -> io::Result<()> {
        self.write_u32::<LittleEndian>(header.magic_number)?;
        self.write_u32::<LittleEndian>(header.block_size)?;
        self.write_consensus_header(header)
    }

    fn write_tx_in(&mut self, input: &TransactionInput) -> io::Result<()> {
        self.write_all(&input.previous_output_hash)?;
        self.write_u32::<LittleEndian>(input.previous_output_index)?;
        self.write_var_bytes(&input.signature_script)?;
        self.write_u32::<LittleEndian>(input.sequence_number)
    }

    fn write_tx_out(&mut self, output: &TransactionOutput) -> io::Result<()> {
        self.write_u64::<LittleEndian>(output.value)?;
        self.write_var_bytes(&output.locking_script)
    }

    fn write_transaction(&mut self, tx: &Transaction) -> io::Result<()> {
        self.write_u32::<LittleEndian>(tx.version)?;
        self.write_varint(tx.inputs.len() as u64)?;
        for input in &tx.inputs {
            self.write_tx_in(input)?;
        }
        self.write_varint(tx.outputs.len() as u64)?;
        for output in &tx.outputs {
            self.write_tx_out(output)?;
        }
        self.write_u32::<LittleEndian>(tx.lock_time)
    }

    /// `block_size` is written as stored, never recomputed
    fn write_block(&mut self, block: &Block) -> io::Result<()> {
        self.write_block_header(&block.header)?;
        self.write_varint(block.transactions.len() as u64)?;
        for tx in &block.transactions {
            self.write_transaction(tx)?;
        }
        Ok(())
    }
}

impl<W: Write + ?Sized> BlockchainWrite for W {}

///
/// Run `f` against an in-memory buffer.
///
pub(crate) fn serialize<F>(f: F) -> Vec<u8>
where
    F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
{
    let mut buf = Vec::new();
    f(&mut buf).expect("in-memory writers don't error");
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::reader::decode_transaction;

    #[test]
    fn test_write_tx_in_layout() {
        let input = TransactionInput {
            previous_output_hash: [7u8; 32],
            previous_output_index: 1,
            signature_script: vec![0xab; 3],
            sequence_number: 0xffff_fffe,
        };
        let bytes = serialize(|w| w.write_tx_in(&input));
        assert_eq!(bytes.len(), 32 + 4 + 1 + 3 + 4);
        assert_eq!(&bytes[32..36], &[1, 0, 0, 0]);
        assert_eq!(bytes[36], 3);
        assert_eq!(&bytes[40..], &[0xfe, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn test_long_script_uses_wide_varint() {
        let tx = Transaction {
            version: 2,
            inputs: vec![],
            outputs: vec![TransactionOutput {
                value: 1,
                locking_script: vec![0x51; 300],
            }],
            lock_time: 0,
        };
        let bytes = tx.encode();
        // version, input count, output count, value, then 0xfd-prefixed length
        assert_eq!(&bytes[14..17], &[0xfd, 0x2c, 0x01]);
        let (decoded, end) = decode_transaction(&bytes, 0).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(end, bytes.len());
    }
}
