use crate::parser::errors::OpResult;
use crate::parser::network::Network;
use crate::parser::proto::transaction::Transaction;
use crate::parser::writer::{serialize, BlockchainWrite};
use bitcoin_hashes::{sha256d, Hash};
use serde::{Deserialize, Serialize};

///
/// The 88-byte block envelope: the two framing fields
/// (`magic_number`, `block_size`) followed by the 80-byte consensus header.
///
/// Hash fields are stored exactly as read from disk.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub magic_number: u32,
    /// byte length of everything following the two framing fields
    pub block_size: u32,
    pub version: u32,
    pub previous_hash: [u8; 32],
    pub merkle_hash: [u8; 32],
    /// unix epoch seconds
    pub timestamp: u32,
    pub bits: u32,
    pub nonce: u32,
}

impl BlockHeader {
    /// framing plus consensus header
    pub const SIZE: usize = 88;

    /// the part of the header that is hashed
    pub const CONSENSUS_SIZE: usize = 80;

    /// `magic_number` and `block_size`, not counted in `block_size`
    pub const FRAMING_SIZE: usize = 8;

    /// previous block hash in the usual big-endian hex rendering
    pub fn previous_hash_hex(&self) -> String {
        sha256d::Hash::from_inner(self.previous_hash).to_string()
    }

    /// merkle root in the usual big-endian hex rendering
    pub fn merkle_hash_hex(&self) -> String {
        sha256d::Hash::from_inner(self.merkle_hash).to_string()
    }

    ///
    /// Double SHA-256 of the 80-byte consensus header.
    ///
    /// Displaying the returned hash gives the familiar block id,
    /// e.g. `000000000019d668...` for the mainnet genesis block.
    /// No proof-of-work check is made.
    ///
    pub fn block_hash(&self) -> sha256d::Hash {
        sha256d::Hash::hash(&serialize(|w| w.write_consensus_header(self)))
    }

    pub fn network(&self) -> OpResult<Network> {
        Network::from_magic(self.magic_number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    /// the first transaction is the coinbase by convention
    pub transactions: Vec<Transaction>,
}

impl Block {
    ///
    /// Bytes this block occupies in the blk file,
    /// i.e. `block_size` plus the two framing fields.
    ///
    #[inline]
    pub fn total_size(&self) -> u64 {
        self.header.block_size as u64 + BlockHeader::FRAMING_SIZE as u64
    }

    pub fn coinbase(&self) -> Option<&Transaction> {
        self.transactions.first()
    }

    /// serialize back into the on-disk format, framing included
    pub fn encode(&self) -> Vec<u8> {
        serialize(|w| w.write_block(self))
    }

    ///
    /// Copy of this block whose `block_size` matches its encoded length.
    ///
    /// Useful for assembling blocks by hand.
    ///
    pub fn with_computed_size(&self) -> Block {
        let mut block = self.clone();
        let encoded = self.encode().len() - BlockHeader::FRAMING_SIZE;
        block.header.block_size = encoded as u32;
        block
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::network::Network;
    use crate::parser::reader::decode_block;
    use crate::parser::test_utils::{block_170_bytes, genesis_bytes};

    #[test]
    fn test_genesis_header_views() {
        let (block, _) = decode_block(&genesis_bytes(), 0).unwrap();
        let header = &block.header;
        assert_eq!(header.network().unwrap(), Network::Mainnet);
        assert_eq!(
            header.previous_hash_hex(),
            "0000000000000000000000000000000000000000000000000000000000000000"
        );
        assert_eq!(
            header.merkle_hash_hex(),
            "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b"
        );
        assert_eq!(
            header.block_hash().to_string(),
            "000000000019d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26f"
        );
        // 2009-01-03 18:15:05 UTC
        assert_eq!(header.timestamp, 1231006505);
        assert_eq!(header.bits, 0x1d00ffff);
        assert_eq!(header.nonce, 2083236893);
    }

    #[test]
    fn test_block_170_header_views() {
        let (block, _) = decode_block(&block_170_bytes(), 0).unwrap();
        assert_eq!(
            block.header.previous_hash_hex(),
            "000000002a22cfee1f2c846adbd12b3e183d4f97683f85dad08a79780a84bd55"
        );
        assert_eq!(
            block.header.merkle_hash_hex(),
            "7dac2c5666815c17a3b36427de37bb9d2e2c5ccec3f8633eb91a4205cb4c10ff"
        );
        assert_eq!(
            block.header.block_hash().to_string(),
            "00000000d1145790a8694403d4063f323d499e655c83426834d4ce2f8dd4a2ee"
        );
        assert_eq!(block.total_size(), 498);
        assert!(block.coinbase().unwrap().is_coinbase());
    }

    #[test]
    fn test_encode_reproduces_file_bytes() {
        let raw = block_170_bytes();
        let (block, _) = decode_block(&raw, 0).unwrap();
        assert_eq!(block.encode(), raw);
    }

    #[test]
    fn test_with_computed_size() {
        let (mut block, _) = decode_block(&genesis_bytes(), 0).unwrap();
        block.transactions.push(block.transactions[0].clone());
        let fixed = block.with_computed_size();
        assert_eq!(fixed.total_size() as usize, fixed.encode().len());
        assert_eq!(fixed.header.block_size, 285 + 204);
    }
}
