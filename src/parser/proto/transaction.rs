use crate::parser::writer::{serialize, BlockchainWrite};
use bitcoin_hashes::{sha256d, Hash};
use serde::{Deserialize, Serialize};

/// lock times below this are block heights, at or above are unix timestamps
pub const LOCK_TIME_THRESHOLD: u32 = 500_000_000;

/// previous output index of an input that spends nothing
pub const NULL_OUTPUT_INDEX: u32 = 0xffff_ffff;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub previous_output_hash: [u8; 32],
    pub previous_output_index: u32,
    /// unlocking script, opaque to the decoder
    pub signature_script: Vec<u8>,
    pub sequence_number: u32,
}

impl TransactionInput {
    ///
    /// A coinbase input has no real outpoint: all-zero hash and
    /// index `0xffffffff`. Its wire layout is that of any other input.
    ///
    pub fn is_coinbase(&self) -> bool {
        self.previous_output_index == NULL_OUTPUT_INDEX
            && self.previous_output_hash.iter().all(|b| *b == 0)
    }

    /// referenced txid in the usual big-endian hex rendering
    pub fn previous_hash_hex(&self) -> String {
        sha256d::Hash::from_inner(self.previous_output_hash).to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    /// amount in the smallest currency unit
    pub value: u64,
    /// locking script, opaque to the decoder
    pub locking_script: Vec<u8>,
}

///
/// Interpretation of a raw `lock_time` field.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockTime {
    BlockHeight(u32),
    /// unix epoch seconds
    Timestamp(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: u32,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub lock_time: u32,
}

impl Transaction {
    /// double SHA-256 of the serialized transaction
    pub fn txid(&self) -> sha256d::Hash {
        sha256d::Hash::hash(&self.encode())
    }

    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].is_coinbase()
    }

    pub fn lock_time_kind(&self) -> LockTime {
        if self.lock_time < LOCK_TIME_THRESHOLD {
            LockTime::BlockHeight(self.lock_time)
        } else {
            LockTime::Timestamp(self.lock_time)
        }
    }

    /// sum of output values, `None` on overflow
    pub fn total_output_value(&self) -> Option<u64> {
        self.outputs
            .iter()
            .try_fold(0u64, |acc, out| acc.checked_add(out.value))
    }

    pub fn encode(&self) -> Vec<u8> {
        serialize(|w| w.write_transaction(self))
    }
}
