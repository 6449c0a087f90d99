use bitcoin_hashes::hex::FromHex;

/// mainnet genesis block, framing included
pub(crate) fn genesis_bytes() -> Vec<u8> {
    Vec::from_hex(include_str!("../../resources/tests/genesis.hex").trim()).unwrap()
}

/// block 170, the first block with a spending transaction
pub(crate) fn block_170_bytes() -> Vec<u8> {
    Vec::from_hex(include_str!("../../resources/tests/block_170.hex").trim()).unwrap()
}
