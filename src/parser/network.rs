use crate::parser::errors::{OpError, OpResult};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;

///
/// Networks a blk file can belong to, identified by the
/// magic number that frames every block.
///
/// Reference: `chainparams.cpp` of bitcoin core.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    Mainnet,
    Testnet,
    Regtest,
    Signet,
}

impl Network {
    pub const ALL: [Network; 4] = [
        Network::Mainnet,
        Network::Testnet,
        Network::Regtest,
        Network::Signet,
    ];

    /// magic number as read little-endian from the file
    pub fn magic(self) -> u32 {
        match self {
            Network::Mainnet => 0xd9b4_bef9,
            Network::Testnet => 0x0709_110b,
            Network::Regtest => 0xdab5_bffa,
            Network::Signet => 0x40cf_030a,
        }
    }

    pub fn from_magic(magic: u32) -> OpResult<Network> {
        Network::ALL
            .iter()
            .copied()
            .find(|n| n.magic() == magic)
            .ok_or(OpError::UnknownNetwork(magic))
    }
}

impl TryFrom<u32> for Network {
    type Error = OpError;

    fn try_from(magic: u32) -> OpResult<Network> {
        Network::from_magic(magic)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Regtest => "regtest",
            Network::Signet => "signet",
        };
        f.write_str(name)
    }
}
