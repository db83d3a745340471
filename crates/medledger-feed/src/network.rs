//! Known networks and explorer links.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Networks the feed knows how to describe. Anything else is displayed by
/// chain id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Network {
    HardhatLocal,
    PolygonMumbai,
    Sepolia,
    Other(u64),
}

impl Network {
    /// Classify a chain id.
    pub fn from_chain_id(chain_id: u64) -> Self {
        match chain_id {
            31_337 => Network::HardhatLocal,
            80_001 => Network::PolygonMumbai,
            11_155_111 => Network::Sepolia,
            other => Network::Other(other),
        }
    }

    /// Block explorer URL for a transaction, if the network has a public
    /// explorer (the local devnet does not).
    pub fn explorer_tx_url(&self, tx_hash: &str) -> Option<String> {
        match self {
            Network::HardhatLocal | Network::Other(_) => None,
            Network::PolygonMumbai => {
                Some(format!("https://mumbai.polygonscan.com/tx/{tx_hash}"))
            }
            Network::Sepolia => Some(format!("https://sepolia.etherscan.io/tx/{tx_hash}")),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::HardhatLocal => write!(f, "Hardhat Local"),
            Network::PolygonMumbai => write!(f, "Polygon Mumbai"),
            Network::Sepolia => write!(f, "Sepolia"),
            Network::Other(id) => write!(f, "Chain {id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_chain_ids() {
        assert_eq!(Network::from_chain_id(31_337), Network::HardhatLocal);
        assert_eq!(Network::from_chain_id(80_001), Network::PolygonMumbai);
        assert_eq!(Network::from_chain_id(11_155_111), Network::Sepolia);
        assert_eq!(Network::from_chain_id(1), Network::Other(1));
    }

    #[test]
    fn local_network_has_no_explorer() {
        assert!(Network::HardhatLocal.explorer_tx_url("0xabc").is_none());
        assert_eq!(
            Network::Sepolia.explorer_tx_url("0xabc").as_deref(),
            Some("https://sepolia.etherscan.io/tx/0xabc")
        );
    }

    #[test]
    fn display_names() {
        assert_eq!(Network::from_chain_id(31_337).to_string(), "Hardhat Local");
        assert_eq!(Network::Other(5).to_string(), "Chain 5");
    }
}
