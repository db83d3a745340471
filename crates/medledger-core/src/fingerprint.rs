//! Event signature fingerprints.
//!
//! The fingerprint of an event is the keccak256 hash of its canonical
//! signature string, e.g.
//!   keccak256("BatchCreated(uint256,string,string,address,uint256)")
//! For raw log entries, topics[0] IS the fingerprint; the registry computes
//! each schema's fingerprint once at startup and matches against topics[0].

use tiny_keccak::{Hasher, Keccak};

/// Compute the keccak256 fingerprint of a canonical event signature,
/// returned as lowercase hex with `0x` prefix.
pub fn keccak256_signature(signature: &str) -> String {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(signature.as_bytes());
    hasher.finalize(&mut output);
    format!("0x{}", hex::encode(output))
}

/// Extract the fingerprint from a raw entry's topics (topics[0]).
/// Returns `None` if topics is empty or the first topic is not a 32-byte hex
/// value.
pub fn from_topics(topics: &[String]) -> Option<&str> {
    let first = topics.first()?;
    let hex = first.strip_prefix("0x").unwrap_or(first);
    if hex.len() == 64 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(first.as_str())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn erc20_transfer_anchor() {
        // Well-known hash, pins the keccak helper to ground truth.
        let fp = keccak256_signature("Transfer(address,address,uint256)");
        assert_eq!(
            fp,
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }

    #[test]
    fn batch_created_fingerprint() {
        let fp = keccak256_signature("BatchCreated(uint256,string,string,address,uint256)");
        assert_eq!(
            fp,
            "0x92b6020e18f2d7328b8bc9a6af7c2c05fd727f42a7e7e48cf5df3cd5bbe19ae5"
        );
    }

    #[test]
    fn from_topics_valid() {
        let topics = vec![
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef".to_string(),
        ];
        assert!(from_topics(&topics).is_some());
    }

    #[test]
    fn from_topics_rejects_short_topic() {
        let topics = vec!["0x1234".to_string()];
        assert!(from_topics(&topics).is_none());
    }

    #[test]
    fn from_topics_empty() {
        assert!(from_topics(&[]).is_none());
    }
}
