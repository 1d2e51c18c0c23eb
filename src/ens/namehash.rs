//! ENS name hashing

use alloy_primitives::{keccak256, Address, B256};

/// Recursive ENS namehash; the empty name hashes to all zeroes
pub fn namehash(name: &str) -> B256 {
    if name.is_empty() {
        return B256::ZERO;
    }
    name.rsplit('.').fold(B256::ZERO, |node, label| {
        let label_hash = keccak256(label.to_lowercase().as_bytes());
        keccak256([node.as_slice(), label_hash.as_slice()].concat())
    })
}

/// Node under which an address's primary name is registered
pub fn reverse_node(address: &Address) -> B256 {
    namehash(&format!("{}.addr.reverse", hex::encode(address.as_slice())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256};

    #[test]
    fn test_namehash_vectors() {
        assert_eq!(namehash(""), B256::ZERO);
        assert_eq!(
            namehash("eth"),
            b256!("93cdeb708b7545dc668eb9280176169d1c33cfd8ed6f04690a0bcc88a93fc4ae")
        );
        assert_eq!(
            namehash("foo.eth"),
            b256!("de9b09fd7c5f901e23a3f19fecc54828e9c848539801e86591bd9801b019f84f")
        );
        assert_eq!(namehash("Foo.ETH"), namehash("foo.eth"));
    }

    #[test]
    fn test_reverse_node() {
        let account = address!("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
        assert_eq!(
            reverse_node(&account),
            namehash("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed.addr.reverse")
        );
        assert_eq!(namehash("addr.reverse"), b256!("91d1777781884d03a6757a803996e38de2a42967fb37eeaca72729271025a9e2"));
    }
}
