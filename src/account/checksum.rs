//! EIP-55 mixed-case checksum encoding

use alloy_primitives::Address;
use std::str::FromStr;

use crate::error::AccountsError;

/// Parse an address in any casing, with or without the `0x` prefix
pub fn parse_address(address: &str) -> Result<Address, AccountsError> {
    let trimmed = address.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if body.len() != 40 {
        return Err(AccountsError::InvalidAddress(address.to_string()));
    }
    Address::from_str(body).map_err(|_| AccountsError::InvalidAddress(address.to_string()))
}

/// Normalize an address to its checksum form.
///
/// Casing of the input is not validated; anything that is not 20 bytes of
/// hex is rejected.
pub fn to_checksum_address(address: &str) -> Result<String, AccountsError> {
    parse_address(address).map(|a| a.to_checksum(None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eip55_vectors() {
        let vectors = [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ];
        for v in vectors {
            assert_eq!(to_checksum_address(&v.to_lowercase()).unwrap(), v);
            assert_eq!(to_checksum_address(&v.to_uppercase().replace("0X", "0x")).unwrap(), v);
            assert_eq!(to_checksum_address(&v[2..].to_lowercase()).unwrap(), v);
            assert!(Address::parse_checksummed(to_checksum_address(v).unwrap(), None).is_ok());
        }
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(to_checksum_address("").is_err());
        assert!(to_checksum_address("0x").is_err());
        assert!(to_checksum_address("0x1234").is_err());
        assert!(to_checksum_address("0xzzAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").is_err());
    }
}
