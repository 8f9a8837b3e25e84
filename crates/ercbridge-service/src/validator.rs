//! Request field parsing
//!
//! Every function here is pure: it takes the raw string a caller sent and the
//! name of the field it came from, and returns a typed value or an
//! `InvalidArgument` error naming that field.

use bytes::Bytes;
use ercbridge_primitives::{Address, H256, U256};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, Zeroizing};

use crate::error::{ServiceError, ServiceResult};

/// Maximum token name length in characters
pub const MAX_NAME_LEN: usize = 100;
/// Maximum token symbol length in characters
pub const MAX_SYMBOL_LEN: usize = 20;
/// Accepted decimals range
pub const DECIMALS_RANGE: std::ops::RangeInclusive<u32> = 1..=18;

/// 32-byte secp256k1 secret, wiped on drop
pub struct PrivateKey(Zeroizing<[u8; 32]>);

impl PrivateKey {
    /// Wrap raw key bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Raw key bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

/// Request field holding secret text, redacted from `Debug`
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretString(String);

impl SecretString {
    /// Wrap `s`
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Secret text
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretString([REDACTED])")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Parse a 20-byte address, `0x`-prefixed or bare, any case
pub fn parse_address(s: &str, field: &str) -> ServiceResult<Address> {
    if s.is_empty() {
        return Err(ServiceError::invalid_argument(format!("{} cannot be empty", field)));
    }

    Address::from_hex(s).map_err(|_| {
        ServiceError::invalid_argument(format!("{} is not a valid Ethereum address: {}", field, s))
    })
}

/// Parse the `contract_address` field
pub fn parse_contract_address(s: &str) -> ServiceResult<Address> {
    parse_address(s, "contract_address")
}

/// Like [`parse_address`], but an empty field is `None`
pub fn parse_optional_address(s: &str, field: &str) -> ServiceResult<Option<Address>> {
    if s.is_empty() {
        return Ok(None);
    }
    parse_address(s, field).map(Some)
}

/// Parse a non-negative base-10 integer that fits in 256 bits
pub fn parse_amount(s: &str, field: &str) -> ServiceResult<U256> {
    if s.is_empty() {
        return Err(ServiceError::invalid_argument(format!("{} cannot be empty", field)));
    }

    let all_digits = |t: &str| !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit());
    if let Some(rest) = s.strip_prefix('-') {
        if all_digits(rest) {
            return Err(ServiceError::invalid_argument(format!("{} cannot be negative", field)));
        }
    }
    if !all_digits(s) {
        return Err(ServiceError::invalid_argument(format!(
            "invalid {}: {} (must be a decimal number)",
            field, s
        )));
    }

    U256::from_dec_str(s).map_err(|_| {
        ServiceError::invalid_argument(format!("{} exceeds the maximum uint256 value", field))
    })
}

/// Parse a token id; same rules as [`parse_amount`]
pub fn parse_token_id(s: &str, field: &str) -> ServiceResult<U256> {
    parse_amount(s, field)
}

/// Decode a hex private key, with or without `0x`
///
/// Errors never echo the input.
pub fn parse_private_key(s: &str) -> ServiceResult<PrivateKey> {
    if s.is_empty() {
        return Err(ServiceError::invalid_argument("private_key cannot be empty"));
    }

    let decoded = Zeroizing::new(
        hex::decode(strip_hex_prefix(s))
            .map_err(|_| ServiceError::invalid_argument("private key is not valid hex"))?,
    );
    let bytes: [u8; 32] = decoded.as_slice().try_into().map_err(|_| {
        ServiceError::invalid_argument(format!(
            "private key must be 32 bytes (64 hex characters), got {} bytes",
            decoded.len()
        ))
    })?;
    Ok(PrivateKey::from_bytes(bytes))
}

/// Optional hex payload; empty input is empty bytes
pub fn parse_call_data(s: &str, field: &str) -> ServiceResult<Bytes> {
    let digits = strip_hex_prefix(s);
    if digits.is_empty() {
        return Ok(Bytes::new());
    }
    hex::decode(digits)
        .map(Bytes::from)
        .map_err(|_| ServiceError::invalid_argument(format!("{} is not valid hex", field)))
}

/// Parse a 32-byte transaction hash
pub fn parse_tx_hash(s: &str) -> ServiceResult<H256> {
    if s.is_empty() {
        return Err(ServiceError::invalid_argument("tx_hash cannot be empty"));
    }

    H256::from_hex(s).map_err(|_| {
        ServiceError::invalid_argument(format!("tx_hash is not a valid transaction hash: {}", s))
    })
}

// ==================== Token Metadata ====================

/// Token name: non-empty, at most 100 characters
pub fn validate_token_name(name: &str) -> ServiceResult<()> {
    if name.is_empty() {
        return Err(ServiceError::invalid_argument("name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ServiceError::invalid_argument("name cannot exceed 100 characters"));
    }
    Ok(())
}

/// Token symbol: non-empty, at most 20 characters
pub fn validate_token_symbol(symbol: &str) -> ServiceResult<()> {
    if symbol.is_empty() {
        return Err(ServiceError::invalid_argument("symbol cannot be empty"));
    }
    if symbol.chars().count() > MAX_SYMBOL_LEN {
        return Err(ServiceError::invalid_argument("symbol cannot exceed 20 characters"));
    }
    Ok(())
}

/// Decimals between 1 and 18, narrowed to the on-chain `uint8`
pub fn validate_decimals(decimals: u32) -> ServiceResult<u8> {
    if !DECIMALS_RANGE.contains(&decimals) {
        return Err(ServiceError::invalid_argument("decimals must be between 1 and 18"));
    }
    Ok(decimals as u8)
}

/// Metadata URI: non-empty
pub fn validate_uri(uri: &str) -> ServiceResult<()> {
    if uri.is_empty() {
        return Err(ServiceError::invalid_argument("uri cannot be empty"));
    }
    Ok(())
}

// ==================== Arrays ====================

/// Validate two parallel arrays
///
/// Shape is checked first (both non-empty, equal length), then every element
/// of `a` in index order, then every element of `b`. The first failure wins.
pub fn parse_pairs<A, B>(
    a: &[String],
    a_field: &str,
    parse_a: impl Fn(&str, &str) -> ServiceResult<A>,
    b: &[String],
    b_field: &str,
    parse_b: impl Fn(&str, &str) -> ServiceResult<B>,
) -> ServiceResult<(Vec<A>, Vec<B>)> {
    if a.is_empty() {
        return Err(ServiceError::invalid_argument(format!("{} array cannot be empty", a_field)));
    }
    if b.is_empty() {
        return Err(ServiceError::invalid_argument(format!("{} array cannot be empty", b_field)));
    }
    if a.len() != b.len() {
        return Err(ServiceError::invalid_argument(format!(
            "{} and {} arrays must have the same length",
            a_field, b_field
        )));
    }

    let left = parse_each(a, a_field, parse_a)?;
    let right = parse_each(b, b_field, parse_b)?;
    Ok((left, right))
}

fn parse_each<T>(
    values: &[String],
    field: &str,
    parse: impl Fn(&str, &str) -> ServiceResult<T>,
) -> ServiceResult<Vec<T>> {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            parse(value.as_str(), field).map_err(|e| {
                ServiceError::invalid_argument(format!(
                    "invalid {} at index {}: {}",
                    field,
                    i,
                    e.message()
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn message<T: std::fmt::Debug>(result: ServiceResult<T>) -> String {
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        err.to_string()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    // ==================== Address ====================

    #[test]
    fn test_parse_address_forms() {
        let lower = parse_address("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48", "to_address").unwrap();
        let mixed = parse_address("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", "to_address").unwrap();
        let upper_prefix = parse_address("0XA0B86991C6218B36C1D19D4A2E9EB0CE3606EB48", "to_address").unwrap();
        let bare = parse_address("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48", "to_address").unwrap();
        assert_eq!(lower, mixed);
        assert_eq!(lower, upper_prefix);
        assert_eq!(lower, bare);
    }

    #[test]
    fn test_parse_address_errors() {
        assert_eq!(message(parse_address("", "owner_address")), "owner_address cannot be empty");
        assert_eq!(
            message(parse_address("0x1234", "owner_address")),
            "owner_address is not a valid Ethereum address: 0x1234"
        );
        assert!(parse_address("0xg0b86991c6218b36c1d19d4a2e9eb0ce3606eb48", "x").is_err());
        assert!(parse_address("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb4800", "x").is_err());
    }

    #[test]
    fn test_parse_optional_address() {
        assert_eq!(parse_optional_address("", "initial_owner").unwrap(), None);
        assert!(parse_optional_address("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48", "initial_owner")
            .unwrap()
            .is_some());
        assert_eq!(
            message(parse_optional_address("nope", "initial_owner")),
            "initial_owner is not a valid Ethereum address: nope"
        );
    }

    #[test]
    fn test_secret_string_debug_is_redacted() {
        let secret = SecretString::from("ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80");
        assert!(!format!("{:?}", secret).contains("ac0974"));
        assert_eq!(secret.expose().len(), 64);
    }

    // ==================== Amount ====================

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("0", "amount").unwrap(), U256::zero());
        assert_eq!(parse_amount("000123", "amount").unwrap(), U256::from(123));
        assert_eq!(
            parse_amount("123456789012345678901", "amount").unwrap().to_string(),
            "123456789012345678901"
        );
    }

    #[test]
    fn test_parse_amount_errors() {
        assert_eq!(message(parse_amount("", "amount")), "amount cannot be empty");
        assert_eq!(message(parse_amount("-5", "amount")), "amount cannot be negative");
        assert_eq!(
            message(parse_amount("+5", "amount")),
            "invalid amount: +5 (must be a decimal number)"
        );
        assert_eq!(
            message(parse_amount("1.5", "amount")),
            "invalid amount: 1.5 (must be a decimal number)"
        );
        assert_eq!(
            message(parse_amount(" 1", "amount")),
            "invalid amount:  1 (must be a decimal number)"
        );
        assert!(parse_amount("-", "amount").is_err());
    }

    #[test]
    fn test_parse_amount_uint256_bound() {
        let max = U256::MAX.to_string();
        assert_eq!(parse_amount(&max, "amount").unwrap(), U256::MAX);

        let over = "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        assert_eq!(
            message(parse_amount(over, "amount")),
            "amount exceeds the maximum uint256 value"
        );
    }

    #[test]
    fn test_parse_token_id_uses_field_name() {
        assert_eq!(message(parse_token_id("abc", "token_id")), "invalid token_id: abc (must be a decimal number)");
    }

    // ==================== Private Key ====================

    #[test]
    fn test_parse_private_key() {
        let hex_key = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
        let plain = parse_private_key(hex_key).unwrap();
        let prefixed = parse_private_key(&format!("0x{}", hex_key)).unwrap();
        let upper = parse_private_key(&format!("0X{}", hex_key.to_uppercase())).unwrap();
        assert_eq!(plain.as_bytes(), prefixed.as_bytes());
        assert_eq!(plain.as_bytes(), upper.as_bytes());
    }

    #[test]
    fn test_parse_private_key_errors() {
        assert_eq!(message(parse_private_key("")), "private_key cannot be empty");
        assert_eq!(message(parse_private_key("0xzz")), "private key is not valid hex");
        assert_eq!(
            message(parse_private_key("0x1234")),
            "private key must be 32 bytes (64 hex characters), got 2 bytes"
        );
    }

    #[test]
    fn test_private_key_debug_redacted() {
        let key = parse_private_key(&"11".repeat(32)).unwrap();
        let debug = format!("{:?}", key);
        assert_eq!(debug, "PrivateKey([REDACTED])");
        assert!(!debug.contains("11"));
    }

    // ==================== Metadata ====================

    #[test]
    fn test_token_metadata() {
        assert!(validate_token_name("Token").is_ok());
        assert_eq!(message(validate_token_name("")), "name cannot be empty");
        assert!(validate_token_name(&"n".repeat(100)).is_ok());
        assert_eq!(message(validate_token_name(&"n".repeat(101))), "name cannot exceed 100 characters");

        assert!(validate_token_symbol("TKN").is_ok());
        assert_eq!(message(validate_token_symbol("")), "symbol cannot be empty");
        assert_eq!(message(validate_token_symbol(&"S".repeat(21))), "symbol cannot exceed 20 characters");

        assert_eq!(validate_decimals(18).unwrap(), 18);
        assert_eq!(validate_decimals(1).unwrap(), 1);
        assert_eq!(message(validate_decimals(0)), "decimals must be between 1 and 18");
        assert_eq!(message(validate_decimals(19)), "decimals must be between 1 and 18");

        assert_eq!(message(validate_uri("")), "uri cannot be empty");
    }

    #[test]
    fn test_parse_call_data_and_hash() {
        assert!(parse_call_data("", "data").unwrap().is_empty());
        assert_eq!(parse_call_data("0xdead", "data").unwrap().as_ref(), &[0xde, 0xad]);
        assert_eq!(message(parse_call_data("0xdeadx", "data")), "data is not valid hex");

        assert_eq!(message(parse_tx_hash("")), "tx_hash cannot be empty");
        assert!(parse_tx_hash("0x1234").is_err());
        let hash = format!("0x{}", "ab".repeat(32));
        assert_eq!(parse_tx_hash(&hash).unwrap().to_hex(), hash);
    }

    // ==================== Arrays ====================

    #[test]
    fn test_parse_pairs_shape() {
        let ids = strings(&["1", "2"]);
        let empty: Vec<String> = Vec::new();

        assert_eq!(
            message(parse_pairs(&empty, "token_ids", parse_token_id, &ids, "amounts", parse_amount)),
            "token_ids array cannot be empty"
        );
        assert_eq!(
            message(parse_pairs(&ids, "token_ids", parse_token_id, &empty, "amounts", parse_amount)),
            "amounts array cannot be empty"
        );
        assert_eq!(
            message(parse_pairs(&ids, "token_ids", parse_token_id, &strings(&["1"]), "amounts", parse_amount)),
            "token_ids and amounts arrays must have the same length"
        );
    }

    #[test]
    fn test_parse_pairs_elements() {
        let (ids, amounts) = parse_pairs(
            &strings(&["1", "2"]),
            "token_ids",
            parse_token_id,
            &strings(&["10", "20"]),
            "amounts",
            parse_amount,
        )
        .unwrap();
        assert_eq!(ids, vec![U256::from(1), U256::from(2)]);
        assert_eq!(amounts, vec![U256::from(10), U256::from(20)]);

        let err = message(parse_pairs(
            &strings(&["1", "-2"]),
            "token_ids",
            parse_token_id,
            &strings(&["x", "20"]),
            "amounts",
            parse_amount,
        ));
        assert_eq!(err, "invalid token_ids at index 1: token_ids cannot be negative");
    }

    // ==================== Properties ====================

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_address_case_insensitive(bytes in proptest::array::uniform20(any::<u8>())) {
                let lower = hex::encode(bytes);
                let upper = lower.to_uppercase();
                let a = parse_address(&format!("0x{}", lower), "a").unwrap();
                let b = parse_address(&format!("0x{}", upper), "a").unwrap();
                prop_assert_eq!(a, b);
                prop_assert_eq!(a.as_bytes(), &bytes);
            }

            #[test]
            fn prop_address_rejects_wrong_length(len in 0usize..80) {
                prop_assume!(len != 40);
                let s = format!("0x{}", "a".repeat(len));
                prop_assert!(parse_address(&s, "a").is_err());
            }

            #[test]
            fn prop_amount_canonical(value in any::<u128>(), zeros in 0usize..5) {
                let padded = format!("{}{}", "0".repeat(zeros), value);
                let parsed = parse_amount(&padded, "amount").unwrap();
                prop_assert_eq!(parsed.to_string(), value.to_string());
            }

            #[test]
            fn prop_amount_negative_rejected(value in 1u64..) {
                let err = parse_amount(&format!("-{}", value), "amount").unwrap_err();
                prop_assert_eq!(err.to_string(), "amount cannot be negative");
            }

            #[test]
            fn prop_amount_non_numeric_rejected(s in "[0-9]*[a-zA-Z.+ ][0-9a-zA-Z]*") {
                prop_assert!(parse_amount(&s, "amount").is_err());
            }

            #[test]
            fn prop_private_key_length(bytes in proptest::collection::vec(any::<u8>(), 0..64), prefixed in any::<bool>(), upper in any::<bool>()) {
                prop_assume!(!bytes.is_empty());
                let mut encoded = hex::encode(&bytes);
                if upper {
                    encoded = encoded.to_uppercase();
                }
                if prefixed {
                    encoded = format!("0x{}", encoded);
                }
                let result = parse_private_key(&encoded);
                prop_assert_eq!(result.is_ok(), bytes.len() == 32);
                if let Ok(key) = result {
                    prop_assert_eq!(key.as_bytes().as_slice(), bytes.as_slice());
                }
            }
        }
    }
}
