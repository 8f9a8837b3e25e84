//! ABI decoding

use ercbridge_primitives::{Address, U256};

use super::types::{ParamType, Token};
use crate::ChainError;

/// Decode tokens from ABI-encoded data
pub fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, ChainError> {
    decode_params(types, data, 0)
}

/// Decode a sequence of params whose head starts at `base`
///
/// Offsets of dynamic params are relative to `base`.
fn decode_params(types: &[ParamType], data: &[u8], base: usize) -> Result<Vec<Token>, ChainError> {
    let mut tokens = Vec::with_capacity(types.len());
    for (i, param_type) in types.iter().enumerate() {
        let slot = base + i * 32;
        let token = if param_type.is_dynamic() {
            let relative = read_usize(data, slot)?;
            let start = base
                .checked_add(relative)
                .ok_or_else(|| ChainError::AbiDecode("offset overflow".to_string()))?;
            decode_dynamic(param_type, data, start)?
        } else {
            decode_static(param_type, data, slot)?
        };
        tokens.push(token);
    }
    Ok(tokens)
}

fn decode_static(param_type: &ParamType, data: &[u8], offset: usize) -> Result<Token, ChainError> {
    let word = read_word(data, offset)?;
    match param_type {
        ParamType::Address => {
            let mut addr_bytes = [0u8; 20];
            addr_bytes.copy_from_slice(&word[12..32]);
            Ok(Token::Address(Address::from_bytes(addr_bytes)))
        }
        ParamType::Uint(_) => Ok(Token::Uint(U256::from_big_endian(word))),
        ParamType::Bool => Ok(Token::Bool(word[31] != 0)),
        ParamType::FixedBytes(size) => Ok(Token::FixedBytes(word[..*size].to_vec())),
        other => Err(ChainError::AbiDecode(format!("{} is not static", other.canonical()))),
    }
}

fn decode_dynamic(param_type: &ParamType, data: &[u8], start: usize) -> Result<Token, ChainError> {
    match param_type {
        ParamType::Bytes => Ok(Token::Bytes(decode_bytes(data, start)?)),
        ParamType::String => {
            let bytes = decode_bytes(data, start)?;
            let s = String::from_utf8(bytes)
                .map_err(|e| ChainError::AbiDecode(format!("invalid UTF-8: {}", e)))?;
            Ok(Token::String(s))
        }
        ParamType::Array(inner) => {
            let len = read_usize(data, start)?;
            // Each element needs at least one word; bound len before allocating.
            let remaining = data.len().saturating_sub(start + 32) / 32;
            if len > remaining {
                return Err(ChainError::AbiDecode(format!(
                    "array length {} exceeds available data",
                    len
                )));
            }
            let inner_types = vec![(**inner).clone(); len];
            Ok(Token::Array(decode_params(&inner_types, data, start + 32)?))
        }
        other => decode_static(other, data, start),
    }
}

fn decode_bytes(data: &[u8], offset: usize) -> Result<Vec<u8>, ChainError> {
    let len = read_usize(data, offset)?;
    let start = offset + 32;
    let end = start
        .checked_add(len)
        .ok_or_else(|| ChainError::AbiDecode("length overflow".to_string()))?;
    check_length(data, end)?;
    Ok(data[start..end].to_vec())
}

fn read_word(data: &[u8], offset: usize) -> Result<&[u8], ChainError> {
    let end = offset
        .checked_add(32)
        .ok_or_else(|| ChainError::AbiDecode("offset overflow".to_string()))?;
    check_length(data, end)?;
    Ok(&data[offset..end])
}

fn read_usize(data: &[u8], offset: usize) -> Result<usize, ChainError> {
    let value = U256::from_big_endian(read_word(data, offset)?);
    if value > U256::from(u32::MAX) {
        return Err(ChainError::AbiDecode(format!("offset or length too large: {}", value)));
    }
    Ok(value.as_usize())
}

fn check_length(data: &[u8], required: usize) -> Result<(), ChainError> {
    if data.len() < required {
        return Err(ChainError::AbiDecode(format!(
            "insufficient data: need {} bytes, have {}",
            required,
            data.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::encode;

    #[test]
    fn test_decode_address() {
        let addr = Address::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3d").unwrap();
        let mut encoded = [0u8; 32];
        encoded[12..32].copy_from_slice(addr.as_bytes());

        let tokens = decode(&[ParamType::Address], &encoded).unwrap();
        assert_eq!(tokens, vec![Token::Address(addr)]);
    }

    #[test]
    fn test_decode_uint() {
        let mut encoded = [0u8; 32];
        encoded[31] = 100;

        let tokens = decode(&[ParamType::Uint(256)], &encoded).unwrap();
        assert_eq!(tokens, vec![Token::Uint(U256::from(100))]);
    }

    #[test]
    fn test_decode_bool() {
        let mut encoded_true = [0u8; 32];
        encoded_true[31] = 1;

        assert_eq!(decode(&[ParamType::Bool], &encoded_true).unwrap()[0], Token::Bool(true));
        assert_eq!(decode(&[ParamType::Bool], &[0u8; 32]).unwrap()[0], Token::Bool(false));
    }

    #[test]
    fn test_decode_string() {
        let mut encoded = vec![0u8; 96];
        encoded[31] = 32;
        encoded[63] = 5;
        encoded[64..69].copy_from_slice(b"hello");

        let tokens = decode(&[ParamType::String], &encoded).unwrap();
        assert_eq!(tokens[0], Token::String("hello".to_string()));
    }

    #[test]
    fn test_decode_uint_array() {
        // balanceOfBatch returns a single uint256[]
        let values = [U256::from(5), U256::zero(), U256::from(u64::MAX)];
        let encoded = encode(&[Token::uint_array(values)]);

        let tokens = decode(&[ParamType::Array(Box::new(ParamType::Uint(256)))], &encoded).unwrap();
        assert_eq!(tokens, vec![Token::uint_array(values)]);
    }

    #[test]
    fn test_decode_string_array_uses_relative_offsets() {
        let original = Token::Array(vec![
            Token::String("ab".to_string()),
            Token::String("a longer string that spans two words....".to_string()),
        ]);
        let encoded = encode(&[Token::Uint(U256::from(9)), original.clone()]);

        let tokens = decode(
            &[ParamType::Uint(256), ParamType::Array(Box::new(ParamType::String))],
            &encoded,
        )
        .unwrap();
        assert_eq!(tokens[1], original);
    }

    #[test]
    fn test_decode_multiple_params() {
        let addr = Address::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3d").unwrap();

        let mut encoded = [0u8; 64];
        encoded[12..32].copy_from_slice(addr.as_bytes());
        encoded[63] = 100;

        let tokens = decode(&[ParamType::Address, ParamType::Uint(256)], &encoded).unwrap();
        assert_eq!(tokens, vec![Token::Address(addr), Token::Uint(U256::from(100))]);
    }

    #[test]
    fn test_decode_insufficient_data() {
        assert!(decode(&[ParamType::Uint(256)], &[0u8; 16]).is_err());
        // empty return data from a call to a non-contract
        assert!(decode(&[ParamType::Uint(256)], &[]).is_err());
    }

    #[test]
    fn test_decode_rejects_huge_array_length() {
        let mut encoded = vec![0u8; 64];
        encoded[31] = 32;
        encoded[32..64].copy_from_slice(&[0xff; 32]);
        assert!(decode(&[ParamType::Array(Box::new(ParamType::Uint(256)))], &encoded).is_err());
    }
}
