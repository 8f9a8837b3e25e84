//! ABI encoding

use ercbridge_primitives::U256;

use super::types::{ParamType, Token};
use crate::ChainError;

/// Encode tokens according to Solidity ABI specification
pub fn encode(tokens: &[Token]) -> Vec<u8> {
    let types: Vec<ParamType> = tokens.iter().map(|t| t.type_of()).collect();
    encode_params(&types, tokens)
}

/// Encode tokens against declared parameter types
///
/// Fails when the arity differs or a token does not fit its slot.
pub fn encode_typed(types: &[ParamType], tokens: &[Token]) -> Result<Vec<u8>, ChainError> {
    if types.len() != tokens.len() {
        return Err(ChainError::AbiEncode(format!(
            "expected {} arguments, got {}",
            types.len(),
            tokens.len()
        )));
    }
    for (i, (param_type, token)) in types.iter().zip(tokens).enumerate() {
        if !param_type.accepts(token) {
            return Err(ChainError::AbiEncode(format!(
                "argument {} is not a {}",
                i,
                param_type.canonical()
            )));
        }
    }
    Ok(encode_params(types, tokens))
}

/// Encode function call (selector + params)
pub fn encode_function_call(selector: [u8; 4], tokens: &[Token]) -> Vec<u8> {
    let mut result = selector.to_vec();
    result.extend(encode(tokens));
    result
}

fn encode_params(types: &[ParamType], tokens: &[Token]) -> Vec<u8> {
    // Every supported type occupies one word in the head.
    let head_size = types.len() * 32;

    let mut head = Vec::with_capacity(head_size);
    let mut tail = Vec::new();

    for (param_type, token) in types.iter().zip(tokens.iter()) {
        if param_type.is_dynamic() {
            let offset = head_size + tail.len();
            head.extend(encode_u256(&U256::from(offset)));
            tail.extend(encode_token(param_type, token));
        } else {
            head.extend(encode_token(param_type, token));
        }
    }

    head.extend(tail);
    head
}

fn encode_token(param_type: &ParamType, token: &Token) -> Vec<u8> {
    match (param_type, token) {
        (ParamType::Address, Token::Address(addr)) => {
            let mut buf = [0u8; 32];
            buf[12..32].copy_from_slice(addr.as_bytes());
            buf.to_vec()
        }
        (ParamType::Uint(_), Token::Uint(value)) => encode_u256(value),
        (ParamType::Bool, Token::Bool(b)) => {
            let mut buf = [0u8; 32];
            buf[31] = u8::from(*b);
            buf.to_vec()
        }
        (ParamType::FixedBytes(size), Token::FixedBytes(data)) => {
            let mut buf = [0u8; 32];
            let len = data.len().min(*size);
            buf[..len].copy_from_slice(&data[..len]);
            buf.to_vec()
        }
        (ParamType::Bytes, Token::Bytes(data)) => encode_bytes(data),
        (ParamType::String, Token::String(s)) => encode_bytes(s.as_bytes()),
        (ParamType::Array(inner), Token::Array(tokens)) => {
            let mut result = encode_u256(&U256::from(tokens.len()));
            let inner_types = vec![(**inner).clone(); tokens.len()];
            result.extend(encode_params(&inner_types, tokens));
            result
        }
        // encode_typed rejects mismatches before we get here
        _ => vec![0u8; 32],
    }
}

fn encode_u256(value: &U256) -> Vec<u8> {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    bytes.to_vec()
}

fn encode_bytes(data: &[u8]) -> Vec<u8> {
    let mut result = encode_u256(&U256::from(data.len()));

    let padded_len = data.len().div_ceil(32) * 32;
    let mut padded = vec![0u8; padded_len];
    padded[..data.len()].copy_from_slice(data);
    result.extend(padded);

    result
}

/// Compute function selector (first 4 bytes of keccak256(signature))
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = ercbridge_crypto::keccak256(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash.as_bytes()[..4]);
    selector
}
