//! ABI type definitions

use ercbridge_primitives::{Address, U256};

/// Solidity ABI token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Address (20 bytes)
    Address(Address),
    /// Unsigned integer (8-256 bits)
    Uint(U256),
    /// Boolean
    Bool(bool),
    /// Dynamic bytes
    Bytes(Vec<u8>),
    /// Fixed-size bytes (1-32)
    FixedBytes(Vec<u8>),
    /// UTF-8 string
    String(String),
    /// Dynamic array
    Array(Vec<Token>),
}

/// Solidity parameter types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// Address
    Address,
    /// Unsigned integer with bit size (8, 16, ..., 256)
    Uint(usize),
    /// Boolean
    Bool,
    /// Dynamic bytes
    Bytes,
    /// Fixed-size bytes (size 1-32)
    FixedBytes(usize),
    /// UTF-8 string
    String,
    /// Dynamic array
    Array(Box<ParamType>),
}

impl ParamType {
    /// Check if this type is dynamic (variable length)
    pub fn is_dynamic(&self) -> bool {
        matches!(self, ParamType::Bytes | ParamType::String | ParamType::Array(_))
    }

    /// Canonical type name as used in function signatures
    pub fn canonical(&self) -> String {
        match self {
            ParamType::Address => "address".to_string(),
            ParamType::Uint(bits) => format!("uint{}", bits),
            ParamType::Bool => "bool".to_string(),
            ParamType::Bytes => "bytes".to_string(),
            ParamType::FixedBytes(size) => format!("bytes{}", size),
            ParamType::String => "string".to_string(),
            ParamType::Array(inner) => format!("{}[]", inner.canonical()),
        }
    }

    /// Whether `token` can be encoded as this type
    pub fn accepts(&self, token: &Token) -> bool {
        match (self, token) {
            (ParamType::Address, Token::Address(_))
            | (ParamType::Uint(_), Token::Uint(_))
            | (ParamType::Bool, Token::Bool(_))
            | (ParamType::Bytes, Token::Bytes(_))
            | (ParamType::String, Token::String(_)) => true,
            (ParamType::FixedBytes(size), Token::FixedBytes(data)) => data.len() <= *size,
            (ParamType::Array(inner), Token::Array(items)) => items.iter().all(|t| inner.accepts(t)),
            _ => false,
        }
    }
}

impl Token {
    /// Get the type of this token
    pub fn type_of(&self) -> ParamType {
        match self {
            Token::Address(_) => ParamType::Address,
            Token::Uint(_) => ParamType::Uint(256),
            Token::Bool(_) => ParamType::Bool,
            Token::Bytes(_) => ParamType::Bytes,
            Token::FixedBytes(b) => ParamType::FixedBytes(b.len()),
            Token::String(_) => ParamType::String,
            Token::Array(tokens) => {
                let inner = tokens.first().map(|t| t.type_of()).unwrap_or(ParamType::Uint(256));
                ParamType::Array(Box::new(inner))
            }
        }
    }

    /// Build a `uint256[]` token
    pub fn uint_array(values: impl IntoIterator<Item = U256>) -> Self {
        Token::Array(values.into_iter().map(Token::Uint).collect())
    }

    /// Build an `address[]` token
    pub fn address_array(values: impl IntoIterator<Item = Address>) -> Self {
        Token::Array(values.into_iter().map(Token::Address).collect())
    }

    /// Extract an address
    pub fn into_address(self) -> Option<Address> {
        match self {
            Token::Address(a) => Some(a),
            _ => None,
        }
    }

    /// Extract an unsigned integer
    pub fn into_uint(self) -> Option<U256> {
        match self {
            Token::Uint(v) => Some(v),
            _ => None,
        }
    }

    /// Extract a boolean
    pub fn into_bool(self) -> Option<bool> {
        match self {
            Token::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Extract a string
    pub fn into_string(self) -> Option<String> {
        match self {
            Token::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extract array elements
    pub fn into_array(self) -> Option<Vec<Token>> {
        match self {
            Token::Array(items) => Some(items),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_type_is_dynamic() {
        assert!(!ParamType::Address.is_dynamic());
        assert!(!ParamType::Uint(256).is_dynamic());
        assert!(!ParamType::Bool.is_dynamic());
        assert!(!ParamType::FixedBytes(32).is_dynamic());

        assert!(ParamType::Bytes.is_dynamic());
        assert!(ParamType::String.is_dynamic());
        assert!(ParamType::Array(Box::new(ParamType::Uint(256))).is_dynamic());
    }

    #[test]
    fn test_canonical_names() {
        assert_eq!(ParamType::Uint(8).canonical(), "uint8");
        assert_eq!(ParamType::Array(Box::new(ParamType::Address)).canonical(), "address[]");
    }

    #[test]
    fn test_accepts() {
        assert!(ParamType::Uint(256).accepts(&Token::Uint(U256::one())));
        assert!(!ParamType::Uint(256).accepts(&Token::Address(Address::ZERO)));
        let ids = Token::uint_array([U256::one(), U256::from(2)]);
        assert!(ParamType::Array(Box::new(ParamType::Uint(256))).accepts(&ids));
        assert!(!ParamType::Array(Box::new(ParamType::Address)).accepts(&ids));
    }

    #[test]
    fn test_token_extractors() {
        assert_eq!(Token::Uint(U256::from(7)).into_uint(), Some(U256::from(7)));
        assert_eq!(Token::Bool(true).into_uint(), None);
        assert_eq!(Token::String("x".into()).into_string().as_deref(), Some("x"));
        assert_eq!(Token::Address(Address::ZERO).into_address(), Some(Address::ZERO));
    }
}
