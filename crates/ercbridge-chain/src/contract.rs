//! Contract ABI tables for the supported token standards
//!
//! A [`ContractAbi`] is address-free: it describes the surface of one
//! contract kind and is shared by every binding of that kind.

use bytes::Bytes;

use crate::abi::{decode, encode_typed, function_selector, ParamType, Token};
use crate::ChainError;

/// Function definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    /// Lookup key, unique within a table (differs from the Solidity name for overloads)
    pub name: String,
    /// Canonical signature (e.g. "transfer(address,uint256)")
    pub signature: String,
    /// Function selector (4 bytes)
    pub selector: [u8; 4],
    /// Input parameter types
    pub inputs: Vec<ParamType>,
    /// Output parameter types
    pub outputs: Vec<ParamType>,
    /// `view`/`pure`: safe to call without a transaction
    pub constant: bool,
}

impl FunctionDef {
    /// Create a function definition whose key is its Solidity name
    pub fn new(name: &str, inputs: Vec<ParamType>, outputs: Vec<ParamType>, constant: bool) -> Self {
        Self::overload(name, name, inputs, outputs, constant)
    }

    /// Create a definition for an overloaded Solidity function under a distinct key
    pub fn overload(
        key: &str,
        solidity_name: &str,
        inputs: Vec<ParamType>,
        outputs: Vec<ParamType>,
        constant: bool,
    ) -> Self {
        let params: Vec<String> = inputs.iter().map(ParamType::canonical).collect();
        let signature = format!("{}({})", solidity_name, params.join(","));
        let selector = function_selector(&signature);
        Self {
            name: key.to_string(),
            signature,
            selector,
            inputs,
            outputs,
            constant,
        }
    }
}

/// ABI surface of one contract kind
#[derive(Debug, Clone)]
pub struct ContractAbi {
    kind: &'static str,
    constructor: Vec<ParamType>,
    functions: Vec<FunctionDef>,
}

impl ContractAbi {
    /// Short name of the contract kind, e.g. "ERC20Ownable"
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Constructor parameter types
    pub fn constructor(&self) -> &[ParamType] {
        &self.constructor
    }

    /// All function definitions
    pub fn functions(&self) -> &[FunctionDef] {
        &self.functions
    }

    /// Get a function by key
    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Whether the surface exposes `name`
    pub fn has_function(&self, name: &str) -> bool {
        self.function(name).is_some()
    }

    /// Encode a function call
    pub fn encode_call(&self, function_name: &str, args: &[Token]) -> Result<Bytes, ChainError> {
        let function = self
            .function(function_name)
            .ok_or_else(|| ChainError::UnknownFunction(function_name.to_string()))?;

        let mut data = function.selector.to_vec();
        data.extend(encode_typed(&function.inputs, args)?);
        Ok(Bytes::from(data))
    }

    /// Decode function output
    pub fn decode_output(&self, function_name: &str, data: &[u8]) -> Result<Vec<Token>, ChainError> {
        let function = self
            .function(function_name)
            .ok_or_else(|| ChainError::UnknownFunction(function_name.to_string()))?;

        decode(&function.outputs, data)
    }

    /// Creation payload: bytecode followed by the encoded constructor arguments
    pub fn encode_deploy(&self, bytecode: &[u8], args: &[Token]) -> Result<Bytes, ChainError> {
        if bytecode.is_empty() {
            return Err(ChainError::AbiEncode(format!("empty bytecode for {}", self.kind)));
        }
        let mut data = bytecode.to_vec();
        data.extend(encode_typed(&self.constructor, args)?);
        Ok(Bytes::from(data))
    }
}

/// Builder for contract ABI tables
pub struct ContractAbiBuilder {
    kind: &'static str,
    constructor: Vec<ParamType>,
    functions: Vec<FunctionDef>,
}

impl ContractAbiBuilder {
    /// Start a table for `kind`
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            constructor: Vec::new(),
            functions: Vec::new(),
        }
    }

    /// Set constructor parameters
    pub fn constructor(mut self, inputs: Vec<ParamType>) -> Self {
        self.constructor = inputs;
        self
    }

    /// Add a read-only function
    pub fn view(mut self, name: &str, inputs: Vec<ParamType>, outputs: Vec<ParamType>) -> Self {
        self.functions.push(FunctionDef::new(name, inputs, outputs, true));
        self
    }

    /// Add a state-changing function
    pub fn function(mut self, name: &str, inputs: Vec<ParamType>, outputs: Vec<ParamType>) -> Self {
        self.functions.push(FunctionDef::new(name, inputs, outputs, false));
        self
    }

    /// Add a state-changing overload under a distinct key
    pub fn overload(mut self, key: &str, solidity_name: &str, inputs: Vec<ParamType>) -> Self {
        self.functions
            .push(FunctionDef::overload(key, solidity_name, inputs, vec![], false));
        self
    }

    /// Build the table
    pub fn build(self) -> ContractAbi {
        ContractAbi {
            kind: self.kind,
            constructor: self.constructor,
            functions: self.functions,
        }
    }
}

fn uint() -> ParamType {
    ParamType::Uint(256)
}

fn uint_array() -> ParamType {
    ParamType::Array(Box::new(uint()))
}

fn erc20_base(kind: &'static str) -> ContractAbiBuilder {
    use ParamType::{Address, Bool, String};

    ContractAbiBuilder::new(kind)
        // name, symbol, decimals, initialSupply, owner
        .constructor(vec![String, String, ParamType::Uint(8), uint(), Address])
        .view("name", vec![], vec![String])
        .view("symbol", vec![], vec![String])
        .view("decimals", vec![], vec![ParamType::Uint(8)])
        .view("totalSupply", vec![], vec![uint()])
        .view("balanceOf", vec![Address], vec![uint()])
        .view("allowance", vec![Address, Address], vec![uint()])
        .function("transfer", vec![Address, uint()], vec![Bool])
        .function("transferFrom", vec![Address, Address, uint()], vec![Bool])
        .function("approve", vec![Address, uint()], vec![Bool])
        .function("mint", vec![Address, uint()], vec![])
        .function("burn", vec![uint()], vec![])
        .function("burnFrom", vec![Address, uint()], vec![])
}

/// ERC20 token with mint and burn
pub fn erc20() -> ContractAbi {
    erc20_base("ERC20").build()
}

/// ERC20 token with mint, burn and `Ownable` administration
pub fn erc20_ownable() -> ContractAbi {
    erc20_base("ERC20Ownable")
        .view("owner", vec![], vec![ParamType::Address])
        .function("transferOwnership", vec![ParamType::Address], vec![])
        .function("renounceOwnership", vec![], vec![])
        .build()
}

/// ERC721 token with safe mint and burn
pub fn erc721() -> ContractAbi {
    use ParamType::{Address, Bool, Bytes, String};

    ContractAbiBuilder::new("ERC721")
        // initialOwner, name, symbol
        .constructor(vec![Address, String, String])
        .view("name", vec![], vec![String])
        .view("symbol", vec![], vec![String])
        .view("balanceOf", vec![Address], vec![uint()])
        .view("ownerOf", vec![uint()], vec![Address])
        .view("tokenURI", vec![uint()], vec![String])
        .view("getApproved", vec![uint()], vec![Address])
        .view("isApprovedForAll", vec![Address, Address], vec![Bool])
        .function("transferFrom", vec![Address, Address, uint()], vec![])
        .function("safeTransferFrom", vec![Address, Address, uint()], vec![])
        .overload("safeTransferFromWithData", "safeTransferFrom", vec![Address, Address, uint(), Bytes])
        .function("approve", vec![Address, uint()], vec![])
        .function("setApprovalForAll", vec![Address, Bool], vec![])
        .function("safeMint", vec![Address, uint()], vec![])
        .function("burn", vec![uint()], vec![])
        .build()
}

/// ERC1155 multi-token with mint and burn
pub fn erc1155() -> ContractAbi {
    use ParamType::{Address, Bool, Bytes, String};

    ContractAbiBuilder::new("ERC1155")
        // initialOwner, uri
        .constructor(vec![Address, String])
        .view("balanceOf", vec![Address, uint()], vec![uint()])
        .view(
            "balanceOfBatch",
            vec![ParamType::Array(Box::new(Address)), uint_array()],
            vec![uint_array()],
        )
        .view("uri", vec![uint()], vec![String])
        .view("isApprovedForAll", vec![Address, Address], vec![Bool])
        .function("setApprovalForAll", vec![Address, Bool], vec![])
        .function("safeTransferFrom", vec![Address, Address, uint(), uint(), Bytes], vec![])
        .function(
            "safeBatchTransferFrom",
            vec![Address, Address, uint_array(), uint_array(), Bytes],
            vec![],
        )
        .function("mint", vec![Address, uint(), uint(), Bytes], vec![])
        .function("mintBatch", vec![Address, uint_array(), uint_array(), Bytes], vec![])
        .function("burn", vec![Address, uint(), uint()], vec![])
        .function("burnBatch", vec![Address, uint_array(), uint_array()], vec![])
        .build()
}
