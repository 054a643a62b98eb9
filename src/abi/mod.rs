//! Contract descriptors - the fixed function surfaces consumed by the call layer
//!
//! A descriptor is declarative data: an ordered list of function
//! signatures with input/output types and a mutability class, sourced
//! from an externally maintained ABI. It is immutable once built and is
//! never extended at runtime.

pub mod codec;

use alloy_json_abi::{JsonAbi, StateMutability};
use alloy_primitives::keccak256;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A function parameter specification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name (may be empty)
    pub name: String,
    /// Solidity type (e.g., "address", "uint256[4]", "int128")
    pub kind: String,
}

impl ParamSpec {
    pub fn new(name: &str, kind: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
        }
    }
}

/// Whether a function mutates remote state or only reads it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mutability {
    /// Read-only; invoked as a simulated execution
    View,
    /// State-changing; invoked as a submitted transaction
    Mutating,
}

impl Mutability {
    pub fn is_view(self) -> bool {
        matches!(self, Mutability::View)
    }
}

impl From<StateMutability> for Mutability {
    fn from(state: StateMutability) -> Self {
        match state {
            StateMutability::Pure | StateMutability::View => Mutability::View,
            StateMutability::NonPayable | StateMutability::Payable => Mutability::Mutating,
        }
    }
}

/// A declared contract function with its canonical signature and selector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSpec {
    /// Function name
    pub name: String,
    /// Full signature string (e.g., "coins(int128)")
    pub signature: String,
    /// 4-byte function selector
    pub selector: [u8; 4],
    /// Input parameters
    pub inputs: Vec<ParamSpec>,
    /// Output parameters
    pub outputs: Vec<ParamSpec>,
    /// Mutability class
    pub mutability: Mutability,
}

impl FunctionSpec {
    /// Build a function spec from (name, type) pairs. The signature and
    /// selector are computed here and never change afterwards.
    pub fn new(
        name: &str,
        inputs: &[(&str, &str)],
        outputs: &[(&str, &str)],
        mutability: Mutability,
    ) -> Self {
        let inputs: Vec<ParamSpec> = inputs
            .iter()
            .map(|(name, kind)| ParamSpec::new(name, kind))
            .collect();
        let outputs: Vec<ParamSpec> = outputs
            .iter()
            .map(|(name, kind)| ParamSpec::new(name, kind))
            .collect();
        let signature = canonical_signature(name, &inputs);
        let selector = compute_selector(&signature);

        Self {
            name: name.to_string(),
            signature,
            selector,
            inputs,
            outputs,
            mutability,
        }
    }

    /// Get selector as hex string
    pub fn selector_hex(&self) -> String {
        format!("0x{}", hex::encode(self.selector))
    }
}

/// An ordered, immutable set of function signatures for one contract
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractDescriptor {
    name: String,
    functions: Vec<FunctionSpec>,
}

impl ContractDescriptor {
    /// Create an empty descriptor for the named contract
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            functions: Vec::new(),
        }
    }

    /// Append a function signature
    ///
    /// Note: First function for a given name wins (no overwrite)
    pub fn with_function(mut self, function: FunctionSpec) -> Self {
        if self.function(&function.name).is_none() {
            self.functions.push(function);
        }
        self
    }

    /// Parse a descriptor from ABI JSON - either a raw fragment array or
    /// a Hardhat/Foundry artifact with an "abi" field.
    pub fn from_json(name: &str, content: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(content)
            .map_err(|err| Error::Abi(format!("{name}: {err}")))?;

        let abi_value = if value.is_array() {
            value
        } else if let Some(abi) = value.get("abi") {
            abi.clone()
        } else {
            return Err(Error::Abi(format!("{name}: no ABI array found")));
        };

        let abi: JsonAbi = serde_json::from_value(abi_value)
            .map_err(|err| Error::Abi(format!("{name}: {err}")))?;

        let mut descriptor = Self::new(name);
        for function in abi.functions() {
            let signature = function.signature();
            let selector = compute_selector(&signature);

            let inputs: Vec<ParamSpec> = function
                .inputs
                .iter()
                .map(|input| ParamSpec {
                    name: input.name.clone(),
                    kind: input.ty.to_string(),
                })
                .collect();
            let outputs: Vec<ParamSpec> = function
                .outputs
                .iter()
                .map(|output| ParamSpec {
                    name: output.name.clone(),
                    kind: output.ty.to_string(),
                })
                .collect();

            descriptor = descriptor.with_function(FunctionSpec {
                name: function.name.clone(),
                signature,
                selector,
                inputs,
                outputs,
                mutability: function.state_mutability.into(),
            });
        }

        Ok(descriptor)
    }

    /// Contract name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a function by name
    pub fn function(&self, name: &str) -> Option<&FunctionSpec> {
        self.functions.iter().find(|function| function.name == name)
    }

    /// Look up a function by 4-byte selector
    pub fn by_selector(&self, selector: [u8; 4]) -> Option<&FunctionSpec> {
        self.functions
            .iter()
            .find(|function| function.selector == selector)
    }

    /// Iterate the declared functions, in declaration order
    pub fn functions(&self) -> impl Iterator<Item = &FunctionSpec> {
        self.functions.iter()
    }

    /// Get the number of declared functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Check if the descriptor is empty
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

fn canonical_signature(name: &str, inputs: &[ParamSpec]) -> String {
    let kinds: Vec<&str> = inputs.iter().map(|param| param.kind.as_str()).collect();
    format!("{}({})", name, kinds.join(","))
}

/// Compute the 4-byte function selector from a signature
fn compute_selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}
