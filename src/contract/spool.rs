//! Curve-style 4-coin stable pool binding

use std::sync::Arc;

use alloy::primitives::{Address, I256, U256};
use alloy_dyn_abi::DynSolValue;

use crate::abi::{ContractDescriptor, FunctionSpec, Mutability};
use crate::connection::Connection;
use crate::contract::{BoundCall, BoundContract};
use crate::error::{Error, Result};

/// Width of the pool's fixed coin-amount arrays
pub const N_COINS: usize = 4;

/// Typed handle for a Curve-style stable pool
#[derive(Clone)]
pub struct SPool {
    contract: BoundContract,
}

impl SPool {
    /// The pool's fixed function surface
    pub fn descriptor() -> ContractDescriptor {
        ContractDescriptor::new("SPool")
            .with_function(FunctionSpec::new(
                "add_liquidity",
                &[("amounts", "uint256[4]"), ("min_mint_amount", "uint256")],
                &[],
                Mutability::Mutating,
            ))
            .with_function(FunctionSpec::new(
                "coins",
                &[("index", "int128")],
                &[("", "address")],
                Mutability::View,
            ))
            .with_function(FunctionSpec::new(
                "remove_liquidity",
                &[("amount", "uint256"), ("min_amounts", "uint256[4]")],
                &[],
                Mutability::Mutating,
            ))
    }

    /// Bind the pool at `address` over `connection`
    pub fn new(address: Address, connection: Arc<dyn Connection>) -> Self {
        Self {
            contract: BoundContract::new(Arc::new(Self::descriptor()), address, connection),
        }
    }

    /// The underlying bound contract
    pub fn contract(&self) -> &BoundContract {
        &self.contract
    }

    /// Deposit `amounts` of each coin, minting at least `min_mint_amount`
    /// LP tokens
    pub fn add_liquidity(
        &self,
        amounts: [U256; N_COINS],
        min_mint_amount: U256,
    ) -> Result<BoundCall<()>> {
        self.contract.method(
            "add_liquidity",
            &[
                uint_array(amounts),
                DynSolValue::Uint(min_mint_amount, 256),
            ],
        )
    }

    /// Address of the coin at `index`
    pub fn coins(&self, index: i128) -> Result<BoundCall<Address>> {
        let index = I256::try_from(index)
            .map_err(|err| Error::encoding("coins", format!("index: {err}")))?;
        self.contract
            .method("coins", &[DynSolValue::Int(index, 128)])
    }

    /// Burn `amount` LP tokens for at least `min_amounts` of each coin
    pub fn remove_liquidity(
        &self,
        amount: U256,
        min_amounts: [U256; N_COINS],
    ) -> Result<BoundCall<()>> {
        self.contract.method(
            "remove_liquidity",
            &[DynSolValue::Uint(amount, 256), uint_array(min_amounts)],
        )
    }
}

fn uint_array(values: [U256; N_COINS]) -> DynSolValue {
    DynSolValue::FixedArray(
        values
            .into_iter()
            .map(|value| DynSolValue::Uint(value, 256))
            .collect(),
    )
}
