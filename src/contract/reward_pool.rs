//! Convex-style base reward pool binding

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use alloy_dyn_abi::DynSolValue;

use crate::abi::{ContractDescriptor, FunctionSpec, Mutability};
use crate::connection::Connection;
use crate::contract::{BoundCall, BoundContract};
use crate::error::Result;

/// Typed handle for a Convex-style base reward pool
#[derive(Clone)]
pub struct BaseRewardPool {
    contract: BoundContract,
}

impl BaseRewardPool {
    /// The reward pool's fixed function surface
    pub fn descriptor() -> ContractDescriptor {
        ContractDescriptor::new("BaseRewardPool")
            .with_function(FunctionSpec::new(
                "earned",
                &[("account", "address")],
                &[("", "uint256")],
                Mutability::View,
            ))
            .with_function(FunctionSpec::new(
                "getReward",
                &[],
                &[("", "bool")],
                Mutability::Mutating,
            ))
            .with_function(FunctionSpec::new(
                "withdrawAndUnwrap",
                &[("amount", "uint256"), ("claim", "bool")],
                &[("", "bool")],
                Mutability::Mutating,
            ))
    }

    /// Bind the reward pool at `address` over `connection`
    pub fn new(address: Address, connection: Arc<dyn Connection>) -> Self {
        Self {
            contract: BoundContract::new(Arc::new(Self::descriptor()), address, connection),
        }
    }

    /// The underlying bound contract
    pub fn contract(&self) -> &BoundContract {
        &self.contract
    }

    /// Reward amount accrued to `account`
    pub fn earned(&self, account: Address) -> Result<BoundCall<U256>> {
        self.contract
            .method("earned", &[DynSolValue::Address(account)])
    }

    /// Claim all accrued rewards for the sender
    pub fn get_reward(&self) -> Result<BoundCall<bool>> {
        self.contract.method("getReward", &[])
    }

    /// Withdraw `amount` of staked tokens, unwrapping to the underlying;
    /// claims pending rewards as well when `claim` is set
    pub fn withdraw_and_unwrap(&self, amount: U256, claim: bool) -> Result<BoundCall<bool>> {
        self.contract.method(
            "withdrawAndUnwrap",
            &[DynSolValue::Uint(amount, 256), DynSolValue::Bool(claim)],
        )
    }
}
