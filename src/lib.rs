//! conduit: typed EVM contract calls over Alloy transports
//!
//! Bind a fixed contract surface (a descriptor) to an address and a
//! connection, then invoke its functions with checked argument and
//! return types. Arguments are validated locally before anything is
//! sent; read-only functions simulate, state-changing functions submit,
//! and every call can also be estimated or exported as an unsent
//! request.
//!
//! ```no_run
//! use alloy::primitives::{Address, U256};
//! use conduit::{connect, ProviderConfig, SPool};
//!
//! # async fn demo() -> conduit::Result<()> {
//! let connection = connect(ProviderConfig::Http("http://localhost:8545".into())).await?;
//! let pool = SPool::new(Address::ZERO, connection);
//!
//! let coin = pool.coins(0)?.call().await?;
//! let pending = pool
//!     .add_liquidity([U256::from(1_000u64); 4], U256::ZERO)?
//!     .send()
//!     .await?;
//! # let _ = (coin, pending);
//! # Ok(())
//! # }
//! ```

pub mod abi;
pub mod config;
pub mod connection;
pub mod contract;
mod error;

pub use abi::{codec, ContractDescriptor, FunctionSpec, Mutability, ParamSpec};
pub use connection::{connect, AlloyConnection, Connection, PendingTx, ProviderConfig};
pub use contract::{BaseRewardPool, BoundCall, BoundContract, FromReturn, SPool};
pub use error::{Error, Result};
