//! Bound contract handles and the typed call builder
//!
//! A `BoundContract` joins a descriptor with an address and a
//! connection; `method` validates and encodes arguments up front and
//! hands back a `BoundCall` covering every invocation variant: submit,
//! simulate, estimate, or export the unsent request.

mod reward_pool;
mod spool;

pub use reward_pool::BaseRewardPool;
pub use spool::SPool;

use std::marker::PhantomData;
use std::sync::Arc;

use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::{TransactionInput, TransactionRequest};
use alloy_dyn_abi::DynSolValue;
use tracing::trace;

use crate::abi::{codec, ContractDescriptor, FunctionSpec};
use crate::connection::{Connection, PendingTx};
use crate::error::{Error, Result};

/// A contract descriptor joined with an address and a connection
///
/// The callable surface is exactly the descriptor's function set.
#[derive(Clone)]
pub struct BoundContract {
    descriptor: Arc<ContractDescriptor>,
    address: Address,
    connection: Arc<dyn Connection>,
}

impl BoundContract {
    pub fn new(
        descriptor: Arc<ContractDescriptor>,
        address: Address,
        connection: Arc<dyn Connection>,
    ) -> Self {
        Self {
            descriptor,
            address,
            connection,
        }
    }

    /// Contract address
    pub fn address(&self) -> Address {
        self.address
    }

    /// The descriptor this handle was bound with
    pub fn descriptor(&self) -> &ContractDescriptor {
        &self.descriptor
    }

    /// Look up a declared function
    pub fn function(&self, name: &str) -> Result<&FunctionSpec> {
        self.descriptor.function(name).ok_or_else(|| {
            Error::encoding(
                name,
                format!("not declared by `{}`", self.descriptor.name()),
            )
        })
    }

    /// Build a typed call for `name`, validating and encoding `args`
    /// before anything touches the network
    pub fn method<T: FromReturn>(&self, name: &str, args: &[DynSolValue]) -> Result<BoundCall<T>> {
        let function = self.function(name)?.clone();
        let calldata = codec::encode_input(&function, args)?;

        Ok(BoundCall {
            connection: self.connection.clone(),
            address: self.address,
            function,
            calldata: Bytes::from(calldata),
            from: None,
            marker: PhantomData,
        })
    }

    /// Encode calldata for `name` without building a call
    pub fn encode_input(&self, name: &str, args: &[DynSolValue]) -> Result<Bytes> {
        let function = self.function(name)?;
        Ok(Bytes::from(codec::encode_input(function, args)?))
    }

    /// Decode the arguments of `name` from full calldata
    pub fn decode_input(&self, name: &str, data: &[u8]) -> Result<Vec<DynSolValue>> {
        codec::decode_input(self.function(name)?, data)
    }

    /// Decode raw return bytes of `name` against its declared outputs
    pub fn decode_output(&self, name: &str, data: &[u8]) -> Result<Vec<DynSolValue>> {
        codec::decode_output(self.function(name)?, data)
    }
}

/// Conversion from decoded return values to a typed result
pub trait FromReturn: Sized {
    fn from_return(function: &str, values: Vec<DynSolValue>) -> Result<Self>;
}

impl FromReturn for Vec<DynSolValue> {
    fn from_return(_function: &str, values: Vec<DynSolValue>) -> Result<Self> {
        Ok(values)
    }
}

impl FromReturn for () {
    fn from_return(function: &str, values: Vec<DynSolValue>) -> Result<Self> {
        if values.is_empty() {
            Ok(())
        } else {
            Err(Error::decoding(
                function,
                format!("expected no return values, got {}", values.len()),
            ))
        }
    }
}

fn single(function: &str, mut values: Vec<DynSolValue>) -> Result<DynSolValue> {
    let count = values.len();
    match values.pop() {
        Some(value) if count == 1 => Ok(value),
        _ => Err(Error::decoding(
            function,
            format!("expected a single return value, got {count}"),
        )),
    }
}

impl FromReturn for bool {
    fn from_return(function: &str, values: Vec<DynSolValue>) -> Result<Self> {
        match single(function, values)? {
            DynSolValue::Bool(value) => Ok(value),
            other => Err(Error::decoding(
                function,
                format!("expected bool, got {:?}", other),
            )),
        }
    }
}

impl FromReturn for U256 {
    fn from_return(function: &str, values: Vec<DynSolValue>) -> Result<Self> {
        match single(function, values)? {
            DynSolValue::Uint(value, _) => Ok(value),
            other => Err(Error::decoding(
                function,
                format!("expected uint, got {:?}", other),
            )),
        }
    }
}

impl FromReturn for Address {
    fn from_return(function: &str, values: Vec<DynSolValue>) -> Result<Self> {
        match single(function, values)? {
            DynSolValue::Address(value) => Ok(value),
            other => Err(Error::decoding(
                function,
                format!("expected address, got {:?}", other),
            )),
        }
    }
}

/// One encoded invocation of a declared function
///
/// The calldata is fixed at construction; pick an invocation variant:
/// `send` (state-changing submission), `call` (simulate and decode),
/// `estimate_gas`, or `into_request` for callers that batch, sign
/// offline, or modify before sending.
pub struct BoundCall<T = Vec<DynSolValue>> {
    connection: Arc<dyn Connection>,
    address: Address,
    function: FunctionSpec,
    calldata: Bytes,
    from: Option<Address>,
    marker: PhantomData<fn() -> T>,
}

impl<T: FromReturn> BoundCall<T> {
    /// Set the sender recorded on the outgoing request
    pub fn from(mut self, sender: Address) -> Self {
        self.from = Some(sender);
        self
    }

    /// The encoded calldata, selector included
    pub fn calldata(&self) -> &Bytes {
        &self.calldata
    }

    /// The declared function this call targets
    pub fn function(&self) -> &FunctionSpec {
        &self.function
    }

    /// The transaction request this call would submit, unsent
    pub fn into_request(self) -> TransactionRequest {
        self.request()
    }

    fn request(&self) -> TransactionRequest {
        let mut request = TransactionRequest::default()
            .to(self.address)
            .input(TransactionInput::new(self.calldata.clone()));
        if let Some(from) = self.from {
            request = request.from(from);
        }
        request
    }

    /// Submit as a state-changing transaction
    pub async fn send(self) -> Result<PendingTx> {
        trace!(function = %self.function.signature, to = %self.address, "send");
        self.connection.send_transaction(self.request()).await
    }

    /// Execute read-only and decode the declared outputs
    pub async fn call(self) -> Result<T> {
        trace!(function = %self.function.signature, to = %self.address, "call");
        let raw = self.connection.call(self.request()).await?;
        let values = codec::decode_output(&self.function, &raw)?;
        T::from_return(&self.function.name, values)
    }

    /// Estimate the gas cost of this call
    pub async fn estimate_gas(self) -> Result<u64> {
        self.connection.estimate_gas(self.request()).await
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::TxKind;

    use super::*;
    use crate::abi::Mutability;
    use crate::connection::mock::{MockConnection, Recorded};

    fn token_descriptor() -> Arc<ContractDescriptor> {
        Arc::new(
            ContractDescriptor::new("Token")
                .with_function(FunctionSpec::new(
                    "balanceOf",
                    &[("account", "address")],
                    &[("", "uint256")],
                    Mutability::View,
                ))
                .with_function(FunctionSpec::new(
                    "transfer",
                    &[("to", "address"), ("amount", "uint256")],
                    &[("", "bool")],
                    Mutability::Mutating,
                )),
        )
    }

    fn uint_word(value: u64) -> Bytes {
        let mut word = [0u8; 32];
        word[24..].copy_from_slice(&value.to_be_bytes());
        Bytes::from(word.to_vec())
    }

    #[tokio::test]
    async fn test_call_decodes_typed_result() {
        let connection = Arc::new(MockConnection::new().respond_with(uint_word(7)));
        let contract =
            BoundContract::new(token_descriptor(), Address::repeat_byte(0xaa), connection);

        let balance: U256 = contract
            .method::<U256>("balanceOf", &[DynSolValue::Address(Address::ZERO)])
            .unwrap()
            .call()
            .await
            .unwrap();

        assert_eq!(balance, U256::from(7u64));
    }

    #[tokio::test]
    async fn test_send_records_submission() {
        let connection = Arc::new(MockConnection::new());
        let contract = BoundContract::new(
            token_descriptor(),
            Address::repeat_byte(0xaa),
            connection.clone(),
        );

        let args = [
            DynSolValue::Address(Address::repeat_byte(0x01)),
            DynSolValue::Uint(U256::from(5u64), 256),
        ];
        let pending = contract
            .method::<bool>("transfer", &args)
            .unwrap()
            .from(Address::repeat_byte(0x02))
            .send()
            .await
            .unwrap();
        assert_eq!(pending.hash(), alloy::primitives::B256::repeat_byte(0x11));

        let recorded = connection.recorded();
        assert_eq!(recorded.len(), 1);
        let Recorded::SendTransaction(request) = &recorded[0] else {
            panic!("expected a submission");
        };
        assert_eq!(request.to, Some(TxKind::Call(Address::repeat_byte(0xaa))));
        assert_eq!(request.from, Some(Address::repeat_byte(0x02)));
        let input = request.input.input.as_ref().unwrap();
        assert_eq!(&input[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[tokio::test]
    async fn test_domain_violation_precedes_network() {
        let connection = Arc::new(MockConnection::new());
        let contract = BoundContract::new(
            token_descriptor(),
            Address::repeat_byte(0xaa),
            connection.clone(),
        );

        // Signed value for an unsigned slot never leaves the process
        let args = [
            DynSolValue::Address(Address::ZERO),
            DynSolValue::Int(alloy::primitives::I256::MINUS_ONE, 256),
        ];
        let result = contract.method::<bool>("transfer", &args);

        assert!(matches!(result, Err(Error::Encoding { .. })));
        assert!(connection.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_estimate_gas_routes_to_estimate() {
        let connection = Arc::new(MockConnection::new());
        let contract = BoundContract::new(
            token_descriptor(),
            Address::repeat_byte(0xaa),
            connection.clone(),
        );

        let gas = contract
            .method::<U256>("balanceOf", &[DynSolValue::Address(Address::ZERO)])
            .unwrap()
            .estimate_gas()
            .await
            .unwrap();

        assert_eq!(gas, 21_000);
        assert!(matches!(
            connection.recorded().as_slice(),
            [Recorded::EstimateGas(_)]
        ));
    }

    #[test]
    fn test_into_request_is_unsent() {
        let connection = Arc::new(MockConnection::new());
        let contract = BoundContract::new(
            token_descriptor(),
            Address::repeat_byte(0xaa),
            connection.clone(),
        );

        let call = contract
            .method::<U256>("balanceOf", &[DynSolValue::Address(Address::ZERO)])
            .unwrap();
        let calldata = call.calldata().clone();
        let request = call.into_request();

        assert_eq!(request.to, Some(TxKind::Call(Address::repeat_byte(0xaa))));
        assert_eq!(request.input.input.as_ref(), Some(&calldata));
        assert!(connection.recorded().is_empty());
    }

    #[test]
    fn test_unknown_function_is_rejected() {
        let connection = Arc::new(MockConnection::new());
        let contract =
            BoundContract::new(token_descriptor(), Address::repeat_byte(0xaa), connection);

        let result = contract.method::<bool>("mint", &[]);
        assert!(matches!(result, Err(Error::Encoding { .. })));
    }

    #[tokio::test]
    async fn test_wrong_return_shape_is_decoding_error() {
        // Empty response for a declared uint256 output
        let connection = Arc::new(MockConnection::new().respond_with(Bytes::new()));
        let contract =
            BoundContract::new(token_descriptor(), Address::repeat_byte(0xaa), connection);

        let result = contract
            .method::<U256>("balanceOf", &[DynSolValue::Address(Address::ZERO)])
            .unwrap()
            .call()
            .await;

        assert!(matches!(result, Err(Error::Decoding { .. })));
    }
}
