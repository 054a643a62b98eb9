//! Request-recording connection used by the call-layer tests

use std::collections::VecDeque;
use std::sync::Mutex;

use alloy::primitives::{Bytes, B256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;

use crate::connection::{Connection, PendingTx};
use crate::error::{Error, Result};

/// One request observed by the mock, tagged with how it arrived
#[derive(Debug, Clone)]
pub enum Recorded {
    SendTransaction(TransactionRequest),
    Call(TransactionRequest),
    EstimateGas(TransactionRequest),
}

impl Recorded {
    pub fn is_submission(&self) -> bool {
        matches!(self, Recorded::SendTransaction(_))
    }
}

/// Connection double that records every request and replays queued
/// call responses in order.
#[derive(Default)]
pub struct MockConnection {
    recorded: Mutex<Vec<Recorded>>,
    call_responses: Mutex<VecDeque<Bytes>>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the raw bytes the next call should return
    pub fn respond_with(self, bytes: Bytes) -> Self {
        self.call_responses.lock().unwrap().push_back(bytes);
        self
    }

    /// Everything this mock has seen, in arrival order
    pub fn recorded(&self) -> Vec<Recorded> {
        self.recorded.lock().unwrap().clone()
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn send_transaction(&self, request: TransactionRequest) -> Result<PendingTx> {
        self.recorded
            .lock()
            .unwrap()
            .push(Recorded::SendTransaction(request));
        Ok(PendingTx::new(B256::repeat_byte(0x11)))
    }

    async fn call(&self, request: TransactionRequest) -> Result<Bytes> {
        self.recorded.lock().unwrap().push(Recorded::Call(request));
        self.call_responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::Simulation {
                revert: None,
                message: "mock: no queued call response".to_string(),
            })
    }

    async fn estimate_gas(&self, request: TransactionRequest) -> Result<u64> {
        self.recorded
            .lock()
            .unwrap()
            .push(Recorded::EstimateGas(request));
        Ok(21_000)
    }

    async fn chain_id(&self) -> Result<u64> {
        Ok(1337)
    }

    fn endpoint_name(&self) -> String {
        "mock".to_string()
    }
}
