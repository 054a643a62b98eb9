//! EVM connection abstraction and Alloy transport implementations
//!
//! The call layer is a pure client of this trait: it submits, simulates,
//! and estimates against whatever endpoint the connection was built for.
//! Nonce sequencing, confirmation tracking, and retries all belong to
//! the node or the caller, not here. A connection may be shared across
//! any number of bound contracts.

#[cfg(test)]
pub(crate) mod mock;

use std::fmt;
#[cfg(unix)]
use std::path::PathBuf;
use std::sync::Arc;

use alloy::network::Ethereum;
use alloy::primitives::{Bytes, B256};
use alloy::providers::{
    fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
    Identity, Provider, ProviderBuilder, RootProvider,
};
use alloy::rpc::types::TransactionRequest;
use alloy::transports::TransportError;
use async_trait::async_trait;
use tracing::debug;

use crate::error::{Error, Result};

/// Pending-transaction handle returned by a state-changing submission.
///
/// Carries only the hash; confirmation and finality live with the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTx {
    hash: B256,
}

impl PendingTx {
    pub(crate) fn new(hash: B256) -> Self {
        Self { hash }
    }

    /// Transaction hash assigned by the node
    pub fn hash(&self) -> B256 {
        self.hash
    }
}

impl fmt::Display for PendingTx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hash)
    }
}

/// Connection configuration
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    /// HTTP JSON-RPC endpoint
    Http(String),
    /// WebSocket endpoint
    WebSocket(String),
    /// IPC socket path (Unix only)
    #[cfg(unix)]
    Ipc(PathBuf),
}

impl ProviderConfig {
    /// Get display name for this endpoint
    pub fn display(&self) -> String {
        match self {
            ProviderConfig::Http(url) => url.clone(),
            ProviderConfig::WebSocket(url) => url.clone(),
            #[cfg(unix)]
            ProviderConfig::Ipc(path) => path.display().to_string(),
        }
    }
}

/// The network collaborator the call layer talks to
///
/// One outbound request per invocation; the caller suspends until a
/// response or failure arrives. No ordering is guaranteed between
/// concurrent invocations unless the caller serializes them.
#[async_trait]
pub trait Connection: Send + Sync + 'static {
    /// Submit a state-changing transaction; returns the pending hash
    async fn send_transaction(&self, request: TransactionRequest) -> Result<PendingTx>;

    /// Execute a read-only call (eth_call) and return the raw result bytes
    async fn call(&self, request: TransactionRequest) -> Result<Bytes>;

    /// Estimate the gas cost of executing `request`
    async fn estimate_gas(&self, request: TransactionRequest) -> Result<u64>;

    /// Chain id reported by the node
    async fn chain_id(&self) -> Result<u64>;

    /// Get endpoint display name
    fn endpoint_name(&self) -> String;
}

// All transports share the default fill stack
type FilledProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider,
    Ethereum,
>;

/// Enum-based connection that stores concrete types for each transport
pub enum AlloyConnection {
    Http {
        provider: FilledProvider,
        endpoint: String,
    },
    WebSocket {
        provider: FilledProvider,
        endpoint: String,
    },
    #[cfg(unix)]
    Ipc {
        provider: FilledProvider,
        endpoint: String,
    },
}

/// Create a connection from configuration
pub async fn connect(config: ProviderConfig) -> Result<Arc<dyn Connection>> {
    match config {
        ProviderConfig::Http(url) => {
            let rpc_url = url
                .parse()
                .map_err(|err| Error::Connection(format!("invalid HTTP URL `{url}`: {err}")))?;
            let provider = ProviderBuilder::new().connect_http(rpc_url);
            debug!(endpoint = %url, "http connection ready");
            Ok(Arc::new(AlloyConnection::Http {
                provider,
                endpoint: url,
            }))
        }
        ProviderConfig::WebSocket(url) => {
            let provider = ProviderBuilder::new()
                .connect(&url)
                .await
                .map_err(|err| Error::Connection(format!("websocket `{url}`: {err}")))?;
            debug!(endpoint = %url, "websocket connection ready");
            Ok(Arc::new(AlloyConnection::WebSocket {
                provider,
                endpoint: url,
            }))
        }
        #[cfg(unix)]
        ProviderConfig::Ipc(path) => {
            use alloy::providers::IpcConnect;
            let ipc_path = path.to_string_lossy().to_string();
            let ipc = IpcConnect::new(ipc_path);
            let provider = ProviderBuilder::new()
                .connect_ipc(ipc)
                .await
                .map_err(|err| {
                    Error::Connection(format!("ipc `{}`: {err}", path.display()))
                })?;
            let endpoint = path.display().to_string();
            debug!(endpoint = %endpoint, "ipc connection ready");
            Ok(Arc::new(AlloyConnection::Ipc { provider, endpoint }))
        }
    }
}

// Collapses the per-transport dispatch for provider method calls
macro_rules! with_provider {
    ($self:ident, $method:ident $(, $arg:expr)*) => {
        match $self {
            AlloyConnection::Http { provider, .. } => provider.$method($($arg),*).await,
            AlloyConnection::WebSocket { provider, .. } => provider.$method($($arg),*).await,
            #[cfg(unix)]
            AlloyConnection::Ipc { provider, .. } => provider.$method($($arg),*).await,
        }
    };
}

#[async_trait]
impl Connection for AlloyConnection {
    async fn send_transaction(&self, request: TransactionRequest) -> Result<PendingTx> {
        debug!(endpoint = %self.endpoint_name(), "submitting transaction");
        let pending = with_provider!(self, send_transaction, request).map_err(|err| {
            Error::Submission {
                reason: err.to_string(),
            }
        })?;
        Ok(PendingTx::new(*pending.tx_hash()))
    }

    async fn call(&self, request: TransactionRequest) -> Result<Bytes> {
        with_provider!(self, call, request).map_err(simulation_error)
    }

    async fn estimate_gas(&self, request: TransactionRequest) -> Result<u64> {
        with_provider!(self, estimate_gas, request).map_err(simulation_error)
    }

    async fn chain_id(&self) -> Result<u64> {
        with_provider!(self, get_chain_id)
            .map_err(|err| Error::Connection(err.to_string()))
    }

    fn endpoint_name(&self) -> String {
        match self {
            AlloyConnection::Http { endpoint, .. } => endpoint.clone(),
            AlloyConnection::WebSocket { endpoint, .. } => endpoint.clone(),
            #[cfg(unix)]
            AlloyConnection::Ipc { endpoint, .. } => endpoint.clone(),
        }
    }
}

/// Map a transport failure on call/estimate to a simulation error,
/// keeping the node's revert reason when one was surfaced.
fn simulation_error(err: TransportError) -> Error {
    let revert = err
        .as_error_resp()
        .map(|payload| payload.message.to_string());
    Error::Simulation {
        revert,
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_config_display() {
        let http = ProviderConfig::Http("http://localhost:8545".to_string());
        assert_eq!(http.display(), "http://localhost:8545");

        let ws = ProviderConfig::WebSocket("ws://localhost:8546".to_string());
        assert_eq!(ws.display(), "ws://localhost:8546");
    }

    #[tokio::test]
    async fn test_connect_rejects_malformed_url() {
        let result = connect(ProviderConfig::Http("not a url".to_string())).await;
        assert!(matches!(result, Err(Error::Connection(_))));
    }
}
