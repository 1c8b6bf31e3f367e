//! Ledger node access: the `NodeClient` seam and its JSON-RPC transport.
//!
//! # Responsibilities
//! - Define the five node operations the pipeline depends on
//! - Connect to JSON-RPC endpoints with per-request timeouts
//! - Fail over read calls across configured endpoints
//! - Classify failures as unreachable (transport) or rejected (node said no)

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::transports::{TransportError, TransportResult};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::{ChainId, Receipt, SubmitError, SubmitResult};
use crate::config::schema::NodeConfig;
use crate::observability::metrics;

/// Operations the submission pipeline needs from a ledger node.
///
/// Implementations may fail over to another endpoint but must not retry the
/// same endpoint: callers decide retry policy.
#[async_trait]
pub trait NodeClient: Send + Sync {
    /// `eth_getTransactionCount` at the latest block.
    async fn get_transaction_count(&self, address: Address) -> SubmitResult<u64>;

    /// `eth_getBalance` at the latest block, in wei.
    async fn get_balance(&self, address: Address) -> SubmitResult<U256>;

    /// `eth_estimateGas` for a call from `from` to `to` with `data`.
    async fn estimate_gas(&self, from: Address, to: Address, data: Bytes) -> SubmitResult<u64>;

    /// `eth_sendRawTransaction`. Not idempotent.
    async fn send_raw_transaction(&self, raw: Bytes) -> SubmitResult<TxHash>;

    /// `eth_getTransactionReceipt`. `None` while the node has no receipt.
    async fn get_transaction_receipt(&self, tx_hash: TxHash) -> SubmitResult<Option<Receipt>>;
}

type SharedProvider = Arc<dyn Provider + Send + Sync>;

/// JSON-RPC node client with read failover support.
#[derive(Clone)]
pub struct RpcNode {
    /// List of providers (primary + failovers).
    providers: Vec<SharedProvider>,
    /// Configuration.
    config: NodeConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl RpcNode {
    /// Create a new node client.
    ///
    /// A node serving a different chain fails construction with `ChainMismatch`.
    /// An unreachable node is only logged; the first pipeline call surfaces it.
    pub async fn new(config: NodeConfig, expected_chain_id: u64) -> SubmitResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        // 1. Add primary provider
        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            SubmitError::NodeUnreachable(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push(Arc::new(ProviderBuilder::new().connect_http(primary_url)) as SharedProvider);

        // 2. Add failover providers
        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(Arc::new(ProviderBuilder::new().connect_http(url)) as SharedProvider);
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        let client = Self {
            providers,
            config: config.clone(),
            timeout_duration,
        };

        match client.verify_chain_id(expected_chain_id).await {
            Ok(()) => {
                tracing::info!(
                    rpc_url = %config.rpc_url,
                    chain_id = expected_chain_id,
                    "Node client initialized"
                );
            }
            Err(e @ SubmitError::ChainMismatch { .. }) => {
                tracing::error!(rpc_url = %config.rpc_url, error = %e, "Node serves the wrong chain");
                return Err(e);
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Node client initialized but chain verification failed"
                );
            }
        }

        Ok(client)
    }

    /// Verify the connected chain ID matches `expected`.
    pub async fn verify_chain_id(&self, expected: u64) -> SubmitResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != expected {
            return Err(SubmitError::ChainMismatch {
                expected,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> SubmitResult<ChainId> {
        self.read("eth_chainId", |p| async move { p.get_chain_id().await })
            .await
            .map(ChainId)
    }

    /// Run a read call against each provider in turn.
    ///
    /// A rejection is definitive and returned at once; transport failures and
    /// timeouts move on to the next provider.
    async fn read<T, F, Fut>(&self, method: &'static str, call: F) -> SubmitResult<T>
    where
        F: Fn(SharedProvider) -> Fut,
        Fut: Future<Output = TransportResult<T>>,
    {
        let mut last_error = None;
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, call(provider.clone())).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => match classify(method, e) {
                    rejected @ SubmitError::NodeRejected(_) => return Err(rejected),
                    unreachable => {
                        tracing::warn!(provider_idx = i, method, error = %unreachable, "RPC error, trying next provider");
                        last_error = Some(unreachable);
                    }
                },
                Err(_) => {
                    tracing::warn!(provider_idx = i, method, "RPC timeout, trying next provider");
                    metrics::record_rpc_error(method, "timeout");
                    last_error = Some(self.timeout_error(method));
                }
            }
        }
        Err(last_error.unwrap_or_else(|| {
            SubmitError::NodeUnreachable(format!("All RPC providers failed for {}", method))
        }))
    }

    fn timeout_error(&self, method: &str) -> SubmitError {
        SubmitError::NodeUnreachable(format!(
            "{} timed out after {} seconds",
            method, self.config.rpc_timeout_secs
        ))
    }
}

#[async_trait]
impl NodeClient for RpcNode {
    async fn get_transaction_count(&self, address: Address) -> SubmitResult<u64> {
        self.read("eth_getTransactionCount", |p| async move {
            p.get_transaction_count(address).await
        })
        .await
    }

    async fn get_balance(&self, address: Address) -> SubmitResult<U256> {
        self.read("eth_getBalance", |p| async move { p.get_balance(address).await })
            .await
    }

    async fn estimate_gas(&self, from: Address, to: Address, data: Bytes) -> SubmitResult<u64> {
        let request = TransactionRequest::default()
            .with_from(from)
            .with_to(to)
            .with_input(data);
        self.read("eth_estimateGas", |p| {
            let request = request.clone();
            async move { p.estimate_gas(request).await }
        })
        .await
    }

    /// Submitted to the primary provider only. Re-sending after an unknown
    /// outcome is the caller's decision, never the transport's.
    async fn send_raw_transaction(&self, raw: Bytes) -> SubmitResult<TxHash> {
        const METHOD: &str = "eth_sendRawTransaction";
        let provider = &self.providers[0];
        match timeout(self.timeout_duration, provider.send_raw_transaction(&raw)).await {
            Ok(Ok(pending)) => Ok(*pending.tx_hash()),
            Ok(Err(e)) => Err(classify(METHOD, e)),
            Err(_) => {
                metrics::record_rpc_error(METHOD, "timeout");
                Err(self.timeout_error(METHOD))
            }
        }
    }

    async fn get_transaction_receipt(&self, tx_hash: TxHash) -> SubmitResult<Option<Receipt>> {
        self.read("eth_getTransactionReceipt", |p| async move {
            p.get_transaction_receipt(tx_hash).await
        })
        .await
        .map(|receipt| receipt.map(Receipt::from))
    }
}

impl std::fmt::Debug for RpcNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcNode")
            .field("rpc_url", &self.config.rpc_url)
            .field("failover_urls", &self.config.failover_urls.len())
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}

/// Map a transport error onto the submission taxonomy.
///
/// A JSON-RPC error response means the node processed and refused the call;
/// everything else (connection, HTTP, malformed body) is treated as the node
/// being unreachable.
fn classify(method: &'static str, err: TransportError) -> SubmitError {
    match err.as_error_resp() {
        Some(payload) => {
            metrics::record_rpc_error(method, "rejected");
            SubmitError::NodeRejected(payload.message.to_string())
        }
        None => {
            metrics::record_rpc_error(method, "unreachable");
            SubmitError::NodeUnreachable(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::rpc::json_rpc::ErrorPayload;
    use alloy::transports::{RpcError, TransportErrorKind};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    fn test_config() -> NodeConfig {
        NodeConfig {
            // Nothing listens on port 1.
            rpc_url: "http://127.0.0.1:1".to_string(),
            failover_urls: Vec::new(),
            rpc_timeout_secs: 2,
        }
    }

    /// Serve HTTP JSON-RPC on a local port, answering every call with `result`.
    async fn spawn_responder(result: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve_connection(stream, result));
            }
        });
        format!("http://{}", addr)
    }

    async fn serve_connection(mut stream: TcpStream, result: &'static str) {
        let mut buf = Vec::new();
        loop {
            // Wait for a complete request: headers plus Content-Length bytes of body.
            let request = loop {
                if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    let headers = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                    let len = headers
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if buf.len() >= end + 4 + len {
                        let body = buf[end + 4..end + 4 + len].to_vec();
                        buf.drain(..end + 4 + len);
                        break body;
                    }
                }
                let mut chunk = [0u8; 4096];
                match stream.read(&mut chunk).await {
                    Ok(0) | Err(_) => return,
                    Ok(n) => buf.extend_from_slice(&chunk[..n]),
                }
            };

            let request: serde_json::Value = serde_json::from_slice(&request).unwrap();
            let body = serde_json::json!({
                "jsonrpc": "2.0",
                "id": request["id"],
                "result": result,
            })
            .to_string();
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
                body.len(),
                body
            );
            if stream.write_all(response.as_bytes()).await.is_err() {
                return;
            }
        }
    }

    #[test]
    fn test_classify_error_response_as_rejected() {
        let err: TransportError = RpcError::ErrorResp(ErrorPayload {
            code: -32000,
            message: "nonce too low".into(),
            data: None,
        });
        assert_eq!(
            classify("eth_sendRawTransaction", err),
            SubmitError::NodeRejected("nonce too low".to_string())
        );
    }

    #[test]
    fn test_classify_transport_error_as_unreachable() {
        let err = TransportErrorKind::custom_str("connection refused");
        assert!(matches!(
            classify("eth_getBalance", err),
            SubmitError::NodeUnreachable(_)
        ));
    }

    #[tokio::test]
    async fn test_client_creation_tolerates_unreachable_node() {
        let result = RpcNode::new(test_config(), 80001).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_client_creation_rejects_wrong_chain() {
        let mut config = test_config();
        config.rpc_url = spawn_responder("0x1").await;

        let result = RpcNode::new(config, 80001).await;

        assert_eq!(
            result.err(),
            Some(SubmitError::ChainMismatch {
                expected: 80001,
                actual: 1,
            })
        );
    }

    #[tokio::test]
    async fn test_client_creation_accepts_matching_chain() {
        let mut config = test_config();
        config.rpc_url = spawn_responder("0x13881").await;

        let client = RpcNode::new(config, 80001).await.unwrap();

        assert_eq!(client.get_chain_id().await, Ok(ChainId(80001)));
    }

    #[tokio::test]
    async fn test_invalid_rpc_url() {
        let mut config = test_config();
        config.rpc_url = "not a url".to_string();
        let result = RpcNode::new(config, 80001).await;
        assert!(matches!(result, Err(SubmitError::NodeUnreachable(_))));
    }

    #[tokio::test]
    async fn test_rpc_failover_reports_unreachable() {
        let mut config = test_config();
        config.failover_urls.push("http://127.0.0.1:2".to_string());
        config.failover_urls.push("::invalid::".to_string());

        let client = RpcNode::new(config, 80001).await.unwrap();
        assert_eq!(client.providers.len(), 2);

        let result = client.get_balance(Address::ZERO).await;
        assert!(matches!(result, Err(SubmitError::NodeUnreachable(_))));
    }
}
