use std::time::Duration;

use thiserror::Error;
use tonic::transport::Endpoint;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("invalid node endpoint `{uri}`: {source}")]
    Endpoint {
        uri: String,
        #[source]
        source: tonic::transport::Error,
    },
}

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// gRPC endpoint of the node's UI service.
    pub node_uri: String,
    /// Deadline for a single operation.
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Messages that may wait at the boundary before senders block.
    pub queue_depth: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            node_uri: "http://[::1]:10000".to_owned(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
            queue_depth: 64,
        }
    }
}

impl BridgeConfig {
    pub fn endpoint(&self) -> Result<Endpoint, BridgeError> {
        let endpoint = Endpoint::from_shared(self.node_uri.clone()).map_err(|source| {
            BridgeError::Endpoint {
                uri: self.node_uri.clone(),
                source,
            }
        })?;
        Ok(endpoint
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout))
    }
}
