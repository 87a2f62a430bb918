use std::sync::Arc;
use std::time::Duration;

use tonic::transport::{Certificate, Channel, ClientTlsConfig, Endpoint};

use crate::gateway::client::GatewayClient;
use crate::gateway::contract::Contract;
use crate::gateway::error::GatewayError;
use crate::gateway::identity::{Identity, Signer};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-call deadlines for gateway requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub evaluate: Duration,
    pub endorse: Duration,
    pub submit: Duration,
    pub commit_status: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Timeouts {
            evaluate: Duration::from_secs(5),
            endorse: Duration::from_secs(15),
            submit: Duration::from_secs(5),
            commit_status: Duration::from_secs(60),
        }
    }
}

/// Opens a TLS channel to the peer, trusting only `tls_ca_pem` and checking
/// the server certificate against `server_name`.
pub async fn create_channel(
    peer_endpoint: &str,
    server_name: &str,
    tls_ca_pem: &[u8],
) -> Result<Channel, GatewayError> {
    let tls = ClientTlsConfig::new()
        .ca_certificate(Certificate::from_pem(tls_ca_pem))
        .domain_name(server_name);

    let channel = Endpoint::from_shared(format!("https://{peer_endpoint}"))?
        .connect_timeout(CONNECT_TIMEOUT)
        .tls_config(tls)?
        .connect()
        .await?;

    log::info!("Connected to gateway peer {} ({})", peer_endpoint, server_name);
    Ok(channel)
}

struct GatewayInner {
    client: GatewayClient,
    identity: Identity,
    signer: Signer,
    timeouts: Timeouts,
}

/// A client session on a gateway peer. Cheap to clone.
#[derive(Clone)]
pub struct Gateway {
    inner: Arc<GatewayInner>,
}

impl Gateway {
    pub fn connect(channel: Channel, identity: Identity, signer: Signer, timeouts: Timeouts) -> Self {
        Gateway {
            inner: Arc::new(GatewayInner {
                client: GatewayClient::new(channel),
                identity,
                signer,
                timeouts,
            }),
        }
    }

    pub fn network(&self, channel_name: &str) -> Network {
        Network {
            gateway: self.clone(),
            channel_name: channel_name.to_string(),
        }
    }

    pub(crate) fn client(&self) -> &GatewayClient {
        &self.inner.client
    }

    pub(crate) fn identity(&self) -> &Identity {
        &self.inner.identity
    }

    pub(crate) fn signer(&self) -> &Signer {
        &self.inner.signer
    }

    pub(crate) fn timeouts(&self) -> &Timeouts {
        &self.inner.timeouts
    }
}

/// A channel on the gateway.
#[derive(Clone)]
pub struct Network {
    gateway: Gateway,
    channel_name: String,
}

impl Network {
    pub fn name(&self) -> &str {
        &self.channel_name
    }

    pub fn contract(&self, chaincode_name: &str) -> Contract {
        Contract::new(
            self.gateway.clone(),
            self.channel_name.clone(),
            chaincode_name.to_string(),
        )
    }
}
