use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failures while loading the client identity, signer or TLS roots.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{} is not a valid PEM certificate: {source}", .path.display())]
    Certificate {
        path: PathBuf,
        source: rustls_pki_types::pem::Error,
    },

    #[error("no usable private key found in {}", .dir.display())]
    NoPrivateKey { dir: PathBuf },
}

/// Failures talking to the gateway peer.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("rpc error: code = {:?} desc = {}", .0.code(), .0.message())]
    Status(#[from] tonic::Status),

    #[error("{call} timed out after {after:?}")]
    Timeout { call: &'static str, after: Duration },

    #[error("chaincode returned status {status}: {message}")]
    Chaincode { status: i32, message: String },

    #[error("transaction {tx_id} failed to commit with status code {code}")]
    CommitFailed { tx_id: String, code: i32 },

    #[error("gateway response is missing {0}")]
    MissingField(&'static str),
}
