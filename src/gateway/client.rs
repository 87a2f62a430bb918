use std::time::Duration;

use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::Channel;

use crate::gateway::error::GatewayError;
use crate::gateway::proto::{
    CommitStatusResponse, EndorseRequest, EndorseResponse, EvaluateRequest, EvaluateResponse,
    SignedCommitStatusRequest, SubmitRequest, SubmitResponse,
};

const EVALUATE: &str = "/gateway.Gateway/Evaluate";
const ENDORSE: &str = "/gateway.Gateway/Endorse";
const SUBMIT: &str = "/gateway.Gateway/Submit";
const COMMIT_STATUS: &str = "/gateway.Gateway/CommitStatus";

/// Unary calls on the peer's `gateway.Gateway` gRPC service.
#[derive(Clone)]
pub struct GatewayClient {
    inner: tonic::client::Grpc<Channel>,
}

impl GatewayClient {
    pub fn new(channel: Channel) -> Self {
        GatewayClient {
            inner: tonic::client::Grpc::new(channel),
        }
    }

    pub async fn evaluate(
        &self,
        request: EvaluateRequest,
        timeout: Duration,
    ) -> Result<EvaluateResponse, GatewayError> {
        self.unary(request, EVALUATE, timeout).await
    }

    pub async fn endorse(
        &self,
        request: EndorseRequest,
        timeout: Duration,
    ) -> Result<EndorseResponse, GatewayError> {
        self.unary(request, ENDORSE, timeout).await
    }

    pub async fn submit(
        &self,
        request: SubmitRequest,
        timeout: Duration,
    ) -> Result<SubmitResponse, GatewayError> {
        self.unary(request, SUBMIT, timeout).await
    }

    pub async fn commit_status(
        &self,
        request: SignedCommitStatusRequest,
        timeout: Duration,
    ) -> Result<CommitStatusResponse, GatewayError> {
        self.unary(request, COMMIT_STATUS, timeout).await
    }

    async fn unary<Req, Resp>(
        &self,
        request: Req,
        path: &'static str,
        timeout: Duration,
    ) -> Result<Resp, GatewayError>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        let mut grpc = self.inner.clone();
        let call = async move {
            grpc.ready().await?;
            let codec = tonic_prost::ProstCodec::<Req, Resp>::default();
            let response = grpc
                .unary(tonic::Request::new(request), PathAndQuery::from_static(path), codec)
                .await?;
            Ok::<_, GatewayError>(response.into_inner())
        };

        tokio::time::timeout(timeout, call)
            .await
            .map_err(|_| GatewayError::Timeout {
                call: path,
                after: timeout,
            })?
    }
}
