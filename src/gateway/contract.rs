use async_trait::async_trait;
use prost::Message;

use crate::gateway::connection::Gateway;
use crate::gateway::error::GatewayError;
use crate::gateway::proposal::{self, TransactionProposal};
use crate::gateway::proto::{
    CommitStatusRequest, CommitStatusResponse, EndorseRequest, EvaluateRequest,
    SignedCommitStatusRequest, SubmitRequest, TX_VALIDATION_CODE_VALID,
};

/// Smart contract operations used by the HTTP handlers.
#[async_trait]
pub trait LedgerContract: Send + Sync {
    /// Runs a read-only transaction on a peer and returns its result.
    async fn evaluate_transaction(&self, name: &str, args: &[String]) -> Result<Vec<u8>, GatewayError>;

    /// Endorses, submits and waits for commit of a transaction.
    async fn submit_transaction(&self, name: &str, args: &[String]) -> Result<(), GatewayError>;
}

/// A chaincode deployed on a channel, reached through a gateway session.
#[derive(Clone)]
pub struct Contract {
    gateway: Gateway,
    channel_name: String,
    chaincode_name: String,
}

impl Contract {
    pub(crate) fn new(gateway: Gateway, channel_name: String, chaincode_name: String) -> Self {
        Contract {
            gateway,
            channel_name,
            chaincode_name,
        }
    }

    pub fn chaincode_name(&self) -> &str {
        &self.chaincode_name
    }

    fn new_proposal(&self, name: &str, args: &[String]) -> TransactionProposal {
        proposal::new_proposal(
            self.gateway.identity(),
            &self.channel_name,
            &self.chaincode_name,
            name,
            args,
        )
    }

    async fn wait_for_commit(&self, tx_id: &str) -> Result<(), GatewayError> {
        let request = CommitStatusRequest {
            transaction_id: tx_id.to_string(),
            channel_id: self.channel_name.clone(),
            identity: self.gateway.identity().serialize(),
        }
        .encode_to_vec();

        let signed = SignedCommitStatusRequest {
            signature: self.gateway.signer().sign(&request),
            request,
        };

        let status = self
            .gateway
            .client()
            .commit_status(signed, self.gateway.timeouts().commit_status)
            .await?;

        check_commit_status(tx_id, &status)?;
        log::info!("Transaction {} committed in block {}", tx_id, status.block_number);
        Ok(())
    }
}

/// Anything other than `VALID` means the orderer accepted the transaction but
/// the peers rejected it at commit time.
fn check_commit_status(tx_id: &str, status: &CommitStatusResponse) -> Result<(), GatewayError> {
    if status.result != TX_VALIDATION_CODE_VALID {
        return Err(GatewayError::CommitFailed {
            tx_id: tx_id.to_string(),
            code: status.result,
        });
    }
    Ok(())
}

#[async_trait]
impl LedgerContract for Contract {
    async fn evaluate_transaction(&self, name: &str, args: &[String]) -> Result<Vec<u8>, GatewayError> {
        let proposal = self.new_proposal(name, args);
        log::info!("Evaluating {} as transaction {}", name, proposal.tx_id);

        let request = EvaluateRequest {
            transaction_id: proposal.tx_id.clone(),
            channel_id: self.channel_name.clone(),
            proposed_transaction: Some(proposal.sign(self.gateway.signer())),
            target_organizations: Vec::new(),
        };

        let response = self
            .gateway
            .client()
            .evaluate(request, self.gateway.timeouts().evaluate)
            .await?;

        let result = response.result.ok_or(GatewayError::MissingField("result"))?;
        if result.status >= 400 {
            return Err(GatewayError::Chaincode {
                status: result.status,
                message: result.message,
            });
        }

        Ok(result.payload)
    }

    async fn submit_transaction(&self, name: &str, args: &[String]) -> Result<(), GatewayError> {
        let proposal = self.new_proposal(name, args);
        log::info!("Submitting {} as transaction {}", name, proposal.tx_id);

        let endorse = EndorseRequest {
            transaction_id: proposal.tx_id.clone(),
            channel_id: self.channel_name.clone(),
            proposed_transaction: Some(proposal.sign(self.gateway.signer())),
            endorsing_organizations: Vec::new(),
        };

        let endorsed = self
            .gateway
            .client()
            .endorse(endorse, self.gateway.timeouts().endorse)
            .await?;

        let mut envelope = endorsed
            .prepared_transaction
            .ok_or(GatewayError::MissingField("prepared_transaction"))?;
        envelope.signature = self.gateway.signer().sign(&envelope.payload);

        let submit = SubmitRequest {
            transaction_id: proposal.tx_id.clone(),
            channel_id: self.channel_name.clone(),
            prepared_transaction: Some(envelope),
        };

        self.gateway
            .client()
            .submit(submit, self.gateway.timeouts().submit)
            .await?;

        self.wait_for_commit(&proposal.tx_id).await
    }
}
