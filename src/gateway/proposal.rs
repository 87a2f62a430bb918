use std::time::SystemTime;

use prost::Message;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::gateway::identity::{Identity, Signer};
use crate::gateway::proto::{
    ChaincodeHeaderExtension, ChaincodeId, ChaincodeInput, ChaincodeInvocationSpec,
    ChaincodeProposalPayload, ChaincodeSpec, ChannelHeader, Header, Proposal,
    SignatureHeader, SignedProposal, HEADER_TYPE_ENDORSER_TRANSACTION,
};

const NONCE_LENGTH: usize = 24;

/// An unsigned transaction proposal and the id the ledger will know it by.
#[derive(Debug, Clone)]
pub struct TransactionProposal {
    pub tx_id: String,
    pub proposal_bytes: Vec<u8>,
}

impl TransactionProposal {
    pub fn sign(&self, signer: &Signer) -> SignedProposal {
        SignedProposal {
            signature: signer.sign(&self.proposal_bytes),
            proposal_bytes: self.proposal_bytes.clone(),
        }
    }
}

/// Transaction id: hex SHA-256 over the nonce followed by the creator bytes.
pub fn transaction_id(nonce: &[u8], creator: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(nonce);
    hasher.update(creator);
    hex::encode(hasher.finalize())
}

pub fn new_proposal(
    identity: &Identity,
    channel_name: &str,
    chaincode_name: &str,
    transaction_name: &str,
    args: &[String],
) -> TransactionProposal {
    let mut nonce = [0u8; NONCE_LENGTH];
    rand::thread_rng().fill_bytes(&mut nonce);
    build_proposal(
        identity,
        &nonce,
        channel_name,
        chaincode_name,
        transaction_name,
        args,
    )
}

fn build_proposal(
    identity: &Identity,
    nonce: &[u8],
    channel_name: &str,
    chaincode_name: &str,
    transaction_name: &str,
    args: &[String],
) -> TransactionProposal {
    let creator = identity.serialize();
    let tx_id = transaction_id(nonce, &creator);

    let chaincode_id = ChaincodeId {
        name: chaincode_name.to_string(),
        ..Default::default()
    };

    let channel_header = ChannelHeader {
        r#type: HEADER_TYPE_ENDORSER_TRANSACTION,
        timestamp: Some(SystemTime::now().into()),
        channel_id: channel_name.to_string(),
        tx_id: tx_id.clone(),
        extension: ChaincodeHeaderExtension {
            chaincode_id: Some(chaincode_id.clone()),
        }
        .encode_to_vec(),
        ..Default::default()
    };

    let signature_header = SignatureHeader {
        creator,
        nonce: nonce.to_vec(),
    };

    let header = Header {
        channel_header: channel_header.encode_to_vec(),
        signature_header: signature_header.encode_to_vec(),
    };

    let mut chaincode_args = Vec::with_capacity(args.len() + 1);
    chaincode_args.push(transaction_name.as_bytes().to_vec());
    chaincode_args.extend(args.iter().map(|arg| arg.as_bytes().to_vec()));

    let invocation = ChaincodeInvocationSpec {
        chaincode_spec: Some(ChaincodeSpec {
            chaincode_id: Some(chaincode_id),
            input: Some(ChaincodeInput {
                args: chaincode_args,
                is_init: false,
            }),
            ..Default::default()
        }),
    };

    let proposal = Proposal {
        header: header.encode_to_vec(),
        payload: ChaincodeProposalPayload {
            input: invocation.encode_to_vec(),
        }
        .encode_to_vec(),
        extension: Vec::new(),
    };

    TransactionProposal {
        tx_id,
        proposal_bytes: proposal.encode_to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity::new("Org1MSP", b"cert".to_vec())
    }

    #[test]
    fn proposal_carries_channel_chaincode_and_arguments() {
        let args = vec!["D1".to_string(), "100.00".to_string()];
        let proposal = build_proposal(&identity(), &[7u8; 24], "mychannel", "basic", "CreateAsset", &args);

        let decoded = Proposal::decode(proposal.proposal_bytes.as_slice()).unwrap();
        let header = Header::decode(decoded.header.as_slice()).unwrap();
        let channel_header = ChannelHeader::decode(header.channel_header.as_slice()).unwrap();
        assert_eq!(channel_header.r#type, HEADER_TYPE_ENDORSER_TRANSACTION);
        assert_eq!(channel_header.channel_id, "mychannel");
        assert_eq!(channel_header.tx_id, proposal.tx_id);
        assert!(channel_header.timestamp.is_some());

        let extension = ChaincodeHeaderExtension::decode(channel_header.extension.as_slice()).unwrap();
        assert_eq!(extension.chaincode_id.unwrap().name, "basic");

        let payload = ChaincodeProposalPayload::decode(decoded.payload.as_slice()).unwrap();
        let invocation = ChaincodeInvocationSpec::decode(payload.input.as_slice()).unwrap();
        let spec = invocation.chaincode_spec.unwrap();
        assert_eq!(spec.chaincode_id.unwrap().name, "basic");
        assert_eq!(
            spec.input.unwrap().args,
            vec![b"CreateAsset".to_vec(), b"D1".to_vec(), b"100.00".to_vec()]
        );
    }

    #[test]
    fn transaction_id_is_hash_of_nonce_and_creator() {
        let identity = identity();
        let nonce = [1u8; 24];
        let proposal = build_proposal(&identity, &nonce, "mychannel", "basic", "ReadAsset", &[]);

        let mut expected = Sha256::new();
        expected.update(nonce);
        expected.update(identity.serialize());
        assert_eq!(proposal.tx_id, hex::encode(expected.finalize()));
        assert_eq!(proposal.tx_id.len(), 64);

        let decoded = Proposal::decode(proposal.proposal_bytes.as_slice()).unwrap();
        let header = Header::decode(decoded.header.as_slice()).unwrap();
        let signature_header = SignatureHeader::decode(header.signature_header.as_slice()).unwrap();
        assert_eq!(signature_header.nonce, nonce.to_vec());
        assert_eq!(signature_header.creator, identity.serialize());
    }

    #[test]
    fn fresh_proposals_get_distinct_ids() {
        let identity = identity();
        let first = new_proposal(&identity, "mychannel", "basic", "ReadAsset", &[]);
        let second = new_proposal(&identity, "mychannel", "basic", "ReadAsset", &[]);
        assert_ne!(first.tx_id, second.tx_id);
    }
}
