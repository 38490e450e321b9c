use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NodeError {
    #[error("Invalid transaction data")]
    InvalidTransaction,

    #[error("Peer address is required")]
    MissingPeerAddress,

    #[error("block #{index} does not link to the current chain tip")]
    ChainLinkMismatch { index: u64 },

    #[error("proof for block #{index} is invalid")]
    ProofInvalid { index: u64 },

    #[error("The chain dump was tampered (block #{index})")]
    TamperedChainDump { index: u64 },

    #[error("peer {address} is unreachable: {source}")]
    PeerUnreachable {
        address: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("peer responded with {status}: {body}")]
    PeerRejected { status: u16, body: String },

    #[error("Mining was interrupted, transactions returned to the pending pool")]
    MiningInterrupted,

    #[error("mining task failed: {0}")]
    MiningTask(#[from] actix_web::error::BlockingError),

    #[error("HTTP client error: {0}")]
    ClientSetup(#[source] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, NodeError>;

impl ResponseError for NodeError {
    fn status_code(&self) -> StatusCode {
        match self {
            NodeError::InvalidTransaction
            | NodeError::MissingPeerAddress
            | NodeError::ChainLinkMismatch { .. }
            | NodeError::ProofInvalid { .. } => StatusCode::BAD_REQUEST,
            NodeError::TamperedChainDump { .. } | NodeError::MiningInterrupted => {
                StatusCode::CONFLICT
            }
            NodeError::PeerUnreachable { .. } => StatusCode::BAD_GATEWAY,
            NodeError::PeerRejected { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            NodeError::MiningTask(_) | NodeError::ClientSetup(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            NodeError::ChainLinkMismatch { .. } | NodeError::ProofInvalid { .. } => {
                "The block was discarded by the peer".to_string()
            }
            // Pass the target's answer through untouched.
            NodeError::PeerRejected { body, .. } => body.clone(),
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).body(body)
    }
}

#[cfg(test)]
mod tests {
    use super::NodeError;
    use actix_web::ResponseError;
    use actix_web::http::StatusCode;

    #[test]
    fn validation_errors_are_client_errors() {
        assert_eq!(
            NodeError::InvalidTransaction.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            NodeError::MissingPeerAddress.to_string(),
            "Peer address is required"
        );
    }

    #[test]
    fn rejected_peer_status_passes_through() {
        let err = NodeError::PeerRejected {
            status: 418,
            body: "teapot".into(),
        };
        assert_eq!(err.status_code().as_u16(), 418);
    }
}
