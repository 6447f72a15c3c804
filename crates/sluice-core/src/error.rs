//! error types for sluice

use crate::leaf::LeafId;
use crate::ledger::LedgerError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("caller is not the operator")]
    Unauthorized,

    #[error("recipients/amounts length mismatch: {recipients} recipients, {amounts} amounts")]
    MalformedBatch { recipients: usize, amounts: usize },

    #[error("no root committed")]
    NoCommitment,

    #[error("batch {0} already executed")]
    AlreadyExecuted(LeafId),

    #[error("merkle proof does not reconstruct the committed root")]
    InvalidProof,

    #[error("zero amount at batch index {0}")]
    ZeroAmount(usize),

    #[error("ledger rejected transfer: {0}")]
    TransferFailed(#[from] LedgerError),
}
