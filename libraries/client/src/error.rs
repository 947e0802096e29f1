use lockpay_vault::error::{IdlError, LockPayErrorCode};
use solana_sdk::pubkey::Pubkey;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Ledger state or arguments forbid the requested operation.
///
/// Rejections are decided before anything is submitted. They are distinct
/// from [`ClientError::Rpc`], which means the state could not be read at all.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("{role} signer mismatch: {role} arg={supplied} but signer wallet={signer}")]
    SignerMismatch {
        role: &'static str,
        supplied: Pubkey,
        signer: Pubkey,
    },

    #[error("Vault PDA not initialized for sender={sender} receiver={receiver} vault={vault}")]
    NotInitialized {
        sender: Pubkey,
        receiver: Pubkey,
        vault: Pubkey,
    },

    #[error(
        "Vault PDA already initialized for sender={sender} receiver={receiver} vault={vault}; claim or cancel it first"
    )]
    AlreadyInitialized {
        sender: Pubkey,
        receiver: Pubkey,
        vault: Pubkey,
    },

    #[error("Vault PDA owner is {owner}, expected {expected}")]
    OwnerMismatch { owner: Pubkey, expected: Pubkey },

    #[error("Vault PDA address {vault} is already in use by owner={owner} (expected {expected})")]
    AddressInUse {
        vault: Pubkey,
        owner: Pubkey,
        expected: Pubkey,
    },

    #[error("Vault {vault} holds undecodable data: {reason}")]
    InvalidState { vault: Pubkey, reason: String },

    #[error("Vault {vault} was already claimed")]
    AlreadyClaimed { vault: Pubkey },
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Usage: {0}")]
    Usage(String),

    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("RPC read failed: {0}")]
    Rpc(String),

    #[error("transaction failed: {message}")]
    Submission {
        message: String,
        program_error: Option<LockPayErrorCode>,
    },

    #[error("timed out after {waited:?} waiting for {address} to become {condition}")]
    ConfirmationTimeout {
        address: Pubkey,
        condition: String,
        waited: Duration,
    },

    #[error("failed to load wallet {path}: {reason}")]
    Wallet { path: PathBuf, reason: String },

    #[error("invalid public key `{0}`")]
    InvalidPubkey(String),

    #[error("invalid amount `{0}`: expected an unsigned 64-bit lamport value")]
    InvalidAmount(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Idl(#[from] IdlError),

    #[error("step `{step}` failed: {source}")]
    StepFailed {
        step: String,
        #[source]
        source: Box<ClientError>,
    },
}

impl ClientError {
    /// True when the operation was refused by pre-flight validation.
    pub fn is_rejection(&self) -> bool {
        self.rejection().is_some()
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            Self::StepFailed { source, .. } => source.rejection(),
            _ => None,
        }
    }

    pub fn program_error(&self) -> Option<LockPayErrorCode> {
        match self {
            Self::Submission { program_error, .. } => *program_error,
            Self::StepFailed { source, .. } => source.program_error(),
            _ => None,
        }
    }
}
