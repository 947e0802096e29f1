use crate::instructions::Operation;
use thiserror::Error;

/// Anchor numbers custom program errors from this offset.
pub const ERROR_CODE_OFFSET: u32 = 6000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum InstructionError {
    #[error("instruction data is shorter than a discriminator")]
    MissingDiscriminator,

    #[error("unknown instruction discriminator {0:?}")]
    UnknownDiscriminator([u8; 8]),

    #[error("malformed {0} arguments: expected {1} bytes, got {2}")]
    InvalidArguments(Operation, usize, usize),
}

#[derive(Debug, Error)]
pub enum IdlError {
    #[error("failed to read IDL: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse IDL: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IDL address {0} is not a valid public key")]
    InvalidAddress(String),

    #[error("IDL has no `{0}` instruction")]
    MissingInstruction(&'static str),

    #[error("IDL `{item}` mismatch: {detail}")]
    Mismatch { item: &'static str, detail: String },
}

/// Custom errors raised by the on-chain program, in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LockPayErrorCode {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Already claimed")]
    AlreadyClaimed,

    #[error("Invalid state")]
    InvalidState,
}

impl LockPayErrorCode {
    pub const ALL: [LockPayErrorCode; 3] = [
        LockPayErrorCode::Unauthorized,
        LockPayErrorCode::AlreadyClaimed,
        LockPayErrorCode::InvalidState,
    ];

    pub fn code(self) -> u32 {
        ERROR_CODE_OFFSET + self as u32
    }

    pub fn from_code(code: u32) -> Option<Self> {
        let index = code.checked_sub(ERROR_CODE_OFFSET)? as usize;
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Unauthorized => "Unauthorized",
            Self::AlreadyClaimed => "AlreadyClaimed",
            Self::InvalidState => "InvalidState",
        }
    }
}
