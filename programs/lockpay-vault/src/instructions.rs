use crate::error::InstructionError;
use crate::pda::{get_vault_address, get_vault_authority_address};
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::pubkey::Pubkey;
use anchor_lang::solana_program::system_program::ID as SYSTEM_PROGRAM_ID;
use std::fmt;

pub const INITIALIZE_VAULT_DISCRIMINATOR: [u8; 8] = [48, 191, 163, 44, 71, 129, 63, 164];
pub const CLAIM_DISCRIMINATOR: [u8; 8] = [62, 198, 214, 193, 213, 159, 108, 210];
pub const CANCEL_DISCRIMINATOR: [u8; 8] = [232, 219, 223, 41, 219, 236, 220, 190];

/// receiver (32) + amount (8)
const INITIALIZE_VAULT_ARGS_LEN: usize = 40;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    InitializeVault,
    Claim,
    Cancel,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Operation::InitializeVault, Operation::Claim, Operation::Cancel];

    pub fn discriminator(self) -> [u8; 8] {
        match self {
            Self::InitializeVault => INITIALIZE_VAULT_DISCRIMINATOR,
            Self::Claim => CLAIM_DISCRIMINATOR,
            Self::Cancel => CANCEL_DISCRIMINATOR,
        }
    }

    pub fn from_discriminator(discriminator: &[u8; 8]) -> Option<Self> {
        Self::ALL.into_iter().find(|operation| operation.discriminator() == *discriminator)
    }

    /// instruction name as the program declares it
    pub fn name(self) -> &'static str {
        match self {
            Self::InitializeVault => "initialize_vault",
            Self::Claim => "claim",
            Self::Cancel => "cancel",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VaultInstruction {
    InitializeVault { receiver: Pubkey, amount: u64 },
    Claim,
    Cancel,
}

impl VaultInstruction {
    pub fn operation(&self) -> Operation {
        match self {
            Self::InitializeVault { .. } => Operation::InitializeVault,
            Self::Claim => Operation::Claim,
            Self::Cancel => Operation::Cancel,
        }
    }

    pub fn data(&self) -> Vec<u8> {
        let mut data = self.operation().discriminator().to_vec();
        if let Self::InitializeVault { receiver, amount } = self {
            data.reserve(INITIALIZE_VAULT_ARGS_LEN);
            data.extend_from_slice(&receiver.to_bytes());
            data.extend_from_slice(&amount.to_le_bytes());
        }
        data
    }

    pub fn unpack(data: &[u8]) -> Result<Self, InstructionError> {
        if data.len() < 8 {
            return Err(InstructionError::MissingDiscriminator);
        }
        let (discriminator, rest) = data.split_at(8);
        let discriminator: [u8; 8] = discriminator
            .try_into()
            .map_err(|_| InstructionError::MissingDiscriminator)?;
        let operation =
            Operation::from_discriminator(&discriminator).ok_or(InstructionError::UnknownDiscriminator(discriminator))?;

        match operation {
            Operation::InitializeVault => {
                let invalid = || InstructionError::InvalidArguments(operation, INITIALIZE_VAULT_ARGS_LEN, rest.len());
                if rest.len() != INITIALIZE_VAULT_ARGS_LEN {
                    return Err(invalid());
                }
                let receiver = Pubkey::new_from_array(rest[..32].try_into().map_err(|_| invalid())?);
                let amount = u64::from_le_bytes(rest[32..].try_into().map_err(|_| invalid())?);
                Ok(Self::InitializeVault { receiver, amount })
            }
            Operation::Claim | Operation::Cancel if !rest.is_empty() => {
                Err(InstructionError::InvalidArguments(operation, 0, rest.len()))
            }
            Operation::Claim => Ok(Self::Claim),
            Operation::Cancel => Ok(Self::Cancel),
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct InitializeVaultAccounts {
    pub sender: Pubkey,
    pub receiver: Pubkey,
    pub vault: Pubkey,
    pub vault_authority: Pubkey,
}

impl From<InitializeVaultAccounts> for Vec<AccountMeta> {
    fn from(accounts: InitializeVaultAccounts) -> Self {
        vec![
            AccountMeta::new(accounts.sender, true),
            AccountMeta::new_readonly(accounts.receiver, false),
            AccountMeta::new(accounts.vault, false),
            AccountMeta::new(accounts.vault_authority, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        ]
    }
}

#[derive(Copy, Clone, Debug)]
pub struct ClaimAccounts {
    pub receiver: Pubkey,
    pub vault: Pubkey,
    pub vault_authority: Pubkey,
}

impl From<ClaimAccounts> for Vec<AccountMeta> {
    fn from(accounts: ClaimAccounts) -> Self {
        vec![
            AccountMeta::new(accounts.receiver, true),
            AccountMeta::new(accounts.vault, false),
            AccountMeta::new(accounts.vault_authority, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        ]
    }
}

#[derive(Copy, Clone, Debug)]
pub struct CancelAccounts {
    pub sender: Pubkey,
    pub vault: Pubkey,
    pub vault_authority: Pubkey,
}

impl From<CancelAccounts> for Vec<AccountMeta> {
    fn from(accounts: CancelAccounts) -> Self {
        vec![
            AccountMeta::new(accounts.sender, true),
            AccountMeta::new(accounts.vault, false),
            AccountMeta::new(accounts.vault_authority, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        ]
    }
}

pub fn initialize_vault(program_id: &Pubkey, sender: &Pubkey, receiver: &Pubkey, amount: u64) -> Instruction {
    let accounts = InitializeVaultAccounts {
        sender: *sender,
        receiver: *receiver,
        vault: get_vault_address(sender, receiver, program_id),
        vault_authority: get_vault_authority_address(program_id),
    };
    Instruction {
        program_id: *program_id,
        accounts: accounts.into(),
        data: VaultInstruction::InitializeVault {
            receiver: *receiver,
            amount,
        }
        .data(),
    }
}

/// The receiver signs; `sender` only locates the vault.
pub fn claim(program_id: &Pubkey, sender: &Pubkey, receiver: &Pubkey) -> Instruction {
    let accounts = ClaimAccounts {
        receiver: *receiver,
        vault: get_vault_address(sender, receiver, program_id),
        vault_authority: get_vault_authority_address(program_id),
    };
    Instruction {
        program_id: *program_id,
        accounts: accounts.into(),
        data: VaultInstruction::Claim.data(),
    }
}

/// The sender signs; `receiver` only locates the vault.
pub fn cancel(program_id: &Pubkey, sender: &Pubkey, receiver: &Pubkey) -> Instruction {
    let accounts = CancelAccounts {
        sender: *sender,
        vault: get_vault_address(sender, receiver, program_id),
        vault_authority: get_vault_authority_address(program_id),
    };
    Instruction {
        program_id: *program_id,
        accounts: accounts.into(),
        data: VaultInstruction::Cancel.data(),
    }
}
