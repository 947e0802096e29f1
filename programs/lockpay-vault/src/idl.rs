//! Typed view of the program's anchor IDL.
//!
//! The client encodes instructions from compiled constants, so a deployed
//! program whose IDL disagrees with them must be caught before anything is
//! submitted. [`Idl::validate`] compares the interface description against
//! the compiled schema and reports the first difference.

use crate::error::{IdlError, LockPayErrorCode};
use crate::instructions::Operation;
use crate::vault::Vault;
use anchor_lang::solana_program::pubkey::Pubkey;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct Idl {
    pub address: String,
    #[serde(default)]
    pub instructions: Vec<IdlInstruction>,
    #[serde(default)]
    pub accounts: Vec<IdlAccountDef>,
    #[serde(default)]
    pub errors: Vec<IdlErrorCode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdlInstruction {
    pub name: String,
    pub discriminator: Vec<u8>,
    #[serde(default)]
    pub accounts: Vec<IdlInstructionAccount>,
    #[serde(default)]
    pub args: Vec<IdlField>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdlInstructionAccount {
    pub name: String,
    #[serde(default)]
    pub writable: bool,
    #[serde(default)]
    pub signer: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdlField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdlAccountDef {
    pub name: String,
    pub discriminator: Vec<u8>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdlErrorCode {
    pub code: u32,
    pub name: String,
}

/// (name, writable, signer) in positional order.
fn expected_accounts(operation: Operation) -> &'static [(&'static str, bool, bool)] {
    match operation {
        Operation::InitializeVault => &[
            ("sender", true, true),
            ("receiver", false, false),
            ("vault", true, false),
            ("vault_authority", true, false),
            ("system_program", false, false),
        ],
        Operation::Claim => &[
            ("receiver", true, true),
            ("vault", true, false),
            ("vault_authority", true, false),
            ("system_program", false, false),
        ],
        Operation::Cancel => &[
            ("sender", true, true),
            ("vault", true, false),
            ("vault_authority", true, false),
            ("system_program", false, false),
        ],
    }
}

fn expected_args(operation: Operation) -> &'static [(&'static str, &'static str)] {
    match operation {
        Operation::InitializeVault => &[("receiver", "pubkey"), ("amount", "u64")],
        Operation::Claim | Operation::Cancel => &[],
    }
}

impl Idl {
    pub fn from_json(json: &str) -> Result<Self, IdlError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, IdlError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn program_id(&self) -> Result<Pubkey, IdlError> {
        Pubkey::from_str(&self.address).map_err(|_| IdlError::InvalidAddress(self.address.clone()))
    }

    pub fn instruction(&self, operation: Operation) -> Option<&IdlInstruction> {
        self.instructions.iter().find(|ix| ix.name == operation.name())
    }

    pub fn validate(&self) -> Result<(), IdlError> {
        self.program_id()?;
        for operation in Operation::ALL {
            self.validate_instruction(operation)?;
        }

        if let Some(account) = self.accounts.iter().find(|account| account.name == "Vault") {
            if account.discriminator != Vault::DISCRIMINATOR {
                return Err(IdlError::Mismatch {
                    item: "Vault",
                    detail: format!(
                        "account discriminator {:?}, expected {:?}",
                        account.discriminator,
                        Vault::DISCRIMINATOR
                    ),
                });
            }
        }

        for known in LockPayErrorCode::ALL {
            if let Some(declared) = self.errors.iter().find(|e| e.name == known.name()) {
                if declared.code != known.code() {
                    return Err(IdlError::Mismatch {
                        item: known.name(),
                        detail: format!("error code {}, expected {}", declared.code, known.code()),
                    });
                }
            }
        }

        Ok(())
    }

    fn validate_instruction(&self, operation: Operation) -> Result<(), IdlError> {
        let name = operation.name();
        let ix = self.instruction(operation).ok_or(IdlError::MissingInstruction(name))?;
        let mismatch = |detail: String| IdlError::Mismatch {
            item: name,
            detail,
        };

        if ix.discriminator != operation.discriminator() {
            return Err(mismatch(format!(
                "discriminator {:?}, expected {:?}",
                ix.discriminator,
                operation.discriminator()
            )));
        }

        let args = expected_args(operation);
        if ix.args.len() != args.len() {
            return Err(mismatch(format!("{} args, expected {}", ix.args.len(), args.len())));
        }
        for (field, (arg_name, arg_type)) in ix.args.iter().zip(args) {
            let ty = field.ty.as_str().unwrap_or_default();
            if field.name != *arg_name || ty != *arg_type {
                return Err(mismatch(format!(
                    "arg `{}: {}`, expected `{}: {}`",
                    field.name, field.ty, arg_name, arg_type
                )));
            }
        }

        let accounts = expected_accounts(operation);
        if ix.accounts.len() != accounts.len() {
            return Err(mismatch(format!(
                "{} accounts, expected {}",
                ix.accounts.len(),
                accounts.len()
            )));
        }
        for (index, (account, (account_name, writable, signer))) in ix.accounts.iter().zip(accounts).enumerate() {
            if account.name != *account_name || account.writable != *writable || account.signer != *signer {
                return Err(mismatch(format!(
                    "account #{index} is `{}` (writable={}, signer={}), expected `{}` (writable={}, signer={})",
                    account.name, account.writable, account.signer, account_name, writable, signer
                )));
            }
        }

        Ok(())
    }
}
