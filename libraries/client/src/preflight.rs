//! Checks that run before any instruction is submitted.
//!
//! Order matters: signer identity first (needs no ledger access), then
//! existence, ownership and decoded state of the vault account. The first
//! failing check wins.

use crate::error::{ClientError, Rejection};
use crate::ledger::{AccountSnapshot, Ledger};
use lockpay_vault::instructions::Operation;
use lockpay_vault::pda::VaultAddresses;
use lockpay_vault::vault::Vault;
use log::debug;
use solana_sdk::pubkey::Pubkey;

/// The party that must sign `operation`, and how to name it in diagnostics.
pub fn primary_actor(operation: Operation, addresses: &VaultAddresses) -> (&'static str, Pubkey) {
    match operation {
        Operation::InitializeVault | Operation::Cancel => ("Sender", addresses.sender),
        Operation::Claim => ("Receiver", addresses.receiver),
    }
}

pub fn check_signer(role: &'static str, supplied: &Pubkey, signer: &Pubkey) -> Result<(), Rejection> {
    if supplied != signer {
        return Err(Rejection::SignerMismatch {
            role,
            supplied: *supplied,
            signer: *signer,
        });
    }
    Ok(())
}

pub struct Preflight<'a, L> {
    ledger: &'a L,
    program_id: Pubkey,
}

impl<'a, L: Ledger> Preflight<'a, L> {
    pub fn new(ledger: &'a L, program_id: Pubkey) -> Self {
        Self { ledger, program_id }
    }

    pub async fn validate(
        &self,
        operation: Operation,
        addresses: &VaultAddresses,
        expected_signer: &Pubkey,
    ) -> Result<(), ClientError> {
        let (role, actor) = primary_actor(operation, addresses);
        check_signer(role, &actor, expected_signer)?;

        let account = self.ledger.get_account(&addresses.vault).await?;
        debug!(
            "{operation} pre-flight: vault {} exists={}",
            addresses.vault,
            account.is_some()
        );

        match operation {
            Operation::InitializeVault => self.require_vacant(addresses, account.as_ref())?,
            Operation::Claim | Operation::Cancel => {
                self.require_open_vault(addresses, account.as_ref())?;
            }
        }
        Ok(())
    }

    fn require_vacant(&self, addresses: &VaultAddresses, account: Option<&AccountSnapshot>) -> Result<(), Rejection> {
        match account {
            None => Ok(()),
            Some(account) if account.owner == self.program_id => Err(Rejection::AlreadyInitialized {
                sender: addresses.sender,
                receiver: addresses.receiver,
                vault: addresses.vault,
            }),
            Some(account) => Err(Rejection::AddressInUse {
                vault: addresses.vault,
                owner: account.owner,
                expected: self.program_id,
            }),
        }
    }

    fn require_open_vault(
        &self,
        addresses: &VaultAddresses,
        account: Option<&AccountSnapshot>,
    ) -> Result<Vault, Rejection> {
        let account = account.ok_or(Rejection::NotInitialized {
            sender: addresses.sender,
            receiver: addresses.receiver,
            vault: addresses.vault,
        })?;

        if account.owner != self.program_id {
            return Err(Rejection::OwnerMismatch {
                owner: account.owner,
                expected: self.program_id,
            });
        }

        let vault = Vault::try_deserialize(&account.data).map_err(|e| Rejection::InvalidState {
            vault: addresses.vault,
            reason: e.to_string(),
        })?;
        if vault.claimed {
            return Err(Rejection::AlreadyClaimed { vault: addresses.vault });
        }
        Ok(vault)
    }
}
