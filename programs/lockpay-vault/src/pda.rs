use crate::{VAULT_AUTHORITY_SEED, VAULT_SEED};
use anchor_lang::solana_program::pubkey::Pubkey;

pub fn find_vault_address(sender: &Pubkey, receiver: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[VAULT_SEED, &sender.to_bytes(), &receiver.to_bytes()], program_id)
}

pub fn get_vault_address(sender: &Pubkey, receiver: &Pubkey, program_id: &Pubkey) -> Pubkey {
    find_vault_address(sender, receiver, program_id).0
}

pub fn find_vault_authority_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[VAULT_AUTHORITY_SEED], program_id)
}

pub fn get_vault_authority_address(program_id: &Pubkey) -> Pubkey {
    find_vault_authority_address(program_id).0
}

/// Every address a vault instruction touches for one sender/receiver pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VaultAddresses {
    pub sender: Pubkey,
    pub receiver: Pubkey,
    pub vault: Pubkey,
    pub vault_authority: Pubkey,
}

impl VaultAddresses {
    pub fn derive(sender: Pubkey, receiver: Pubkey, program_id: &Pubkey) -> Self {
        Self {
            sender,
            receiver,
            vault: get_vault_address(&sender, &receiver, program_id),
            vault_authority: get_vault_authority_address(program_id),
        }
    }
}
