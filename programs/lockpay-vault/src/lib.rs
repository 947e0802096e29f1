//! Anchor-compatible SDK for the lockpay_vault program.
#![allow(unused)]

pub mod contexts;
pub mod error;
pub mod idl;
pub mod instructions;
pub mod pda;
pub mod vault;

use crate::contexts::*;
use anchor_lang::prelude::*;

declare_id!("6YwvmcWvd2ijBN3ecMhi3VJ2ghmgRbvuWMboHk3JSkPu");

pub const VAULT_SEED: &[u8] = b"vault";
pub const VAULT_AUTHORITY_SEED: &[u8] = b"vault_authority";

#[program]
pub mod lockpay_vault {
    use super::*;

    /// lock `amount` lamports for `receiver`
    pub fn initialize_vault(ctx: Context<InitializeVault>, receiver: Pubkey, amount: u64) -> Result<()> {
        Ok(())
    }

    /// release the locked lamports to the receiver and close the vault
    pub fn claim(ctx: Context<Claim>) -> Result<()> {
        Ok(())
    }

    /// return the locked lamports to the sender and close the vault
    pub fn cancel(ctx: Context<Cancel>) -> Result<()> {
        Ok(())
    }
}
