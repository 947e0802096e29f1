use crate::error::ClientError;
use crate::ledger::Ledger;
use crate::preflight::Preflight;
use lockpay_vault::instructions::{self, Operation};
use lockpay_vault::pda::VaultAddresses;
use log::{debug, info};
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::signer::Signer;

/// Result of a confirmed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub signature: Signature,
    pub addresses: VaultAddresses,
}

/// Executes vault operations: derive, validate, encode, submit.
///
/// The signer passed to each operation is always the primary actor. A
/// separately supplied identity for that actor must match it.
pub struct LockPay<'a, L> {
    ledger: &'a L,
    program_id: Pubkey,
}

impl<'a, L: Ledger> LockPay<'a, L> {
    pub fn new(ledger: &'a L, program_id: Pubkey) -> Self {
        Self { ledger, program_id }
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    pub fn addresses(&self, sender: Pubkey, receiver: Pubkey) -> VaultAddresses {
        VaultAddresses::derive(sender, receiver, &self.program_id)
    }

    pub async fn initialize_vault(
        &self,
        sender: &dyn Signer,
        receiver: Pubkey,
        amount: u64,
    ) -> Result<Receipt, ClientError> {
        let addresses = self.addresses(sender.pubkey(), receiver);
        let instruction = instructions::initialize_vault(&self.program_id, &addresses.sender, &receiver, amount);
        self.execute(Operation::InitializeVault, addresses, instruction, sender).await
    }

    /// `receiver` defaults to the signer; `sender` locates the vault.
    pub async fn claim(
        &self,
        signer: &dyn Signer,
        receiver: Option<Pubkey>,
        sender: Pubkey,
    ) -> Result<Receipt, ClientError> {
        let receiver = receiver.unwrap_or_else(|| signer.pubkey());
        let addresses = self.addresses(sender, receiver);
        let instruction = instructions::claim(&self.program_id, &sender, &receiver);
        self.execute(Operation::Claim, addresses, instruction, signer).await
    }

    /// `sender` defaults to the signer; `receiver` locates the vault.
    pub async fn cancel(
        &self,
        signer: &dyn Signer,
        sender: Option<Pubkey>,
        receiver: Pubkey,
    ) -> Result<Receipt, ClientError> {
        let sender = sender.unwrap_or_else(|| signer.pubkey());
        let addresses = self.addresses(sender, receiver);
        let instruction = instructions::cancel(&self.program_id, &sender, &receiver);
        self.execute(Operation::Cancel, addresses, instruction, signer).await
    }

    async fn execute(
        &self,
        operation: Operation,
        addresses: VaultAddresses,
        instruction: Instruction,
        signer: &dyn Signer,
    ) -> Result<Receipt, ClientError> {
        debug!(
            "{operation}: sender={} receiver={} vault={} vault_authority={}",
            addresses.sender, addresses.receiver, addresses.vault, addresses.vault_authority
        );
        Preflight::new(self.ledger, self.program_id)
            .validate(operation, &addresses, &signer.pubkey())
            .await?;

        info!("submitting {operation} for vault {}", addresses.vault);
        let signature = self.ledger.send_and_confirm(instruction, signer).await?;
        info!("{operation} confirmed: {signature}");

        Ok(Receipt { signature, addresses })
    }
}
