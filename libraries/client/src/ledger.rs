use crate::error::ClientError;
use lockpay_vault::error::LockPayErrorCode;
use log::debug;
use solana_client::client_error::ClientError as RpcClientError;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::account::Account;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::instruction::{Instruction, InstructionError};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::signer::Signer;
use solana_sdk::transaction::{Transaction, TransactionError};

/// Owner and data of an account as last observed on the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSnapshot {
    pub owner: Pubkey,
    pub lamports: u64,
    pub data: Vec<u8>,
}

impl From<Account> for AccountSnapshot {
    fn from(account: Account) -> Self {
        Self {
            owner: account.owner,
            lamports: account.lamports,
            data: account.data,
        }
    }
}

/// The remote ledger as the executors see it.
///
/// Reads return `Ok(None)` for an address with no account; `Err` means the
/// state could not be determined.
#[allow(async_fn_in_trait)]
pub trait Ledger {
    async fn get_account(&self, address: &Pubkey) -> Result<Option<AccountSnapshot>, ClientError>;

    /// Sign `instruction` into a transaction paid by `signer`, submit it and
    /// wait for confirmation.
    async fn send_and_confirm(&self, instruction: Instruction, signer: &dyn Signer) -> Result<Signature, ClientError>;
}

pub struct RpcLedger {
    client: RpcClient,
    commitment: CommitmentConfig,
}

impl RpcLedger {
    pub fn new(rpc_url: String, commitment: CommitmentConfig) -> Self {
        Self {
            client: RpcClient::new_with_commitment(rpc_url, commitment),
            commitment,
        }
    }

    pub fn url(&self) -> String {
        self.client.url()
    }
}

impl Ledger for RpcLedger {
    async fn get_account(&self, address: &Pubkey) -> Result<Option<AccountSnapshot>, ClientError> {
        let response = self
            .client
            .get_account_with_commitment(address, self.commitment)
            .await
            .map_err(|e| ClientError::Rpc(e.to_string()))?;
        debug!("account {address} at slot {}: exists={}", response.context.slot, response.value.is_some());
        Ok(response.value.map(AccountSnapshot::from))
    }

    async fn send_and_confirm(&self, instruction: Instruction, signer: &dyn Signer) -> Result<Signature, ClientError> {
        let blockhash = self.client.get_latest_blockhash().await.map_err(submission_error)?;
        let payer = signer.pubkey();
        let signers: Vec<&dyn Signer> = vec![signer];
        let transaction = Transaction::new_signed_with_payer(&[instruction], Some(&payer), &signers, blockhash);

        self.client
            .send_and_confirm_transaction(&transaction)
            .await
            .map_err(submission_error)
    }
}

fn submission_error(err: RpcClientError) -> ClientError {
    let program_error = match err.get_transaction_error() {
        Some(TransactionError::InstructionError(_, InstructionError::Custom(code))) => {
            LockPayErrorCode::from_code(code)
        }
        _ => None,
    };
    let message = match program_error {
        Some(code) => format!("{err} ({}: {code})", code.name()),
        None => err.to_string(),
    };
    ClientError::Submission { message, program_error }
}
