//! In-memory ledger that plays the lockpay_vault program.
#![allow(dead_code)]

use lockpay_client::cli::Dependencies;
use lockpay_client::confirm::Poll;
use lockpay_client::{AccountSnapshot, ClientError, Config, Ledger};
use lockpay_vault::error::LockPayErrorCode;
use lockpay_vault::instructions::VaultInstruction;
use lockpay_vault::pda::find_vault_address;
use lockpay_vault::vault::Vault;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub struct MockLedger {
    pub program_id: Pubkey,
    accounts: Mutex<HashMap<Pubkey, AccountSnapshot>>,
    reads: AtomicUsize,
    submissions: AtomicUsize,
    fail_reads: AtomicBool,
}

impl MockLedger {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            accounts: Mutex::new(HashMap::new()),
            reads: AtomicUsize::new(0),
            submissions: AtomicUsize::new(0),
            fail_reads: AtomicBool::new(false),
        }
    }

    pub fn insert(&self, address: Pubkey, account: AccountSnapshot) {
        self.accounts.lock().unwrap().insert(address, account);
    }

    pub fn account(&self, address: &Pubkey) -> Option<AccountSnapshot> {
        self.accounts.lock().unwrap().get(address).cloned()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn execute(&self, instruction: &Instruction, payer: &Pubkey) -> Result<(), ClientError> {
        if instruction.program_id != self.program_id {
            return Err(submission("incorrect program id for instruction"));
        }
        let signed = instruction
            .accounts
            .iter()
            .any(|meta| meta.is_signer && meta.pubkey == *payer);
        if !signed {
            return Err(submission("missing required signature for instruction"));
        }

        let ix = VaultInstruction::unpack(&instruction.data).map_err(|e| submission(&e.to_string()))?;
        let mut accounts = self.accounts.lock().unwrap();
        match ix {
            VaultInstruction::InitializeVault { receiver, amount } => {
                let sender = instruction.accounts[0].pubkey;
                let vault = instruction.accounts[2].pubkey;
                let (expected, bump) = find_vault_address(&sender, &receiver, &self.program_id);
                if vault != expected {
                    return Err(submission("seeds constraint was violated"));
                }
                if accounts.contains_key(&vault) {
                    return Err(submission("account already in use"));
                }
                let state = Vault {
                    sender,
                    receiver,
                    amount,
                    claimed: false,
                    bump,
                };
                accounts.insert(
                    vault,
                    AccountSnapshot {
                        owner: self.program_id,
                        lamports: amount,
                        data: state.pack(),
                    },
                );
            }
            VaultInstruction::Claim | VaultInstruction::Cancel => {
                let signer = instruction.accounts[0].pubkey;
                let vault = instruction.accounts[1].pubkey;
                let account = accounts
                    .get(&vault)
                    .ok_or_else(|| submission("account not initialized"))?;
                let state = Vault::try_deserialize(&account.data)
                    .map_err(|_| program_error(LockPayErrorCode::InvalidState))?;
                if state.claimed {
                    return Err(program_error(LockPayErrorCode::AlreadyClaimed));
                }
                let party = match ix {
                    VaultInstruction::Claim => state.receiver,
                    _ => state.sender,
                };
                if party != signer {
                    return Err(program_error(LockPayErrorCode::Unauthorized));
                }
                accounts.remove(&vault);
            }
        }
        Ok(())
    }
}

impl Ledger for MockLedger {
    async fn get_account(&self, address: &Pubkey) -> Result<Option<AccountSnapshot>, ClientError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ClientError::Rpc("connection refused".to_string()));
        }
        Ok(self.account(address))
    }

    async fn send_and_confirm(&self, instruction: Instruction, signer: &dyn Signer) -> Result<Signature, ClientError> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        self.execute(&instruction, &signer.pubkey())?;
        Ok(Signature::new_unique())
    }
}

fn submission(message: &str) -> ClientError {
    ClientError::Submission {
        message: message.to_string(),
        program_error: None,
    }
}

fn program_error(code: LockPayErrorCode) -> ClientError {
    ClientError::Submission {
        message: format!("custom program error: {:#x}", code.code()),
        program_error: Some(code),
    }
}

pub fn write_wallet(keypair: &Keypair) -> PathBuf {
    let path = std::env::temp_dir().join(format!("lockpay-test-{}.json", keypair.pubkey()));
    std::fs::write(&path, serde_json::to_string(&keypair.to_bytes().to_vec()).unwrap()).unwrap();
    path
}

/// Two funded parties with wallets on disk and a mock ledger.
pub struct Fixture {
    pub sender: Keypair,
    pub receiver: Keypair,
    pub deps: Dependencies<MockLedger>,
}

impl Fixture {
    pub fn new() -> Self {
        let sender = Keypair::new();
        let receiver = Keypair::new();
        let program_id = Pubkey::new_unique();
        let config = Config {
            program_id,
            sender_wallet: write_wallet(&sender),
            receiver_wallet: write_wallet(&receiver),
            poll: Poll {
                timeout: Duration::from_millis(200),
                interval: Duration::from_millis(10),
            },
            step_delay: Duration::ZERO,
            ..Config::default()
        };

        Self {
            sender,
            receiver,
            deps: Dependencies {
                ledger: MockLedger::new(program_id),
                config,
            },
        }
    }

    pub fn ledger(&self) -> &MockLedger {
        &self.deps.ledger
    }

    pub fn program_id(&self) -> Pubkey {
        self.deps.config.program_id
    }

    pub fn vault(&self) -> Pubkey {
        find_vault_address(&self.sender.pubkey(), &self.receiver.pubkey(), &self.program_id()).0
    }

    pub fn sender_wallet(&self) -> String {
        self.deps.config.sender_wallet.to_string_lossy().into_owned()
    }

    pub fn receiver_wallet(&self) -> String {
        self.deps.config.receiver_wallet.to_string_lossy().into_owned()
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.deps.config.sender_wallet);
        let _ = std::fs::remove_file(&self.deps.config.receiver_wallet);
    }
}
