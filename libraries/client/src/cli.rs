//! Positional argument contract shared by the binaries and the workflow.

use crate::config::Config;
use crate::error::ClientError;
use crate::ledger::{Ledger, RpcLedger};
use crate::operations::{LockPay, Receipt};
use crate::wallet::{load_keypair, parse_pubkey, parse_pubkey_or_wallet};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signer::Signer;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const INITIALIZE_USAGE: &str =
    "lockpay-initialize [receiverPubkeyOrWalletPath] [amountLamports] [senderWalletPath]";
pub const CLAIM_USAGE: &str = "lockpay-claim [receiverPubkey] [receiverWalletPath] [senderPubkey]";
pub const CANCEL_USAGE: &str = "lockpay-cancel <senderPubkey> [senderWalletPath] [receiverPubkey]";

/// Everything an entry point needs besides its arguments.
pub struct Dependencies<L> {
    pub ledger: L,
    pub config: Config,
}

impl Dependencies<RpcLedger> {
    pub fn connect(config: Config) -> Self {
        let ledger = RpcLedger::new(config.rpc_url.clone(), config.commitment);
        Self { ledger, config }
    }
}

impl<L: Ledger> Dependencies<L> {
    pub fn lockpay(&self) -> LockPay<'_, L> {
        LockPay::new(&self.ledger, self.config.program_id)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InitializeArgs {
    /// Wallet path or base58 key; resolved when the command runs.
    pub receiver: Option<String>,
    pub amount: Option<u64>,
    pub sender_wallet: Option<PathBuf>,
}

impl InitializeArgs {
    pub fn parse(args: &[String]) -> Result<Self, ClientError> {
        let [receiver, amount, sender_wallet] = positional::<3>(args, INITIALIZE_USAGE)?;
        let amount = amount
            .map(|amount| u64::from_str(amount).map_err(|_| ClientError::InvalidAmount(amount.to_string())))
            .transpose()?;

        Ok(Self {
            receiver: receiver.map(str::to_string),
            amount,
            sender_wallet: sender_wallet.map(PathBuf::from),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClaimArgs {
    pub receiver: Option<Pubkey>,
    pub receiver_wallet: Option<PathBuf>,
    pub sender: Option<Pubkey>,
}

impl ClaimArgs {
    pub fn parse(args: &[String]) -> Result<Self, ClientError> {
        let [receiver, receiver_wallet, sender] = positional::<3>(args, CLAIM_USAGE)?;
        Ok(Self {
            receiver: receiver.map(parse_pubkey).transpose()?,
            receiver_wallet: receiver_wallet.map(PathBuf::from),
            sender: sender.map(parse_pubkey).transpose()?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CancelArgs {
    pub sender: Pubkey,
    pub sender_wallet: Option<PathBuf>,
    pub receiver: Option<Pubkey>,
}

impl CancelArgs {
    pub fn parse(args: &[String]) -> Result<Self, ClientError> {
        let [sender, sender_wallet, receiver] = positional::<3>(args, CANCEL_USAGE)?;
        let sender = sender.ok_or_else(|| ClientError::Usage(CANCEL_USAGE.to_string()))?;
        Ok(Self {
            sender: parse_pubkey(sender)?,
            sender_wallet: sender_wallet.map(PathBuf::from),
            receiver: receiver.map(parse_pubkey).transpose()?,
        })
    }
}

/// Up to `N` positional arguments; empty strings count as absent.
fn positional<'a, const N: usize>(args: &'a [String], usage: &str) -> Result<[Option<&'a str>; N], ClientError> {
    if args.len() > N {
        return Err(ClientError::Usage(usage.to_string()));
    }
    let mut values = [None; N];
    for (slot, arg) in values.iter_mut().zip(args) {
        *slot = Some(arg.as_str()).filter(|arg| !arg.is_empty());
    }
    Ok(values)
}

fn wallet_pubkey(path: &Path) -> Result<Pubkey, ClientError> {
    Ok(load_keypair(path)?.pubkey())
}

pub async fn run_initialize<L: Ledger>(args: &[String], deps: &Dependencies<L>) -> Result<Receipt, ClientError> {
    let args = InitializeArgs::parse(args)?;
    let config = &deps.config;

    let sender = load_keypair(args.sender_wallet.as_deref().unwrap_or(config.sender_wallet.as_path()))?;
    let receiver = match args.receiver.as_deref() {
        Some(receiver) => parse_pubkey_or_wallet(receiver)?,
        None => wallet_pubkey(&config.receiver_wallet)?,
    };
    let amount = args.amount.unwrap_or(config.default_amount);

    deps.lockpay().initialize_vault(&sender, receiver, amount).await
}

pub async fn run_claim<L: Ledger>(args: &[String], deps: &Dependencies<L>) -> Result<Receipt, ClientError> {
    let args = ClaimArgs::parse(args)?;
    let config = &deps.config;

    let signer = load_keypair(args.receiver_wallet.as_deref().unwrap_or(config.receiver_wallet.as_path()))?;
    let sender = match args.sender {
        Some(sender) => sender,
        None => wallet_pubkey(&config.sender_wallet)?,
    };

    deps.lockpay().claim(&signer, args.receiver, sender).await
}

pub async fn run_cancel<L: Ledger>(args: &[String], deps: &Dependencies<L>) -> Result<Receipt, ClientError> {
    let args = CancelArgs::parse(args)?;
    let config = &deps.config;

    let signer = load_keypair(args.sender_wallet.as_deref().unwrap_or(config.sender_wallet.as_path()))?;
    let receiver = match args.receiver {
        Some(receiver) => receiver,
        None => wallet_pubkey(&config.receiver_wallet)?,
    };

    deps.lockpay().cancel(&signer, Some(args.sender), receiver).await
}

pub fn render_receipt(label: &str, receipt: &Receipt, config: &Config) -> String {
    let addresses = &receipt.addresses;
    format!(
        "{label}! {}\nsender:   {}\nreceiver: {}\nvault:    {}\nvaultAuthority: {}",
        config.explorer_url(&receipt.signature.to_string()),
        addresses.sender,
        addresses.receiver,
        addresses.vault,
        addresses.vault_authority,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockpay_vault::pda::VaultAddresses;
    use solana_sdk::signature::Signature;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn test_initialize_args() {
        assert_eq!(InitializeArgs::parse(&[]).unwrap(), InitializeArgs::default());

        let parsed = InitializeArgs::parse(&args(&["receiver.json", "25000000", "sender.json"])).unwrap();
        assert_eq!(parsed.receiver.as_deref(), Some("receiver.json"));
        assert_eq!(parsed.amount, Some(25_000_000));
        assert_eq!(parsed.sender_wallet, Some(PathBuf::from("sender.json")));
    }

    #[test]
    fn test_initialize_rejects_malformed_amounts() {
        for amount in ["-1", "1.5", "18446744073709551616", "lots"] {
            let parsed = InitializeArgs::parse(&args(&["", amount]));
            assert!(
                matches!(parsed, Err(ClientError::InvalidAmount(ref v)) if v == amount),
                "{amount}"
            );
        }
    }

    #[test]
    fn test_empty_arguments_are_absent() {
        let sender = Pubkey::new_unique();
        let parsed = ClaimArgs::parse(&args(&["", "", sender.to_string().as_str()])).unwrap();
        assert_eq!(parsed.receiver, None);
        assert_eq!(parsed.receiver_wallet, None);
        assert_eq!(parsed.sender, Some(sender));
    }

    #[test]
    fn test_cancel_requires_sender() {
        assert!(matches!(CancelArgs::parse(&[]), Err(ClientError::Usage(_))));
        assert!(matches!(CancelArgs::parse(&args(&[""])), Err(ClientError::Usage(_))));
        assert!(matches!(
            CancelArgs::parse(&args(&["not-a-key"])),
            Err(ClientError::InvalidPubkey(_))
        ));

        let sender = Pubkey::new_unique();
        let parsed = CancelArgs::parse(&args(&[sender.to_string().as_str(), "sender.json"])).unwrap();
        assert_eq!(parsed.sender, sender);
        assert_eq!(parsed.sender_wallet, Some(PathBuf::from("sender.json")));
        assert_eq!(parsed.receiver, None);
    }

    #[test]
    fn test_too_many_arguments() {
        assert!(matches!(
            ClaimArgs::parse(&args(&["a", "b", "c", "d"])),
            Err(ClientError::Usage(ref usage)) if usage == CLAIM_USAGE
        ));
    }

    #[test]
    fn test_render_receipt() {
        let addresses = VaultAddresses::derive(Pubkey::new_unique(), Pubkey::new_unique(), &lockpay_vault::ID);
        let receipt = Receipt {
            signature: Signature::default(),
            addresses,
        };
        let rendered = render_receipt("Claim success", &receipt, &Config::default());

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Claim success! https://explorer.solana.com/tx/"));
        assert!(lines[0].ends_with("?cluster=devnet"));
        assert_eq!(lines[3], format!("vault:    {}", addresses.vault));
        assert_eq!(lines[4], format!("vaultAuthority: {}", addresses.vault_authority));
    }
}
