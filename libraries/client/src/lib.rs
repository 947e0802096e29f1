//! Off-chain toolkit for the lockpay_vault program.
//!
//! Usage:
//!   lockpay-initialize [receiverPubkeyOrWalletPath] [amountLamports] [senderWalletPath]
//!   lockpay-claim [receiverPubkey] [receiverWalletPath] [senderPubkey]
//!   lockpay-cancel <senderPubkey> [senderWalletPath] [receiverPubkey]
//!   lockpay-workflow
//!
//! Every operation derives its addresses, passes the pre-flight checks and
//! only then submits. Configuration comes from the environment, see [`Config`].

pub mod cli;
pub mod config;
pub mod confirm;
pub mod error;
pub mod ledger;
pub mod operations;
pub mod preflight;
pub mod wallet;
pub mod workflow;

pub use cli::Dependencies;
pub use config::Config;
pub use error::{ClientError, Rejection};
pub use ledger::{AccountSnapshot, Ledger, RpcLedger};
pub use operations::{LockPay, Receipt};
