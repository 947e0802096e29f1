//! Polling for a confirmed post-condition on one address.
//!
//! A dependent operation must not be issued until the ledger shows the effect
//! of the previous one. Instead of sleeping a fixed time, poll the address of
//! interest until the expected condition holds or the deadline passes.

use crate::error::ClientError;
use crate::ledger::{AccountSnapshot, Ledger};
use log::debug;
use solana_sdk::pubkey::Pubkey;
use std::fmt;
use std::time::Duration;
use tokio::time::{sleep, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    Exists,
    Absent,
    OwnedBy(Pubkey),
}

impl Condition {
    pub fn holds(&self, account: Option<&AccountSnapshot>) -> bool {
        match (self, account) {
            (Self::Exists, account) => account.is_some(),
            (Self::Absent, account) => account.is_none(),
            (Self::OwnedBy(owner), Some(account)) => account.owner == *owner,
            (Self::OwnedBy(_), None) => false,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exists => f.write_str("present"),
            Self::Absent => f.write_str("absent"),
            Self::OwnedBy(owner) => write!(f, "owned by {owner}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Poll {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for Poll {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            interval: Duration::from_millis(500),
        }
    }
}

/// Read errors are not retried; only an unmet condition is.
pub async fn wait_for<L: Ledger>(
    ledger: &L,
    address: &Pubkey,
    condition: Condition,
    poll: Poll,
) -> Result<(), ClientError> {
    let started = Instant::now();
    loop {
        let account = ledger.get_account(address).await?;
        if condition.holds(account.as_ref()) {
            debug!("{address} is {condition} after {:?}", started.elapsed());
            return Ok(());
        }

        let waited = started.elapsed();
        if waited >= poll.timeout {
            return Err(ClientError::ConfirmationTimeout {
                address: *address,
                condition: condition.to_string(),
                waited,
            });
        }
        sleep(poll.interval.min(poll.timeout - waited)).await;
    }
}
