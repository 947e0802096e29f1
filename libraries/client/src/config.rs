use crate::confirm::Poll;
use crate::error::ClientError;
use lockpay_vault::idl::Idl;
use log::info;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";
pub const DEFAULT_IDL_PATH: &str = "target/idl/lockpay_vault.json";
pub const DEFAULT_SENDER_WALLET: &str = "sender-wallet.json";
pub const DEFAULT_RECEIVER_WALLET: &str = "receiver-wallet.json";
pub const DEFAULT_AMOUNT_LAMPORTS: u64 = 30_000_000;

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub commitment: CommitmentConfig,
    pub program_id: Pubkey,
    pub sender_wallet: PathBuf,
    pub receiver_wallet: PathBuf,
    pub default_amount: u64,
    /// explorer cluster query value
    pub cluster: String,
    pub poll: Poll,
    pub step_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            commitment: CommitmentConfig::confirmed(),
            program_id: lockpay_vault::ID,
            sender_wallet: PathBuf::from(DEFAULT_SENDER_WALLET),
            receiver_wallet: PathBuf::from(DEFAULT_RECEIVER_WALLET),
            default_amount: DEFAULT_AMOUNT_LAMPORTS,
            cluster: "devnet".to_string(),
            poll: Poll::default(),
            step_delay: Duration::from_millis(5_000),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok().filter(|value| !value.is_empty()))
    }

    /// Build a config from `lookup`, falling back to the defaults for unset keys.
    ///
    /// When an IDL is found it is validated against the compiled schema and
    /// supplies the program id unless `LOCKPAY_PROGRAM_ID` overrides it.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("LOCKPAY_RPC_URL").or_else(|| lookup("ANCHOR_PROVIDER_URL")) {
            config.rpc_url = url;
        }
        if let Some(commitment) = lookup("LOCKPAY_COMMITMENT") {
            config.commitment = CommitmentConfig::from_str(&commitment)
                .map_err(|_| ClientError::Config(format!("unknown commitment `{commitment}`")))?;
        }

        let idl = match lookup("LOCKPAY_IDL") {
            Some(path) => Some(load_idl(Path::new(&path))?),
            None if Path::new(DEFAULT_IDL_PATH).is_file() => Some(load_idl(Path::new(DEFAULT_IDL_PATH))?),
            None => None,
        };
        if let Some(idl) = &idl {
            config.program_id = idl.program_id()?;
        }
        if let Some(program_id) = lookup("LOCKPAY_PROGRAM_ID") {
            config.program_id = Pubkey::from_str(&program_id)
                .map_err(|_| ClientError::Config(format!("LOCKPAY_PROGRAM_ID `{program_id}` is not a public key")))?;
        }

        if let Some(path) = lookup("LOCKPAY_SENDER_WALLET").or_else(|| lookup("ANCHOR_WALLET")) {
            config.sender_wallet = PathBuf::from(path);
        }
        if let Some(path) = lookup("LOCKPAY_RECEIVER_WALLET") {
            config.receiver_wallet = PathBuf::from(path);
        }
        if let Some(amount) = lookup("LOCKPAY_AMOUNT") {
            config.default_amount = u64::from_str(&amount).map_err(|_| ClientError::InvalidAmount(amount))?;
        }
        if let Some(cluster) = lookup("LOCKPAY_CLUSTER") {
            config.cluster = cluster;
        }

        if let Some(secs) = lookup("LOCKPAY_CONFIRM_TIMEOUT_SECS") {
            config.poll.timeout = Duration::from_secs(parse_number("LOCKPAY_CONFIRM_TIMEOUT_SECS", &secs)?);
        }
        if let Some(millis) = lookup("LOCKPAY_POLL_INTERVAL_MS") {
            config.poll.interval = Duration::from_millis(parse_number("LOCKPAY_POLL_INTERVAL_MS", &millis)?);
        }
        if let Some(millis) = lookup("LOCKPAY_STEP_DELAY_MS") {
            config.step_delay = Duration::from_millis(parse_number("LOCKPAY_STEP_DELAY_MS", &millis)?);
        }

        Ok(config)
    }

    pub fn explorer_url(&self, signature: &str) -> String {
        match self.cluster.as_str() {
            "mainnet-beta" | "mainnet" => format!("https://explorer.solana.com/tx/{signature}"),
            cluster => format!("https://explorer.solana.com/tx/{signature}?cluster={cluster}"),
        }
    }
}

fn load_idl(path: &Path) -> Result<Idl, ClientError> {
    let idl = Idl::from_path(path)?;
    idl.validate()?;
    info!("validated IDL {} for program {}", path.display(), idl.address);
    Ok(idl)
}

fn parse_number(key: &str, value: &str) -> Result<u64, ClientError> {
    u64::from_str(value).map_err(|_| ClientError::Config(format!("{key} `{value}` is not a number")))
}
