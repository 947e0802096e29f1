use crate::error::ClientError;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Relative paths resolve against the working directory.
pub fn resolve_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

/// Load a keypair from a JSON array of raw secret-key bytes.
pub fn load_keypair(path: &Path) -> Result<Keypair, ClientError> {
    let path = resolve_path(path);
    let wallet_error = |reason: String| ClientError::Wallet {
        path: path.clone(),
        reason,
    };

    let raw = std::fs::read_to_string(&path).map_err(|e| wallet_error(e.to_string()))?;
    let bytes: Vec<u8> = serde_json::from_str(&raw).map_err(|e| wallet_error(e.to_string()))?;
    Keypair::from_bytes(&bytes).map_err(|e| wallet_error(e.to_string()))
}

pub fn parse_pubkey(value: &str) -> Result<Pubkey, ClientError> {
    Pubkey::from_str(value).map_err(|_| ClientError::InvalidPubkey(value.to_string()))
}

/// An existing wallet file yields its public key; anything else must be a
/// base58 public key.
pub fn parse_pubkey_or_wallet(value: &str) -> Result<Pubkey, ClientError> {
    let path = resolve_path(Path::new(value));
    if path.is_file() {
        return Ok(load_keypair(&path)?.pubkey());
    }
    parse_pubkey(value)
}
