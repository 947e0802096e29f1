//! Positional entry points, run the way the binaries run them.

mod common;

use common::{write_wallet, Fixture};
use lockpay_client::cli::{run_cancel, run_claim, run_initialize};
use lockpay_client::confirm::{wait_for, Condition};
use lockpay_client::{ClientError, Rejection};
use lockpay_vault::vault::Vault;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[tokio::test]
async fn test_defaults_come_from_config() {
    let fixture = Fixture::new();

    let receipt = run_initialize(&[], &fixture.deps).await.unwrap();
    assert_eq!(receipt.addresses.receiver, fixture.receiver.pubkey());
    let account = fixture.ledger().account(&fixture.vault()).unwrap();
    assert_eq!(Vault::try_deserialize(&account.data).unwrap().amount, 30_000_000);

    let receipt = run_claim(&[], &fixture.deps).await.unwrap();
    assert_eq!(receipt.addresses.vault, fixture.vault());
    wait_for(fixture.ledger(), &fixture.vault(), Condition::Absent, fixture.deps.config.poll)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_initialize_with_receiver_wallet_and_amount() {
    let fixture = Fixture::new();
    let other = Keypair::new();
    let other_wallet = write_wallet(&other);

    let receipt = run_initialize(
        &args(&[other_wallet.to_str().unwrap(), "25000000", &fixture.sender_wallet()]),
        &fixture.deps,
    )
    .await
    .unwrap();
    assert_eq!(receipt.addresses.receiver, other.pubkey());
    let account = fixture.ledger().account(&receipt.addresses.vault).unwrap();
    assert_eq!(Vault::try_deserialize(&account.data).unwrap().amount, 25_000_000);

    // the receiver may also be given as a literal key
    let third = Keypair::new().pubkey();
    let receipt = run_initialize(&args(&[third.to_string().as_str(), ""]), &fixture.deps)
        .await
        .unwrap();
    assert_eq!(receipt.addresses.receiver, third);
    std::fs::remove_file(other_wallet).unwrap();
}

#[tokio::test]
async fn test_claim_with_wrong_wallet() {
    let fixture = Fixture::new();
    run_initialize(&[], &fixture.deps).await.unwrap();
    let receiver = fixture.receiver.pubkey().to_string();
    let sender = fixture.sender.pubkey().to_string();

    let err = run_claim(&args(&[&receiver, &fixture.sender_wallet(), &sender]), &fixture.deps)
        .await
        .unwrap_err();
    assert!(matches!(err.rejection(), Some(Rejection::SignerMismatch { role: "Receiver", .. })));

    run_claim(&args(&[&receiver, &fixture.receiver_wallet(), &sender]), &fixture.deps)
        .await
        .unwrap();
    assert_eq!(fixture.ledger().submissions(), 2);
}

#[tokio::test]
async fn test_cancel_contract() {
    let fixture = Fixture::new();
    run_initialize(&[], &fixture.deps).await.unwrap();

    let err = run_cancel(&[], &fixture.deps).await.unwrap_err();
    assert!(matches!(err, ClientError::Usage(_)));

    let sender = fixture.sender.pubkey().to_string();
    let err = run_cancel(&args(&[&sender, &fixture.receiver_wallet()]), &fixture.deps)
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("Sender signer mismatch"));

    let receipt = run_cancel(&args(&[&sender]), &fixture.deps).await.unwrap();
    assert_eq!(receipt.addresses.vault, fixture.vault());
    assert_eq!(fixture.ledger().account(&fixture.vault()), None);
}

#[tokio::test]
async fn test_bad_arguments_never_submit() {
    let fixture = Fixture::new();

    let err = run_initialize(&args(&["", "-20000000"]), &fixture.deps).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidAmount(_)));

    let err = run_initialize(&args(&["nobody"]), &fixture.deps).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidPubkey(_)));

    let err = run_claim(&args(&["", "/nonexistent/wallet.json"]), &fixture.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Wallet { .. }));

    assert_eq!(fixture.ledger().reads(), 0);
    assert_eq!(fixture.ledger().submissions(), 0);
}
