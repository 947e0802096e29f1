//! Sequential runner for steps that are expected to succeed or to fail.
//!
//! An expected failure counts as a pass. A step that succeeds although it was
//! expected to fail is a warning; the run continues and the verdict records it.
//! Any other failure halts the run, leaving the remaining steps `Pending`.

use crate::cli::{render_receipt, run_cancel, run_claim, run_initialize, Dependencies};
use crate::confirm::{wait_for, Condition, Poll};
use crate::error::ClientError;
use crate::ledger::Ledger;
use crate::operations::Receipt;
use crate::wallet::load_keypair;
use log::{error, info, warn};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signer::Signer;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

pub type StepFuture<'a> = Pin<Box<dyn Future<Output = Result<(), ClientError>> + 'a>>;

/// What to wait for before the next step may start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Settlement {
    Delay(Duration),
    Await { address: Pubkey, condition: Condition },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepState {
    Pending,
    Running,
    Succeeded,
    ExpectedFailure(String),
    UnexpectedSuccess,
    Failed(String),
}

impl StepState {
    fn resolve(expect_failure: bool, outcome: &Result<(), ClientError>) -> Self {
        match (outcome, expect_failure) {
            (Ok(()), false) => Self::Succeeded,
            (Ok(()), true) => Self::UnexpectedSuccess,
            (Err(e), true) => Self::ExpectedFailure(e.to_string()),
            (Err(e), false) => Self::Failed(e.to_string()),
        }
    }
}

pub struct Step<'a> {
    label: String,
    expect_failure: bool,
    action: StepFuture<'a>,
    settle: Option<Settlement>,
}

impl<'a> Step<'a> {
    pub fn expect_success(
        label: impl Into<String>,
        action: impl Future<Output = Result<(), ClientError>> + 'a,
    ) -> Self {
        Self::new(label, false, action)
    }

    pub fn expect_failure(
        label: impl Into<String>,
        action: impl Future<Output = Result<(), ClientError>> + 'a,
    ) -> Self {
        Self::new(label, true, action)
    }

    fn new(
        label: impl Into<String>,
        expect_failure: bool,
        action: impl Future<Output = Result<(), ClientError>> + 'a,
    ) -> Self {
        Self {
            label: label.into(),
            expect_failure,
            action: Box::pin(action),
            settle: None,
        }
    }

    /// Runs after the step unless it failed.
    pub fn settle(mut self, settlement: Settlement) -> Self {
        self.settle = Some(settlement);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepReport {
    pub label: String,
    pub expect_failure: bool,
    pub state: StepState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    PassedWithWarnings,
    Failed,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => f.write_str("passed"),
            Self::PassedWithWarnings => f.write_str("passed with warnings"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

#[derive(Debug)]
pub struct WorkflowReport {
    pub steps: Vec<StepReport>,
    /// Set when a step failed and halted the run.
    pub failure: Option<ClientError>,
}

impl WorkflowReport {
    pub fn verdict(&self) -> Verdict {
        if self.failure.is_some() || self.steps.iter().any(|step| matches!(step.state, StepState::Failed(_))) {
            Verdict::Failed
        } else if self.steps.iter().any(|step| step.state == StepState::UnexpectedSuccess) {
            Verdict::PassedWithWarnings
        } else {
            Verdict::Passed
        }
    }

    pub fn into_result(self) -> Result<Vec<StepReport>, ClientError> {
        match self.failure {
            Some(failure) => Err(failure),
            None => Ok(self.steps),
        }
    }
}

pub struct Workflow<'a, L> {
    ledger: &'a L,
    poll: Poll,
    steps: Vec<Step<'a>>,
}

impl<'a, L: Ledger> Workflow<'a, L> {
    pub fn new(ledger: &'a L, poll: Poll) -> Self {
        Self {
            ledger,
            poll,
            steps: vec![],
        }
    }

    pub fn step(mut self, step: Step<'a>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub async fn run(self) -> WorkflowReport {
        let mut reports: Vec<StepReport> = self
            .steps
            .iter()
            .map(|step| StepReport {
                label: step.label.clone(),
                expect_failure: step.expect_failure,
                state: StepState::Pending,
            })
            .collect();

        for (index, step) in self.steps.into_iter().enumerate() {
            let report = &mut reports[index];
            report.state = StepState::Running;
            if step.expect_failure {
                info!("STEP: {} (expected error)", step.label);
            } else {
                info!("STEP: {}", step.label);
            }

            let outcome = step.action.await;
            report.state = StepState::resolve(step.expect_failure, &outcome);

            let outcome = match (&report.state, outcome) {
                (StepState::Succeeded, _) => {
                    info!("OK: {} completed successfully", step.label);
                    Ok(())
                }
                (StepState::UnexpectedSuccess, _) => {
                    warn!("{} completed without error, but an error was expected", step.label);
                    Ok(())
                }
                (StepState::ExpectedFailure(reason), _) => {
                    info!("OK: expected error captured: {reason}");
                    Ok(())
                }
                (_, outcome) => outcome,
            };

            let settled = match (outcome, step.settle) {
                (Ok(()), Some(settlement)) => Self::settle(self.ledger, settlement, self.poll).await,
                (outcome, _) => outcome,
            };

            if let Err(source) = settled {
                error!("Unexpected error in step {}: {source}", step.label);
                report.state = StepState::Failed(source.to_string());
                return WorkflowReport {
                    steps: reports,
                    failure: Some(ClientError::StepFailed {
                        step: step.label,
                        source: Box::new(source),
                    }),
                };
            }
        }

        WorkflowReport {
            steps: reports,
            failure: None,
        }
    }

    async fn settle(ledger: &L, settlement: Settlement, poll: Poll) -> Result<(), ClientError> {
        match settlement {
            Settlement::Delay(delay) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
            Settlement::Await { address, condition } => wait_for(ledger, &address, condition, poll).await,
        }
    }
}

/// Flow 1 locks funds and claims them, Flow 2 locks funds and cancels. Each
/// flow first tries the settling operation with the wrong wallet.
pub fn lockpay_scenario<L: Ledger>(deps: &Dependencies<L>) -> Result<Workflow<'_, L>, ClientError> {
    let config = &deps.config;
    let sender = load_keypair(&config.sender_wallet)?.pubkey();
    let receiver = load_keypair(&config.receiver_wallet)?.pubkey();
    let sender_wallet = config.sender_wallet.to_string_lossy().into_owned();
    let receiver_wallet = config.receiver_wallet.to_string_lossy().into_owned();
    let vault = deps.lockpay().addresses(sender, receiver).vault;

    info!("workflow sender={sender} receiver={receiver} vault={vault}");

    let locked = Settlement::Await {
        address: vault,
        condition: Condition::OwnedBy(config.program_id),
    };
    let closed = Settlement::Await {
        address: vault,
        condition: Condition::Absent,
    };
    let pause = Settlement::Delay(config.step_delay);

    let (sender, receiver) = (sender.to_string(), receiver.to_string());
    let claim_with = |wallet: &str| vec![receiver.clone(), wallet.to_string(), sender.clone()];
    let cancel_with = |wallet: &str| vec![sender.clone(), wallet.to_string(), receiver.clone()];

    let workflow = Workflow::new(&deps.ledger, config.poll)
        .step(
            Step::expect_success(
                "Flow 1.1 - initialize_vault",
                run_command("Vault initialized", deps, vec![], Command::Initialize),
            )
            .settle(locked),
        )
        .step(
            Step::expect_failure(
                "Flow 1.2 - claim with invalid wallet",
                run_command("Claim success", deps, claim_with(&sender_wallet), Command::Claim),
            )
            .settle(pause),
        )
        .step(
            Step::expect_success(
                "Flow 1.3 - claim with valid wallet",
                run_command("Claim success", deps, claim_with(&receiver_wallet), Command::Claim),
            )
            .settle(closed),
        )
        .step(
            Step::expect_success(
                "Flow 2.1 - initialize_vault",
                run_command("Vault initialized", deps, vec![], Command::Initialize),
            )
            .settle(locked),
        )
        .step(
            Step::expect_failure(
                "Flow 2.2 - cancel with invalid wallet",
                run_command("Cancel sent", deps, cancel_with(&receiver_wallet), Command::Cancel),
            )
            .settle(pause),
        )
        .step(
            Step::expect_success(
                "Flow 2.3 - cancel with valid wallet",
                run_command("Cancel sent", deps, cancel_with(&sender_wallet), Command::Cancel),
            )
            .settle(closed),
        );

    Ok(workflow)
}

#[derive(Clone, Copy)]
enum Command {
    Initialize,
    Claim,
    Cancel,
}

/// Run `command` through the positional layer and print its receipt.
async fn run_command<L: Ledger>(
    label: &'static str,
    deps: &Dependencies<L>,
    args: Vec<String>,
    command: Command,
) -> Result<(), ClientError> {
    let receipt: Receipt = match command {
        Command::Initialize => run_initialize(&args, deps).await?,
        Command::Claim => run_claim(&args, deps).await?,
        Command::Cancel => run_cancel(&args, deps).await?,
    };
    println!("{}", render_receipt(label, &receipt, &deps.config));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_step_state() {
        let rejected = || Err(ClientError::Usage("nope".into()));

        assert_eq!(StepState::resolve(false, &Ok(())), StepState::Succeeded);
        assert_eq!(StepState::resolve(true, &Ok(())), StepState::UnexpectedSuccess);
        assert_eq!(
            StepState::resolve(true, &rejected()),
            StepState::ExpectedFailure("Usage: nope".into())
        );
        assert_eq!(StepState::resolve(false, &rejected()), StepState::Failed("Usage: nope".into()));
    }

    fn report(states: &[StepState]) -> WorkflowReport {
        WorkflowReport {
            steps: states
                .iter()
                .enumerate()
                .map(|(i, state)| StepReport {
                    label: format!("step {i}"),
                    expect_failure: false,
                    state: state.clone(),
                })
                .collect(),
            failure: None,
        }
    }

    #[test]
    fn test_verdict() {
        assert_eq!(report(&[]).verdict(), Verdict::Passed);
        assert_eq!(
            report(&[StepState::Succeeded, StepState::ExpectedFailure("x".into())]).verdict(),
            Verdict::Passed
        );
        assert_eq!(
            report(&[StepState::Succeeded, StepState::UnexpectedSuccess]).verdict(),
            Verdict::PassedWithWarnings
        );
        assert_eq!(
            report(&[StepState::UnexpectedSuccess, StepState::Failed("x".into()), StepState::Pending]).verdict(),
            Verdict::Failed
        );
        assert_eq!(Verdict::PassedWithWarnings.to_string(), "passed with warnings");
    }
}
