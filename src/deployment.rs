use std::io::Write;

use tracing::{info, instrument};

use self::confirmation::ConfirmationPolicy;
use crate::error::DeployError;
use crate::framework::{ContractFactory, ContractFramework, PendingDeployment};

pub mod confirmation;
pub mod model;

pub use self::model::{Deployment, DeploymentRequest, DeploymentResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum DeploymentState {
    #[display(fmt = "idle")]
    Idle,
    #[display(fmt = "resolving factory")]
    FactoryResolving,
    #[display(fmt = "submitting")]
    Submitting,
    #[display(fmt = "awaiting confirmation")]
    AwaitingConfirmation,
    #[display(fmt = "reported")]
    Reported,
    #[display(fmt = "failed")]
    Failed,
}

impl DeploymentState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Reported | Self::Failed)
    }
}

/// Runs the resolve, submit, confirm, report sequence exactly once.
pub struct Deployer<F> {
    framework: F,
    policy: ConfirmationPolicy,
    state: DeploymentState,
}

impl<F> Deployer<F>
where
    F: ContractFramework,
{
    pub fn new(framework: F, policy: ConfirmationPolicy) -> Self {
        Self {
            framework,
            policy,
            state: DeploymentState::Idle,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> DeploymentState {
        self.state
    }

    /// Deploys `request` and writes the success line to `out`.
    ///
    /// Nothing is written to `out` unless the deployment was confirmed.
    #[instrument(name = "deploy", skip_all, fields(contract = request.contract_name()))]
    pub async fn run<W: Write>(
        &mut self,
        request: &DeploymentRequest,
        out: &mut W,
    ) -> Result<Deployment, DeployError> {
        if self.state != DeploymentState::Idle {
            return Err(DeployError::AlreadyRan { state: self.state });
        }

        let outcome = self.execute(request, out).await;

        if outcome.is_err() {
            self.transition(DeploymentState::Failed);
        }

        outcome
    }

    async fn execute<W: Write>(
        &mut self,
        request: &DeploymentRequest,
        out: &mut W,
    ) -> Result<Deployment, DeployError> {
        self.transition(DeploymentState::FactoryResolving);

        let factory = self
            .framework
            .get_factory(request.contract_name())
            .await
            .map_err(|source| DeployError::FactoryResolution {
                contract: request.contract_name().to_owned(),
                source,
            })?;

        self.transition(DeploymentState::Submitting);

        let pending = factory
            .deploy(request.constructor_args().to_vec())
            .await
            .map_err(|source| DeployError::Submission {
                contract: request.contract_name().to_owned(),
                source,
            })?;

        let transaction_hash = pending.tx_hash();

        self.transition(DeploymentState::AwaitingConfirmation);

        let contract_address =
            confirmation::await_confirmation(&pending, &self.policy).await?;

        let deployment = Deployment {
            result: DeploymentResult {
                contract_address,
                receiver_address: request.receiver(),
            },
            transaction_hash,
        };

        info!(
            contract_address = ?contract_address,
            tx_hash = ?transaction_hash,
            "Deployment confirmed"
        );

        writeln!(out, "{}", deployment.result).map_err(|source| {
            DeployError::Output {
                contract_address,
                tx_hash: transaction_hash,
                source,
            }
        })?;

        self.transition(DeploymentState::Reported);

        Ok(deployment)
    }

    fn transition(&mut self, next: DeploymentState) {
        debug_assert!(!self.state.is_terminal());

        info!(from = %self.state, to = %next, "Deployment state changed");

        self.state = next;
    }
}
