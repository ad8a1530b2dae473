use std::io;
use std::time::Duration;

use ethers::types::{Address, H256};
use thiserror::Error;

use crate::deployment::DeploymentState;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum DeployError {
    /// The contract identifier is unknown to the build (not compiled or not part of the project).
    #[error("Failed to resolve a deployable factory for {contract}")]
    FactoryResolution {
        contract: String,
        #[source]
        source: BoxError,
    },

    /// The network rejected the deployment transaction outright.
    #[error("Failed to submit the deployment transaction for {contract}")]
    Submission {
        contract: String,
        #[source]
        source: BoxError,
    },

    /// The transaction was broadcast but never produced a contract.
    #[error("Deployment transaction {tx_hash:?} was not confirmed")]
    Confirmation {
        tx_hash: H256,
        #[source]
        source: BoxError,
    },

    #[error(
        "Deployment transaction {tx_hash:?} not confirmed after {}s",
        .waited.as_secs()
    )]
    Timeout { tx_hash: H256, waited: Duration },

    /// The contract exists on chain, only printing the result failed.
    #[error(
        "Failed to report the deployment of {contract_address:?} (transaction {tx_hash:?})"
    )]
    Output {
        contract_address: Address,
        tx_hash: H256,
        #[source]
        source: io::Error,
    },

    #[error("Deployer already ran (state: {state})")]
    AlreadyRan { state: DeploymentState },
}
