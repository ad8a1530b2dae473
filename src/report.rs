use std::path::Path;

use ethers::types::{Address, H256};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::deployment::{Deployment, DeploymentResult};
use crate::serde_utils;

/// Persistent record of a confirmed deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub contract_name: String,
    pub chain_id: u64,
    pub deployer: Address,
    pub transaction_hash: H256,
    #[serde(flatten)]
    pub result: DeploymentResult,
}

impl Report {
    pub fn new(
        contract_name: impl ToString,
        chain_id: u64,
        deployer: Address,
        deployment: &Deployment,
    ) -> Self {
        Self {
            contract_name: contract_name.to_string(),
            chain_id,
            deployer,
            transaction_hash: deployment.transaction_hash,
            result: deployment.result,
        }
    }
}

#[instrument(skip(report))]
pub async fn write_report(path: &Path, report: &Report) -> eyre::Result<()> {
    serde_utils::write_serialize(path, report).await?;

    info!("Report written");

    Ok(())
}
