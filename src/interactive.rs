use ethers::types::Address;
use eyre::ContextCompat;

use self::utils::prompt_text_handle_errors;
use crate::types::ChecksumAddress;

mod utils;

/// What is about to be deployed, shown before asking for confirmation.
#[derive(Debug, Clone)]
pub struct DeploymentSummary {
    pub contract_name: String,
    pub receiver: Address,
    pub chain_id: u64,
    pub deployer: Address,
}

/// Returns the configured receiver, prompting for one when allowed.
pub fn resolve_receiver(
    configured: Option<ChecksumAddress>,
    interactive: bool,
) -> eyre::Result<Address> {
    if let Some(receiver) = configured {
        return Ok(receiver.0);
    }

    let receiver = interactive
        .then(|| prompt_text_handle_errors::<ChecksumAddress>("Receiver address:"))
        .transpose()?
        .context(
            "No receiver address configured, pass --receiver, set RECEIVER or add `receiver` to the config file",
        )?;

    Ok(receiver.0)
}

pub fn confirm_deployment(summary: &DeploymentSummary) -> eyre::Result<bool> {
    print_deployment_info(summary);

    let proceed = inquire::Confirm::new("Proceed with this deployment?")
        .with_default(false)
        .prompt()?;

    Ok(proceed)
}

fn print_deployment_info(summary: &DeploymentSummary) {
    println!("Contract: {}", summary.contract_name);
    println!("  Receiver: {}", ChecksumAddress(summary.receiver));
    println!("  Chain id: {}", summary.chain_id);
    println!("  Deployer: {}", ChecksumAddress(summary.deployer));
}
