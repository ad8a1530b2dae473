use std::time::Duration;

use clap::ValueEnum;
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tokio::time::Instant;
use tracing::{instrument, warn};

use crate::error::DeployError;
use crate::framework::PendingDeployment;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);
pub const DEFAULT_MAX_POLLS: u32 = 10;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TimeoutPolicy {
    /// Give up once the first window elapses
    #[default]
    Fail,
    /// Keep waiting for up to `max_polls` windows
    Poll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    pub timeout: Duration,
    pub on_timeout: TimeoutPolicy,
    pub max_polls: u32,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            on_timeout: TimeoutPolicy::Fail,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }
}

impl ConfirmationPolicy {
    /// Total number of windows waited before giving up, never less than one.
    pub fn windows(&self) -> u32 {
        match self.on_timeout {
            TimeoutPolicy::Fail => 1,
            TimeoutPolicy::Poll => self.max_polls.max(1),
        }
    }
}

/// Waits for `pending` to be confirmed, bounded by `policy`.
///
/// The same confirmation future is resumed across windows, nothing is
/// resubmitted when a window elapses.
#[instrument(skip_all, fields(tx_hash = ?pending.tx_hash()))]
pub async fn await_confirmation<P>(
    pending: &P,
    policy: &ConfirmationPolicy,
) -> Result<Address, DeployError>
where
    P: PendingDeployment + ?Sized,
{
    let tx_hash = pending.tx_hash();
    let started = Instant::now();
    let windows = policy.windows();

    let confirmation = pending.await_confirmation();
    tokio::pin!(confirmation);

    for window in 1..=windows {
        match tokio::time::timeout(policy.timeout, &mut confirmation).await {
            Ok(Ok(address)) => return Ok(address),
            Ok(Err(source)) => {
                return Err(DeployError::Confirmation { tx_hash, source })
            }
            Err(_) if window < windows => {
                warn!(
                    window,
                    windows,
                    waited_secs = started.elapsed().as_secs(),
                    "Still waiting for confirmation"
                );
            }
            Err(_) => {}
        }
    }

    Err(DeployError::Timeout {
        tx_hash,
        waited: started.elapsed(),
    })
}
