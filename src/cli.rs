use std::path::PathBuf;

use clap::Parser;
use reqwest::Url;

use crate::deployment::confirmation::TimeoutPolicy;
use crate::types::ChecksumAddress;

pub mod private_key;

pub use private_key::PrivateKey;

#[derive(Debug, Clone, Parser)]
#[clap(rename_all = "kebab-case", about, version)]
pub struct Args {
    /// Path to an optional deployment configuration file (yaml)
    #[clap(short, long, env)]
    pub config: Option<PathBuf>,

    /// Private key to use for the deployment
    #[clap(short, long, env)]
    pub private_key: PrivateKey,

    /// The RPC Url to use for the deployment
    #[clap(short, long, env)]
    pub rpc_url: Url,

    /// Address passed to the contract constructor as the receiver
    ///
    /// There is no default, an address must be given explicitly
    /// (here, in the config file or at the interactive prompt)
    #[clap(long, env)]
    pub receiver: Option<ChecksumAddress>,

    /// Name of the contract to deploy
    #[clap(long, env)]
    pub contract_name: Option<String>,

    /// Root of the forge project containing the contract
    #[clap(long, env)]
    pub project_dir: Option<PathBuf>,

    /// Number of block confirmations to wait for
    #[clap(long, env, value_parser = clap::value_parser!(u64).range(1..))]
    pub confirmations: Option<u64>,

    /// Seconds to wait for the deployment to be confirmed
    #[clap(long, env, value_parser = clap::value_parser!(u64).range(1..))]
    pub confirmation_timeout: Option<u64>,

    /// What to do once the confirmation timeout elapses
    #[clap(long, env, value_enum)]
    pub timeout_policy: Option<TimeoutPolicy>,

    /// Number of timeout windows to wait for with the `poll` policy
    #[clap(long, env)]
    pub max_polls: Option<u32>,

    /// Where to write the deployment report
    #[clap(long, env)]
    pub report_path: Option<PathBuf>,

    /// Never prompt, fail on missing values instead
    #[clap(long, env)]
    pub no_interactive: bool,
}
