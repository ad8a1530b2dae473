use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::deployment::confirmation::{
    ConfirmationPolicy, TimeoutPolicy, DEFAULT_MAX_POLLS, DEFAULT_TIMEOUT,
};
use crate::types::ChecksumAddress;

pub const DEFAULT_CONTRACT_NAME: &str = "SubscriptionManager";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeployConfig {
    pub contract_name: String,
    pub receiver: Option<ChecksumAddress>,
    pub project_dir: PathBuf,
    pub confirmations: u64,
    pub confirmation: ConfirmationConfig,
    pub report_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfirmationConfig {
    pub timeout_secs: u64,
    pub policy: TimeoutPolicy,
    pub max_polls: u32,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            contract_name: DEFAULT_CONTRACT_NAME.to_owned(),
            receiver: None,
            project_dir: PathBuf::from("."),
            confirmations: 1,
            confirmation: ConfirmationConfig::default(),
            report_path: None,
        }
    }
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            policy: TimeoutPolicy::default(),
            max_polls: DEFAULT_MAX_POLLS,
        }
    }
}

impl ConfirmationConfig {
    pub fn policy(&self) -> ConfirmationPolicy {
        ConfirmationPolicy {
            timeout: Duration::from_secs(self.timeout_secs),
            on_timeout: self.policy,
            max_polls: self.max_polls,
        }
    }
}

impl DeployConfig {
    /// Rejects values that would broadcast a deployment but never wait for it.
    pub fn validate(&self) -> eyre::Result<()> {
        if self.confirmations == 0 {
            eyre::bail!("confirmations must be at least 1");
        }

        if self.confirmation.timeout_secs == 0 {
            eyre::bail!("confirmation.timeout_secs must be at least 1");
        }

        Ok(())
    }

    /// Command line values take precedence over the config file.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(contract_name) = &args.contract_name {
            self.contract_name = contract_name.clone();
        }

        if let Some(receiver) = args.receiver {
            self.receiver = Some(receiver);
        }

        if let Some(project_dir) = &args.project_dir {
            self.project_dir = project_dir.clone();
        }

        if let Some(confirmations) = args.confirmations {
            self.confirmations = confirmations;
        }

        if let Some(timeout_secs) = args.confirmation_timeout {
            self.confirmation.timeout_secs = timeout_secs;
        }

        if let Some(policy) = args.timeout_policy {
            self.confirmation.policy = policy;
        }

        if let Some(max_polls) = args.max_polls {
            self.confirmation.max_polls = max_polls;
        }

        if let Some(report_path) = &args.report_path {
            self.report_path = Some(report_path.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use indoc::indoc;

    use super::*;

    const KEY: &str =
        "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    #[test]
    fn empty_config_uses_defaults() -> eyre::Result<()> {
        let config: DeployConfig = serde_yaml::from_str("{}")?;

        assert_eq!(config, DeployConfig::default());
        assert_eq!(config.contract_name, "SubscriptionManager");
        assert!(config.receiver.is_none());
        assert_eq!(config.confirmation.policy(), ConfirmationPolicy::default());

        Ok(())
    }

    #[test]
    fn full_config() -> eyre::Result<()> {
        let config: DeployConfig = serde_yaml::from_str(indoc! {r#"
            contract_name: SubscriptionManager
            receiver: "0xD1049F82d75D5AdC81586DA8F9E85723eC4CA4a3"
            project_dir: ./contracts
            confirmations: 3
            confirmation:
              timeout_secs: 60
              policy: poll
              max_polls: 4
            report_path: deployments/report.yml
        "#})?;

        assert_eq!(
            config.receiver.map(|r| r.to_string()).as_deref(),
            Some("0xD1049F82d75D5AdC81586DA8F9E85723eC4CA4a3")
        );
        assert_eq!(config.project_dir, PathBuf::from("./contracts"));
        assert_eq!(config.confirmations, 3);
        assert_eq!(
            config.confirmation.policy(),
            ConfirmationPolicy {
                timeout: Duration::from_secs(60),
                on_timeout: TimeoutPolicy::Poll,
                max_polls: 4,
            }
        );
        assert_eq!(
            config.report_path,
            Some(PathBuf::from("deployments/report.yml"))
        );

        Ok(())
    }

    #[test]
    fn zero_values_fail_validation() -> eyre::Result<()> {
        let config: DeployConfig = serde_yaml::from_str(indoc! {r#"
            confirmation:
              timeout_secs: 0
        "#})?;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));

        let config: DeployConfig =
            serde_yaml::from_str("confirmations: 0")?;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("confirmations"));

        DeployConfig::default().validate()?;

        Ok(())
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_yaml::from_str::<DeployConfig>(indoc! {r#"
            reciever: "0xD1049F82d75D5AdC81586DA8F9E85723eC4CA4a3"
        "#});

        assert!(result.is_err());
    }

    #[test]
    fn args_override_file() -> eyre::Result<()> {
        let mut config: DeployConfig = serde_yaml::from_str(indoc! {r#"
            receiver: "0x0000000000000000000000000000000000000001"
            confirmation:
              timeout_secs: 60
        "#})?;

        let args = Args::try_parse_from([
            "deployer",
            "--private-key",
            KEY,
            "--rpc-url",
            "http://localhost:8545",
            "--receiver",
            "0xD1049F82d75D5AdC81586DA8F9E85723eC4CA4a3",
            "--timeout-policy",
            "poll",
        ])?;

        config.apply_args(&args);

        assert_eq!(
            config.receiver.map(|r| r.to_string()).as_deref(),
            Some("0xD1049F82d75D5AdC81586DA8F9E85723eC4CA4a3")
        );
        assert_eq!(config.confirmation.timeout_secs, 60);
        assert_eq!(config.confirmation.policy, TimeoutPolicy::Poll);

        Ok(())
    }
}
