use std::io::IsTerminal;

use clap::Parser;
use cli::Args;
use config::DeployConfig;
use deployment::{Deployer, DeploymentRequest};
use framework::ForgeFramework;
use indicatif::ProgressStyle;
use interactive::DeploymentSummary;
use report::Report;
use tracing::{info, Level, Subscriber};
use tracing_error::ErrorLayer;
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::filter::{filter_fn, FilterExt, LevelFilter};
use tracing_subscriber::layer::Filter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer};

pub mod forge_utils;
pub mod serde_utils;

mod cli;
mod config;
mod deployment;
mod error;
mod framework;
mod interactive;
mod report;
mod types;

async fn start() -> eyre::Result<()> {
    let args = Args::parse();

    let mut config = match args.config.as_ref() {
        Some(path) => serde_utils::read_deserialize(path).await?,
        None => DeployConfig::default(),
    };
    config.apply_args(&args);
    config.validate()?;

    let interactive = !args.no_interactive && std::io::stdin().is_terminal();

    let receiver = interactive::resolve_receiver(config.receiver, interactive)?;

    let framework = ForgeFramework::connect(
        &args.rpc_url,
        &args.private_key,
        &config.project_dir,
        usize::try_from(config.confirmations)?,
    )
    .await?;

    let chain_id = framework.chain_id();
    let deployer_address = framework.deployer_address();

    if interactive {
        let summary = DeploymentSummary {
            contract_name: config.contract_name.clone(),
            receiver,
            chain_id,
            deployer: deployer_address,
        };

        if !interactive::confirm_deployment(&summary)? {
            info!("Deployment cancelled");
            return Ok(());
        }
    }

    let request = DeploymentRequest::new(&config.contract_name, receiver);

    let mut deployer =
        Deployer::new(framework, config.confirmation.policy());

    let deployment = deployer.run(&request, &mut std::io::stdout()).await?;

    if let Some(report_path) = config.report_path.as_ref() {
        let report = Report::new(
            &config.contract_name,
            chain_id,
            deployer_address,
            &deployment,
        );

        report::write_report(report_path, &report).await?;
    }

    Ok(())
}

/// `RUST_LOG` directives, falling back to `info`. Errors raised by this crate
/// always pass, whatever the directives say.
fn log_filter<S>(directives: &str) -> impl Filter<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives);

    let own_errors = filter_fn(|metadata| {
        metadata.target().starts_with(env!("CARGO_CRATE_NAME"))
            && *metadata.level() == Level::ERROR
    });

    env_filter.or(own_errors)
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    dotenv::dotenv().ok();

    let indicatif_layer = IndicatifLayer::new().with_progress_style(
        ProgressStyle::with_template(
            "{span_child_prefix}{spinner} {span_name}{{{span_fields}}} {elapsed}",
        )?
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
    );

    let filter =
        log_filter(&std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(indicatif_layer.get_stderr_writer())
                .with_filter(filter),
        )
        .with(indicatif_layer)
        .with(ErrorLayer::default())
        .init();

    match start().await {
        Ok(()) => Ok(()),
        Err(err) => {
            tracing::error!("{:?}", err);
            std::process::exit(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn logged_with(directives: &str, emit: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();

        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(move || writer.clone())
                .with_filter(log_filter(directives)),
        );

        tracing::subscriber::with_default(subscriber, emit);

        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn own_errors_survive_target_only_directives() {
        let logged = logged_with("ethers=debug", || {
            tracing::error!("deployment failed");
        });

        assert!(logged.contains("deployment failed"));
    }

    #[test]
    fn defaults_to_info() {
        let logged = logged_with("", || {
            info!("progress");
            tracing::debug!("details");
        });

        assert!(logged.contains("progress"));
        assert!(!logged.contains("details"));
    }
}
