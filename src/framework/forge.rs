use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use ethers::abi::Token;
use ethers::contract::ContractFactory as EthersContractFactory;
use ethers::prelude::SignerMiddleware;
use ethers::providers::{Http, Middleware, PendingTransaction, Provider};
use ethers::signers::{LocalWallet, Signer, Wallet};
use ethers::types::{Address, TransactionReceipt, H256, U64};
use reqwest::Url;
use thiserror::Error;
use tracing::{info, instrument};

use super::{ContractFactory, ContractFramework, PendingDeployment};
use crate::cli::PrivateKey;
use crate::error::BoxError;
use crate::forge_utils::{ContractSpec, ForgeInspect};

pub type RpcSigner = SignerMiddleware<Provider<Http>, LocalWallet>;

#[derive(Debug, Error)]
pub enum ConfirmationFailure {
    #[error("transaction was dropped from the mempool")]
    Dropped,
    #[error("transaction reverted in block {block:?}")]
    Reverted { block: Option<U64> },
    #[error("receipt carries no contract address")]
    MissingContractAddress,
}

/// Compiles with `forge` and deploys over JSON-RPC with a local wallet.
#[derive(Debug)]
pub struct ForgeFramework {
    project_dir: PathBuf,
    client: Arc<RpcSigner>,
    confirmations: usize,
}

impl ForgeFramework {
    #[instrument(skip(rpc_url, private_key))]
    pub async fn connect(
        rpc_url: &Url,
        private_key: &PrivateKey,
        project_dir: &Path,
        confirmations: usize,
    ) -> eyre::Result<Self> {
        let provider = Provider::try_from(rpc_url.as_str())?;
        let chain_id = provider.get_chainid().await?;
        let wallet = Wallet::from(private_key.key.clone())
            .with_chain_id(chain_id.as_u64());

        info!(chain_id = chain_id.as_u64(), deployer = ?wallet.address(), "Connected");

        let client = SignerMiddleware::new(provider, wallet);

        Ok(Self {
            project_dir: project_dir.to_owned(),
            client: Arc::new(client),
            confirmations,
        })
    }

    pub fn chain_id(&self) -> u64 {
        self.client.signer().chain_id()
    }

    pub fn deployer_address(&self) -> Address {
        self.client.address()
    }
}

#[async_trait]
impl ContractFramework for ForgeFramework {
    type Factory = ForgeContractFactory;

    #[instrument(skip(self))]
    async fn get_factory(
        &self,
        contract_name: &str,
    ) -> Result<ForgeContractFactory, BoxError> {
        let inspect = ForgeInspect::new(ContractSpec::from(contract_name))
            .with_cwd(&self.project_dir);

        let abi = inspect.abi().await?;
        let bytecode = inspect.bytecode().await?;

        if bytecode.is_empty() {
            return Err(format!(
                "{contract_name} has no creation bytecode (abstract contract or interface?)"
            )
            .into());
        }

        Ok(ForgeContractFactory {
            factory: EthersContractFactory::new(
                abi,
                bytecode,
                self.client.clone(),
            ),
            client: self.client.clone(),
            confirmations: self.confirmations,
        })
    }
}

pub struct ForgeContractFactory {
    factory: EthersContractFactory<RpcSigner>,
    client: Arc<RpcSigner>,
    confirmations: usize,
}

#[async_trait]
impl ContractFactory for ForgeContractFactory {
    type Pending = ForgePendingDeployment;

    #[instrument(skip_all)]
    async fn deploy(
        &self,
        args: Vec<Token>,
    ) -> Result<ForgePendingDeployment, BoxError> {
        let deployer = self.factory.clone().deploy_tokens(args)?;

        let pending = self.client.send_transaction(deployer.tx, None).await?;
        let tx_hash = pending.tx_hash();

        info!(?tx_hash, "Deployment transaction broadcast");

        Ok(ForgePendingDeployment {
            tx_hash,
            client: self.client.clone(),
            confirmations: self.confirmations,
        })
    }
}

pub struct ForgePendingDeployment {
    tx_hash: H256,
    client: Arc<RpcSigner>,
    confirmations: usize,
}

#[async_trait]
impl PendingDeployment for ForgePendingDeployment {
    fn tx_hash(&self) -> H256 {
        self.tx_hash
    }

    #[instrument(skip_all, fields(tx_hash = ?self.tx_hash))]
    async fn await_confirmation(&self) -> Result<Address, BoxError> {
        let receipt =
            PendingTransaction::new(self.tx_hash, self.client.provider())
                .confirmations(self.confirmations)
                .await?;

        Ok(contract_address(receipt)?)
    }
}

/// Extracts the created contract from a deployment receipt.
fn contract_address(
    receipt: Option<TransactionReceipt>,
) -> Result<Address, ConfirmationFailure> {
    let receipt = receipt.ok_or(ConfirmationFailure::Dropped)?;

    if receipt.status != Some(1.into()) {
        return Err(ConfirmationFailure::Reverted {
            block: receipt.block_number,
        });
    }

    receipt
        .contract_address
        .ok_or(ConfirmationFailure::MissingContractAddress)
}
