//! The boundary between the deployer and whatever compiles, signs and
//! broadcasts contracts.
//!
//! Implementations return raw errors; the deployer classifies them into
//! [`DeployError`](crate::error::DeployError) kinds by the step that failed.

use async_trait::async_trait;
use ethers::abi::Token;
use ethers::types::{Address, H256};

use crate::error::BoxError;

pub mod forge;

pub use self::forge::ForgeFramework;

#[async_trait]
pub trait ContractFramework: Send + Sync {
    type Factory: ContractFactory;

    /// Looks up a deployable factory for the named contract.
    async fn get_factory(
        &self,
        contract_name: &str,
    ) -> Result<Self::Factory, BoxError>;
}

#[async_trait]
pub trait ContractFactory: Send + Sync {
    type Pending: PendingDeployment;

    /// Broadcasts the creation transaction and returns as soon as the
    /// network accepted it.
    async fn deploy(&self, args: Vec<Token>) -> Result<Self::Pending, BoxError>;
}

#[async_trait]
pub trait PendingDeployment: Send + Sync {
    fn tx_hash(&self) -> H256;

    /// Resolves to the created contract address once the transaction is mined.
    ///
    /// Dropping the returned future must not affect the transaction itself.
    async fn await_confirmation(&self) -> Result<Address, BoxError>;
}
