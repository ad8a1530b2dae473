use std::fmt;

use ethers::abi::Token;
use ethers::types::{Address, H256};
use serde::{Deserialize, Serialize};

use crate::types::ChecksumAddress;

/// What to deploy. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentRequest {
    contract_name: String,
    receiver: Address,
    constructor_args: Vec<Token>,
}

impl DeploymentRequest {
    pub fn new(contract_name: impl ToString, receiver: Address) -> Self {
        Self {
            contract_name: contract_name.to_string(),
            receiver,
            constructor_args: vec![Token::Address(receiver)],
        }
    }

    pub fn contract_name(&self) -> &str {
        &self.contract_name
    }

    pub fn receiver(&self) -> Address {
        self.receiver
    }

    pub fn constructor_args(&self) -> &[Token] {
        &self.constructor_args
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentResult {
    pub contract_address: Address,
    pub receiver_address: Address,
}

/// The operator-facing success line. The `reciever` spelling is kept as is,
/// log scrapers match on it.
impl fmt::Display for DeploymentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Deployed to {} with 'reciever' set as {}.",
            ChecksumAddress(self.contract_address),
            ChecksumAddress(self.receiver_address),
        )
    }
}

/// A confirmed deployment along with the transaction that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployment {
    pub result: DeploymentResult,
    pub transaction_hash: H256,
}
