use std::fmt;
use std::str::FromStr;

use ethers::types::Address;
use serde::{Deserialize, Serialize};
use shrinkwraprs::Shrinkwrap;

/// An address rendered in its EIP-55 checksummed form.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Shrinkwrap,
)]
#[serde(transparent)]
pub struct ChecksumAddress(pub Address);

impl FromStr for ChecksumAddress {
    type Err = eyre::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let address = Address::from_str(s.trim())
            .map_err(|err| eyre::eyre!("Invalid address {s:?}: {err}"))?;

        Ok(Self(address))
    }
}

impl fmt::Display for ChecksumAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&ethers::utils::to_checksum(&self.0, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_checksummed() -> eyre::Result<()> {
        let address: ChecksumAddress =
            "0xd1049f82d75d5adc81586da8f9e85723ec4ca4a3".parse()?;

        assert_eq!(
            address.to_string(),
            "0xD1049F82d75D5AdC81586DA8F9E85723eC4CA4a3"
        );

        Ok(())
    }

    #[test]
    fn rejects_garbage() {
        assert!("0xnot-an-address".parse::<ChecksumAddress>().is_err());
    }
}
