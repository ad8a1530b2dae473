mod common;
mod inspect;

pub use self::common::ContractSpec;
pub use self::inspect::{ForgeInspect, InspectField};

pub const FORGE_BIN: &str = "forge";
