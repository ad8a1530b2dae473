use std::fmt;
use std::path::PathBuf;

/// Identifies a contract the way `forge` expects it: `[<path>:]<name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractSpec {
    pub path: Option<PathBuf>,
    pub name: String,
}

impl ContractSpec {
    pub fn name(name: impl ToString) -> Self {
        Self {
            path: None,
            name: name.to_string(),
        }
    }
}

impl From<&str> for ContractSpec {
    fn from(s: &str) -> Self {
        let s = s.trim();

        match s.rsplit_once(':') {
            Some((path, name)) => Self {
                path: Some(PathBuf::from(path)),
                name: name.to_owned(),
            },
            None => Self::name(s),
        }
    }
}

impl fmt::Display for ContractSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = self.path.as_deref() {
            write!(f, "{}:{}", path.display(), self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_name() {
        let spec = ContractSpec::from("SubscriptionManager");

        assert_eq!(spec, ContractSpec::name("SubscriptionManager"));
        assert_eq!(spec.to_string(), "SubscriptionManager");
    }

    #[test]
    fn path_and_name() {
        let spec =
            ContractSpec::from("src/SubscriptionManager.sol:SubscriptionManager");

        assert_eq!(
            spec.path.as_deref(),
            Some(std::path::Path::new("src/SubscriptionManager.sol"))
        );
        assert_eq!(spec.name, "SubscriptionManager");
        assert_eq!(
            spec.to_string(),
            "src/SubscriptionManager.sol:SubscriptionManager"
        );
    }
}
