use std::path::{Path, PathBuf};

use ethers::abi::Abi;
use ethers::types::Bytes;
use eyre::Context;
use strum::Display;
use tracing::{debug, instrument};

use super::common::ContractSpec;
use super::FORGE_BIN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum InspectField {
    Abi,
    Bytecode,
}

/// Wraps `forge inspect`, compiling the project first if needed.
#[derive(Debug, Clone)]
pub struct ForgeInspect {
    cwd: Option<PathBuf>,
    contract_spec: ContractSpec,
}

impl ForgeInspect {
    pub fn new(contract_spec: ContractSpec) -> Self {
        Self {
            cwd: None,
            contract_spec,
        }
    }

    pub fn with_cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_owned());
        self
    }

    pub async fn abi(&self) -> eyre::Result<Abi> {
        let stdout = self.run(InspectField::Abi).await?;

        parse_abi(&stdout)
            .with_context(|| format!("Parsing abi of {}", self.contract_spec))
    }

    pub async fn bytecode(&self) -> eyre::Result<Bytes> {
        let stdout = self.run(InspectField::Bytecode).await?;

        parse_bytecode(&stdout).with_context(|| {
            format!("Parsing bytecode of {}", self.contract_spec)
        })
    }

    #[instrument(name = "forge_inspect", skip(self), fields(contract = %self.contract_spec))]
    pub async fn run(&self, field: InspectField) -> eyre::Result<String> {
        let mut cmd = tokio::process::Command::new(FORGE_BIN);

        cmd.arg("inspect");

        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }

        cmd.arg(self.contract_spec.to_string());
        cmd.arg(field.to_string());

        if field == InspectField::Abi {
            cmd.arg("--json");
        }

        debug!("Inspecting contract with {cmd:#?}");

        let output = cmd
            .output()
            .await
            .with_context(|| format!("Spawning {FORGE_BIN}"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            eyre::bail!("forge inspect {field} failed: {}", stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Compiler chatter, including `[⠊] Compiling...` progress lines, may precede
/// the JSON document, so every line opening a bracket is tried in turn.
fn parse_abi(s: &str) -> eyre::Result<Abi> {
    let end = s.rfind([']', '}']).map_or(s.len(), |end| end + 1);

    let mut last_err = None;

    for start in json_line_starts(s).filter(|start| *start < end) {
        match serde_json::from_str(&s[start..end]) {
            Ok(abi) => return Ok(abi),
            Err(err) => last_err = Some(err),
        }
    }

    match last_err {
        Some(err) => Err(err.into()),
        None => eyre::bail!("No JSON found in forge output"),
    }
}

fn parse_bytecode(s: &str) -> eyre::Result<Bytes> {
    let s = s.trim();

    s.parse()
        .map_err(|err| eyre::eyre!("Invalid bytecode {s:?}: {err}"))
}

/// Byte offsets of the lines whose first non-blank character is `[` or `{`.
fn json_line_starts(s: &str) -> impl Iterator<Item = usize> + '_ {
    let mut offset = 0;

    s.split_inclusive('\n').filter_map(move |line| {
        let line_start = offset;
        offset += line.len();

        let indent = line.len() - line.trim_start().len();

        line.trim_start()
            .starts_with(['[', '{'])
            .then_some(line_start + indent)
    })
}
