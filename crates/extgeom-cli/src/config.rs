use crate::cli::{ReadArgs, WriteArgs};
use crate::error::{CliError, Result};
use extgeom::config::{ReadOptions, ReadOptionsBuilder, WriteOptions, WriteOptionsBuilder};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialSymmetryConfig {
    symprec: Option<f64>,
    angle_tolerance: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialOutputConfig {
    sort_operations: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialInputConfig {
    verify_closure: Option<bool>,
    closure_tolerance: Option<f64>,
}

/// Settings from the optional TOML file. Every key may be omitted; command
/// line flags take precedence and the library defaults fill the rest.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    symmetry: Option<PartialSymmetryConfig>,
    output: Option<PartialOutputConfig>,
    input: Option<PartialInputConfig>,
}

impl PartialConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Loads `path` if given, otherwise an empty configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn merge_read_args(&self, args: &ReadArgs) -> Result<ReadOptions> {
        let input = self.input.clone().unwrap_or_default();
        let verify = args.verify_closure || input.verify_closure.unwrap_or(false);

        let mut builder = ReadOptionsBuilder::new().verify_atom_closure(verify);
        if let Some(tolerance) = args.closure_tolerance.or(input.closure_tolerance) {
            builder = builder.closure_tolerance(tolerance);
        }
        Ok(builder.build()?)
    }

    pub fn merge_write_args(&self, args: &WriteArgs) -> Result<WriteOptions> {
        let symmetry = self.symmetry.clone().unwrap_or_default();
        let output = self.output.clone().unwrap_or_default();

        let mut builder = WriteOptionsBuilder::new()
            .sort_operations(args.sort_operations || output.sort_operations.unwrap_or(false));
        if let Some(symprec) = args.symprec.or(symmetry.symprec) {
            builder = builder.symprec(symprec);
        }
        if let Some(angle) = args.angle_tolerance.or(symmetry.angle_tolerance) {
            builder = builder.angle_tolerance(angle);
        }
        Ok(builder.build()?)
    }
}
