use crate::cli::ReadArgs;
use crate::config::PartialConfig;
use crate::error::{CliError, Result};
use extgeom::config::ReadOptions;
use extgeom::core::adapter::CanonicalDict;
use extgeom::core::io::gui::{GuiDocument, GuiFile};
use extgeom::core::models::symmetry::SymmetryRecord;
use serde::Serialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct ReadReport {
    pub structure: CanonicalDict,
    pub symmetry: SymmetryRecord,
    pub energy: Option<f64>,
}

pub fn read_report(path: &Path, options: &ReadOptions) -> Result<ReadReport> {
    let content = std::fs::read_to_string(path)?;
    let document =
        GuiFile::read_document_str(&content, options).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
    let GuiDocument {
        header,
        structure,
        symmetry,
    } = document;
    info!(
        atoms = structure.num_atoms(),
        operations = symmetry.num_operations(),
        space_group = symmetry.space_group_number,
        "Read geometry file"
    );
    Ok(ReadReport {
        structure: CanonicalDict::from(&structure),
        symmetry,
        energy: header.energy,
    })
}

pub fn run(args: ReadArgs, config: &PartialConfig) -> Result<()> {
    let options = config.merge_read_args(&args)?;
    let report = read_report(&args.input, &options)?;
    let json = serde_json::to_string_pretty(&report).map_err(anyhow::Error::from)?;
    println!("{}", json);
    Ok(())
}
