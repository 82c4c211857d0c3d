use crate::cli::WriteArgs;
use crate::config::PartialConfig;
use crate::error::{CliError, Result};
use extgeom::config::WriteOptions;
use extgeom::core::adapter::StructureInput;
use extgeom::core::io::gui::GuiFile;
use extgeom::core::models::symmetry::SymmetryRecord;
use extgeom::symmetry::analyzer::MoyoAnalyzer;
use extgeom::symmetry::database::MoyoDatabase;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

fn load_symmetry(path: &Path) -> Result<SymmetryRecord> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

pub fn write_geometry(
    input: &Path,
    symmetry: Option<&Path>,
    output: &Path,
    options: &WriteOptions,
) -> Result<()> {
    let content = std::fs::read_to_string(input)?;
    let structure = StructureInput::from_json_str(&content).map_err(|e| CliError::FileParsing {
        path: input.to_path_buf(),
        source: e.into(),
    })?;
    let symmetry = symmetry.map(load_symmetry).transpose()?;
    if symmetry.is_none() {
        info!("No symmetry file given; deriving symmetry from the structure.");
    }

    let lines = GuiFile::write_derived_lines(
        &structure,
        symmetry.as_ref(),
        options,
        &MoyoAnalyzer,
        &MoyoDatabase,
    )?;

    let mut writer = BufWriter::new(File::create(output)?);
    for line in &lines {
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;
    info!("Wrote {} lines to {:?}", lines.len(), output);
    Ok(())
}

pub fn run(args: WriteArgs, config: &PartialConfig) -> Result<()> {
    let options = config.merge_write_args(&args)?;
    write_geometry(
        &args.input,
        args.symmetry.as_deref(),
        &args.output,
        &options,
    )?;
    println!("Geometry written to: {}", args.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use extgeom::config::ReadOptions;

    const ATOMS: &str = r#"{
        "cell": [[3.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 3.0]],
        "positions": [[0.0, 0.0, 0.0]],
        "numbers": [29]
    }"#;

    const P1_FRACTIONAL: &str = r#"{
        "centring_code": 1,
        "crystal_type_code": 1,
        "space_group": 1,
        "operations": [[1, 0, 0, 0, 1, 0, 0, 0, 1, 0.5, 0, 0]],
        "basis": "fractional"
    }"#;

    #[test]
    fn given_symmetry_file_is_written_in_cartesian_form() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("cu.json");
        let symmetry = dir.path().join("sym.json");
        let output = dir.path().join("main.gui");
        std::fs::write(&input, ATOMS).unwrap();
        std::fs::write(&symmetry, P1_FRACTIONAL).unwrap();

        write_geometry(&input, Some(&symmetry), &output, &WriteOptions::default()).unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        let (structure, record) = GuiFile::read_str(&text, &ReadOptions::default()).unwrap();
        assert_eq!(structure.atomic_numbers(), &[29]);
        assert_eq!(record.space_group_number, 1);
        assert!((record.operations[0].translation[0] - 1.5).abs() < 1e-9);
    }

    #[test]
    fn missing_symmetry_is_derived() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("cu.json");
        let output = dir.path().join("main.gui");
        std::fs::write(&input, ATOMS).unwrap();

        write_geometry(&input, None, &output, &WriteOptions::default()).unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        let (_, record) = GuiFile::read_str(&text, &ReadOptions::default()).unwrap();
        assert_eq!(record.space_group_number, 221);
        assert_eq!(record.num_operations(), 48);
    }

    #[test]
    fn unsupported_structure_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("weird.json");
        std::fs::write(&input, r#"{"sites": []}"#).unwrap();

        let result = write_geometry(
            &input,
            None,
            &dir.path().join("main.gui"),
            &WriteOptions::default(),
        );
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn unknown_basis_in_symmetry_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("cu.json");
        let symmetry = dir.path().join("sym.json");
        std::fs::write(&input, ATOMS).unwrap();
        std::fs::write(&symmetry, P1_FRACTIONAL.replace("fractional", "reciprocal")).unwrap();

        let result = write_geometry(
            &input,
            Some(&symmetry),
            &dir.path().join("main.gui"),
            &WriteOptions::default(),
        );
        match result {
            Err(CliError::FileParsing { source, .. }) => {
                assert!(source.to_string().contains("reciprocal"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
