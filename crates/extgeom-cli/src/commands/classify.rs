use crate::cli::ClassifyArgs;
use crate::error::Result;
use extgeom::symmetry::classifier::{Classification, classify};
use extgeom::symmetry::database::{MoyoDatabase, SpaceGroupDatabase};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize, PartialEq)]
pub struct ClassifyReport {
    pub hall_number: i32,
    pub space_group: u16,
    pub symbol: String,
    pub crystal_system: &'static str,
    pub crystal_type_code: u8,
    pub centring_code: u8,
}

impl From<Classification> for ClassifyReport {
    fn from(c: Classification) -> Self {
        Self {
            hall_number: c.space_group.hall_number,
            space_group: c.space_group.number,
            crystal_system: c.crystal_system.name(),
            crystal_type_code: c.crystal_type_code,
            centring_code: c.centering_code,
            symbol: c.space_group.international_short,
        }
    }
}

pub fn classify_report(
    hall_number: i32,
    database: &impl SpaceGroupDatabase,
) -> Result<ClassifyReport> {
    let report = ClassifyReport::from(classify(hall_number, database)?);
    info!(
        "Hall number {} is space group {} ({})",
        hall_number, report.space_group, report.symbol
    );
    Ok(report)
}

pub fn run(args: ClassifyArgs) -> Result<()> {
    let report = classify_report(args.hall_number, &MoyoDatabase)?;
    let json = serde_json::to_string_pretty(&report).map_err(anyhow::Error::from)?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use extgeom::symmetry::SymmetryError;

    #[test]
    fn body_centered_cubic_hall_setting() {
        let report = classify_report(529, &MoyoDatabase).unwrap();
        assert_eq!(report.space_group, 229);
        assert_eq!(report.crystal_system, "cubic");
        assert_eq!(report.crystal_type_code, 6);
        assert_eq!(report.centring_code, 6);
    }

    #[test]
    fn unknown_hall_number_is_a_symmetry_error() {
        assert!(matches!(
            classify_report(0, &MoyoDatabase),
            Err(CliError::Symmetry(SymmetryError::UnknownHallNumber(0)))
        ));
    }
}
