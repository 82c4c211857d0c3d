//! Closed lookup tables used by the geometry file codec.
//!
//! The tables are compile-time constants: crystal-system names to the integer
//! crystal-type codes written in the file header, dimensionality codes to
//! periodic-boundary triples, and the primitive-to-conventional centering
//! matrices indexed by centering code.

use nalgebra::Matrix3;
use phf::{Map, phf_map};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TableError {
    #[error("Dimensionality must be between 0 and 3 (got {0})")]
    InvalidDimensionality(i64),
    #[error("Unknown crystal system name: '{0}'")]
    UnknownCrystalSystem(String),
}

/// Crystal-system name to crystal-type code.
///
/// The three hexagonal-family names share code 5, so this direction is lossy.
static CRYSTAL_TYPE_CODES: Map<&'static str, u8> = phf_map! {
    "triclinic" => 1,
    "monoclinic" => 2,
    "orthorhombic" => 3,
    "tetragonal" => 4,
    "hexagonal" => 5,
    "rhombohedral" => 5,
    "trigonal" => 5,
    "cubic" => 6,
};

const CRYSTAL_TYPE_NAMES: [&str; 6] = [
    "triclinic",
    "monoclinic",
    "orthorhombic",
    "tetragonal",
    "hexagonal",
    "cubic",
];

const PERIODICITIES: [[bool; 3]; 4] = [
    [false, false, false],
    [true, false, false],
    [true, true, false],
    [true, true, true],
];

/// Looks up the crystal-type code CRYSTAL uses for a crystal system.
///
/// # Arguments
///
/// * `crystal_system` - A crystal-system name, matched case-insensitively.
///   `hexagonal`, `rhombohedral` and `trigonal` all map to 5.
///
/// # Return
///
/// The code, 1 (triclinic) to 6 (cubic).
///
/// # Errors
///
/// Returns [`TableError::UnknownCrystalSystem`] for any other name.
pub fn crystal_type_code(crystal_system: &str) -> Result<u8, TableError> {
    CRYSTAL_TYPE_CODES
        .get(crystal_system.trim().to_ascii_lowercase().as_str())
        .copied()
        .ok_or_else(|| TableError::UnknownCrystalSystem(crystal_system.to_string()))
}

/// Returns the canonical crystal-system name for a crystal-type code.
pub fn crystal_type_name(code: u8) -> Option<&'static str> {
    match code {
        1..=6 => Some(CRYSTAL_TYPE_NAMES[usize::from(code) - 1]),
        _ => None,
    }
}

/// Expands a dimensionality code into per-direction periodic flags.
///
/// # Return
///
/// `[true; n]` followed by `false` for the remaining directions.
///
/// # Errors
///
/// Returns [`TableError::InvalidDimensionality`] unless the code is 0 to 3.
pub fn periodicity(dimensionality: i64) -> Result<[bool; 3], TableError> {
    usize::try_from(dimensionality)
        .ok()
        .and_then(|d| PERIODICITIES.get(d))
        .copied()
        .ok_or(TableError::InvalidDimensionality(dimensionality))
}

/// Inverse of [`periodicity`]. Only prefix forms (the first `n` directions
/// periodic) have a dimensionality code.
pub fn dimensionality(periodicity: [bool; 3]) -> Option<u8> {
    PERIODICITIES
        .iter()
        .position(|p| *p == periodicity)
        .and_then(|d| u8::try_from(d).ok())
}

/// Transformation from the primitive to the conventional cell for a
/// centering code. Code 2 is the A-face setting, which the classifier never
/// emits but files from other sources may carry.
pub fn centering_matrix(code: u8) -> Option<Matrix3<f64>> {
    let m = match code {
        1 => Matrix3::identity(),
        2 => Matrix3::new(1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, -1.0, 1.0),
        4 => Matrix3::new(1.0, 1.0, 0.0, -1.0, 1.0, 0.0, 0.0, 0.0, 1.0),
        5 => Matrix3::new(-1.0, 1.0, 1.0, 1.0, -1.0, 1.0, 1.0, 1.0, -1.0),
        6 => Matrix3::new(0.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 0.0),
        _ => return None,
    };
    Some(m)
}
