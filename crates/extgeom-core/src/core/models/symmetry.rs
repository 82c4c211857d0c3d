use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Symmetry basis must be 'fractional' or 'cartesian' (got '{0}')")]
pub struct UnsupportedBasis(pub String);

/// Coordinate system in which symmetry operations are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Basis {
    Fractional,
    Cartesian,
}

impl Basis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Basis::Fractional => "fractional",
            Basis::Cartesian => "cartesian",
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Basis {
    type Err = UnsupportedBasis;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fractional" => Ok(Basis::Fractional),
            "cartesian" => Ok(Basis::Cartesian),
            _ => Err(UnsupportedBasis(s.to_string())),
        }
    }
}

impl TryFrom<String> for Basis {
    type Error = UnsupportedBasis;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Basis> for String {
    fn from(basis: Basis) -> Self {
        basis.as_str().to_string()
    }
}

/// An affine symmetry operation `x' = R x + t` acting on column vectors.
///
/// Serialized as the flat 12-number form: the nine rotation entries in
/// row-major order followed by the three translation entries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 12]", into = "[f64; 12]")]
pub struct SymmetryOperation {
    pub rotation: Matrix3<f64>,
    pub translation: Vector3<f64>,
}

impl SymmetryOperation {
    pub fn new(rotation: Matrix3<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    pub fn identity() -> Self {
        Self::new(Matrix3::identity(), Vector3::zeros())
    }

    pub fn from_flat(values: [f64; 12]) -> Self {
        let rotation = Matrix3::new(
            values[0], values[1], values[2], values[3], values[4], values[5], values[6],
            values[7], values[8],
        );
        let translation = Vector3::new(values[9], values[10], values[11]);
        Self::new(rotation, translation)
    }

    pub fn to_flat(&self) -> [f64; 12] {
        let mut flat = [0.0; 12];
        for i in 0..3 {
            for j in 0..3 {
                flat[i * 3 + j] = self.rotation[(i, j)];
            }
            flat[9 + i] = self.translation[i];
        }
        flat
    }

    /// The four 3-number rows written to a geometry file: three rotation rows
    /// followed by the translation.
    pub fn rows(&self) -> [[f64; 3]; 4] {
        let flat = self.to_flat();
        [
            [flat[0], flat[1], flat[2]],
            [flat[3], flat[4], flat[5]],
            [flat[6], flat[7], flat[8]],
            [flat[9], flat[10], flat[11]],
        ]
    }

    /// Lexicographic order over the flat 12-number form.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.to_flat()
            .iter()
            .zip(other.to_flat().iter())
            .map(|(a, b)| a.total_cmp(b))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        self.to_flat()
            .iter()
            .zip(other.to_flat().iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

impl From<[f64; 12]> for SymmetryOperation {
    fn from(values: [f64; 12]) -> Self {
        Self::from_flat(values)
    }
}

impl From<SymmetryOperation> for [f64; 12] {
    fn from(op: SymmetryOperation) -> Self {
        op.to_flat()
    }
}

/// Symmetry metadata carried by a geometry file.
///
/// All operations share one [`Basis`]. The record is never edited in place;
/// conversions produce a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymmetryRecord {
    #[serde(rename = "centring_code")]
    pub centering_code: u8,
    pub crystal_type_code: u8,
    #[serde(rename = "space_group")]
    pub space_group_number: u16,
    pub operations: Vec<SymmetryOperation>,
    pub basis: Basis,
}

impl SymmetryRecord {
    pub fn new(
        centering_code: u8,
        crystal_type_code: u8,
        space_group_number: u16,
        operations: Vec<SymmetryOperation>,
        basis: Basis,
    ) -> Self {
        Self {
            centering_code,
            crystal_type_code,
            space_group_number,
            operations,
            basis,
        }
    }

    /// The trivial P1 record: one identity operation.
    pub fn p1(basis: Basis) -> Self {
        Self::new(1, 1, 1, vec![SymmetryOperation::identity()], basis)
    }

    pub fn num_operations(&self) -> usize {
        self.operations.len()
    }

    /// Returns a copy with the operations in canonical order.
    pub fn sorted(&self) -> Self {
        let mut operations = self.operations.clone();
        operations.sort_by(SymmetryOperation::canonical_cmp);
        Self {
            operations,
            ..self.clone()
        }
    }
}
