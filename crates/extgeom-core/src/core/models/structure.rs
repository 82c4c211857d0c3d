use crate::core::tables;
use nalgebra::{Matrix3, Point3};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error(
        "Number of atomic numbers ({atomic_numbers}) does not match number of coordinates ({coordinates})"
    )]
    LengthMismatch {
        atomic_numbers: usize,
        coordinates: usize,
    },
    #[error("Atomic number at index {index} must be positive (got {value})")]
    NonPositiveAtomicNumber { index: usize, value: i64 },
}

/// A periodic (or partially periodic) atomic structure in cartesian form.
///
/// The lattice rows are the lattice vectors `a`, `b` and `c`. The lattice is
/// always a full 3x3 matrix, even when some directions are not periodic.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureRecord {
    periodicity: [bool; 3],
    lattice: Matrix3<f64>,
    atomic_numbers: Vec<u32>,
    cartesian_coordinates: Vec<Point3<f64>>,
}

impl StructureRecord {
    pub fn new(
        periodicity: [bool; 3],
        lattice: Matrix3<f64>,
        atomic_numbers: Vec<u32>,
        cartesian_coordinates: Vec<Point3<f64>>,
    ) -> Result<Self, StructureError> {
        if atomic_numbers.len() != cartesian_coordinates.len() {
            return Err(StructureError::LengthMismatch {
                atomic_numbers: atomic_numbers.len(),
                coordinates: cartesian_coordinates.len(),
            });
        }
        if let Some(index) = atomic_numbers.iter().position(|&z| z == 0) {
            return Err(StructureError::NonPositiveAtomicNumber { index, value: 0 });
        }
        Ok(Self {
            periodicity,
            lattice,
            atomic_numbers,
            cartesian_coordinates,
        })
    }

    /// Builds a record from raw rows, as they appear in dictionaries and files.
    pub fn from_rows(
        periodicity: [bool; 3],
        lattice: [[f64; 3]; 3],
        atomic_numbers: &[i64],
        cartesian_coordinates: &[[f64; 3]],
    ) -> Result<Self, StructureError> {
        let numbers = atomic_numbers
            .iter()
            .enumerate()
            .map(|(index, &z)| {
                u32::try_from(z)
                    .ok()
                    .filter(|&z| z > 0)
                    .ok_or(StructureError::NonPositiveAtomicNumber { index, value: z })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let coords = cartesian_coordinates
            .iter()
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        Self::new(periodicity, lattice_from_rows(lattice), numbers, coords)
    }

    pub fn periodicity(&self) -> [bool; 3] {
        self.periodicity
    }

    /// Dimensionality code of the periodicity, if it is one of the prefix
    /// forms the geometry file can express.
    pub fn dimensionality(&self) -> Option<u8> {
        tables::dimensionality(self.periodicity)
    }

    pub fn lattice(&self) -> &Matrix3<f64> {
        &self.lattice
    }

    pub fn lattice_rows(&self) -> [[f64; 3]; 3] {
        lattice_to_rows(&self.lattice)
    }

    pub fn atomic_numbers(&self) -> &[u32] {
        &self.atomic_numbers
    }

    pub fn cartesian_coordinates(&self) -> &[Point3<f64>] {
        &self.cartesian_coordinates
    }

    pub fn num_atoms(&self) -> usize {
        self.atomic_numbers.len()
    }

    pub fn atoms(&self) -> impl Iterator<Item = (u32, &Point3<f64>)> {
        self.atomic_numbers
            .iter()
            .copied()
            .zip(self.cartesian_coordinates.iter())
    }
}

pub fn lattice_from_rows(rows: [[f64; 3]; 3]) -> Matrix3<f64> {
    Matrix3::new(
        rows[0][0], rows[0][1], rows[0][2], rows[1][0], rows[1][1], rows[1][2], rows[2][0],
        rows[2][1], rows[2][2],
    )
}

pub fn lattice_to_rows(lattice: &Matrix3<f64>) -> [[f64; 3]; 3] {
    let mut rows = [[0.0; 3]; 3];
    for (i, row) in rows.iter_mut().enumerate() {
        for (j, value) in row.iter_mut().enumerate() {
            *value = lattice[(i, j)];
        }
    }
    rows
}
