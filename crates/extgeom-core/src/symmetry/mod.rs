//! # Symmetry Module
//!
//! Derives the symmetry metadata a geometry file needs and moves symmetry
//! operations between bases.
//!
//! - [`database`] - Space-group facts per Hall setting (external capability, `moyo`-backed)
//! - [`classifier`] - Crystal-type and centering codes from a Hall setting
//! - [`basis`] - Fractional/cartesian conversion of operations and positions
//! - [`analyzer`] - Tolerance-based symmetry search (external capability, `moyo`-backed)
//!   and assembly of a complete [`SymmetryRecord`](crate::core::models::symmetry::SymmetryRecord)
//! - [`closure`] - Detection of atom lists that are not closed under their operations

pub mod analyzer;
pub mod basis;
pub mod classifier;
pub mod closure;
pub mod database;

use crate::core::tables::TableError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SymmetryError {
    #[error("Unknown Hall number: {0}")]
    UnknownHallNumber(i32),
    #[error("Space group number {0} is outside 1-230")]
    UnknownSpaceGroup(i64),
    #[error("Symmetry analysis failed: {0}")]
    Analysis(String),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Basis(#[from] basis::BasisError),
}
