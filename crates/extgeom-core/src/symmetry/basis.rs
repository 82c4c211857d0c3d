//! Conversion of symmetry operations and positions between the fractional
//! (lattice-relative) and cartesian bases.
//!
//! Lattice vectors are the rows of `L`. Positions act as column vectors, so a
//! fractional position `f` maps to the cartesian position `Lᵀ f`. An operation
//! `(R_f, t_f)` becomes `(Lᵀ R_f Lᵀ⁻¹, Lᵀ t_f)` in the cartesian basis; the
//! reverse direction applies the inverse conjugation.

use crate::core::models::symmetry::{Basis, SymmetryOperation, SymmetryRecord};
use nalgebra::{Matrix3, Point3, Vector3};
use thiserror::Error;
use tracing::trace;

const SINGULAR_DETERMINANT: f64 = 1e-12;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BasisError {
    #[error("Lattice matrix is singular (determinant {determinant:e}); cannot change basis")]
    SingularLattice { determinant: f64 },
}

/// Returns `(Lᵀ, Lᵀ⁻¹)` for a lattice with vectors as rows.
fn transposed_pair(lattice: &Matrix3<f64>) -> Result<(Matrix3<f64>, Matrix3<f64>), BasisError> {
    let determinant = lattice.determinant();
    if !determinant.is_finite() || determinant.abs() < SINGULAR_DETERMINANT {
        return Err(BasisError::SingularLattice { determinant });
    }
    let lt = lattice.transpose();
    let lt_inv = lt
        .try_inverse()
        .ok_or(BasisError::SingularLattice { determinant })?;
    Ok((lt, lt_inv))
}

pub fn operations_frac_to_cart(
    operations: &[SymmetryOperation],
    lattice: &Matrix3<f64>,
) -> Result<Vec<SymmetryOperation>, BasisError> {
    let (lt, lt_inv) = transposed_pair(lattice)?;
    trace!(count = operations.len(), "Converting operations fractional -> cartesian");
    Ok(operations
        .iter()
        .map(|op| SymmetryOperation::new(lt * op.rotation * lt_inv, lt * op.translation))
        .collect())
}

pub fn operations_cart_to_frac(
    operations: &[SymmetryOperation],
    lattice: &Matrix3<f64>,
) -> Result<Vec<SymmetryOperation>, BasisError> {
    let (lt, lt_inv) = transposed_pair(lattice)?;
    trace!(count = operations.len(), "Converting operations cartesian -> fractional");
    Ok(operations
        .iter()
        .map(|op| SymmetryOperation::new(lt_inv * op.rotation * lt, lt_inv * op.translation))
        .collect())
}

/// Re-expresses a symmetry record in `target` basis. A record already in the
/// target basis is returned as an unchanged copy.
pub fn convert_record(
    record: &SymmetryRecord,
    target: Basis,
    lattice: &Matrix3<f64>,
) -> Result<SymmetryRecord, BasisError> {
    if record.basis == target {
        return Ok(record.clone());
    }
    let operations = match target {
        Basis::Cartesian => operations_frac_to_cart(&record.operations, lattice)?,
        Basis::Fractional => operations_cart_to_frac(&record.operations, lattice)?,
    };
    Ok(SymmetryRecord {
        operations,
        basis: target,
        ..record.clone()
    })
}

pub fn positions_cart_to_frac(
    positions: &[Point3<f64>],
    lattice: &Matrix3<f64>,
) -> Result<Vec<Vector3<f64>>, BasisError> {
    let (_, lt_inv) = transposed_pair(lattice)?;
    Ok(positions.iter().map(|p| lt_inv * p.coords).collect())
}

pub fn positions_frac_to_cart(positions: &[Vector3<f64>], lattice: &Matrix3<f64>) -> Vec<Point3<f64>> {
    let lt = lattice.transpose();
    positions.iter().map(|f| Point3::from(lt * f)).collect()
}
