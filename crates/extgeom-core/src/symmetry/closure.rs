use super::basis::{BasisError, positions_cart_to_frac};
use crate::core::models::structure::StructureRecord;
use crate::core::models::symmetry::{Basis, SymmetryRecord};
use crate::symmetry::basis::convert_record;
use nalgebra::Vector3;

/// First atom image that does not land on an atom of the same element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingImage {
    pub atom: usize,
    pub operation: usize,
}

/// Checks that the atom list is closed under every symmetry operation.
///
/// Images are compared modulo lattice translations along periodic directions
/// only; a non-periodic direction must match exactly (within `tolerance`,
/// measured as a cartesian distance). A file that lists only the
/// symmetry-inequivalent atoms fails this check.
pub fn find_missing_image(
    structure: &StructureRecord,
    symmetry: &SymmetryRecord,
    tolerance: f64,
) -> Result<Option<MissingImage>, BasisError> {
    let lattice = structure.lattice();
    let fractional = convert_record(symmetry, Basis::Fractional, lattice)?;
    let positions = positions_cart_to_frac(structure.cartesian_coordinates(), lattice)?;
    let periodic = structure.periodicity();
    let lt = lattice.transpose();

    for (operation, op) in fractional.operations.iter().enumerate() {
        for (atom, (z, position)) in structure
            .atomic_numbers()
            .iter()
            .zip(&positions)
            .enumerate()
        {
            let image = op.rotation * position + op.translation;
            let found = structure
                .atomic_numbers()
                .iter()
                .zip(&positions)
                .filter(|(other, _)| *other == z)
                .any(|(_, candidate)| {
                    let mut delta: Vector3<f64> = image - candidate;
                    for axis in 0..3 {
                        if periodic[axis] {
                            delta[axis] -= delta[axis].round();
                        }
                    }
                    (lt * delta).norm() <= tolerance
                });
            if !found {
                return Ok(Some(MissingImage { atom, operation }));
            }
        }
    }
    Ok(None)
}
