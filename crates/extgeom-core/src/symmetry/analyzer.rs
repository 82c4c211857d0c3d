use super::SymmetryError;
use super::basis::{operations_frac_to_cart, positions_cart_to_frac};
use super::classifier::{Classification, classify};
use super::database::SpaceGroupDatabase;
use crate::config::SymmetryTolerance;
use crate::core::models::structure::StructureRecord;
use crate::core::models::symmetry::{Basis, SymmetryOperation, SymmetryRecord};
use moyo::base::AngleTolerance;
use moyo::data::Setting;
use nalgebra::{Matrix3, Vector3};
use tracing::{debug, warn};

/// Output of a tolerance-based space-group search. Rotations and translations
/// are in the fractional basis of the input lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetryDataset {
    pub number: u16,
    pub hall_number: i32,
    pub rotations: Vec<Matrix3<f64>>,
    pub translations: Vec<Vector3<f64>>,
}

impl SymmetryDataset {
    pub fn operations(&self) -> Vec<SymmetryOperation> {
        self.rotations
            .iter()
            .zip(&self.translations)
            .map(|(r, t)| SymmetryOperation::new(*r, *t))
            .collect()
    }
}

pub trait SymmetryAnalyzer {
    fn dataset(
        &self,
        structure: &StructureRecord,
        tolerance: &SymmetryTolerance,
    ) -> Result<SymmetryDataset, SymmetryError>;
}

/// Symmetry search delegated to `moyo`.
///
/// An angle tolerance in degrees is passed to `moyo` in radians; without one
/// `moyo` chooses its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoyoAnalyzer;

impl SymmetryAnalyzer for MoyoAnalyzer {
    fn dataset(
        &self,
        structure: &StructureRecord,
        tolerance: &SymmetryTolerance,
    ) -> Result<SymmetryDataset, SymmetryError> {
        let positions = positions_cart_to_frac(structure.cartesian_coordinates(), structure.lattice())?;
        let numbers = structure
            .atomic_numbers()
            .iter()
            .map(|&z| i32::try_from(z).map_err(|_| SymmetryError::Analysis(format!("atomic number {z} out of range"))))
            .collect::<Result<Vec<_>, _>>()?;
        let lattice = moyo::base::Lattice::from_basis(structure.lattice_rows());
        let cell = moyo::base::Cell::new(lattice, positions, numbers);

        let angle_tolerance = match tolerance.angle_tolerance {
            Some(degrees) => AngleTolerance::Radian(degrees.to_radians()),
            None => AngleTolerance::Default,
        };

        let dataset = moyo::MoyoDataset::new(
            &cell,
            tolerance.symprec,
            angle_tolerance,
            Setting::Spglib,
            true,
        )
        .map_err(|e| SymmetryError::Analysis(format!("{e:?}")))?;
        let number = u16::try_from(dataset.number)
            .map_err(|_| SymmetryError::UnknownSpaceGroup(i64::from(dataset.number)))?;

        let mut rotations = Vec::with_capacity(dataset.operations.len());
        let mut translations = Vec::with_capacity(dataset.operations.len());
        for op in &dataset.operations {
            rotations.push(op.rotation.map(f64::from));
            translations.push(op.translation);
        }
        debug!(
            number,
            hall_number = dataset.hall_number,
            operations = rotations.len(),
            "Symmetry search finished"
        );
        Ok(SymmetryDataset {
            number,
            hall_number: dataset.hall_number,
            rotations,
            translations,
        })
    }
}

/// A derived symmetry record with the crystal system it was classified as.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSymmetry {
    pub record: SymmetryRecord,
    pub classification: Classification,
}

/// Runs the symmetry search on a structure and classifies the result into a
/// record ready for writing. Operations are fractional unless `as_cartesian`.
pub fn structure_to_symmetry(
    structure: &StructureRecord,
    tolerance: &SymmetryTolerance,
    as_cartesian: bool,
    analyzer: &impl SymmetryAnalyzer,
    database: &impl SpaceGroupDatabase,
) -> Result<DerivedSymmetry, SymmetryError> {
    let dataset = analyzer.dataset(structure, tolerance)?;
    let classification = classify(dataset.hall_number, database)?;
    if classification.space_group.number != dataset.number {
        warn!(
            dataset = dataset.number,
            hall_setting = classification.space_group.number,
            "Space group of the symmetry search disagrees with its Hall setting"
        );
    }

    let mut operations = dataset.operations();
    let mut basis = Basis::Fractional;
    if as_cartesian {
        operations = operations_frac_to_cart(&operations, structure.lattice())?;
        basis = Basis::Cartesian;
    }

    let record = SymmetryRecord::new(
        classification.centering_code,
        classification.crystal_type_code,
        dataset.number,
        operations,
        basis,
    );
    Ok(DerivedSymmetry {
        record,
        classification,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::symmetry::database::{CrystalSystem, MoyoDatabase, SpaceGroupType};

    /// Reports a fixed dataset regardless of the input structure.
    pub(crate) struct FixedAnalyzer(pub SymmetryDataset);

    impl SymmetryAnalyzer for FixedAnalyzer {
        fn dataset(
            &self,
            _structure: &StructureRecord,
            _tolerance: &SymmetryTolerance,
        ) -> Result<SymmetryDataset, SymmetryError> {
            Ok(self.0.clone())
        }
    }

    pub(crate) struct SingleEntryDatabase(pub SpaceGroupType);

    impl SpaceGroupDatabase for SingleEntryDatabase {
        fn space_group_type(&self, hall_number: i32) -> Result<SpaceGroupType, SymmetryError> {
            if hall_number == self.0.hall_number {
                Ok(self.0.clone())
            } else {
                Err(SymmetryError::UnknownHallNumber(hall_number))
            }
        }
    }

    pub(crate) fn inversion_dataset() -> SymmetryDataset {
        SymmetryDataset {
            number: 2,
            hall_number: 2,
            rotations: vec![Matrix3::identity(), -Matrix3::identity()],
            translations: vec![Vector3::zeros(), Vector3::zeros()],
        }
    }

    pub(crate) fn p_1bar() -> SpaceGroupType {
        SpaceGroupType {
            hall_number: 2,
            number: 2,
            international_short: "P-1".into(),
        }
    }

    fn simple_cubic(a: f64) -> StructureRecord {
        StructureRecord::from_rows(
            [true; 3],
            [[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]],
            &[29],
            &[[0.0, 0.0, 0.0]],
        )
        .unwrap()
    }

    fn rock_salt_conventional(a: f64) -> StructureRecord {
        let h = a / 2.0;
        StructureRecord::from_rows(
            [true; 3],
            [[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]],
            &[11, 11, 11, 11, 17, 17, 17, 17],
            &[
                [0.0, 0.0, 0.0],
                [0.0, h, h],
                [h, 0.0, h],
                [h, h, 0.0],
                [h, 0.0, 0.0],
                [0.0, h, 0.0],
                [0.0, 0.0, h],
                [h, h, h],
            ],
        )
        .unwrap()
    }

    #[test]
    fn structure_to_symmetry_uses_dataset_and_classifier() {
        let derived = structure_to_symmetry(
            &simple_cubic(2.0),
            &SymmetryTolerance::default(),
            false,
            &FixedAnalyzer(inversion_dataset()),
            &SingleEntryDatabase(p_1bar()),
        )
        .unwrap();
        assert_eq!(derived.record.space_group_number, 2);
        assert_eq!(derived.record.crystal_type_code, 1);
        assert_eq!(derived.record.centering_code, 1);
        assert_eq!(derived.record.basis, Basis::Fractional);
        assert_eq!(derived.record.num_operations(), 2);
        assert_eq!(derived.classification.crystal_system, CrystalSystem::Triclinic);
    }

    #[test]
    fn structure_to_symmetry_can_return_cartesian_operations() {
        let dataset = SymmetryDataset {
            number: 2,
            hall_number: 2,
            rotations: vec![Matrix3::identity()],
            translations: vec![Vector3::new(0.5, 0.0, 0.0)],
        };
        let derived = structure_to_symmetry(
            &simple_cubic(2.0),
            &SymmetryTolerance::default(),
            true,
            &FixedAnalyzer(dataset),
            &SingleEntryDatabase(p_1bar()),
        )
        .unwrap();
        assert_eq!(derived.record.basis, Basis::Cartesian);
        assert!((derived.record.operations[0].translation[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn moyo_finds_primitive_cubic_symmetry() {
        let derived = structure_to_symmetry(
            &simple_cubic(3.0),
            &SymmetryTolerance::default(),
            false,
            &MoyoAnalyzer,
            &MoyoDatabase,
        )
        .unwrap();
        assert_eq!(derived.record.space_group_number, 221);
        assert_eq!(derived.record.centering_code, 1);
        assert_eq!(derived.record.crystal_type_code, 6);
        assert_eq!(derived.record.num_operations(), 48);
    }

    #[test]
    fn moyo_finds_rock_salt_in_conventional_cell() {
        let derived = structure_to_symmetry(
            &rock_salt_conventional(5.64),
            &SymmetryTolerance::default(),
            false,
            &MoyoAnalyzer,
            &MoyoDatabase,
        )
        .unwrap();
        assert_eq!(derived.record.space_group_number, 225);
        assert_eq!(derived.record.centering_code, 5);
        assert_eq!(derived.record.crystal_type_code, 6);
        assert_eq!(derived.record.num_operations(), 192);
    }

    fn sheared_cubic(a: f64, gamma_degrees: f64) -> StructureRecord {
        let gamma = gamma_degrees.to_radians();
        StructureRecord::from_rows(
            [true; 3],
            [[a, 0.0, 0.0], [a * gamma.cos(), a * gamma.sin(), 0.0], [0.0, 0.0, a]],
            &[29],
            &[[0.0, 0.0, 0.0]],
        )
        .unwrap()
    }

    #[test]
    fn tight_angle_tolerance_lowers_symmetry_of_sheared_cell() {
        let structure = sheared_cubic(3.0, 90.3);
        let search = |angle_tolerance| {
            let tolerance = SymmetryTolerance::new(0.1, angle_tolerance).unwrap();
            structure_to_symmetry(&structure, &tolerance, false, &MoyoAnalyzer, &MoyoDatabase)
                .unwrap()
                .record
                .space_group_number
        };
        assert_eq!(search(None), 221);
        assert_eq!(search(Some(0.01)), 65);
    }
}
