use super::SymmetryError;
use super::database::{CrystalSystem, LatticeType, SpaceGroupDatabase, SpaceGroupType};
use crate::core::tables;
use tracing::debug;

/// Header codes derived for a Hall setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub space_group: SpaceGroupType,
    pub crystal_system: CrystalSystem,
    pub crystal_type_code: u8,
    pub centering_code: u8,
}

/// Centering code for the primitive-to-conventional relation, decided by the
/// first matching rule over the international symbol and lattice type.
///
/// Monoclinic and orthorhombic C-centering share code 4. A-centered symbols
/// fall through to the primitive code.
pub fn centering_code(symbol: &str, lattice_type: Option<LatticeType>) -> u8 {
    if symbol.contains('P') || lattice_type == Some(LatticeType::Hexagonal) {
        1
    } else if lattice_type == Some(LatticeType::Rhombohedral) {
        1
    } else if symbol.contains('I') {
        6
    } else if symbol.contains('F') {
        5
    } else if symbol.contains('C') {
        4
    } else {
        1
    }
}

/// Crystal-type code for a space group, from the crystal system its number
/// falls in.
///
/// # Errors
///
/// Returns [`SymmetryError::UnknownSpaceGroup`] for a number outside 1 to 230.
pub fn crystal_type_code(space_group: &SpaceGroupType) -> Result<u8, SymmetryError> {
    let system = crystal_system(space_group)?;
    Ok(tables::crystal_type_code(system.name())?)
}

fn crystal_system(space_group: &SpaceGroupType) -> Result<CrystalSystem, SymmetryError> {
    space_group
        .crystal_system()
        .ok_or(SymmetryError::UnknownSpaceGroup(i64::from(space_group.number)))
}

/// Derives both header codes for an already resolved space-group type.
///
/// # Errors
///
/// Returns [`SymmetryError::UnknownSpaceGroup`] for a number outside 1 to 230.
pub fn classify_space_group(space_group: SpaceGroupType) -> Result<Classification, SymmetryError> {
    let crystal_system = crystal_system(&space_group)?;
    let crystal_type_code = tables::crystal_type_code(crystal_system.name())?;
    let centering_code = centering_code(&space_group.international_short, space_group.lattice_type());
    debug!(
        hall_number = space_group.hall_number,
        number = space_group.number,
        %crystal_system,
        crystal_type_code,
        centering_code,
        "Classified space group"
    );
    Ok(Classification {
        space_group,
        crystal_system,
        crystal_type_code,
        centering_code,
    })
}

/// Classifies a Hall setting.
///
/// # Arguments
///
/// * `hall_number` - The Hall number of the setting, 1 to 530.
/// * `database` - Source of the space-group number and international symbol.
///
/// # Return
///
/// The resolved space-group type with its crystal system, crystal-type code
/// and centering code.
///
/// # Errors
///
/// Returns whatever the database reports for an unknown Hall number, or
/// [`SymmetryError::UnknownSpaceGroup`] if it yields a number outside 1 to 230.
pub fn classify(
    hall_number: i32,
    database: &impl SpaceGroupDatabase,
) -> Result<Classification, SymmetryError> {
    classify_space_group(database.space_group_type(hall_number)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symmetry::database::MoyoDatabase;
    use std::collections::HashMap;

    struct FixedDatabase(HashMap<i32, (u16, &'static str)>);

    impl SpaceGroupDatabase for FixedDatabase {
        fn space_group_type(&self, hall_number: i32) -> Result<SpaceGroupType, SymmetryError> {
            let (number, symbol) = self
                .0
                .get(&hall_number)
                .copied()
                .ok_or(SymmetryError::UnknownHallNumber(hall_number))?;
            Ok(SpaceGroupType {
                hall_number,
                number,
                international_short: symbol.to_string(),
            })
        }
    }

    fn database() -> FixedDatabase {
        FixedDatabase(HashMap::from([
            (1, (1, "P1")),
            (9, (5, "C2")),
            (211, (42, "Fmm2")),
            (223, (44, "Imm2")),
            (190, (38, "Amm2")),
            (298, (65, "Cmmm")),
            (458, (166, "R-3m")),
            (484, (194, "P6_3/mmc")),
            (517, (221, "Pm-3m")),
            (523, (225, "Fm-3m")),
            (529, (229, "Im-3m")),
            (9000, (300, "X")),
        ]))
    }

    #[test]
    fn primitive_cubic_yields_primitive_centering_and_cubic_type() {
        let c = classify(517, &database()).unwrap();
        assert_eq!(c.centering_code, 1);
        assert_eq!(c.crystal_type_code, 6);
        assert_eq!(c.crystal_system, CrystalSystem::Cubic);
        assert_eq!(c.space_group.number, 221);
    }

    #[test]
    fn body_and_face_centered_groups_get_their_codes() {
        assert_eq!(classify(529, &database()).unwrap().centering_code, 6);
        assert_eq!(classify(523, &database()).unwrap().centering_code, 5);
        assert_eq!(classify(223, &database()).unwrap().centering_code, 6);
        assert_eq!(classify(211, &database()).unwrap().centering_code, 5);
    }

    #[test]
    fn c_centering_maps_to_four_for_monoclinic_and_orthorhombic() {
        let mono = classify(9, &database()).unwrap();
        assert_eq!(mono.centering_code, 4);
        assert_eq!(mono.crystal_type_code, 2);
        let ortho = classify(298, &database()).unwrap();
        assert_eq!(ortho.centering_code, 4);
        assert_eq!(ortho.crystal_type_code, 3);
    }

    #[test]
    fn a_centering_falls_back_to_primitive_code() {
        assert_eq!(classify(190, &database()).unwrap().centering_code, 1);
    }

    #[test]
    fn rhombohedral_and_hexagonal_lattices_are_primitive_with_hexagonal_type() {
        let rhombo = classify(458, &database()).unwrap();
        assert_eq!(rhombo.centering_code, 1);
        assert_eq!(rhombo.crystal_type_code, 5);
        assert_eq!(rhombo.crystal_system, CrystalSystem::Trigonal);
        let hex = classify(484, &database()).unwrap();
        assert_eq!(hex.centering_code, 1);
        assert_eq!(hex.crystal_type_code, 5);
    }

    #[test]
    fn centering_rules_apply_in_order() {
        assert_eq!(centering_code("R-3m", Some(LatticeType::Rhombohedral)), 1);
        assert_eq!(centering_code("I4/mmm", Some(LatticeType::Tetragonal)), 6);
        assert_eq!(centering_code("Cmcm", Some(LatticeType::Orthorhombic)), 4);
        assert_eq!(centering_code("Bmm2", Some(LatticeType::Orthorhombic)), 1);
        assert_eq!(centering_code("anything", Some(LatticeType::Hexagonal)), 1);
    }

    #[test]
    fn classification_is_deterministic() {
        let db = database();
        let first = classify(523, &db).unwrap();
        for _ in 0..5 {
            assert_eq!(classify(523, &db).unwrap(), first);
        }
    }

    #[test]
    fn unknown_hall_number_and_space_group_are_errors() {
        assert!(matches!(
            classify(42, &database()),
            Err(SymmetryError::UnknownHallNumber(42))
        ));
        assert!(matches!(
            classify(9000, &database()),
            Err(SymmetryError::UnknownSpaceGroup(300))
        ));
    }

    #[test]
    fn moyo_backed_classification_of_rock_salt_setting() {
        let c = classify(523, &MoyoDatabase).unwrap();
        assert_eq!(c.space_group.number, 225);
        assert_eq!(c.centering_code, 5);
        assert_eq!(c.crystal_type_code, 6);
    }
}
