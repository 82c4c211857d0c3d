//! Space-group metadata keyed by Hall number.
//!
//! The classifier only needs three facts about a Hall setting: its space-group
//! number, its international short symbol and its lattice type. The first two
//! come from a [`SpaceGroupDatabase`]; the lattice type and crystal system are
//! fixed functions of the space-group number.

use super::SymmetryError;
use std::fmt;
use tracing::trace;

/// One of the seven crystal systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrystalSystem {
    Triclinic,
    Monoclinic,
    Orthorhombic,
    Tetragonal,
    Trigonal,
    Hexagonal,
    Cubic,
}

impl CrystalSystem {
    pub fn from_space_group_number(number: u16) -> Option<Self> {
        let system = match number {
            1..=2 => Self::Triclinic,
            3..=15 => Self::Monoclinic,
            16..=74 => Self::Orthorhombic,
            75..=142 => Self::Tetragonal,
            143..=167 => Self::Trigonal,
            168..=194 => Self::Hexagonal,
            195..=230 => Self::Cubic,
            _ => return None,
        };
        Some(system)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Triclinic => "triclinic",
            Self::Monoclinic => "monoclinic",
            Self::Orthorhombic => "orthorhombic",
            Self::Tetragonal => "tetragonal",
            Self::Trigonal => "trigonal",
            Self::Hexagonal => "hexagonal",
            Self::Cubic => "cubic",
        }
    }
}

impl fmt::Display for CrystalSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lattice type: the crystal system, with the trigonal groups split into
/// those on a rhombohedral lattice and those on a hexagonal one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LatticeType {
    Triclinic,
    Monoclinic,
    Orthorhombic,
    Tetragonal,
    Rhombohedral,
    Hexagonal,
    Cubic,
}

const RHOMBOHEDRAL_SPACE_GROUPS: [u16; 7] = [146, 148, 155, 160, 161, 166, 167];

impl LatticeType {
    pub fn from_space_group_number(number: u16) -> Option<Self> {
        let lattice = match CrystalSystem::from_space_group_number(number)? {
            CrystalSystem::Triclinic => Self::Triclinic,
            CrystalSystem::Monoclinic => Self::Monoclinic,
            CrystalSystem::Orthorhombic => Self::Orthorhombic,
            CrystalSystem::Tetragonal => Self::Tetragonal,
            CrystalSystem::Trigonal if RHOMBOHEDRAL_SPACE_GROUPS.contains(&number) => {
                Self::Rhombohedral
            }
            CrystalSystem::Trigonal | CrystalSystem::Hexagonal => Self::Hexagonal,
            CrystalSystem::Cubic => Self::Cubic,
        };
        Some(lattice)
    }
}

/// Space-group facts for a single Hall setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceGroupType {
    pub hall_number: i32,
    pub number: u16,
    pub international_short: String,
}

impl SpaceGroupType {
    pub fn crystal_system(&self) -> Option<CrystalSystem> {
        CrystalSystem::from_space_group_number(self.number)
    }

    pub fn lattice_type(&self) -> Option<LatticeType> {
        LatticeType::from_space_group_number(self.number)
    }
}

pub trait SpaceGroupDatabase {
    fn space_group_type(&self, hall_number: i32) -> Result<SpaceGroupType, SymmetryError>;
}

/// Hall-setting lookups backed by the tables bundled with `moyo`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoyoDatabase;

impl SpaceGroupDatabase for MoyoDatabase {
    fn space_group_type(&self, hall_number: i32) -> Result<SpaceGroupType, SymmetryError> {
        let entry = moyo::data::hall_symbol_entry(hall_number)
            .ok_or(SymmetryError::UnknownHallNumber(hall_number))?;
        let number = u16::try_from(entry.number)
            .map_err(|_| SymmetryError::UnknownSpaceGroup(i64::from(entry.number)))?;
        trace!(hall_number, number, symbol = entry.hm_short, "Resolved Hall setting");
        Ok(SpaceGroupType {
            hall_number,
            number,
            international_short: entry.hm_short.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crystal_system_boundaries_follow_international_tables() {
        assert_eq!(CrystalSystem::from_space_group_number(2), Some(CrystalSystem::Triclinic));
        assert_eq!(CrystalSystem::from_space_group_number(3), Some(CrystalSystem::Monoclinic));
        assert_eq!(CrystalSystem::from_space_group_number(74), Some(CrystalSystem::Orthorhombic));
        assert_eq!(CrystalSystem::from_space_group_number(142), Some(CrystalSystem::Tetragonal));
        assert_eq!(CrystalSystem::from_space_group_number(167), Some(CrystalSystem::Trigonal));
        assert_eq!(CrystalSystem::from_space_group_number(194), Some(CrystalSystem::Hexagonal));
        assert_eq!(CrystalSystem::from_space_group_number(230), Some(CrystalSystem::Cubic));
        assert_eq!(CrystalSystem::from_space_group_number(0), None);
        assert_eq!(CrystalSystem::from_space_group_number(231), None);
    }

    #[test]
    fn lattice_type_splits_trigonal_groups() {
        assert_eq!(LatticeType::from_space_group_number(166), Some(LatticeType::Rhombohedral));
        assert_eq!(LatticeType::from_space_group_number(146), Some(LatticeType::Rhombohedral));
        assert_eq!(LatticeType::from_space_group_number(164), Some(LatticeType::Hexagonal));
        assert_eq!(LatticeType::from_space_group_number(194), Some(LatticeType::Hexagonal));
        assert_eq!(LatticeType::from_space_group_number(225), Some(LatticeType::Cubic));
    }

    #[test]
    fn moyo_database_resolves_primitive_cubic_setting() {
        let sg = MoyoDatabase.space_group_type(517).unwrap();
        assert_eq!(sg.number, 221);
        assert!(sg.international_short.contains('P'));
        assert_eq!(sg.crystal_system(), Some(CrystalSystem::Cubic));
    }

    #[test]
    fn moyo_database_rejects_unknown_hall_numbers() {
        assert!(matches!(
            MoyoDatabase.space_group_type(9999),
            Err(SymmetryError::UnknownHallNumber(9999))
        ));
    }
}
