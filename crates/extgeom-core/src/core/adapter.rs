//! Normalization of the structure representations accepted by the writer.
//!
//! Every supported representation implements [`ToCanonicalRecord`]. The codec
//! only ever consumes the resulting [`StructureRecord`]; it never inspects
//! which representation it came from.

use crate::core::models::structure::{StructureError, StructureRecord, lattice_from_rows};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AdapterError {
    #[error("Unsupported structure type: {0}")]
    UnsupportedStructureType(String),
    #[error("Invalid structure: {0}")]
    Structure(#[from] StructureError),
}

pub trait ToCanonicalRecord {
    fn to_canonical_record(&self) -> Result<StructureRecord, AdapterError>;
}

impl ToCanonicalRecord for StructureRecord {
    fn to_canonical_record(&self) -> Result<StructureRecord, AdapterError> {
        Ok(self.clone())
    }
}

/// The dictionary form: `pbc`, `lattice`, `atomic_numbers` and cartesian
/// `ccoords`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CanonicalDict {
    pub pbc: [bool; 3],
    pub lattice: [[f64; 3]; 3],
    pub atomic_numbers: Vec<i64>,
    pub ccoords: Vec<[f64; 3]>,
}

impl ToCanonicalRecord for CanonicalDict {
    fn to_canonical_record(&self) -> Result<StructureRecord, AdapterError> {
        Ok(StructureRecord::from_rows(
            self.pbc,
            self.lattice,
            &self.atomic_numbers,
            &self.ccoords,
        )?)
    }
}

impl From<&StructureRecord> for CanonicalDict {
    fn from(record: &StructureRecord) -> Self {
        Self {
            pbc: record.periodicity(),
            lattice: record.lattice_rows(),
            atomic_numbers: record
                .atomic_numbers()
                .iter()
                .map(|&z| i64::from(z))
                .collect(),
            ccoords: record
                .cartesian_coordinates()
                .iter()
                .map(|p| [p.x, p.y, p.z])
                .collect(),
        }
    }
}

/// Periodic boundary flags given either once for all directions or per
/// direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Pbc {
    All(bool),
    Each([bool; 3]),
}

impl Pbc {
    pub fn flags(&self) -> [bool; 3] {
        match *self {
            Pbc::All(flag) => [flag; 3],
            Pbc::Each(flags) => flags,
        }
    }
}

fn fully_periodic() -> Pbc {
    Pbc::All(true)
}

/// The atomistic-object layout: `cell`, cartesian `positions`, `numbers`
/// and `pbc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AtomsObject {
    pub cell: [[f64; 3]; 3],
    pub positions: Vec<[f64; 3]>,
    pub numbers: Vec<i64>,
    #[serde(default = "fully_periodic")]
    pub pbc: Pbc,
}

impl ToCanonicalRecord for AtomsObject {
    fn to_canonical_record(&self) -> Result<StructureRecord, AdapterError> {
        Ok(StructureRecord::from_rows(
            self.pbc.flags(),
            self.cell,
            &self.numbers,
            &self.positions,
        )?)
    }
}

/// A lattice with fractional positions and atomic numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FractionalCell {
    pub lattice: [[f64; 3]; 3],
    pub positions: Vec<[f64; 3]>,
    pub numbers: Vec<i64>,
    #[serde(default = "fully_periodic")]
    pub pbc: Pbc,
}

impl ToCanonicalRecord for FractionalCell {
    fn to_canonical_record(&self) -> Result<StructureRecord, AdapterError> {
        let lt = lattice_from_rows(self.lattice).transpose();
        let ccoords: Vec<[f64; 3]> = self
            .positions
            .iter()
            .map(|f| {
                let c = lt * Vector3::new(f[0], f[1], f[2]);
                [c.x, c.y, c.z]
            })
            .collect();
        Ok(StructureRecord::from_rows(
            self.pbc.flags(),
            self.lattice,
            &self.numbers,
            &ccoords,
        )?)
    }
}

/// Any of the supported representations, as found in a JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StructureInput {
    Canonical(CanonicalDict),
    Atoms(AtomsObject),
    Cell(FractionalCell),
}

impl StructureInput {
    pub fn from_json(value: serde_json::Value) -> Result<Self, AdapterError> {
        let description = describe(&value);
        serde_json::from_value(value)
            .map_err(|_| AdapterError::UnsupportedStructureType(description))
    }

    pub fn from_json_str(content: &str) -> Result<Self, AdapterError> {
        let value: serde_json::Value = serde_json::from_str(content)
            .map_err(|e| AdapterError::UnsupportedStructureType(format!("not valid JSON ({e})")))?;
        Self::from_json(value)
    }
}

fn describe(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Object(map) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            format!("object with keys [{}]", keys.join(", "))
        }
        serde_json::Value::Array(_) => "array".to_string(),
        serde_json::Value::String(_) => "string".to_string(),
        serde_json::Value::Number(_) => "number".to_string(),
        serde_json::Value::Bool(_) => "boolean".to_string(),
        serde_json::Value::Null => "null".to_string(),
    }
}

impl ToCanonicalRecord for StructureInput {
    fn to_canonical_record(&self) -> Result<StructureRecord, AdapterError> {
        match self {
            StructureInput::Canonical(dict) => dict.to_canonical_record(),
            StructureInput::Atoms(atoms) => atoms.to_canonical_record(),
            StructureInput::Cell(cell) => cell.to_canonical_record(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn canonical_dict_round_trips_through_record() {
        let dict = CanonicalDict {
            pbc: [true, true, false],
            lattice: [[3.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 20.0]],
            atomic_numbers: vec![6, 6],
            ccoords: vec![[0.0, 0.0, 10.0], [1.5, 1.5, 10.0]],
        };
        let record = dict.to_canonical_record().unwrap();
        assert_eq!(record.periodicity(), [true, true, false]);
        assert_eq!(CanonicalDict::from(&record), dict);
    }

    #[test]
    fn atoms_object_accepts_scalar_pbc() {
        let input = StructureInput::from_json(json!({
            "cell": [[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]],
            "positions": [[0.0, 0.0, 0.0]],
            "numbers": [26],
            "pbc": false
        }))
        .unwrap();
        assert!(matches!(input, StructureInput::Atoms(_)));
        let record = input.to_canonical_record().unwrap();
        assert_eq!(record.periodicity(), [false; 3]);
        assert_eq!(record.atomic_numbers(), &[26]);
    }

    #[test]
    fn fractional_cell_positions_become_cartesian() {
        let input = StructureInput::from_json(json!({
            "lattice": [[4.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 6.0]],
            "positions": [[0.5, 0.5, 0.5]],
            "numbers": [14]
        }))
        .unwrap();
        assert!(matches!(input, StructureInput::Cell(_)));
        let record = input.to_canonical_record().unwrap();
        let p = record.cartesian_coordinates()[0];
        assert!((p.x - 2.0).abs() < 1e-12);
        assert!((p.y - 2.5).abs() < 1e-12);
        assert!((p.z - 3.0).abs() < 1e-12);
        assert_eq!(record.periodicity(), [true; 3]);
    }

    #[test]
    fn canonical_dict_is_selected_for_dictionary_form() {
        let input = StructureInput::from_json(json!({
            "pbc": [true, true, true],
            "lattice": [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            "atomic_numbers": [1],
            "ccoords": [[0.0, 0.0, 0.0]]
        }))
        .unwrap();
        assert!(matches!(input, StructureInput::Canonical(_)));
    }

    #[test]
    fn unrecognized_shape_is_unsupported_structure_type() {
        let result = StructureInput::from_json(json!({ "species": ["Na"], "sites": [] }));
        match result {
            Err(AdapterError::UnsupportedStructureType(desc)) => {
                assert!(desc.contains("species"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(matches!(
            StructureInput::from_json_str("[1, 2, 3]"),
            Err(AdapterError::UnsupportedStructureType(_))
        ));
    }

    #[test]
    fn inconsistent_lengths_surface_as_structure_error() {
        let dict = CanonicalDict {
            pbc: [true; 3],
            lattice: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            atomic_numbers: vec![1, 1],
            ccoords: vec![[0.0; 3]],
        };
        assert!(matches!(
            dict.to_canonical_record(),
            Err(AdapterError::Structure(StructureError::LengthMismatch { .. }))
        ));
    }
}
