//! # Core Models Module
//!
//! The two records exchanged through the geometry file codec.
//!
//! ## Key Components
//!
//! - [`structure`] - Lattice, periodicity, atomic numbers and cartesian coordinates
//! - [`symmetry`] - Symmetry operations with their basis and the header codes
//!   (centering, crystal type, space group) the file format requires
//!
//! Both records are plain values: constructed once per read or write call and
//! never mutated afterwards. Transformations such as basis conversion build a
//! new record.
//!
//! ```ignore
//! use extgeom::core::models::{structure::StructureRecord, symmetry::{Basis, SymmetryRecord}};
//!
//! let structure = StructureRecord::from_rows(
//!     [true, true, true],
//!     [[4.2, 0.0, 0.0], [0.0, 4.2, 0.0], [0.0, 0.0, 4.2]],
//!     &[11, 17],
//!     &[[0.0, 0.0, 0.0], [2.1, 2.1, 2.1]],
//! )?;
//! let symmetry = SymmetryRecord::p1(Basis::Cartesian);
//! ```

pub mod structure;
pub mod symmetry;
