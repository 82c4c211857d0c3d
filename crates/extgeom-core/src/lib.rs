//! # extgeom
//!
//! Reading, writing and symmetry classification of CRYSTAL external geometry
//! (`.gui`) files.
//!
//! ## Layout
//!
//! - **[`core`]: Data and formats.** The structure and symmetry records, the
//!   crystal-type and periodicity lookup tables, the structure adapter that
//!   normalizes the accepted input representations, and the `.gui` codec.
//!
//! - **[`symmetry`]: Crystallography.** Basis conversion of symmetry operations,
//!   the space-group database, the classifier that assigns centring and crystal
//!   type codes, and the analyzer that derives a symmetry record from a bare
//!   structure.
//!
//! - **[`config`]: Options.** Builders for the read and write options shared by
//!   the library and the command-line tool.

pub mod config;
pub mod core;
pub mod symmetry;
