//! Input/output for structure file formats.
//!
//! Formats implement the [`traits::StructureFile`] interface. The only format
//! provided is the CRYSTAL external geometry file in [`gui`].

pub mod format;
pub mod gui;
pub mod traits;
