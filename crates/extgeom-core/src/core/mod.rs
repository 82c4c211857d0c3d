//! # Core Module
//!
//! Data models and file formats. Nothing in here performs a symmetry search;
//! the codec only calls into [`crate::symmetry`] when it has to derive a
//! symmetry record that the caller did not supply.
//!
//! - **Records** ([`models`]) - Structures and symmetry records
//! - **Lookup tables** ([`tables`]) - Crystal type codes, periodicity and centring matrices
//! - **Input normalization** ([`adapter`]) - Dictionary, atoms-object and fractional-cell inputs
//! - **File I/O** ([`io`]) - The `.gui` format and its number layout

pub mod adapter;
pub mod io;
pub mod models;
pub mod tables;
