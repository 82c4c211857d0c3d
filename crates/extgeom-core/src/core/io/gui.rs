//! The CRYSTAL external geometry (`.gui`) format.
//!
//! ```text
//! dimensionality centring_code crystal_type_code [energy]
//!     a_x a_y a_z
//!     b_x b_y b_z
//!     c_x c_y c_z
//! num_symm_ops
//!     rot_00 rot_01 rot_02
//!     rot_10 rot_11 rot_12
//!     rot_20 rot_21 rot_22
//!     trans_0 trans_1 trans_2       (x num_symm_ops)
//! num_atoms
//!     atomic_number x y z           (x num_atoms)
//! space_group_number num_symm_ops
//! ```
//!
//! Symmetry operations and atomic positions are cartesian. Files from
//! releases that list only the symmetry-inequivalent atoms parse without
//! error; [`ReadOptions::closure_tolerance`] rejects them.

use super::format::{COORDINATE_ROUND_DECIMALS, ROUND_DECIMALS, float_row};
use super::traits::StructureFile;
use crate::config::{ReadOptions, WriteOptions};
use crate::core::adapter::{AdapterError, ToCanonicalRecord};
use crate::core::models::structure::{StructureError, StructureRecord, lattice_from_rows};
use crate::core::models::symmetry::{Basis, SymmetryOperation, SymmetryRecord, UnsupportedBasis};
use crate::core::tables::{self, TableError};
use crate::symmetry::SymmetryError;
use crate::symmetry::analyzer::{MoyoAnalyzer, SymmetryAnalyzer, structure_to_symmetry};
use crate::symmetry::basis::{BasisError, convert_record};
use crate::symmetry::closure::find_missing_image;
use crate::symmetry::database::{MoyoDatabase, SpaceGroupDatabase};
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error)]
pub enum GuiError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("Malformed number on line {line}: '{value}'")]
    MalformedNumber { line: usize, value: String },
    #[error("Expected symmetry operation x, y and z values on line {line} (found {found} values)")]
    MalformedOperation { line: usize, found: usize },
    #[error("Expected {expected} on line {line} (found {found} values)")]
    MalformedRecord {
        line: usize,
        expected: &'static str,
        found: usize,
    },
    #[error("Unexpected end of file at line {line}")]
    UnexpectedEof { line: usize },
    #[error(
        "Number of symmetry operations in the operation section ({declared}) and in the final line ({trailer}) are inconsistent"
    )]
    SymmetryCountMismatch { declared: usize, trailer: usize },
    #[error("Unexpected content after the final line on line {line}")]
    TrailingContent { line: usize },
    #[error("Periodicity {0:?} cannot be expressed as a dimensionality")]
    UnsupportedPeriodicity([bool; 3]),
    #[error(
        "Atom {atom} has no symmetry image under operation {operation}; the file may list only inequivalent atoms"
    )]
    IncompleteAtomList { atom: usize, operation: usize },
    #[error(transparent)]
    UnsupportedBasis(#[from] UnsupportedBasis),
    #[error(transparent)]
    Basis(#[from] BasisError),
    #[error(transparent)]
    Symmetry(#[from] SymmetryError),
    #[error(transparent)]
    Structure(#[from] StructureError),
    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

/// Contents of the first line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuiHeader {
    pub dimensionality: u8,
    pub periodicity: [bool; 3],
    pub centering_code: u8,
    pub crystal_type_code: u8,
    pub energy: Option<f64>,
}

struct LineCursor<'a, S> {
    lines: &'a [S],
    position: usize,
}

impl<'a, S: AsRef<str>> LineCursor<'a, S> {
    fn new(lines: &'a [S]) -> Self {
        Self { lines, position: 0 }
    }

    /// Returns the next line with its zero-based index.
    fn next_line(&mut self) -> Result<(usize, Vec<&'a str>), GuiError> {
        let index = self.position;
        let line = self
            .lines
            .get(index)
            .ok_or(GuiError::UnexpectedEof { line: index })?;
        self.position += 1;
        Ok((index, line.as_ref().split_whitespace().collect()))
    }

    fn remaining(&self) -> impl Iterator<Item = (usize, &'a str)> {
        self.lines[self.position.min(self.lines.len())..]
            .iter()
            .enumerate()
            .map(move |(offset, line)| (self.position + offset, line.as_ref()))
    }
}

fn parse_number<T: FromStr>(token: &str, line: usize) -> Result<T, GuiError> {
    token.parse().map_err(|_| GuiError::MalformedNumber {
        line,
        value: token.to_string(),
    })
}

fn parse_triple(tokens: &[&str], line: usize) -> Result<[f64; 3], GuiError> {
    Ok([
        parse_number(tokens[0], line)?,
        parse_number(tokens[1], line)?,
        parse_number(tokens[2], line)?,
    ])
}

fn expect_tokens(
    tokens: &[&str],
    line: usize,
    count: usize,
    expected: &'static str,
) -> Result<(), GuiError> {
    if tokens.len() == count {
        Ok(())
    } else {
        Err(GuiError::MalformedRecord {
            line,
            expected,
            found: tokens.len(),
        })
    }
}

fn parse_header_tokens(tokens: &[&str], line: usize) -> Result<GuiHeader, GuiError> {
    if !(3..=4).contains(&tokens.len()) {
        return Err(GuiError::MalformedRecord {
            line,
            expected: "dimensionality, centring code, crystal type and optional energy",
            found: tokens.len(),
        });
    }
    let dimensionality: i64 = parse_number(tokens[0], line)?;
    let periodicity = tables::periodicity(dimensionality)?;
    let energy = match tokens.get(3) {
        Some(token) => Some(parse_number(token, line)?),
        None => None,
    };
    Ok(GuiHeader {
        dimensionality: dimensionality as u8,
        periodicity,
        centering_code: parse_number(tokens[1], line)?,
        crystal_type_code: parse_number(tokens[2], line)?,
        energy,
    })
}

/// Parses the first line of a geometry file.
///
/// # Errors
///
/// Returns `MalformedRecord` unless the line has three or four tokens,
/// `MalformedNumber` for a non-numeric token, and `Table` for a
/// dimensionality outside 0 to 3.
pub fn parse_header(line: &str) -> Result<GuiHeader, GuiError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    parse_header_tokens(&tokens, 0)
}

/// Everything a single read of a geometry file yields.
#[derive(Debug, Clone, PartialEq)]
pub struct GuiDocument {
    pub header: GuiHeader,
    pub structure: StructureRecord,
    pub symmetry: SymmetryRecord,
}

/// Reader and writer for the CRYSTAL external geometry format.
///
/// The line-based entry points (`read_lines`, `write_lines`) are the core of
/// the codec; the [`StructureFile`] implementation wraps them for readers,
/// writers and paths.
pub struct GuiFile;

impl GuiFile {
    /// Parses a geometry file already split into lines, keeping the header.
    ///
    /// # Arguments
    ///
    /// * `lines` - The lines of the file, without line terminators.
    /// * `options` - Read options; `closure_tolerance` enables the atom-list check.
    ///
    /// # Return
    ///
    /// The parsed header with the structure and its cartesian symmetry record.
    ///
    /// # Errors
    ///
    /// Returns a [`GuiError`] citing the zero-based index of the offending line
    /// for malformed or truncated input, `SymmetryCountMismatch` when the
    /// trailer disagrees with the operation count, `TrailingContent` for
    /// non-blank lines after the trailer, and `IncompleteAtomList` when the
    /// closure check is enabled and fails.
    pub fn read_document<S: AsRef<str>>(
        lines: &[S],
        options: &ReadOptions,
    ) -> Result<GuiDocument, GuiError> {
        let mut cursor = LineCursor::new(lines);

        let (line, tokens) = cursor.next_line()?;
        let header = parse_header_tokens(&tokens, line)?;
        trace!(?header, "Parsed header");

        let mut lattice = [[0.0; 3]; 3];
        for row in lattice.iter_mut() {
            let (line, tokens) = cursor.next_line()?;
            expect_tokens(&tokens, line, 3, "three lattice vector components")?;
            *row = parse_triple(&tokens, line)?;
        }

        let (line, tokens) = cursor.next_line()?;
        expect_tokens(&tokens, line, 1, "the number of symmetry operations")?;
        let num_operations: usize = parse_number(tokens[0], line)?;

        let mut operations = Vec::with_capacity(num_operations);
        for _ in 0..num_operations {
            let mut flat = [0.0; 12];
            for chunk in flat.chunks_exact_mut(3) {
                let (line, tokens) = cursor.next_line()?;
                if tokens.len() != 3 {
                    return Err(GuiError::MalformedOperation {
                        line,
                        found: tokens.len(),
                    });
                }
                chunk.copy_from_slice(&parse_triple(&tokens, line)?);
            }
            operations.push(SymmetryOperation::from_flat(flat));
        }
        debug!(count = num_operations, "Read symmetry operations");

        let (line, tokens) = cursor.next_line()?;
        expect_tokens(&tokens, line, 1, "the number of atoms")?;
        let num_atoms: usize = parse_number(tokens[0], line)?;

        let mut atomic_numbers = Vec::with_capacity(num_atoms);
        let mut coordinates = Vec::with_capacity(num_atoms);
        for _ in 0..num_atoms {
            let (line, tokens) = cursor.next_line()?;
            if tokens.len() < 4 {
                return Err(GuiError::MalformedRecord {
                    line,
                    expected: "an atomic number and x, y and z coordinates",
                    found: tokens.len(),
                });
            }
            atomic_numbers.push(parse_number::<u32>(tokens[0], line)?);
            let [x, y, z] = parse_triple(&tokens[1..4], line)?;
            coordinates.push(Point3::new(x, y, z));
        }
        debug!(count = num_atoms, "Read atomic positions");

        let (line, tokens) = cursor.next_line()?;
        expect_tokens(&tokens, line, 2, "the space group number and number of operations")?;
        let space_group_number: u16 = parse_number(tokens[0], line)?;
        let trailer_count: usize = parse_number(tokens[1], line)?;
        if trailer_count != num_operations {
            return Err(GuiError::SymmetryCountMismatch {
                declared: num_operations,
                trailer: trailer_count,
            });
        }

        if let Some((line, _)) = cursor.remaining().find(|(_, l)| !l.trim().is_empty()) {
            return Err(GuiError::TrailingContent { line });
        }

        let structure = StructureRecord::new(
            header.periodicity,
            lattice_from_rows(lattice),
            atomic_numbers,
            coordinates,
        )?;
        let symmetry = SymmetryRecord::new(
            header.centering_code,
            header.crystal_type_code,
            space_group_number,
            operations,
            Basis::Cartesian,
        );

        if let Some(tolerance) = options.closure_tolerance {
            if let Some(missing) = find_missing_image(&structure, &symmetry, tolerance)? {
                return Err(GuiError::IncompleteAtomList {
                    atom: missing.atom,
                    operation: missing.operation,
                });
            }
        }

        Ok(GuiDocument {
            header,
            structure,
            symmetry,
        })
    }

    /// Parses a geometry file already split into lines.
    ///
    /// # Errors
    ///
    /// See [`GuiFile::read_document`].
    pub fn read_lines<S: AsRef<str>>(
        lines: &[S],
        options: &ReadOptions,
    ) -> Result<(StructureRecord, SymmetryRecord), GuiError> {
        let document = Self::read_document(lines, options)?;
        Ok((document.structure, document.symmetry))
    }

    /// Parses the full text of a geometry file, keeping the header.
    pub fn read_document_str(content: &str, options: &ReadOptions) -> Result<GuiDocument, GuiError> {
        let lines: Vec<&str> = content.lines().collect();
        Self::read_document(&lines, options)
    }

    /// Parses the full text of a geometry file.
    pub fn read_str(
        content: &str,
        options: &ReadOptions,
    ) -> Result<(StructureRecord, SymmetryRecord), GuiError> {
        let document = Self::read_document_str(content, options)?;
        Ok((document.structure, document.symmetry))
    }

    /// Formats a structure and its symmetry as geometry file lines.
    ///
    /// Fractional operations are converted to cartesian first. The operation
    /// count is written twice, both times from the same converted list.
    ///
    /// # Arguments
    ///
    /// * `structure` - The structure; its periodicity gives the dimensionality.
    /// * `symmetry` - The symmetry record, in either basis.
    /// * `options` - `sort_operations` orders the converted operations canonically.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedPeriodicity` if the periodicity is not one of the
    /// prefix forms, or `Basis` if fractional operations meet a singular lattice.
    pub fn write_lines(
        structure: &StructureRecord,
        symmetry: &SymmetryRecord,
        options: &WriteOptions,
    ) -> Result<Vec<String>, GuiError> {
        let dimensionality = structure
            .dimensionality()
            .ok_or(GuiError::UnsupportedPeriodicity(structure.periodicity()))?;

        let mut cartesian = convert_record(symmetry, Basis::Cartesian, structure.lattice())?;
        if options.sort_operations {
            cartesian = cartesian.sorted();
        }
        let operations = &cartesian.operations;
        let num_operations = operations.len();

        let mut lines = Vec::with_capacity(7 + 4 * num_operations + structure.num_atoms());
        lines.push(format!(
            "{} {} {}",
            dimensionality, cartesian.centering_code, cartesian.crystal_type_code
        ));
        for row in structure.lattice_rows() {
            lines.push(float_row(&row, ROUND_DECIMALS));
        }
        lines.push(num_operations.to_string());
        for op in operations {
            for row in op.rows() {
                lines.push(float_row(&row, ROUND_DECIMALS));
            }
        }
        lines.push(structure.num_atoms().to_string());
        for (z, position) in structure.atoms() {
            lines.push(format!(
                "{:>3} {}",
                z,
                float_row(&[position.x, position.y, position.z], COORDINATE_ROUND_DECIMALS)
            ));
        }
        lines.push(format!("{} {}", cartesian.space_group_number, num_operations));

        debug!(
            dimensionality,
            operations = num_operations,
            atoms = structure.num_atoms(),
            "Formatted geometry file"
        );
        Ok(lines)
    }

    /// Normalizes `structure` and writes it, deriving the symmetry record
    /// through `analyzer` and `database` when none is given.
    ///
    /// # Errors
    ///
    /// Returns `Adapter` if the structure cannot be normalized, `Symmetry` if
    /// the derivation fails, and otherwise the errors of [`GuiFile::write_lines`].
    pub fn write_derived_lines(
        structure: &impl ToCanonicalRecord,
        symmetry: Option<&SymmetryRecord>,
        options: &WriteOptions,
        analyzer: &impl SymmetryAnalyzer,
        database: &impl SpaceGroupDatabase,
    ) -> Result<Vec<String>, GuiError> {
        let structure = structure.to_canonical_record()?;
        let derived;
        let symmetry = match symmetry {
            Some(symmetry) => symmetry,
            None => {
                debug!("No symmetry given; deriving it from the structure.");
                derived =
                    structure_to_symmetry(&structure, &options.tolerance, false, analyzer, database)?;
                &derived.record
            }
        };
        Self::write_lines(&structure, symmetry, options)
    }
}

fn write_all_lines(lines: &[String], writer: &mut impl Write) -> io::Result<()> {
    for line in lines {
        writeln!(writer, "{}", line)?;
    }
    Ok(())
}

impl StructureFile for GuiFile {
    type Metadata = SymmetryRecord;
    type Error = GuiError;

    fn read_from(
        reader: &mut impl BufRead,
    ) -> Result<(StructureRecord, Self::Metadata), Self::Error> {
        let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
        Self::read_lines(&lines, &ReadOptions::default())
    }

    fn write_to(
        structure: &StructureRecord,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        let lines = Self::write_lines(structure, metadata, &WriteOptions::default())?;
        write_all_lines(&lines, writer)?;
        Ok(())
    }

    fn write_structure_to(
        structure: &StructureRecord,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        let lines = Self::write_derived_lines(
            structure,
            None,
            &WriteOptions::default(),
            &MoyoAnalyzer,
            &MoyoDatabase,
        )?;
        write_all_lines(&lines, writer)?;
        Ok(())
    }
}
