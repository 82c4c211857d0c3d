use thiserror::Error;

pub const DEFAULT_SYMPREC: f64 = 1e-5;
pub const DEFAULT_CLOSURE_TOLERANCE: f64 = 1e-4;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Tolerance '{name}' must be a positive finite number (got {value})")]
    InvalidTolerance { name: &'static str, value: f64 },
}

fn check_tolerance(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidTolerance { name, value })
    }
}

/// Tolerances for the symmetry search: a length tolerance in the structure's
/// length unit and an optional angle tolerance in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymmetryTolerance {
    pub symprec: f64,
    pub angle_tolerance: Option<f64>,
}

impl Default for SymmetryTolerance {
    fn default() -> Self {
        Self {
            symprec: DEFAULT_SYMPREC,
            angle_tolerance: None,
        }
    }
}

impl SymmetryTolerance {
    pub fn new(symprec: f64, angle_tolerance: Option<f64>) -> Result<Self, ConfigError> {
        let symprec = check_tolerance("symprec", symprec)?;
        // A negative angle tolerance selects the backend's own heuristic.
        let angle_tolerance = angle_tolerance.filter(|a| *a >= 0.0);
        if let Some(angle) = angle_tolerance {
            check_tolerance("angle-tolerance", angle)?;
        }
        Ok(Self {
            symprec,
            angle_tolerance,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReadOptions {
    /// When set, the atom list must be closed under the symmetry operations
    /// within this cartesian distance.
    pub closure_tolerance: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WriteOptions {
    pub tolerance: SymmetryTolerance,
    pub sort_operations: bool,
}

#[derive(Default)]
pub struct ReadOptionsBuilder {
    verify_closure: bool,
    closure_tolerance: Option<f64>,
}

impl ReadOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verify_atom_closure(mut self, verify: bool) -> Self {
        self.verify_closure = verify;
        self
    }

    pub fn closure_tolerance(mut self, tolerance: f64) -> Self {
        self.closure_tolerance = Some(tolerance);
        self
    }

    pub fn build(self) -> Result<ReadOptions, ConfigError> {
        if !self.verify_closure {
            return Ok(ReadOptions::default());
        }
        let tolerance = check_tolerance(
            "closure-tolerance",
            self.closure_tolerance.unwrap_or(DEFAULT_CLOSURE_TOLERANCE),
        )?;
        Ok(ReadOptions {
            closure_tolerance: Some(tolerance),
        })
    }
}

#[derive(Default)]
pub struct WriteOptionsBuilder {
    symprec: Option<f64>,
    angle_tolerance: Option<f64>,
    sort_operations: bool,
}

impl WriteOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn symprec(mut self, symprec: f64) -> Self {
        self.symprec = Some(symprec);
        self
    }

    pub fn angle_tolerance(mut self, angle_tolerance: f64) -> Self {
        self.angle_tolerance = Some(angle_tolerance);
        self
    }

    pub fn sort_operations(mut self, sort: bool) -> Self {
        self.sort_operations = sort;
        self
    }

    pub fn build(self) -> Result<WriteOptions, ConfigError> {
        let tolerance = SymmetryTolerance::new(
            self.symprec.unwrap_or(DEFAULT_SYMPREC),
            self.angle_tolerance,
        )?;
        Ok(WriteOptions {
            tolerance,
            sort_operations: self.sort_operations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_builder_defaults_to_no_closure_check() {
        let options = ReadOptionsBuilder::new().build().unwrap();
        assert_eq!(options.closure_tolerance, None);
    }

    #[test]
    fn read_builder_uses_default_tolerance_when_verifying() {
        let options = ReadOptionsBuilder::new()
            .verify_atom_closure(true)
            .build()
            .unwrap();
        assert_eq!(options.closure_tolerance, Some(DEFAULT_CLOSURE_TOLERANCE));
    }

    #[test]
    fn read_builder_rejects_non_positive_tolerance() {
        let result = ReadOptionsBuilder::new()
            .verify_atom_closure(true)
            .closure_tolerance(0.0)
            .build();
        assert_eq!(
            result,
            Err(ConfigError::InvalidTolerance {
                name: "closure-tolerance",
                value: 0.0
            })
        );
    }

    #[test]
    fn write_builder_sets_all_fields() {
        let options = WriteOptionsBuilder::new()
            .symprec(1e-3)
            .angle_tolerance(5.0)
            .sort_operations(true)
            .build()
            .unwrap();
        assert_eq!(options.tolerance.symprec, 1e-3);
        assert_eq!(options.tolerance.angle_tolerance, Some(5.0));
        assert!(options.sort_operations);
    }

    #[test]
    fn negative_angle_tolerance_means_backend_default() {
        let tolerance = SymmetryTolerance::new(1e-5, Some(-1.0)).unwrap();
        assert_eq!(tolerance.angle_tolerance, None);
    }

    #[test]
    fn symprec_must_be_positive() {
        assert!(matches!(
            SymmetryTolerance::new(-1e-5, None),
            Err(ConfigError::InvalidTolerance { name: "symprec", .. })
        ));
        assert!(SymmetryTolerance::new(f64::NAN, None).is_err());
    }
}
