//! Fixed-width scientific notation used for every float in a geometry file.

/// Field width of a formatted float.
pub const FLOAT_WIDTH: usize = 17;
/// Digits after the decimal point in the mantissa.
pub const MANTISSA_DIGITS: usize = 9;
/// Rounding applied to lattice vectors and symmetry operations.
pub const ROUND_DECIMALS: i32 = 9;
/// Rounding applied to atomic coordinates.
pub const COORDINATE_ROUND_DECIMALS: i32 = 10;

/// Rounds to `decimals` places, halves to even, and adds `0.0`, so a value
/// that rounds to zero is a positive zero.
pub fn normalize(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    let rounded = (value * scale).round_ties_even() / scale;
    if rounded.is_finite() {
        rounded + 0.0
    } else {
        value + 0.0
    }
}

/// Formats a value as `d.dddddddddE±XX`, right-aligned to [`FLOAT_WIDTH`].
pub fn scientific(value: f64) -> String {
    let raw = format!("{:.*E}", MANTISSA_DIGITS, value);
    let formatted = match raw.split_once('E') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exp) => {
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{mantissa}E{sign}{:02}", exp.abs())
            }
            Err(_) => raw,
        },
        None => raw,
    };
    format!("{formatted:>width$}", width = FLOAT_WIDTH)
}

/// Three normalized floats separated by single spaces.
pub fn float_row(values: &[f64; 3], decimals: i32) -> String {
    values
        .iter()
        .map(|v| scientific(normalize(*v, decimals)))
        .collect::<Vec<_>>()
        .join(" ")
}
