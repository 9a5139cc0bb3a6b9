//! SI-style units: prefix, base unit and integer exponent.
//!
//! A unit is written `[prefix]base[exponent]`, e.g. `kV`, `mm2`, `mm-1`,
//! `keV`. Prefixes are restricted to the decimal SI set. A few non-SI
//! units (`Å`, `degrees`, `counts`, composition units) are admitted as
//! standalone bases and never take a prefix.
//!
//! Conversions are only defined between units sharing a base, plus the
//! two cross-base pairs m↔Å and rad↔degrees.

use std::f64::consts::PI;
use std::fmt;

use crate::error::{HmsaError, Result};

/// SI prefixes with their decimal exponent. `da` must be tried before `d`.
const PREFIXES: &[(&str, i32)] = &[
    ("da", 1),
    ("y", -24),
    ("z", -21),
    ("a", -18),
    ("f", -15),
    ("p", -12),
    ("n", -9),
    ("u", -6),
    ("m", -3),
    ("c", -2),
    ("d", -1),
    ("h", 2),
    ("k", 3),
    ("M", 6),
    ("G", 9),
    ("T", 12),
    ("P", 15),
    ("E", 18),
    ("Z", 21),
    ("Y", 24),
];

/// Base units that accept a prefix and an exponent.
const PREFIXABLE_BASES: &[&str] = &[
    "m", "g", "s", "A", "K", "mol", "cd", "Hz", "N", "Pa", "J", "W", "C", "V", "F", "ohm",
    "S", "Wb", "T", "H", "lm", "lx", "Bq", "Gy", "Sv", "kat", "rad", "sr", "eV", "L",
];

/// Units admitted verbatim, without prefix.
const STANDALONE_UNITS: &[&str] = &[
    "Å", "degrees", "degreesC", "counts", "counts/s", "%", "wt%", "mol%", "atoms", "u",
];

/// Spellings folded into their canonical form before parsing.
const ALIASES: &[(&str, &str)] = &[
    ("\u{212B}", "Å"),
    ("angstrom", "Å"),
    ("deg", "degrees"),
    ("degree", "degrees"),
    ("\u{00B0}", "degrees"),
    ("\u{00B0}C", "degreesC"),
];

/// A parsed unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    prefix: &'static str,
    base: String,
    exponent: i32,
}

impl Unit {
    /// Parse a unit string.
    pub fn parse(unit: &str) -> Result<Self> {
        let trimmed = unit.trim();
        if trimmed.is_empty() {
            return Err(HmsaError::InvalidUnit(unit.to_string()));
        }

        let aliased = ALIASES
            .iter()
            .find(|(alias, _)| *alias == trimmed)
            .map(|(_, canonical)| *canonical)
            .unwrap_or(trimmed);

        if let Some(standalone) = STANDALONE_UNITS.iter().find(|u| **u == aliased) {
            return Ok(Self {
                prefix: "",
                base: standalone.to_string(),
                exponent: 1,
            });
        }

        // Micro sign and greek mu both fold to `u`
        let folded = aliased.replacen(['\u{00B5}', '\u{03BC}'], "u", 1);
        let (body, exponent) = split_exponent(&folded)
            .ok_or_else(|| HmsaError::InvalidUnit(unit.to_string()))?;

        // Prefer the unprefixed reading: `T` is tesla, `Pa` is pascal
        if let Some(base) = PREFIXABLE_BASES.iter().find(|b| **b == body) {
            return Ok(Self {
                prefix: "",
                base: base.to_string(),
                exponent,
            });
        }
        if let Some(base) = STANDALONE_UNITS.iter().find(|b| **b == body) {
            if exponent != 1 {
                return Err(HmsaError::InvalidUnit(unit.to_string()));
            }
            return Ok(Self {
                prefix: "",
                base: base.to_string(),
                exponent,
            });
        }

        for (prefix, _) in PREFIXES {
            if let Some(rest) = body.strip_prefix(prefix) {
                if let Some(base) = PREFIXABLE_BASES.iter().find(|b| **b == rest) {
                    return Ok(Self {
                        prefix,
                        base: base.to_string(),
                        exponent,
                    });
                }
            }
        }

        Err(HmsaError::InvalidUnit(unit.to_string()))
    }

    /// SI prefix (empty when absent)
    pub fn prefix(&self) -> &str {
        self.prefix
    }

    /// Base unit symbol
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Integer exponent (1 when absent)
    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    fn prefix_exponent(&self) -> i32 {
        PREFIXES
            .iter()
            .find(|(p, _)| *p == self.prefix)
            .map(|(_, e)| *e)
            .unwrap_or(0)
    }

    /// Canonical base, decimal exponent and non-decimal factor of one unit
    /// of this base (before applying the unit exponent).
    fn canonical(&self) -> (&str, i32, f64) {
        match self.base.as_str() {
            "Å" => ("m", -10, 1.0),
            "degrees" => ("rad", 0, PI / 180.0),
            base => (base, self.prefix_exponent(), 1.0),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.base)?;
        if self.exponent != 1 {
            write!(f, "{}", self.exponent)?;
        }
        Ok(())
    }
}

/// Split a trailing signed integer exponent (`mm2`, `mm-1`).
fn split_exponent(unit: &str) -> Option<(&str, i32)> {
    let digits_start = unit
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i);

    let Some(start) = digits_start else {
        return Some((unit, 1));
    };

    let (mut body, digits) = unit.split_at(start);
    let mut exponent: i32 = digits.parse().ok()?;
    if let Some(stripped) = body.strip_suffix('-') {
        body = stripped;
        exponent = -exponent;
    }
    if body.is_empty() || exponent == 0 {
        return None;
    }
    Some((body, exponent))
}

/// Validate and normalize a unit string.
///
/// The returned string is canonical: `validate_unit(validate_unit(u)) ==
/// validate_unit(u)`.
pub fn validate_unit(unit: &str) -> Result<String> {
    Ok(Unit::parse(unit)?.to_string())
}

/// Convert `value` expressed in `from_unit` into `to_unit`.
///
/// # Errors
///
/// Returns [`HmsaError::InvalidUnit`] if either unit is invalid or the two
/// units have no admitted conversion.
pub fn convert_unit(to_unit: &str, value: f64, from_unit: &str) -> Result<f64> {
    let to = Unit::parse(to_unit)?;
    let from = Unit::parse(from_unit)?;

    let (from_base, from_decimal, from_factor) = from.canonical();
    let (to_base, to_decimal, to_factor) = to.canonical();

    if from_base != to_base || from.exponent != to.exponent {
        return Err(HmsaError::InvalidUnit(format!(
            "cannot convert {} to {}",
            from, to
        )));
    }

    let exponent = from.exponent;
    let decimal = (from_decimal - to_decimal) * exponent;
    let mut result = scale_by_power_of_ten(value, decimal);
    if from_factor != to_factor {
        result *= (from_factor / to_factor).powi(exponent);
    }
    Ok(result)
}

/// Multiply by 10^`power` dividing for negative powers, which keeps
/// conversions exact whenever 10^|power| is representable.
fn scale_by_power_of_ten(value: f64, power: i32) -> f64 {
    match power {
        0 => value,
        p if p > 0 => value * 10f64.powi(p),
        p => value / 10f64.powi(-p),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_prefixed_units() {
        let unit = Unit::parse("kV").unwrap();
        assert_eq!(unit.prefix(), "k");
        assert_eq!(unit.base(), "V");
        assert_eq!(unit.exponent(), 1);

        let unit = Unit::parse("mm-1").unwrap();
        assert_eq!(unit.prefix(), "m");
        assert_eq!(unit.base(), "m");
        assert_eq!(unit.exponent(), -1);

        let unit = Unit::parse("daPa").unwrap();
        assert_eq!(unit.prefix(), "da");
        assert_eq!(unit.base(), "Pa");
    }

    #[test]
    fn test_unprefixed_reading_wins() {
        assert_eq!(Unit::parse("T").unwrap().prefix(), "");
        assert_eq!(Unit::parse("Pa").unwrap().base(), "Pa");
        assert_eq!(Unit::parse("mol").unwrap().base(), "mol");
        assert_eq!(Unit::parse("cd").unwrap().base(), "cd");
    }

    #[test]
    fn test_normalization() {
        assert_eq!(validate_unit("\u{00B5}m").unwrap(), "um");
        assert_eq!(validate_unit("\u{212B}").unwrap(), "Å");
        assert_eq!(validate_unit("m1").unwrap(), "m");
        assert_eq!(validate_unit("deg").unwrap(), "degrees");
        assert_eq!(validate_unit("wt%").unwrap(), "wt%");
    }

    #[test]
    fn test_invalid_units() {
        for unit in ["", "xyz", "kÅ", "kcounts", "m0", "Å2", "-1", "furlong"] {
            assert!(
                matches!(validate_unit(unit), Err(HmsaError::InvalidUnit(_))),
                "{unit}"
            );
        }
    }

    #[test]
    fn test_convert_prefix() {
        assert_eq!(convert_unit("m", 5.0, "km").unwrap(), 5000.0);
        assert_eq!(convert_unit("keV", 1500.0, "eV").unwrap(), 1.5);
        assert_eq!(convert_unit("mm2", 1.0, "m2").unwrap(), 1e6);
    }

    #[test]
    fn test_convert_cross_base() {
        assert_eq!(convert_unit("Å", 1.0, "m").unwrap(), 1e10);
        assert_eq!(convert_unit("nm", 10.0, "Å").unwrap(), 1.0);
        let rad = convert_unit("rad", 180.0, "degrees").unwrap();
        assert!((rad - PI).abs() < 1e-15);
    }

    #[test]
    fn test_convert_incompatible() {
        assert!(convert_unit("s", 1.0, "m").is_err());
        assert!(convert_unit("m2", 1.0, "m").is_err());
    }

    const ADMITTED: &[&str] = &[
        "m", "km", "mm2", "mm-1", "nA", "kV", "keV", "Å", "degrees", "rad", "mrad", "sr",
        "counts", "Hz", "MHz", "um", "degreesC", "wt%", "s-1",
    ];

    proptest! {
        #[test]
        fn prop_validate_is_idempotent(index in 0..ADMITTED.len()) {
            let once = validate_unit(ADMITTED[index]).unwrap();
            let twice = validate_unit(&once).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_metre_angstrom_inverse(exp in -30i32..30, mantissa in 1.0f64..10.0) {
            let value = mantissa * 10f64.powi(exp);
            let there = convert_unit("Å", value, "m").unwrap();
            let back = convert_unit("m", there, "Å").unwrap();
            prop_assert!(((back - value) / value).abs() <= 4.0 * f64::EPSILON);
        }

        #[test]
        fn prop_radian_degree_inverse(exp in -30i32..30, mantissa in 1.0f64..10.0) {
            let value = mantissa * 10f64.powi(exp);
            let there = convert_unit("degrees", value, "rad").unwrap();
            let back = convert_unit("rad", there, "degrees").unwrap();
            prop_assert!(((back - value) / value).abs() <= 4.0 * f64::EPSILON);
        }
    }
}
