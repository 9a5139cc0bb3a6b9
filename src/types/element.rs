//! Atomic numbers and numerical ranges.

use std::fmt;

use super::numerical::Scalar;
use super::unit::validate_unit;
use crate::error::{HmsaError, Result};

/// Highest admitted atomic number (oganesson).
pub const MAX_ATOMIC_NUMBER: u8 = 118;

/// An atomic number in `1..=118`.
///
/// Values built with `From<u8>` are checked by [`AtomicNumber::validate`]
/// when assigned to an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AtomicNumber(u8);

impl AtomicNumber {
    /// Create a validated atomic number.
    pub fn new(z: u8) -> Result<Self> {
        let number = Self(z);
        number.validate()?;
        Ok(number)
    }

    /// Atomic number.
    pub fn get(&self) -> u8 {
        self.0
    }

    /// Check the range.
    pub fn validate(&self) -> Result<()> {
        if self.0 == 0 || self.0 > MAX_ATOMIC_NUMBER {
            return Err(HmsaError::validation(format!(
                "Atomic number {} out of range 1..={}",
                self.0, MAX_ATOMIC_NUMBER
            )));
        }
        Ok(())
    }
}

impl From<u8> for AtomicNumber {
    fn from(z: u8) -> Self {
        Self(z)
    }
}

impl fmt::Display for AtomicNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A closed numerical interval `[start, end]` with an optional unit.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericalRange {
    start: Scalar,
    end: Scalar,
    unit: Option<String>,
}

impl NumericalRange {
    /// Create a range; `start` must not exceed `end`.
    pub fn new(start: impl Into<Scalar>, end: impl Into<Scalar>, unit: Option<&str>) -> Result<Self> {
        let (start, end) = (start.into(), end.into());
        if start.dtype() != end.dtype() {
            return Err(HmsaError::validation(format!(
                "Range bounds have different types: {} and {}",
                start.dtype(),
                end.dtype()
            )));
        }
        if start.to_f64() > end.to_f64() {
            return Err(HmsaError::validation(format!(
                "Range start {} exceeds end {}",
                start, end
            )));
        }
        let unit = unit.map(validate_unit).transpose()?;
        Ok(Self { start, end, unit })
    }

    /// Lower bound.
    pub fn start(&self) -> Scalar {
        self.start
    }

    /// Upper bound.
    pub fn end(&self) -> Scalar {
        self.end
    }

    /// Unit of both bounds.
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Apply `default` when no unit is set.
    pub fn with_default_unit(mut self, default: Option<&str>) -> Result<Self> {
        if self.unit.is_none() {
            self.unit = default.map(validate_unit).transpose()?;
        }
        Ok(self)
    }

    /// Whether `value` lies within the range.
    pub fn contains(&self, value: f64) -> bool {
        self.start.to_f64() <= value && value <= self.end.to_f64()
    }
}

impl fmt::Display for NumericalRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)?;
        if let Some(unit) = &self.unit {
            write!(f, " {}", unit)?;
        }
        Ok(())
    }
}
