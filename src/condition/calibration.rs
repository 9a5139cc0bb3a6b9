//! Calibrations mapping a channel index to a physical quantity.

use crate::error::{HmsaError, Result};
use crate::parameter::{Parameter, ParameterType};
use crate::types::{validate_unit, LangStr, Numerical};

parameter! {
    /// Same value for every channel.
    #[derive(Debug, Clone, PartialEq)]
    pub struct CalibrationConstant ["Calibration", "Constant"] {
        /// Calibrated quantity
        quantity, set_quantity: LangStr => "Quantity", required;
        /// Unit of the quantity
        unit, set_unit: String => "Unit", required;
        /// Constant value
        value, set_value: Numerical => "Value", required;
    }
}

impl CalibrationConstant {
    /// Create with the required attributes.
    pub fn new(quantity: &str, unit: &str, value: f64) -> Result<Self> {
        let unit = validate_unit(unit)?;
        let mut calibration = Self::empty();
        calibration.set_quantity(quantity)?;
        calibration.set_value(Numerical::new(value, Some(&unit))?)?;
        calibration.set_unit(unit)?;
        Ok(calibration)
    }
}

parameter! {
    /// `offset + gain * x`
    #[derive(Debug, Clone, PartialEq)]
    pub struct CalibrationLinear ["Calibration", "Linear"] {
        /// Calibrated quantity
        quantity, set_quantity: LangStr => "Quantity", required;
        /// Unit of the quantity
        unit, set_unit: String => "Unit", required;
        /// Slope
        gain, set_gain: Numerical => "Gain", required;
        /// Value of channel 0
        offset, set_offset: Numerical => "Offset", required;
    }
}

impl CalibrationLinear {
    /// Linear calibration `gain * x + offset`.
    pub fn new(quantity: &str, unit: &str, gain: f64, offset: f64) -> Result<Self> {
        let unit = validate_unit(unit)?;
        let mut calibration = Self::empty();
        calibration.set_quantity(quantity)?;
        calibration.set_gain(Numerical::new(gain, Some(&unit))?)?;
        calibration.set_offset(Numerical::new(offset, Some(&unit))?)?;
        calibration.set_unit(unit)?;
        Ok(calibration)
    }
}

parameter! {
    /// `sum(c[i] * x^i)`
    #[derive(Debug, Clone, PartialEq)]
    pub struct CalibrationPolynomial ["Calibration", "Polynomial"] {
        /// Calibrated quantity
        quantity, set_quantity: LangStr => "Quantity", required;
        /// Unit of the quantity
        unit, set_unit: String => "Unit", required;
        /// Coefficients, constant term first
        coefficients, set_coefficients: Numerical => "Coefficients", required;
    }
}

impl CalibrationPolynomial {
    /// Polynomial calibration, lowest order coefficient first.
    pub fn new(quantity: &str, unit: &str, coefficients: Vec<f64>) -> Result<Self> {
        if coefficients.is_empty() {
            return Err(HmsaError::validation("Polynomial calibration needs a coefficient"));
        }
        let mut calibration = Self::empty();
        calibration.set_quantity(quantity)?;
        calibration.set_unit(validate_unit(unit)?)?;
        calibration.set_coefficients(Numerical::array(coefficients, None)?)?;
        Ok(calibration)
    }
}

parameter! {
    /// One value per channel.
    #[derive(Debug, Clone, PartialEq)]
    pub struct CalibrationExplicit ["Calibration", "Explicit"] {
        /// Calibrated quantity
        quantity, set_quantity: LangStr => "Quantity", required;
        /// Unit of the quantity
        unit, set_unit: String => "Unit", required;
        /// Value of each channel
        values, set_values: Numerical => "Values", required;
    }
}

impl CalibrationExplicit {
    /// Tabulated calibration, one value per channel.
    pub fn new(quantity: &str, unit: &str, values: Vec<f64>) -> Result<Self> {
        let mut calibration = Self::empty();
        calibration.set_quantity(quantity)?;
        calibration.set_unit(validate_unit(unit)?)?;
        calibration.set_values(Numerical::array(values, None)?)?;
        Ok(calibration)
    }
}

/// Any calibration.
#[derive(Debug, Clone, PartialEq)]
pub enum Calibration {
    /// Constant value
    Constant(CalibrationConstant),
    /// Linear function
    Linear(CalibrationLinear),
    /// Polynomial
    Polynomial(CalibrationPolynomial),
    /// Lookup table
    Explicit(CalibrationExplicit),
}

fn number(value: Option<&Numerical>) -> f64 {
    value.map(Numerical::as_f64).unwrap_or(f64::NAN)
}

impl Calibration {
    /// Calibrated value at channel `x`.
    ///
    /// # Errors
    ///
    /// [`HmsaError::ValidationError`] when an explicit calibration is
    /// evaluated outside `[0, N)` or at a fractional channel.
    pub fn call(&self, x: f64) -> Result<f64> {
        match self {
            Calibration::Constant(c) => Ok(number(c.value())),
            Calibration::Linear(c) => Ok(number(c.offset()) + number(c.gain()) * x),
            Calibration::Polynomial(c) => {
                let coefficients = c.coefficients().map(Numerical::to_f64_vec).unwrap_or_default();
                // Horner evaluation, highest degree first
                Ok(coefficients.iter().rev().fold(0.0, |acc, ci| acc * x + ci))
            }
            Calibration::Explicit(c) => {
                let values = c.values().map(Numerical::to_f64_vec).unwrap_or_default();
                if x < 0.0 || x.fract() != 0.0 || x as usize >= values.len() {
                    return Err(HmsaError::validation(format!(
                        "Channel {} outside explicit calibration of {} values",
                        x,
                        values.len()
                    )));
                }
                Ok(values[x as usize])
            }
        }
    }

    /// Calibrated quantity.
    pub fn quantity(&self) -> Option<&LangStr> {
        match self {
            Calibration::Constant(c) => c.quantity(),
            Calibration::Linear(c) => c.quantity(),
            Calibration::Polynomial(c) => c.quantity(),
            Calibration::Explicit(c) => c.quantity(),
        }
    }

    /// Unit of the quantity.
    pub fn unit(&self) -> Option<&str> {
        let unit = match self {
            Calibration::Constant(c) => c.unit(),
            Calibration::Linear(c) => c.unit(),
            Calibration::Polynomial(c) => c.unit(),
            Calibration::Explicit(c) => c.unit(),
        };
        unit.map(String::as_str)
    }

    /// Attribute view of the inner calibration.
    pub fn as_parameter(&self) -> &dyn Parameter {
        match self {
            Calibration::Constant(c) => c,
            Calibration::Linear(c) => c,
            Calibration::Polynomial(c) => c,
            Calibration::Explicit(c) => c,
        }
    }

    /// Mutable attribute view of the inner calibration.
    pub fn as_parameter_mut(&mut self) -> &mut dyn Parameter {
        match self {
            Calibration::Constant(c) => c,
            Calibration::Linear(c) => c,
            Calibration::Polynomial(c) => c,
            Calibration::Explicit(c) => c,
        }
    }
}

impl From<CalibrationConstant> for Calibration {
    fn from(c: CalibrationConstant) -> Self {
        Calibration::Constant(c)
    }
}

impl From<CalibrationLinear> for Calibration {
    fn from(c: CalibrationLinear) -> Self {
        Calibration::Linear(c)
    }
}

impl From<CalibrationPolynomial> for Calibration {
    fn from(c: CalibrationPolynomial) -> Self {
        Calibration::Polynomial(c)
    }
}

impl From<CalibrationExplicit> for Calibration {
    fn from(c: CalibrationExplicit) -> Self {
        Calibration::Explicit(c)
    }
}

/// A concrete calibration type, recoverable from a [`Calibration`].
pub trait CalibrationType: ParameterType + Into<Calibration> + Clone {
    /// Borrow the inner value if `calibration` holds this type.
    fn from_calibration(calibration: &Calibration) -> Option<&Self>;
}

macro_rules! calibration_type {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl CalibrationType for $ty {
                fn from_calibration(calibration: &Calibration) -> Option<&Self> {
                    match calibration {
                        Calibration::$variant(c) => Some(c),
                        _ => None,
                    }
                }
            }
        )+
    };
}

calibration_type!(
    CalibrationConstant => Constant,
    CalibrationLinear => Linear,
    CalibrationPolynomial => Polynomial,
    CalibrationExplicit => Explicit,
);
