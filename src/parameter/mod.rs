//! Attribute framework shared by the header, conditions and calibrations.
//!
//! Each entity declares its attributes once through the [`parameter!`]
//! macro. The declaration produces typed getters and setters, an
//! [`AttributeSpec`] table and an implementation of [`Parameter`], which
//! lets validation and the XML handlers walk attributes generically.
//!
//! ```
//! use hmsa::prelude::*;
//!
//! let mut probe = ProbeEm::new(15.0).unwrap();
//! probe.set_beam_current(2.5).unwrap();
//!
//! // Bare numbers take the attribute's default unit
//! assert_eq!(probe.beam_current().unwrap().unit(), Some("nA"));
//! assert_eq!(probe.attribute_specs()[0].xml_name, "BeamVoltage");
//! ```

#[macro_use]
mod macros;


use chrono::{NaiveDate, NaiveTime};

use crate::error::{HmsaError, Result};
use crate::types::{AtomicNumber, Checksum, LangStr, Numerical, NumericalRange, XRayLine};

/// Kind of an attribute, driving validation and serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    /// Number or 1-D array with an optional unit
    Numerical,
    /// Text with optional language alternatives
    Text,
    /// One of a closed set of strings
    Enum,
    /// Atomic number in `1..=118`
    AtomicNumber,
    /// X-ray line with notation
    XRayLine,
    /// Calendar date
    Date,
    /// Time of day
    Time,
    /// Checksum value and algorithm
    Checksum,
    /// Closed numerical interval
    Range,
    /// Boolean flag
    Bool,
}

/// Declaration of one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSpec {
    /// Rust-side attribute name
    pub name: &'static str,
    /// Element name used in the XML document
    pub xml_name: &'static str,
    /// Value kind
    pub kind: AttributeKind,
    /// Whether the attribute must be set
    pub required: bool,
    /// Unit applied to numerical values given without one
    pub default_unit: Option<&'static str>,
}

/// Type-erased attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Numerical value
    Numerical(Numerical),
    /// Text value
    Text(LangStr),
    /// Enumerated value, as its document string
    Enum(String),
    /// Atomic number
    AtomicNumber(AtomicNumber),
    /// X-ray line
    XRayLine(XRayLine),
    /// Date
    Date(NaiveDate),
    /// Time
    Time(NaiveTime),
    /// Checksum
    Checksum(Checksum),
    /// Numerical range
    Range(NumericalRange),
    /// Boolean
    Bool(bool),
}

impl AttributeValue {
    /// Kind of the held value.
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::Numerical(_) => AttributeKind::Numerical,
            AttributeValue::Text(_) => AttributeKind::Text,
            AttributeValue::Enum(_) => AttributeKind::Enum,
            AttributeValue::AtomicNumber(_) => AttributeKind::AtomicNumber,
            AttributeValue::XRayLine(_) => AttributeKind::XRayLine,
            AttributeValue::Date(_) => AttributeKind::Date,
            AttributeValue::Time(_) => AttributeKind::Time,
            AttributeValue::Checksum(_) => AttributeKind::Checksum,
            AttributeValue::Range(_) => AttributeKind::Range,
            AttributeValue::Bool(_) => AttributeKind::Bool,
        }
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeValue::Numerical(v) => write!(f, "{}", v),
            AttributeValue::Text(v) => write!(f, "{}", v),
            AttributeValue::Enum(v) => write!(f, "{}", v),
            AttributeValue::AtomicNumber(v) => write!(f, "{}", v),
            AttributeValue::XRayLine(v) => write!(f, "{}", v),
            AttributeValue::Date(v) => write!(f, "{}", v),
            AttributeValue::Time(v) => write!(f, "{}", v),
            AttributeValue::Checksum(v) => write!(f, "{}", v),
            AttributeValue::Range(v) => write!(f, "{}", v),
            AttributeValue::Bool(v) => write!(f, "{}", v),
        }
    }
}

fn mismatch(expected: AttributeKind, value: &AttributeValue) -> HmsaError {
    HmsaError::TypeMismatch(format!(
        "expected {:?} attribute value, got {:?}",
        expected,
        value.kind()
    ))
}

/// A Rust type usable as an attribute.
pub trait AttributeType: Sized + Clone {
    /// Attribute kind
    const KIND: AttributeKind;

    /// Erase the type.
    fn into_value(self) -> AttributeValue;

    /// Recover the type, failing with [`HmsaError::TypeMismatch`].
    fn from_value(value: AttributeValue) -> Result<Self>;

    /// Validate and normalize a value before it is stored.
    fn normalize(self, _default_unit: Option<&str>) -> Result<Self> {
        Ok(self)
    }
}

/// Implement [`AttributeType`] for a type wrapped by one `AttributeValue` variant.
macro_rules! attribute_type {
    ($ty:ty => $variant:ident) => {
        impl AttributeType for $ty {
            const KIND: AttributeKind = AttributeKind::$variant;

            fn into_value(self) -> AttributeValue {
                AttributeValue::$variant(self)
            }

            fn from_value(value: AttributeValue) -> Result<Self> {
                match value {
                    AttributeValue::$variant(v) => Ok(v),
                    other => Err(mismatch(Self::KIND, &other)),
                }
            }
        }
    };
}

attribute_type!(LangStr => Text);
attribute_type!(XRayLine => XRayLine);
attribute_type!(NaiveDate => Date);
attribute_type!(NaiveTime => Time);
attribute_type!(Checksum => Checksum);
attribute_type!(bool => Bool);

impl AttributeType for Numerical {
    const KIND: AttributeKind = AttributeKind::Numerical;

    fn into_value(self) -> AttributeValue {
        AttributeValue::Numerical(self)
    }

    fn from_value(value: AttributeValue) -> Result<Self> {
        match value {
            AttributeValue::Numerical(v) => Ok(v),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }

    fn normalize(self, default_unit: Option<&str>) -> Result<Self> {
        self.with_default_unit(default_unit)
    }
}

impl AttributeType for NumericalRange {
    const KIND: AttributeKind = AttributeKind::Range;

    fn into_value(self) -> AttributeValue {
        AttributeValue::Range(self)
    }

    fn from_value(value: AttributeValue) -> Result<Self> {
        match value {
            AttributeValue::Range(v) => Ok(v),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }

    fn normalize(self, default_unit: Option<&str>) -> Result<Self> {
        self.with_default_unit(default_unit)
    }
}

impl AttributeType for AtomicNumber {
    const KIND: AttributeKind = AttributeKind::AtomicNumber;

    fn into_value(self) -> AttributeValue {
        AttributeValue::AtomicNumber(self)
    }

    fn from_value(value: AttributeValue) -> Result<Self> {
        match value {
            AttributeValue::AtomicNumber(v) => Ok(v),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }

    fn normalize(self, _default_unit: Option<&str>) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }
}

impl AttributeType for String {
    const KIND: AttributeKind = AttributeKind::Text;

    fn into_value(self) -> AttributeValue {
        AttributeValue::Text(LangStr::new(self))
    }

    fn from_value(value: AttributeValue) -> Result<Self> {
        match value {
            AttributeValue::Text(v) => Ok(v.as_str().to_string()),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }
}

/// An entity described by a declared list of attributes.
pub trait Parameter {
    /// XML element tag.
    fn tag(&self) -> &'static str;

    /// XML `Class` discriminator, if any.
    fn class(&self) -> Option<&'static str>;

    /// Declared attributes, in document order.
    fn attribute_specs(&self) -> &'static [AttributeSpec];

    /// Current value of an attribute, `None` when unset or unknown.
    fn attribute(&self, name: &str) -> Option<AttributeValue>;

    /// Set or clear an attribute.
    ///
    /// # Errors
    ///
    /// [`HmsaError::ValidationError`] when clearing a required attribute or
    /// when the value fails validation, [`HmsaError::TypeMismatch`] when
    /// the value has the wrong kind.
    fn set_attribute(&mut self, name: &str, value: Option<AttributeValue>) -> Result<()>;

    /// Check that every required attribute is set.
    fn validate(&self) -> Result<()> {
        for spec in self.attribute_specs() {
            if spec.required && self.attribute(spec.name).is_none() {
                return Err(HmsaError::validation(format!(
                    "{}: required attribute {} is not set",
                    self.tag(),
                    spec.name
                )));
            }
        }
        Ok(())
    }

    /// Set attributes with their specs, in declaration order.
    fn attributes(&self) -> Vec<(&'static AttributeSpec, AttributeValue)> {
        self.attribute_specs()
            .iter()
            .filter_map(|spec| self.attribute(spec.name).map(|value| (spec, value)))
            .collect()
    }
}

/// Static side of a [`Parameter`] type.
pub trait ParameterType: Parameter + Sized {
    /// XML element tag
    const TAG: &'static str;
    /// XML `Class` discriminator
    const CLASS: Option<&'static str>;

    /// Instance with every attribute unset, to be filled by a decoder.
    fn empty() -> Self;
}
