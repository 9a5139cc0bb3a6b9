use crate::error::Result;
use crate::parameter::ParameterType;
use crate::types::{AtomicNumber, Numerical, XRayLine};

parameter! {
    /// Identifies the element a datum refers to.
    #[derive(Debug, Clone, PartialEq)]
    pub struct ElementalID ["ElementalID"] {
        /// Atomic number
        atomic_number, set_atomic_number: AtomicNumber => "Element", required;
    }
}

impl ElementalID {
    /// Element with atomic number `z`.
    pub fn new(z: u8) -> Result<Self> {
        let mut id = Self::empty();
        id.set_atomic_number(AtomicNumber::new(z)?)?;
        Ok(id)
    }
}

parameter! {
    /// Identifies an element and one of its X-ray lines.
    #[derive(Debug, Clone, PartialEq)]
    pub struct ElementalIDXray ["ElementalID", "X-ray"] {
        /// Atomic number
        atomic_number, set_atomic_number: AtomicNumber => "Element", required;
        /// X-ray line
        line, set_line: XRayLine => "Line", required;
        /// Line energy
        energy, set_energy: Numerical => "Energy" ("eV");
    }
}

impl ElementalIDXray {
    /// Create with the required attributes.
    pub fn new(z: u8, line: XRayLine) -> Result<Self> {
        let mut id = Self::empty();
        id.set_atomic_number(AtomicNumber::new(z)?)?;
        id.set_line(line)?;
        Ok(id)
    }
}
