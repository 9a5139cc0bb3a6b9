use crate::error::Result;
use crate::parameter::ParameterType;
use crate::types::Numerical;

parameter! {
    /// Physical location on (or in) the specimen.
    #[derive(Debug, Clone, PartialEq)]
    pub struct SpecimenPosition ["SpecimenPosition"] {
        /// X coordinate
        x, set_x: Numerical => "X" ("mm");
        /// Y coordinate
        y, set_y: Numerical => "Y" ("mm");
        /// Z coordinate
        z, set_z: Numerical => "Z" ("mm");
        /// Rotation
        r, set_r: Numerical => "R" ("degrees");
        /// Tilt
        t, set_t: Numerical => "T" ("degrees");
    }
}

impl SpecimenPosition {
    /// Position with no coordinate set.
    pub fn new() -> Self {
        Self::empty()
    }

    /// Position from X, Y and Z in millimetres.
    pub fn from_xyz(x: f64, y: f64, z: f64) -> Result<Self> {
        let mut position = Self::empty();
        position.set_x(x)?;
        position.set_y(y)?;
        position.set_z(z)?;
        Ok(position)
    }
}

impl Default for SpecimenPosition {
    fn default() -> Self {
        Self::empty()
    }
}
