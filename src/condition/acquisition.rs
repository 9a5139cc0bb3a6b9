//! Acquisition conditions: how the probe visited the specimen.

use super::SpecimenPosition;
use crate::error::{HmsaError, Result};
use crate::parameter::ParameterType;
use crate::types::Numerical;

text_enum! {
    /// Whether the raster moves the stage or deflects the beam.
    pub enum RasterMode {
        /// Stage movement
        Stage => "Stage",
        /// Beam deflection
        Beam => "Beam",
    }
}

text_enum! {
    /// How the third raster axis is obtained.
    pub enum RasterModeZ {
        /// Focused ion beam sectioning
        Fib => "FIB",
    }
}

/// Declare an acquisition type with the timing attributes every
/// acquisition carries.
macro_rules! acquisition {
    (
        $(#[$meta:meta])*
        pub struct $name:ident [$class:literal] { $($body:tt)* }
        $($tail:tt)*
    ) => {
        parameter! {
            $(#[$meta])*
            pub struct $name ["Acquisition", $class] {
                /// Time spent at each position
                dwell_time, set_dwell_time: Numerical => "DwellTime" ("s");
                /// Total acquisition time
                total_time, set_total_time: Numerical => "TotalTime" ("s");
                /// Live dwell time
                dwell_time_live, set_dwell_time_live: Numerical => "DwellTimeLive" ("s");
                $($body)*
            }
            $($tail)*
        }
    };
}

acquisition! {
    /// Acquisition at a single position.
    #[derive(Debug, Clone, PartialEq)]
    pub struct AcquisitionPoint ["Point"] {}
    extra {
        position: SpecimenPosition,
    }
}

impl AcquisitionPoint {
    /// Create with the required attributes.
    pub fn new(position: SpecimenPosition) -> Self {
        let mut acquisition = Self::empty();
        acquisition.position = position;
        acquisition
    }

    /// Position of the acquisition.
    pub fn position(&self) -> &SpecimenPosition {
        &self.position
    }

    /// Set position.
    pub fn set_position(&mut self, position: SpecimenPosition) {
        self.position = position;
    }
}

acquisition! {
    /// Acquisition at an ordered list of positions.
    #[derive(Debug, Clone, PartialEq)]
    pub struct AcquisitionMultipoint ["Multipoint"] {}
    extra {
        positions: Vec<SpecimenPosition>,
    }
}

impl AcquisitionMultipoint {
    /// Multipoint acquisition over `positions`. At least one is required.
    pub fn new(positions: Vec<SpecimenPosition>) -> Result<Self> {
        if positions.is_empty() {
            return Err(HmsaError::validation("Multipoint acquisition needs a position"));
        }
        let mut acquisition = Self::empty();
        acquisition.positions = positions;
        Ok(acquisition)
    }

    /// Positions in acquisition order.
    pub fn positions(&self) -> &[SpecimenPosition] {
        &self.positions
    }

    /// Number of positions.
    pub fn point_count(&self) -> usize {
        self.positions.len()
    }

    /// Append a position.
    pub fn push_position(&mut self, position: SpecimenPosition) {
        self.positions.push(position);
    }
}

acquisition! {
    /// Acquisition along a line between two positions.
    #[derive(Debug, Clone, PartialEq)]
    pub struct AcquisitionRasterLinescan ["Raster/Linescan"] {
        /// Number of steps
        step_count, set_step_count: Numerical => "StepCount", required;
        /// Distance between steps
        step_size, set_step_size: Numerical => "StepSize" ("um"), required;
        /// Number of frames averaged
        frame_count, set_frame_count: Numerical => "FrameCount";
        /// Stage or beam raster
        raster_mode, set_raster_mode: RasterMode => "RasterMode";
    }
    extra {
        position_start: SpecimenPosition,
        position_end: SpecimenPosition,
    }
}

impl AcquisitionRasterLinescan {
    /// Line scan of `step_count` steps.
    pub fn new(
        step_count: u32,
        step_size: f64,
        position_start: SpecimenPosition,
        position_end: SpecimenPosition,
    ) -> Result<Self> {
        let mut acquisition = Self::empty();
        acquisition.set_step_count(step_count)?;
        acquisition.set_step_size(step_size)?;
        acquisition.position_start = position_start;
        acquisition.position_end = position_end;
        Ok(acquisition)
    }

    /// First position of the line.
    pub fn position_start(&self) -> &SpecimenPosition {
        &self.position_start
    }

    /// Last position of the line.
    pub fn position_end(&self) -> &SpecimenPosition {
        &self.position_end
    }

    /// Set position start.
    pub fn set_position_start(&mut self, position: SpecimenPosition) {
        self.position_start = position;
    }

    /// Set position end.
    pub fn set_position_end(&mut self, position: SpecimenPosition) {
        self.position_end = position;
    }
}

acquisition! {
    /// Two-dimensional raster.
    #[derive(Debug, Clone, PartialEq)]
    pub struct AcquisitionRasterXY ["Raster/XY"] {
        /// Steps along X
        step_count_x, set_step_count_x: Numerical => "XStepCount", required;
        /// Steps along Y
        step_count_y, set_step_count_y: Numerical => "YStepCount", required;
        /// Step size along X
        step_size_x, set_step_size_x: Numerical => "XStepSize" ("um");
        /// Step size along Y
        step_size_y, set_step_size_y: Numerical => "YStepSize" ("um");
        /// Number of frames averaged
        frame_count, set_frame_count: Numerical => "FrameCount";
        /// Stage or beam raster
        raster_mode, set_raster_mode: RasterMode => "RasterMode";
    }
    extra {
        position: Option<SpecimenPosition>,
    }
}

impl AcquisitionRasterXY {
    /// Raster of `step_count_x` by `step_count_y` steps.
    pub fn new(step_count_x: u32, step_count_y: u32) -> Result<Self> {
        let mut acquisition = Self::empty();
        acquisition.set_step_count_x(step_count_x)?;
        acquisition.set_step_count_y(step_count_y)?;
        Ok(acquisition)
    }

    /// Centre of the raster, if recorded.
    pub fn position(&self) -> Option<&SpecimenPosition> {
        self.position.as_ref()
    }

    /// Set or clear the raster position.
    pub fn set_position(&mut self, position: Option<SpecimenPosition>) {
        self.position = position;
    }
}

acquisition! {
    /// Three-dimensional raster.
    #[derive(Debug, Clone, PartialEq)]
    pub struct AcquisitionRasterXYZ ["Raster/XYZ"] {
        /// Steps along X
        step_count_x, set_step_count_x: Numerical => "XStepCount", required;
        /// Steps along Y
        step_count_y, set_step_count_y: Numerical => "YStepCount", required;
        /// Steps along Z
        step_count_z, set_step_count_z: Numerical => "ZStepCount", required;
        /// Step size along X
        step_size_x, set_step_size_x: Numerical => "XStepSize" ("um");
        /// Step size along Y
        step_size_y, set_step_size_y: Numerical => "YStepSize" ("um");
        /// Step size along Z
        step_size_z, set_step_size_z: Numerical => "ZStepSize" ("um");
        /// Stage or beam raster in the XY plane
        raster_mode, set_raster_mode: RasterMode => "RasterMode";
        /// Sectioning method along Z
        raster_mode_z, set_raster_mode_z: RasterModeZ => "ZRasterMode";
    }
    extra {
        position: Option<SpecimenPosition>,
    }
}

impl AcquisitionRasterXYZ {
    /// Create with the required attributes.
    pub fn new(step_count_x: u32, step_count_y: u32, step_count_z: u32) -> Result<Self> {
        let mut acquisition = Self::empty();
        acquisition.set_step_count_x(step_count_x)?;
        acquisition.set_step_count_y(step_count_y)?;
        acquisition.set_step_count_z(step_count_z)?;
        Ok(acquisition)
    }

    /// Centre of the raster, if recorded.
    pub fn position(&self) -> Option<&SpecimenPosition> {
        self.position.as_ref()
    }

    /// Set position.
    pub fn set_position(&mut self, position: Option<SpecimenPosition>) {
        self.position = position;
    }
}
