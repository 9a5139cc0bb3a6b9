use crate::error::Result;
use crate::parameter::ParameterType;
use crate::types::NumericalRange;

parameter! {
    /// Range of channels of interest in a spectrum.
    #[derive(Debug, Clone, PartialEq)]
    pub struct RegionOfInterest ["RegionOfInterest"] {
        /// Inclusive channel range
        channels, set_channels: NumericalRange => "Channel", required;
    }
}

impl RegionOfInterest {
    /// Channel range from `start_channel` to `end_channel` inclusive.
    pub fn new(start_channel: u32, end_channel: u32) -> Result<Self> {
        let mut region = Self::empty();
        region.set_channels(NumericalRange::new(start_channel, end_channel, None)?)?;
        Ok(region)
    }
}
