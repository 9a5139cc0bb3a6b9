use crate::error::Result;
use crate::parameter::ParameterType;
use crate::types::LangStr;

parameter! {
    /// The instrument used to acquire the data.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Instrument ["Instrument"] {
        /// Manufacturer
        manufacturer, set_manufacturer: LangStr => "Manufacturer", required;
        /// Model
        model, set_model: LangStr => "Model", required;
        /// Serial number
        serial_number, set_serial_number: String => "SerialNumber";
    }
}

impl Instrument {
    /// Create with the required attributes.
    pub fn new(manufacturer: impl Into<LangStr>, model: impl Into<LangStr>) -> Result<Self> {
        let mut instrument = Self::empty();
        instrument.set_manufacturer(manufacturer)?;
        instrument.set_model(model)?;
        Ok(instrument)
    }
}
