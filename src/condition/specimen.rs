use crate::error::Result;
use crate::parameter::ParameterType;
use crate::types::{LangStr, Numerical};

parameter! {
    /// The analysed specimen.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Specimen ["Specimen"] {
        /// Name
        name, set_name: LangStr => "Name", required;
        /// Description
        description, set_description: LangStr => "Description";
        /// Origin or provenance
        origin, set_origin: LangStr => "Origin";
        /// Chemical formula
        formula, set_formula: String => "Formula";
        /// Temperature during acquisition
        temperature, set_temperature: Numerical => "Temperature" ("degreesC");
    }
}

impl Specimen {
    /// Specimen named `name`.
    pub fn new(name: impl Into<LangStr>) -> Result<Self> {
        let mut specimen = Self::empty();
        specimen.set_name(name)?;
        Ok(specimen)
    }
}

parameter! {
    /// One layer of a multilayer specimen.
    #[derive(Debug, Clone, PartialEq)]
    pub struct SpecimenLayer ["Layer"] {
        /// Name
        name, set_name: LangStr => "Name";
        /// Thickness
        thickness, set_thickness: Numerical => "Thickness" ("nm");
        /// Chemical formula
        formula, set_formula: String => "Formula";
    }
}

impl SpecimenLayer {
    /// Create with the required attributes.
    pub fn new() -> Self {
        Self::empty()
    }
}

impl Default for SpecimenLayer {
    fn default() -> Self {
        Self::empty()
    }
}

parameter! {
    /// Specimen made of stacked layers, top layer first.
    #[derive(Debug, Clone, PartialEq)]
    pub struct SpecimenMultilayer ["Specimen", "Multilayer"] {
        /// Name
        name, set_name: LangStr => "Name", required;
        /// Description
        description, set_description: LangStr => "Description";
        /// Origin or provenance
        origin, set_origin: LangStr => "Origin";
        /// Chemical formula of the substrate
        formula, set_formula: String => "Formula";
        /// Temperature during acquisition
        temperature, set_temperature: Numerical => "Temperature" ("degreesC");
    }
    extra {
        layers: Vec<SpecimenLayer>,
    }
}

impl SpecimenMultilayer {
    /// Create with the required attributes.
    pub fn new(name: impl Into<LangStr>) -> Result<Self> {
        let mut specimen = Self::empty();
        specimen.set_name(name)?;
        Ok(specimen)
    }

    /// Layers from the surface downwards.
    pub fn layers(&self) -> &[SpecimenLayer] {
        &self.layers
    }

    /// Append a layer below the existing ones.
    pub fn push_layer(&mut self, layer: SpecimenLayer) {
        self.layers.push(layer);
    }
}
