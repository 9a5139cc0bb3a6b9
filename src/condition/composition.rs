use std::collections::BTreeMap;

use crate::error::Result;
use crate::parameter::ParameterType;
use crate::types::AtomicNumber;

text_enum! {
    /// Unit shared by every entry of an elemental composition.
    pub enum CompositionUnit {
        /// Mass fraction in percent
        MassPercent => "wt%",
        /// Number of atoms
        Atoms => "atoms",
        /// Mole fraction in percent
        MolePercent => "mol%",
    }
}

parameter! {
    /// Elemental composition of the specimen.
    #[derive(Debug, Clone, PartialEq)]
    pub struct CompositionElemental ["Composition", "Elemental"] {
        /// Unit of all values
        unit, set_unit: CompositionUnit => "Unit", required;
    }
    extra {
        values: BTreeMap<AtomicNumber, f64>,
    }
}

impl CompositionElemental {
    /// Empty composition expressed in `unit`.
    pub fn new(unit: CompositionUnit) -> Self {
        let mut composition = Self::empty();
        composition.unit = Some(unit);
        composition
    }

    /// Set the amount of element `z`.
    pub fn insert(&mut self, z: u8, value: f64) -> Result<Option<f64>> {
        let z = AtomicNumber::new(z)?;
        Ok(self.values.insert(z, value))
    }

    /// Amount of element `z`.
    pub fn get(&self, z: u8) -> Option<f64> {
        self.values.get(&AtomicNumber::from(z)).copied()
    }

    /// Remove element `z`, returning its amount.
    pub fn remove(&mut self, z: u8) -> Option<f64> {
        self.values.remove(&AtomicNumber::from(z))
    }

    /// Entries by increasing atomic number.
    pub fn iter(&self) -> impl Iterator<Item = (AtomicNumber, f64)> + '_ {
        self.values.iter().map(|(z, v)| (*z, *v))
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
