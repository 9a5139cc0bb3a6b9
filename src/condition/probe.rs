//! Electron probe conditions.

use crate::error::Result;
use crate::parameter::ParameterType;
use crate::types::Numerical;

text_enum! {
    /// Electron gun type.
    pub enum GunType {
        /// Tungsten filament
        Tungsten => "W filament",
        /// Lanthanum hexaboride
        LaB6 => "LaB6",
        /// Cold field emission
        ColdFieldEmission => "Cold field emission",
        /// Schottky field emission
        SchottkyFieldEmission => "Schottky field emission",
    }
}

text_enum! {
    /// TEM lens mode.
    pub enum LensMode {
        /// Imaging
        Image => "IMAGE",
        /// Diffraction
        Diffraction => "DIFFR",
        /// Scanning imaging
        Scanning => "SCIMG",
    }
}

/// Declare an electron probe type with the attributes shared by SEM and
/// TEM probes.
macro_rules! electron_probe {
    (
        $(#[$meta:meta])*
        pub struct $name:ident [$class:literal] { $($body:tt)* }
    ) => {
        parameter! {
            $(#[$meta])*
            pub struct $name ["Probe", $class] {
                /// Accelerating voltage
                beam_voltage, set_beam_voltage: Numerical => "BeamVoltage" ("kV"), required;
                /// Probe current
                beam_current, set_beam_current: Numerical => "BeamCurrent" ("nA");
                /// Gun type
                gun_type, set_gun_type: GunType => "GunType";
                /// Emission current
                emission_current, set_emission_current: Numerical => "EmissionCurrent" ("uA");
                /// Filament current
                filament_current, set_filament_current: Numerical => "FilamentCurrent" ("A");
                /// Extractor bias
                extractor_bias, set_extractor_bias: Numerical => "ExtractorBias" ("V");
                /// Beam diameter
                beam_diameter, set_beam_diameter: Numerical => "BeamDiameter" ("nm");
                /// Chamber pressure
                chamber_pressure, set_chamber_pressure: Numerical => "ChamberPressure" ("Pa");
                /// Gun pressure
                gun_pressure, set_gun_pressure: Numerical => "GunPressure" ("Pa");
                /// Scan magnification
                scan_magnification, set_scan_magnification: Numerical => "ScanMagnification";
                /// Working distance
                working_distance, set_working_distance: Numerical => "WorkingDistance" ("mm");
                $($body)*
            }
        }

        impl $name {
            /// Probe with the given beam voltage (kV unless a unit is given).
            pub fn new(beam_voltage: impl Into<Numerical>) -> Result<Self> {
                let mut probe = Self::empty();
                probe.set_beam_voltage(beam_voltage)?;
                Ok(probe)
            }
        }
    };
}

electron_probe! {
    /// Electron probe of a scanning electron microscope or microprobe.
    #[derive(Debug, Clone, PartialEq)]
    pub struct ProbeEm ["EM"] {}
}

electron_probe! {
    /// Electron probe of a transmission electron microscope.
    #[derive(Debug, Clone, PartialEq)]
    pub struct ProbeTem ["TEM"] {
        /// Lens mode
        lens_mode, set_lens_mode: LensMode => "LensMode";
        /// Camera magnification
        camera_magnification, set_camera_magnification: Numerical => "CameraMagnification";
        /// Convergence angle
        convergence_angle, set_convergence_angle: Numerical => "ConvergenceAngle" ("mrad");
    }
}
