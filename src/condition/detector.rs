//! Detector conditions: cameras and the spectrometer family.

use super::Calibration;
use crate::error::Result;
use crate::parameter::ParameterType;
use crate::types::{LangStr, Numerical};

text_enum! {
    /// Type of signal recorded by a detector.
    pub enum SignalType {
        /// Energy dispersive X-ray spectroscopy
        Eds => "EDS",
        /// Wavelength dispersive X-ray spectroscopy
        Wds => "WDS",
        /// Electron energy loss spectroscopy
        Els => "ELS",
        /// Auger electron spectroscopy
        Aes => "AES",
        /// Photo electron spectroscopy
        Pes => "PES",
        /// X-ray fluorescence
        Xrf => "XRF",
        /// Cathodoluminescence
        Cls => "CLS",
        /// Gamma spectroscopy
        Gam => "GAM",
        /// Electron backscatter diffraction
        Ebsd => "EBSD",
        /// Backscattered electron imaging
        Bei => "BEI",
        /// Secondary electron imaging
        Sei => "SEI",
    }
}

text_enum! {
    /// How spectrometer channels are acquired.
    pub enum CollectionMode {
        /// All channels at once
        Parallel => "Parallel",
        /// One channel at a time
        Serial => "Serial",
    }
}

text_enum! {
    /// XEDS detector technology.
    pub enum XedsTechnology {
        /// Germanium
        Ge => "Ge",
        /// Lithium-drifted silicon
        SiLi => "SiLi",
        /// Silicon drift detector
        Sdd => "SDD",
        /// Microcalorimeter
        Ucc => "UCC",
    }
}

/// One layer of a detector window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowLayer {
    material: String,
    thickness: Numerical,
}

impl WindowLayer {
    /// Layer of `material` with a thickness in micrometres unless a unit is
    /// given.
    pub fn new(material: impl Into<String>, thickness: impl Into<Numerical>) -> Result<Self> {
        Ok(Self {
            material: material.into(),
            thickness: thickness.into().with_default_unit(Some("um"))?,
        })
    }

    /// Layer material.
    pub fn material(&self) -> &str {
        &self.material
    }

    /// Layer thickness.
    pub fn thickness(&self) -> &Numerical {
        &self.thickness
    }
}

/// Detector window, a stack of layers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Window {
    layers: Vec<WindowLayer>,
}

impl Window {
    /// Window without layers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer, builder style.
    pub fn with_layer(mut self, material: &str, thickness: impl Into<Numerical>) -> Result<Self> {
        self.push_layer(WindowLayer::new(material, thickness)?);
        Ok(self)
    }

    /// Append a layer.
    pub fn push_layer(&mut self, layer: WindowLayer) {
        self.layers.push(layer);
    }

    /// Layers from the detector outwards.
    pub fn layers(&self) -> &[WindowLayer] {
        &self.layers
    }
}

/// Declare a detector type with the attributes every detector carries.
macro_rules! detector {
    (
        $(#[$meta:meta])*
        pub struct $name:ident [$class:literal] { $($body:tt)* }
        $($tail:tt)*
    ) => {
        parameter! {
            $(#[$meta])*
            pub struct $name ["Detector", $class] {
                /// Recorded signal
                signal_type, set_signal_type: SignalType => "SignalType";
                /// Manufacturer
                manufacturer, set_manufacturer: LangStr => "Manufacturer";
                /// Model
                model, set_model: LangStr => "Model";
                /// Serial number
                serial_number, set_serial_number: String => "SerialNumber";
                /// Unit of the recorded values
                measurement_unit, set_measurement_unit: String => "MeasurementUnit";
                /// Elevation (take-off) angle
                elevation, set_elevation: Numerical => "Elevation" ("degrees");
                /// Azimuthal angle
                azimuth, set_azimuth: Numerical => "Azimuth" ("degrees");
                /// Distance to the specimen
                distance, set_distance: Numerical => "Distance" ("mm");
                /// Active area
                area, set_area: Numerical => "Area" ("mm2");
                /// Solid angle
                solid_angle, set_solid_angle: Numerical => "SolidAngle" ("sr");
                /// Collection semi-angle
                semi_angle, set_semi_angle: Numerical => "SemiAngle" ("mrad");
                /// Operating temperature
                temperature, set_temperature: Numerical => "Temperature" ("degreesC");
                $($body)*
            }
            $($tail)*
        }
    };
}

/// Declare a spectrometer type: a detector with channels and a calibration.
macro_rules! spectrometer {
    (
        $(#[$meta:meta])*
        pub struct $name:ident [$class:literal] { $($body:tt)* }
        extra { $($extra:tt)* }
    ) => {
        detector! {
            $(#[$meta])*
            pub struct $name [$class] {
                /// Number of channels
                channel_count, set_channel_count: Numerical => "ChannelCount", required;
                /// Parallel or serial acquisition
                collection_mode, set_collection_mode: CollectionMode => "CollectionMode";
                $($body)*
            }
            extra {
                calibration: Option<Calibration>,
                $($extra)*
            }
        }

        impl $name {
            /// Channel calibration.
            pub fn calibration(&self) -> Option<&Calibration> {
                self.calibration.as_ref()
            }

            /// Replace the channel calibration.
            pub fn set_calibration(&mut self, calibration: impl Into<Calibration>) {
                self.calibration = Some(calibration.into());
            }
        }
    };
}

detector! {
    /// Two-dimensional detector.
    #[derive(Debug, Clone, PartialEq)]
    pub struct DetectorCamera ["Camera"] {
        /// Pixels along U
        pixel_count_u, set_pixel_count_u: Numerical => "UPixelCount", required;
        /// Pixels along V
        pixel_count_v, set_pixel_count_v: Numerical => "VPixelCount", required;
        /// Exposure time
        exposure_time, set_exposure_time: Numerical => "ExposureTime" ("ms");
        /// Magnification
        magnification, set_magnification: Numerical => "Magnification";
        /// Focal length
        focal_length, set_focal_length: Numerical => "FocalLength" ("mm");
    }
}

impl DetectorCamera {
    /// Camera with the given pixel counts.
    pub fn new(pixel_count_u: u32, pixel_count_v: u32) -> Result<Self> {
        let mut detector = Self::empty();
        detector.set_pixel_count_u(pixel_count_u)?;
        detector.set_pixel_count_v(pixel_count_v)?;
        Ok(detector)
    }
}

spectrometer! {
    /// Generic spectrometer.
    #[derive(Debug, Clone, PartialEq)]
    pub struct DetectorSpectrometer ["Spectrometer"] {}
    extra {}
}

impl DetectorSpectrometer {
    /// Spectrometer with `channel_count` channels.
    pub fn new(channel_count: u32, calibration: impl Into<Calibration>) -> Result<Self> {
        let mut detector = Self::empty();
        detector.set_channel_count(channel_count)?;
        detector.set_calibration(calibration);
        Ok(detector)
    }
}

spectrometer! {
    /// Cathodoluminescence spectrometer.
    #[derive(Debug, Clone, PartialEq)]
    pub struct DetectorSpectrometerCL ["Spectrometer/CL"] {
        /// Grating groove density
        grating_d, set_grating_d: Numerical => "Grating-d" ("mm-1");
    }
    extra {}
}

impl DetectorSpectrometerCL {
    /// Create with the required attributes.
    pub fn new(channel_count: u32, calibration: impl Into<Calibration>) -> Result<Self> {
        let mut detector = Self::empty();
        detector.set_channel_count(channel_count)?;
        detector.set_calibration(calibration);
        Ok(detector)
    }
}

spectrometer! {
    /// Wavelength dispersive X-ray spectrometer.
    #[derive(Debug, Clone, PartialEq)]
    pub struct DetectorSpectrometerWDS ["Spectrometer/WDS"] {
        /// Diffracting crystal or multilayer
        dispersion_element, set_dispersion_element: LangStr => "DispersionElement";
        /// Crystal 2d spacing
        crystal_2d, set_crystal_2d: Numerical => "Crystal2d" ("Å");
        /// Rowland circle diameter
        rowland_circle_diameter, set_rowland_circle_diameter: Numerical => "RowlandCircleDiameter" ("mm");
    }
    extra {
        window: Option<Window>,
    }
}

impl DetectorSpectrometerWDS {
    /// Create with the required attributes.
    pub fn new(channel_count: u32, calibration: impl Into<Calibration>) -> Result<Self> {
        let mut detector = Self::empty();
        detector.set_channel_count(channel_count)?;
        detector.set_calibration(calibration);
        Ok(detector)
    }

    /// Entrance window, if described.
    pub fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }

    /// Set window.
    pub fn set_window(&mut self, window: Option<Window>) {
        self.window = window;
    }
}

spectrometer! {
    /// Energy dispersive X-ray spectrometer.
    #[derive(Debug, Clone, PartialEq)]
    pub struct DetectorSpectrometerXEDS ["Spectrometer/XEDS"] {
        /// Detector technology
        technology, set_technology: XedsTechnology => "Technology";
        /// Nominal throughput
        nominal_throughput, set_nominal_throughput: Numerical => "NominalThroughput" ("counts");
        /// Pulse processor time constant
        time_constant, set_time_constant: Numerical => "TimeConstant" ("us");
        /// Strobe rate
        strobe_rate, set_strobe_rate: Numerical => "StrobeRate" ("Hz");
    }
    extra {
        window: Option<Window>,
    }
}

impl DetectorSpectrometerXEDS {
    /// Create with the required attributes.
    pub fn new(channel_count: u32, calibration: impl Into<Calibration>) -> Result<Self> {
        let mut detector = Self::empty();
        detector.set_channel_count(channel_count)?;
        detector.set_calibration(calibration);
        Ok(detector)
    }

    /// Entrance window.
    pub fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }

    /// Set window.
    pub fn set_window(&mut self, window: Option<Window>) {
        self.window = window;
    }
}
