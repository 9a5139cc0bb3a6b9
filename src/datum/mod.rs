//! Typed N-dimensional data and their layouts.
//!
//! A [`Datum`] pairs an [`NdArray`] with a [`DatumKind`] fixing how its axes
//! are interpreted. Axes are split into *collection* dimensions (which
//! analysis or which pixel) followed by *datum* dimensions (the channels or
//! the 2-D pattern of one analysis).

#[cfg(test)]
mod tests;

use std::fmt;

use crate::condition::Condition;
use crate::container::IdentifierMap;
use crate::error::{HmsaError, Result};
use crate::types::{DataType, NdArray, Scalar};

/// Layout of a datum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatumKind {
    /// Single value, shape `()`
    Analysis0D,
    /// Spectrum, shape `(channels,)`
    Analysis1D,
    /// 2-D pattern, shape `(U, V)`
    Analysis2D,
    /// List of values, shape `(N,)`
    AnalysisList0D,
    /// List of spectra, shape `(N, channels)`
    AnalysisList1D,
    /// List of patterns, shape `(N, U, V)`
    AnalysisList2D,
    /// Image, shape `(X, Y)`
    ImageRaster2D,
    /// Spectrum image, shape `(X, Y, channels)`
    ImageRaster2DSpectral,
    /// Pattern image, shape `(X, Y, U, V)`
    ImageRaster2DHyperimage,
}

const NO_DIMENSIONS: &[&str] = &[];
const CHANNEL: &[&str] = &["Channel"];
const UV: &[&str] = &["U", "V"];
const ANALYSIS: &[&str] = &["Analysis"];
const XY: &[&str] = &["X", "Y"];

impl DatumKind {
    /// Every kind, in document order.
    pub const ALL: [DatumKind; 9] = [
        DatumKind::Analysis0D,
        DatumKind::Analysis1D,
        DatumKind::Analysis2D,
        DatumKind::AnalysisList0D,
        DatumKind::AnalysisList1D,
        DatumKind::AnalysisList2D,
        DatumKind::ImageRaster2D,
        DatumKind::ImageRaster2DSpectral,
        DatumKind::ImageRaster2DHyperimage,
    ];

    /// Document tag.
    pub const fn tag(&self) -> &'static str {
        match self {
            DatumKind::Analysis0D => "Analysis0D",
            DatumKind::Analysis1D => "Analysis1D",
            DatumKind::Analysis2D => "Analysis2D",
            DatumKind::AnalysisList0D => "AnalysisList0D",
            DatumKind::AnalysisList1D => "AnalysisList1D",
            DatumKind::AnalysisList2D => "AnalysisList2D",
            DatumKind::ImageRaster2D => "ImageRaster2D",
            DatumKind::ImageRaster2DSpectral => "ImageRaster2DSpectral",
            DatumKind::ImageRaster2DHyperimage => "ImageRaster2DHyperimage",
        }
    }

    /// Datum type for an XML tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.tag() == tag)
    }

    /// Names of the collection dimensions.
    pub const fn collection_names(&self) -> &'static [&'static str] {
        match self {
            DatumKind::Analysis0D | DatumKind::Analysis1D | DatumKind::Analysis2D => NO_DIMENSIONS,
            DatumKind::AnalysisList0D | DatumKind::AnalysisList1D | DatumKind::AnalysisList2D => {
                ANALYSIS
            }
            DatumKind::ImageRaster2D
            | DatumKind::ImageRaster2DSpectral
            | DatumKind::ImageRaster2DHyperimage => XY,
        }
    }

    /// Names of the datum dimensions.
    pub const fn datum_names(&self) -> &'static [&'static str] {
        match self {
            DatumKind::Analysis0D | DatumKind::AnalysisList0D | DatumKind::ImageRaster2D => {
                NO_DIMENSIONS
            }
            DatumKind::Analysis1D
            | DatumKind::AnalysisList1D
            | DatumKind::ImageRaster2DSpectral => CHANNEL,
            DatumKind::Analysis2D
            | DatumKind::AnalysisList2D
            | DatumKind::ImageRaster2DHyperimage => UV,
        }
    }

    /// Total number of axes.
    pub const fn ndim(&self) -> usize {
        self.collection_names().len() + self.datum_names().len()
    }

    /// Kind of a single analysis of this layout.
    pub const fn analysis_kind(&self) -> DatumKind {
        match self.datum_names().len() {
            0 => DatumKind::Analysis0D,
            1 => DatumKind::Analysis1D,
            _ => DatumKind::Analysis2D,
        }
    }
}

impl fmt::Display for DatumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Check that `array` has the number of axes `kind` requires.
pub(crate) fn check_shape(kind: DatumKind, array: &NdArray) -> Result<()> {
    if array.ndim() != kind.ndim() {
        return Err(HmsaError::validation(format!(
            "{} expects {} dimensions, got shape {:?}",
            kind,
            kind.ndim(),
            array.shape()
        )));
    }
    Ok(())
}

/// `(name, size)` pairs of the collection dimensions.
pub(crate) fn collection_dimensions(kind: DatumKind, array: &NdArray) -> Vec<(&'static str, usize)> {
    kind.collection_names()
        .iter()
        .copied()
        .zip(array.shape().iter().copied())
        .collect()
}

/// `(name, size)` pairs of the datum dimensions.
pub(crate) fn datum_dimensions(kind: DatumKind, array: &NdArray) -> Vec<(&'static str, usize)> {
    let offset = kind.collection_names().len();
    kind.datum_names()
        .iter()
        .copied()
        .zip(array.shape().iter().skip(offset).copied())
        .collect()
}

/// Element at `index` widened to `f64`.
pub(crate) fn value_at(array: &NdArray, index: &[usize]) -> Result<f64> {
    if index.len() != array.ndim() {
        return Err(HmsaError::validation(format!(
            "Index {:?} does not address shape {:?}",
            index,
            array.shape()
        )));
    }
    array.get_f64(index).ok_or_else(|| {
        HmsaError::validation(format!(
            "Index {:?} out of range for shape {:?}",
            index,
            array.shape()
        ))
    })
}

/// A standalone datum: array, layout and its own conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct Datum {
    kind: DatumKind,
    array: NdArray,
    conditions: IdentifierMap<Condition>,
}

impl Datum {
    /// Create a datum, checking the array has the layout's number of axes.
    pub fn new(kind: DatumKind, array: NdArray) -> Result<Self> {
        check_shape(kind, &array)?;
        Ok(Self {
            kind,
            array,
            conditions: IdentifierMap::new(),
        })
    }

    /// Zero-filled datum.
    pub fn zeros(kind: DatumKind, dtype: DataType, shape: &[usize]) -> Result<Self> {
        Self::new(kind, NdArray::zeros(dtype, shape))
    }

    /// Single value.
    pub fn analysis0d(value: impl Into<Scalar>) -> Self {
        Self {
            kind: DatumKind::Analysis0D,
            array: NdArray::from_scalar(value.into()),
            conditions: IdentifierMap::new(),
        }
    }

    /// Spectrum from channel values.
    pub fn analysis1d(channels: impl Into<NdArray>) -> Result<Self> {
        Self::new(DatumKind::Analysis1D, channels.into())
    }

    /// 2-D pattern.
    pub fn analysis2d(pattern: impl Into<NdArray>) -> Result<Self> {
        Self::new(DatumKind::Analysis2D, pattern.into())
    }

    /// Image of `(X, Y)`.
    pub fn image_raster_2d(image: impl Into<NdArray>) -> Result<Self> {
        Self::new(DatumKind::ImageRaster2D, image.into())
    }

    /// Spectrum image of `(X, Y, channels)`.
    pub fn image_raster_2d_spectral(cube: impl Into<NdArray>) -> Result<Self> {
        Self::new(DatumKind::ImageRaster2DSpectral, cube.into())
    }

    /// Attach a condition, builder style.
    pub fn with_condition(mut self, id: &str, condition: impl Into<Condition>) -> Result<Self> {
        self.conditions.insert(id, condition.into())?;
        Ok(self)
    }

    pub(crate) fn from_parts(
        kind: DatumKind,
        array: NdArray,
        conditions: IdentifierMap<Condition>,
    ) -> Self {
        Self {
            kind,
            array,
            conditions,
        }
    }

    pub(crate) fn into_parts(self) -> (DatumKind, NdArray, IdentifierMap<Condition>) {
        (self.kind, self.array, self.conditions)
    }

    /// Datum type.
    pub fn kind(&self) -> DatumKind {
        self.kind
    }

    /// Stored values.
    pub fn array(&self) -> &NdArray {
        &self.array
    }

    /// Replace the array, keeping the layout.
    pub fn set_array(&mut self, array: NdArray) -> Result<()> {
        check_shape(self.kind, &array)?;
        self.array = array;
        Ok(())
    }

    /// Array shape, collection axes first.
    pub fn shape(&self) -> &[usize] {
        self.array.shape()
    }

    /// Element type.
    pub fn dtype(&self) -> DataType {
        self.array.dtype()
    }

    /// Element at `index`, one entry per axis.
    pub fn value(&self, index: &[usize]) -> Result<f64> {
        value_at(&self.array, index)
    }

    /// Named collection dimensions with their lengths.
    pub fn collection_dimensions(&self) -> Vec<(&'static str, usize)> {
        collection_dimensions(self.kind, &self.array)
    }

    /// Named datum dimensions with their lengths.
    pub fn datum_dimensions(&self) -> Vec<(&'static str, usize)> {
        datum_dimensions(self.kind, &self.array)
    }

    /// Conditions owned by this datum.
    pub fn conditions(&self) -> &IdentifierMap<Condition> {
        &self.conditions
    }

    /// Conditions attached to this datum.
    pub fn conditions_mut(&mut self) -> &mut IdentifierMap<Condition> {
        &mut self.conditions
    }

    /// The analysis at a collection index: `[i]` for analysis lists,
    /// `[x, y]` for rasters. The result carries a copy of the conditions.
    pub fn to_analysis(&self, index: &[usize]) -> Result<Datum> {
        let collection = self.kind.collection_names().len();
        if collection == 0 {
            return Err(HmsaError::validation(format!(
                "{} is already a single analysis",
                self.kind
            )));
        }
        if index.len() != collection {
            return Err(HmsaError::validation(format!(
                "{} needs {} collection indices, got {}",
                self.kind,
                collection,
                index.len()
            )));
        }
        let array = self.array.subview(index)?;
        Ok(Datum {
            kind: self.kind.analysis_kind(),
            array,
            conditions: self.conditions.clone(),
        })
    }
}
