//! Datum descriptors and their payloads.
//!
//! A datum element holds its layout and where its bytes live:
//!
//! ```xml
//! <Analysis1D Name="Spectrum" Conditions="Probe0 Det0">
//!   <DatumType>int32</DatumType>
//!   <DataOffset DataType="uint64">8</DataOffset>
//!   <DataLength DataType="uint64">16</DataLength>
//!   <DatumDimensions>
//!     <Dimension Name="Channel" DataType="uint32">4</Dimension>
//!   </DatumDimensions>
//! </Analysis1D>
//! ```

use crate::datafile::LinkedDatum;
use crate::datum::{Datum, DatumKind};
use crate::error::{HmsaError, Result};
use crate::types::{DataType, NdArray};
use crate::xml::Element;

/// Destination of datum payloads.
pub trait PayloadSink {
    /// Append `bytes` and return their absolute offset.
    fn write_payload(&mut self, bytes: &[u8]) -> Result<u64>;
}

/// Source of datum payloads.
pub trait PayloadSource {
    /// Read `length` bytes at absolute `offset`.
    ///
    /// # Errors
    ///
    /// [`HmsaError::InvalidDocument`] when the range falls outside the
    /// payload area.
    fn read_payload(&mut self, offset: u64, length: u64) -> Result<Vec<u8>>;
}

/// Parses and converts the data of one layout family.
pub trait DatumHandler: Send + Sync {
    /// Document version the handler was built for.
    fn version(&self) -> &str;

    /// Whether `element` uses one of this handler's layouts.
    fn can_parse(&self, element: &Element) -> bool;

    /// Rebuild the datum described by `element`, without conditions.
    fn parse(&self, element: &Element, source: &mut dyn PayloadSource) -> Result<Datum>;

    /// Whether `datum` uses one of this handler's layouts.
    fn can_convert(&self, datum: &LinkedDatum) -> bool;

    /// Write the payload to `sink` and return the descriptor.
    fn convert(&self, datum: &LinkedDatum, sink: &mut dyn PayloadSink) -> Result<Element>;
}

/// Handler for a family of array layouts.
pub struct ArrayDatumHandler {
    version: String,
    kinds: &'static [DatumKind],
}

const ANALYSIS: &[DatumKind] = &[
    DatumKind::Analysis0D,
    DatumKind::Analysis1D,
    DatumKind::Analysis2D,
];
const ANALYSIS_LIST: &[DatumKind] = &[
    DatumKind::AnalysisList0D,
    DatumKind::AnalysisList1D,
    DatumKind::AnalysisList2D,
];
const IMAGE_RASTER: &[DatumKind] = &[
    DatumKind::ImageRaster2D,
    DatumKind::ImageRaster2DSpectral,
    DatumKind::ImageRaster2DHyperimage,
];

impl ArrayDatumHandler {
    /// Single analyses.
    pub fn analysis(version: &str) -> Self {
        Self::new(version, ANALYSIS)
    }

    /// Lists of analyses.
    pub fn analysis_list(version: &str) -> Self {
        Self::new(version, ANALYSIS_LIST)
    }

    /// Raster images.
    pub fn image_raster(version: &str) -> Self {
        Self::new(version, IMAGE_RASTER)
    }

    fn new(version: &str, kinds: &'static [DatumKind]) -> Self {
        Self {
            version: version.to_string(),
            kinds,
        }
    }
}

fn text_element(name: &str, text: impl ToString) -> Element {
    Element::new(name).with_text(text.to_string())
}

fn uint64_element(name: &str, value: u64) -> Element {
    text_element(name, value).with_attribute("DataType", "uint64")
}

fn parse_u64(element: &Element) -> Result<u64> {
    element.text.trim().parse().map_err(|_| {
        HmsaError::document(format!(
            "<{}> holds invalid integer {:?}",
            element.name, element.text
        ))
    })
}

fn dimensions_element(name: &str, dimensions: &[(&str, usize)]) -> Element {
    let mut element = Element::new(name);
    for (dimension, size) in dimensions {
        element.push(
            text_element("Dimension", size)
                .with_attribute("Name", *dimension)
                .with_attribute("DataType", "uint32"),
        );
    }
    element
}

/// Sizes of the dimensions named `names`, read from the `group` child.
fn read_dimensions(datum: &Element, group: &str, names: &[&str]) -> Result<Vec<usize>> {
    if names.is_empty() {
        return Ok(Vec::new());
    }
    let group = datum.required_child(group)?;
    names
        .iter()
        .map(|name| {
            let dimension = group
                .children_named("Dimension")
                .find(|d| d.attribute("Name") == Some(*name))
                .ok_or_else(|| {
                    HmsaError::document(format!(
                        "<{}> has no dimension {}",
                        datum.name, name
                    ))
                })?;
            let size = parse_u64(dimension)?;
            usize::try_from(size)
                .map_err(|_| HmsaError::document(format!("Dimension {} too large", name)))
        })
        .collect()
}

/// Layout of a datum as declared by its descriptor element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    /// Datum type
    pub kind: DatumKind,
    /// Element type of the payload
    pub dtype: DataType,
    /// Absolute offset of the payload in the binary file
    pub offset: u64,
    /// Payload size in bytes
    pub length: u64,
    /// Collection dimensions followed by datum dimensions
    pub shape: Vec<usize>,
}

impl Descriptor {
    /// Read and check a descriptor: the declared length must equal the
    /// shape times the element size.
    pub fn parse(element: &Element) -> Result<Self> {
        let kind = DatumKind::from_tag(&element.name)
            .ok_or_else(|| HmsaError::document(format!("Not a datum: <{}>", element.name)))?;

        let type_name = element.required_child("DatumType")?.text.trim();
        let dtype = DataType::from_xml_name(type_name).ok_or_else(|| {
            HmsaError::document(format!("Unknown DatumType {:?}", type_name))
        })?;
        let offset = parse_u64(element.required_child("DataOffset")?)?;
        let length = parse_u64(element.required_child("DataLength")?)?;

        let mut shape = read_dimensions(element, "CollectionDimensions", kind.collection_names())?;
        shape.extend(read_dimensions(element, "DatumDimensions", kind.datum_names())?);

        let expected = shape
            .iter()
            .try_fold(dtype.size_bytes() as u64, |acc, &n| acc.checked_mul(n as u64));
        if expected != Some(length) {
            return Err(HmsaError::document(format!(
                "{} of shape {:?} x {} cannot span {} bytes",
                kind, shape, dtype, length
            )));
        }

        Ok(Self {
            kind,
            dtype,
            offset,
            length,
            shape,
        })
    }
}

impl DatumHandler for ArrayDatumHandler {
    fn version(&self) -> &str {
        &self.version
    }

    fn can_parse(&self, element: &Element) -> bool {
        self.kinds.iter().any(|kind| kind.tag() == element.name)
    }

    fn parse(&self, element: &Element, source: &mut dyn PayloadSource) -> Result<Datum> {
        let descriptor = Descriptor::parse(element)?;
        if !self.kinds.contains(&descriptor.kind) {
            return Err(HmsaError::document(format!("Not a datum: <{}>", element.name)));
        }
        let bytes = source.read_payload(descriptor.offset, descriptor.length)?;
        let array = NdArray::from_le_bytes(descriptor.dtype, &descriptor.shape, &bytes)?;
        Datum::new(descriptor.kind, array)
    }

    fn can_convert(&self, datum: &LinkedDatum) -> bool {
        self.kinds.contains(&datum.kind())
    }

    fn convert(&self, datum: &LinkedDatum, sink: &mut dyn PayloadSink) -> Result<Element> {
        let kind = datum.kind();
        let array = datum.array();
        let bytes = array.to_le_bytes();
        let offset = sink.write_payload(&bytes)?;

        let mut element = Element::new(kind.tag());
        element.push(text_element("DatumType", array.dtype().xml_name()));
        element.push(uint64_element("DataOffset", offset));
        element.push(uint64_element("DataLength", bytes.len() as u64));

        let collection = crate::datum::collection_dimensions(kind, array);
        if !collection.is_empty() {
            element.push(dimensions_element("CollectionDimensions", &collection));
        }
        let dimensions = crate::datum::datum_dimensions(kind, array);
        if !dimensions.is_empty() {
            element.push(dimensions_element("DatumDimensions", &dimensions));
        }
        Ok(element)
    }
}

/// Constructor of a datum handler for a document version.
pub type DatumHandlerFactory = fn(&str) -> Box<dyn DatumHandler>;

/// Every datum handler.
pub static DATUM_HANDLERS: &[DatumHandlerFactory] = &[
    |version| Box::new(ArrayDatumHandler::analysis(version)),
    |version| Box::new(ArrayDatumHandler::analysis_list(version)),
    |version| Box::new(ArrayDatumHandler::image_raster(version)),
];

/// Datum handlers for `version`.
pub fn datum_handlers(version: &str) -> Vec<Box<dyn DatumHandler>> {
    DATUM_HANDLERS.iter().map(|factory| factory(version)).collect()
}

/// Parse with the unique datum handler accepting `element`.
pub fn parse_datum(
    handlers: &[Box<dyn DatumHandler>],
    element: &Element,
    source: &mut dyn PayloadSource,
) -> Result<Datum> {
    let mut candidates = handlers.iter().filter(|h| h.can_parse(element));
    let handler = candidates
        .next()
        .ok_or_else(|| HmsaError::document(format!("No handler for datum <{}>", element.name)))?;
    if candidates.next().is_some() {
        return Err(HmsaError::document(format!(
            "Several handlers accept datum <{}>",
            element.name
        )));
    }
    handler.parse(element, source)
}

/// Convert with the first datum handler accepting `datum`.
pub fn convert_datum(
    handlers: &[Box<dyn DatumHandler>],
    datum: &LinkedDatum,
    sink: &mut dyn PayloadSink,
) -> Result<Element> {
    handlers
        .iter()
        .find(|h| h.can_convert(datum))
        .ok_or_else(|| HmsaError::TypeMismatch(format!("No handler for {}", datum.kind())))?
        .convert(datum, sink)
}
