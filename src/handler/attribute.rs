//! Element encoding of single attribute values.

use chrono::{NaiveDate, NaiveTime};

use crate::error::{HmsaError, Result};
use crate::parameter::{AttributeKind, AttributeSpec, AttributeValue, Parameter};
use crate::types::{
    AtomicNumber, Checksum, ChecksumAlgorithm, DataType, LangStr, NdArray, Notation, NumericValue,
    Numerical, NumericalRange, Scalar, XRayLine,
};
use crate::xml::Element;

const ARRAY_PREFIX: &str = "array:";
const ALT_LANG_PREFIX: &str = "alt-lang-";

/// `<name DataType=".." Unit="..">value</name>`, arrays as comma-separated
/// text with a `Count`.
pub fn encode_numerical(name: &str, value: &Numerical) -> Element {
    let mut element = Element::new(name);
    match value.value() {
        NumericValue::Scalar(scalar) => {
            element.set_attribute("DataType", scalar.dtype().xml_name());
            element.text = scalar.to_string();
        }
        NumericValue::Array(array) => {
            element.set_attribute("DataType", format!("{}{}", ARRAY_PREFIX, array.dtype()));
            element.set_attribute("Count", array.len().to_string());
            let items: Vec<String> = array.scalars().iter().map(Scalar::to_string).collect();
            element.text = items.join(",");
        }
    }
    if let Some(unit) = value.unit() {
        element.set_attribute("Unit", unit);
    }
    element
}

fn data_type(element: &Element, name: &str) -> Result<DataType> {
    DataType::from_xml_name(name).ok_or_else(|| {
        HmsaError::document(format!("<{}> has unknown DataType {:?}", element.name, name))
    })
}

/// Inverse of [`encode_numerical`].
pub fn decode_numerical(element: &Element) -> Result<Numerical> {
    let declared = element.required_attribute("DataType")?;
    let unit = element.attribute("Unit");

    match declared.strip_prefix(ARRAY_PREFIX) {
        Some(inner) => {
            let dtype = data_type(element, inner)?;
            let scalars = element
                .text
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| Scalar::parse(dtype, s))
                .collect::<Result<Vec<_>>>()?;
            if let Some(count) = element.attribute("Count") {
                let count: usize = count.trim().parse().map_err(|_| {
                    HmsaError::document(format!("<{}> has invalid Count {:?}", element.name, count))
                })?;
                if count != scalars.len() {
                    return Err(HmsaError::document(format!(
                        "<{}> declares {} values, found {}",
                        element.name,
                        count,
                        scalars.len()
                    )));
                }
            }
            let array = NdArray::from_scalars(dtype, &scalars)?;
            Numerical::from_value(NumericValue::Array(array), unit)
        }
        None => {
            let dtype = data_type(element, declared)?;
            let scalar = Scalar::parse(dtype, &element.text)?;
            Numerical::from_value(NumericValue::Scalar(scalar), unit)
        }
    }
}

/// Text element with `alt-lang-<tag>` alternatives.
pub fn encode_text(name: &str, value: &LangStr) -> Element {
    let mut element = Element::new(name).with_text(value.as_str());
    for (language, text) in value.alternatives() {
        element.set_attribute(format!("{}{}", ALT_LANG_PREFIX, language), text.as_str());
    }
    element
}

/// Decode the text of `element` with its `alt-lang-*` spellings.
pub fn decode_text(element: &Element) -> Result<LangStr> {
    let mut value = LangStr::new(element.text.as_str());
    for (key, text) in &element.attributes {
        if let Some(language) = key.strip_prefix(ALT_LANG_PREFIX) {
            value.set_alternative(language, text.as_str())?;
        }
    }
    Ok(value)
}

fn encode_xray_line(name: &str, line: &XRayLine) -> Element {
    let mut element = Element::new(name)
        .with_text(line.line())
        .with_attribute("Notation", line.notation().as_str());
    if let Some(alternative) = line.alternative() {
        element.set_attribute(format!("alt-{}", line.notation().other()), alternative);
    }
    element
}

fn decode_xray_line(element: &Element) -> Result<XRayLine> {
    let notation: Notation = element.required_attribute("Notation")?.parse()?;
    let line = XRayLine::new(element.text.as_str(), notation)?;
    match element.attribute(&format!("alt-{}", notation.other())) {
        Some(alternative) => line.with_alternative(alternative),
        None => Ok(line),
    }
}

fn parse_text<T: std::str::FromStr>(element: &Element, what: &str) -> Result<T> {
    element.text.trim().parse().map_err(|_| {
        HmsaError::document(format!(
            "<{}> holds invalid {}: {:?}",
            element.name, what, element.text
        ))
    })
}

/// Elements for one attribute value. Ranges produce a `Start`/`End` pair.
pub fn encode_value(xml_name: &str, value: &AttributeValue) -> Vec<Element> {
    let element = match value {
        AttributeValue::Numerical(v) => encode_numerical(xml_name, v),
        AttributeValue::Text(v) => encode_text(xml_name, v),
        AttributeValue::Enum(v) => Element::new(xml_name).with_text(v.as_str()),
        AttributeValue::AtomicNumber(z) => Element::new(xml_name)
            .with_attribute("DataType", DataType::UInt32.xml_name())
            .with_text(z.get().to_string()),
        AttributeValue::XRayLine(v) => encode_xray_line(xml_name, v),
        AttributeValue::Date(v) => Element::new(xml_name).with_text(v.to_string()),
        AttributeValue::Time(v) => Element::new(xml_name).with_text(v.to_string()),
        AttributeValue::Checksum(v) => Element::new(xml_name)
            .with_attribute("Algorithm", v.algorithm().as_str())
            .with_text(v.value()),
        AttributeValue::Bool(v) => Element::new(xml_name).with_text(v.to_string()),
        AttributeValue::Range(range) => {
            let bound = |prefix: &str, scalar: Scalar| {
                let mut element = Element::new(format!("{}{}", prefix, xml_name))
                    .with_attribute("DataType", scalar.dtype().xml_name())
                    .with_text(scalar.to_string());
                if let Some(unit) = range.unit() {
                    element.set_attribute("Unit", unit);
                }
                element
            };
            return vec![bound("Start", range.start()), bound("End", range.end())];
        }
    };
    vec![element]
}

/// Decode the value of a `kind` attribute named `xml_name` among the
/// children of `parent`. `None` when absent.
pub fn decode_value(
    parent: &Element,
    xml_name: &str,
    kind: AttributeKind,
) -> Result<Option<AttributeValue>> {
    if kind == AttributeKind::Range {
        let start = parent.child(&format!("Start{}", xml_name));
        let end = parent.child(&format!("End{}", xml_name));
        return match (start, end) {
            (None, None) => Ok(None),
            (Some(start), Some(end)) => {
                let start_value = decode_numerical(start)?;
                let end_value = decode_numerical(end)?;
                let unit = start_value.unit().or(end_value.unit());
                let bounds = |n: &Numerical| match n.value() {
                    NumericValue::Scalar(s) => Ok(*s),
                    NumericValue::Array(_) => Err(HmsaError::document(format!(
                        "Range {} bounds must be scalars",
                        xml_name
                    ))),
                };
                let range = NumericalRange::new(bounds(&start_value)?, bounds(&end_value)?, unit)?;
                Ok(Some(AttributeValue::Range(range)))
            }
            _ => Err(HmsaError::document(format!(
                "<{}> has only one bound of {}",
                parent.name, xml_name
            ))),
        };
    }

    let Some(element) = parent.child(xml_name) else {
        return Ok(None);
    };
    let value = match kind {
        AttributeKind::Numerical => AttributeValue::Numerical(decode_numerical(element)?),
        AttributeKind::Text => AttributeValue::Text(decode_text(element)?),
        AttributeKind::Enum => AttributeValue::Enum(element.text.trim().to_string()),
        AttributeKind::AtomicNumber => {
            let z: u8 = parse_text(element, "atomic number")?;
            AttributeValue::AtomicNumber(AtomicNumber::new(z)?)
        }
        AttributeKind::XRayLine => AttributeValue::XRayLine(decode_xray_line(element)?),
        AttributeKind::Date => AttributeValue::Date(parse_text::<NaiveDate>(element, "date")?),
        AttributeKind::Time => AttributeValue::Time(parse_text::<NaiveTime>(element, "time")?),
        AttributeKind::Checksum => {
            let algorithm: ChecksumAlgorithm = element.required_attribute("Algorithm")?.parse()?;
            AttributeValue::Checksum(Checksum::new(element.text.trim(), algorithm)?)
        }
        AttributeKind::Bool => AttributeValue::Bool(parse_text(element, "boolean")?),
        AttributeKind::Range => return Ok(None),
    };
    Ok(Some(value))
}

/// Append every set attribute of `parameter` to `element`.
pub fn encode_attributes(parameter: &dyn Parameter, element: &mut Element) {
    for (spec, value) in parameter.attributes() {
        element.children.extend(encode_value(spec.xml_name, &value));
    }
}

/// Set every attribute of `parameter` found among the children of `element`.
pub fn decode_attributes(parameter: &mut dyn Parameter, element: &Element) -> Result<()> {
    let specs: &'static [AttributeSpec] = parameter.attribute_specs();
    for spec in specs {
        if let Some(value) = decode_value(element, spec.xml_name, spec.kind)? {
            parameter.set_attribute(spec.name, Some(value))?;
        }
    }
    Ok(())
}
