//! Numeric element types, typed N-dimensional arrays and numerical values
//! carrying a unit.

use std::fmt;
use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use ndarray::{ArrayD, Axis, IxDyn};

use super::unit::validate_unit;
use crate::error::{HmsaError, Result};

/// Element data types admitted in HMSA documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// 8-bit unsigned integer (`byte`)
    UInt8,
    /// 16-bit signed integer (`int16`)
    Int16,
    /// 16-bit unsigned integer (`uint16`)
    UInt16,
    /// 32-bit signed integer (`int32`)
    Int32,
    /// 32-bit unsigned integer (`uint32`)
    UInt32,
    /// 64-bit signed integer (`int64`)
    Int64,
    /// 32-bit floating point (`float`)
    Float32,
    /// 64-bit floating point (`double`)
    Float64,
}

impl DataType {
    /// All data types, in document order.
    pub const ALL: [DataType; 8] = [
        DataType::UInt8,
        DataType::Int16,
        DataType::UInt16,
        DataType::Int32,
        DataType::UInt32,
        DataType::Int64,
        DataType::Float32,
        DataType::Float64,
    ];

    /// Name used in the `DataType` XML attribute.
    pub const fn xml_name(&self) -> &'static str {
        match self {
            DataType::UInt8 => "byte",
            DataType::Int16 => "int16",
            DataType::UInt16 => "uint16",
            DataType::Int32 => "int32",
            DataType::UInt32 => "uint32",
            DataType::Int64 => "int64",
            DataType::Float32 => "float",
            DataType::Float64 => "double",
        }
    }

    /// Parse an XML `DataType` name.
    pub fn from_xml_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.xml_name() == name)
    }

    /// Size in bytes of one element.
    pub const fn size_bytes(&self) -> usize {
        match self {
            DataType::UInt8 => 1,
            DataType::Int16 | DataType::UInt16 => 2,
            DataType::Int32 | DataType::UInt32 | DataType::Float32 => 4,
            DataType::Int64 | DataType::Float64 => 8,
        }
    }

    /// Check if this type is a floating-point type.
    pub const fn is_float(&self) -> bool {
        matches!(self, DataType::Float32 | DataType::Float64)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.xml_name())
    }
}

/// A single typed number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    /// `byte`
    UInt8(u8),
    /// `int16`
    Int16(i16),
    /// `uint16`
    UInt16(u16),
    /// `int32`
    Int32(i32),
    /// `uint32`
    UInt32(u32),
    /// `int64`
    Int64(i64),
    /// `float`
    Float32(f32),
    /// `double`
    Float64(f64),
}

impl Scalar {
    /// Element type of this scalar.
    pub fn dtype(&self) -> DataType {
        match self {
            Scalar::UInt8(_) => DataType::UInt8,
            Scalar::Int16(_) => DataType::Int16,
            Scalar::UInt16(_) => DataType::UInt16,
            Scalar::Int32(_) => DataType::Int32,
            Scalar::UInt32(_) => DataType::UInt32,
            Scalar::Int64(_) => DataType::Int64,
            Scalar::Float32(_) => DataType::Float32,
            Scalar::Float64(_) => DataType::Float64,
        }
    }

    /// Value widened to `f64`.
    pub fn to_f64(&self) -> f64 {
        match *self {
            Scalar::UInt8(v) => v as f64,
            Scalar::Int16(v) => v as f64,
            Scalar::UInt16(v) => v as f64,
            Scalar::Int32(v) => v as f64,
            Scalar::UInt32(v) => v as f64,
            Scalar::Int64(v) => v as f64,
            Scalar::Float32(v) => v as f64,
            Scalar::Float64(v) => v,
        }
    }

    /// Parse a text value as the given type.
    pub fn parse(dtype: DataType, text: &str) -> Result<Self> {
        let text = text.trim();
        let invalid = || HmsaError::document(format!("Invalid {} value: {:?}", dtype, text));
        Ok(match dtype {
            DataType::UInt8 => Scalar::UInt8(text.parse().map_err(|_| invalid())?),
            DataType::Int16 => Scalar::Int16(text.parse().map_err(|_| invalid())?),
            DataType::UInt16 => Scalar::UInt16(text.parse().map_err(|_| invalid())?),
            DataType::Int32 => Scalar::Int32(text.parse().map_err(|_| invalid())?),
            DataType::UInt32 => Scalar::UInt32(text.parse().map_err(|_| invalid())?),
            DataType::Int64 => Scalar::Int64(text.parse().map_err(|_| invalid())?),
            DataType::Float32 => Scalar::Float32(text.parse().map_err(|_| invalid())?),
            DataType::Float64 => Scalar::Float64(text.parse().map_err(|_| invalid())?),
        })
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::UInt8(v) => write!(f, "{}", v),
            Scalar::Int16(v) => write!(f, "{}", v),
            Scalar::UInt16(v) => write!(f, "{}", v),
            Scalar::Int32(v) => write!(f, "{}", v),
            Scalar::UInt32(v) => write!(f, "{}", v),
            Scalar::Int64(v) => write!(f, "{}", v),
            Scalar::Float32(v) => write!(f, "{}", v),
            Scalar::Float64(v) => write!(f, "{}", v),
        }
    }
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Self {
                    Scalar::$variant(value)
                }
            }
        )*
    };
}

scalar_from!(
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
);

/// A typed N-dimensional array over one of the admitted element types.
#[derive(Debug, Clone, PartialEq)]
pub enum NdArray {
    /// `byte` elements
    UInt8(ArrayD<u8>),
    /// `int16` elements
    Int16(ArrayD<i16>),
    /// `uint16` elements
    UInt16(ArrayD<u16>),
    /// `int32` elements
    Int32(ArrayD<i32>),
    /// `uint32` elements
    UInt32(ArrayD<u32>),
    /// `int64` elements
    Int64(ArrayD<i64>),
    /// `float` elements
    Float32(ArrayD<f32>),
    /// `double` elements
    Float64(ArrayD<f64>),
}

/// Apply `$body` to the inner `ArrayD` of any variant.
macro_rules! with_array {
    ($value:expr, $a:ident => $body:expr) => {
        match $value {
            NdArray::UInt8($a) => $body,
            NdArray::Int16($a) => $body,
            NdArray::UInt16($a) => $body,
            NdArray::Int32($a) => $body,
            NdArray::UInt32($a) => $body,
            NdArray::Int64($a) => $body,
            NdArray::Float32($a) => $body,
            NdArray::Float64($a) => $body,
        }
    };
}

/// Apply `$body` to the inner array and rewrap the result in the same variant.
macro_rules! map_array {
    ($value:expr, $a:ident => $body:expr) => {
        match $value {
            NdArray::UInt8($a) => NdArray::UInt8($body),
            NdArray::Int16($a) => NdArray::Int16($body),
            NdArray::UInt16($a) => NdArray::UInt16($body),
            NdArray::Int32($a) => NdArray::Int32($body),
            NdArray::UInt32($a) => NdArray::UInt32($body),
            NdArray::Int64($a) => NdArray::Int64($body),
            NdArray::Float32($a) => NdArray::Float32($body),
            NdArray::Float64($a) => NdArray::Float64($body),
        }
    };
}

macro_rules! ndarray_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<ArrayD<$ty>> for NdArray {
                fn from(array: ArrayD<$ty>) -> Self {
                    NdArray::$variant(array)
                }
            }

            impl From<Vec<$ty>> for NdArray {
                fn from(values: Vec<$ty>) -> Self {
                    NdArray::$variant(ndarray::Array1::from(values).into_dyn())
                }
            }
        )*
    };
}

ndarray_from!(
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
);

impl NdArray {
    /// Create a zero-filled array of the given type and shape.
    pub fn zeros(dtype: DataType, shape: &[usize]) -> Self {
        let shape = IxDyn(shape);
        match dtype {
            DataType::UInt8 => NdArray::UInt8(ArrayD::zeros(shape)),
            DataType::Int16 => NdArray::Int16(ArrayD::zeros(shape)),
            DataType::UInt16 => NdArray::UInt16(ArrayD::zeros(shape)),
            DataType::Int32 => NdArray::Int32(ArrayD::zeros(shape)),
            DataType::UInt32 => NdArray::UInt32(ArrayD::zeros(shape)),
            DataType::Int64 => NdArray::Int64(ArrayD::zeros(shape)),
            DataType::Float32 => NdArray::Float32(ArrayD::zeros(shape)),
            DataType::Float64 => NdArray::Float64(ArrayD::zeros(shape)),
        }
    }

    /// Build an array from a flat row-major buffer and a shape.
    pub fn from_shape_vec<T>(shape: &[usize], values: Vec<T>) -> Result<Self>
    where
        NdArray: From<ArrayD<T>>,
    {
        let array = ArrayD::from_shape_vec(IxDyn(shape), values).map_err(|e| {
            HmsaError::validation(format!("Buffer does not match shape {:?}: {}", shape, e))
        })?;
        Ok(NdArray::from(array))
    }

    /// A 0-dimensional array holding one scalar.
    pub fn from_scalar(value: Scalar) -> Self {
        let shape = IxDyn(&[]);
        match value {
            Scalar::UInt8(v) => NdArray::UInt8(ArrayD::from_elem(shape, v)),
            Scalar::Int16(v) => NdArray::Int16(ArrayD::from_elem(shape, v)),
            Scalar::UInt16(v) => NdArray::UInt16(ArrayD::from_elem(shape, v)),
            Scalar::Int32(v) => NdArray::Int32(ArrayD::from_elem(shape, v)),
            Scalar::UInt32(v) => NdArray::UInt32(ArrayD::from_elem(shape, v)),
            Scalar::Int64(v) => NdArray::Int64(ArrayD::from_elem(shape, v)),
            Scalar::Float32(v) => NdArray::Float32(ArrayD::from_elem(shape, v)),
            Scalar::Float64(v) => NdArray::Float64(ArrayD::from_elem(shape, v)),
        }
    }

    /// Element type.
    pub fn dtype(&self) -> DataType {
        match self {
            NdArray::UInt8(_) => DataType::UInt8,
            NdArray::Int16(_) => DataType::Int16,
            NdArray::UInt16(_) => DataType::UInt16,
            NdArray::Int32(_) => DataType::Int32,
            NdArray::UInt32(_) => DataType::UInt32,
            NdArray::Int64(_) => DataType::Int64,
            NdArray::Float32(_) => DataType::Float32,
            NdArray::Float64(_) => DataType::Float64,
        }
    }

    /// Array shape.
    pub fn shape(&self) -> &[usize] {
        with_array!(self, a => a.shape())
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        with_array!(self, a => a.len())
    }

    /// Whether the array holds no element.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Payload size in bytes.
    pub fn byte_len(&self) -> usize {
        self.len() * self.dtype().size_bytes()
    }

    /// Typed element at a multi-dimensional index.
    pub fn get(&self, index: &[usize]) -> Option<Scalar> {
        with_array!(self, a => a.get(index).map(|v| Scalar::from(*v)))
    }

    /// Element at a multi-dimensional index widened to `f64`.
    pub fn get_f64(&self, index: &[usize]) -> Option<f64> {
        self.get(index).map(|v| v.to_f64())
    }

    /// Elements in row-major order.
    pub fn scalars(&self) -> Vec<Scalar> {
        with_array!(self, a => a.iter().map(|v| Scalar::from(*v)).collect())
    }

    /// Elements in row-major order widened to `f64`.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.scalars().iter().map(Scalar::to_f64).collect()
    }

    /// Sub-array obtained by fixing the leading axes to `indices`.
    pub fn subview(&self, indices: &[usize]) -> Result<Self> {
        if indices.len() > self.ndim() {
            return Err(HmsaError::validation(format!(
                "Index {:?} has more axes than shape {:?}",
                indices,
                self.shape()
            )));
        }
        for (axis, (&i, &size)) in indices.iter().zip(self.shape()).enumerate() {
            if i >= size {
                return Err(HmsaError::validation(format!(
                    "Index {} out of range for axis {} of size {}",
                    i, axis, size
                )));
            }
        }
        Ok(map_array!(self, a => {
            let mut view = a.view();
            for &i in indices {
                view = view.index_axis_move(Axis(0), i);
            }
            view.to_owned()
        }))
    }

    /// Encode the elements as a contiguous little-endian row-major buffer.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(self.byte_len());
        // Writes into a Vec cannot fail
        let _ = self.write_le(&mut buffer);
        buffer
    }

    fn write_le(&self, buffer: &mut Vec<u8>) -> std::io::Result<()> {
        match self {
            NdArray::UInt8(a) => buffer.extend(a.iter()),
            NdArray::Int16(a) => {
                for v in a.iter() {
                    buffer.write_i16::<LittleEndian>(*v)?;
                }
            }
            NdArray::UInt16(a) => {
                for v in a.iter() {
                    buffer.write_u16::<LittleEndian>(*v)?;
                }
            }
            NdArray::Int32(a) => {
                for v in a.iter() {
                    buffer.write_i32::<LittleEndian>(*v)?;
                }
            }
            NdArray::UInt32(a) => {
                for v in a.iter() {
                    buffer.write_u32::<LittleEndian>(*v)?;
                }
            }
            NdArray::Int64(a) => {
                for v in a.iter() {
                    buffer.write_i64::<LittleEndian>(*v)?;
                }
            }
            NdArray::Float32(a) => {
                for v in a.iter() {
                    buffer.write_f32::<LittleEndian>(*v)?;
                }
            }
            NdArray::Float64(a) => {
                for v in a.iter() {
                    buffer.write_f64::<LittleEndian>(*v)?;
                }
            }
        }
        Ok(())
    }

    /// Decode a little-endian row-major buffer into an array.
    ///
    /// # Errors
    ///
    /// Returns [`HmsaError::InvalidDocument`] if the buffer length does not
    /// equal the shape's element count times the element size.
    pub fn from_le_bytes(dtype: DataType, shape: &[usize], bytes: &[u8]) -> Result<Self> {
        let count: usize = shape.iter().product();
        let expected = count * dtype.size_bytes();
        if bytes.len() != expected {
            return Err(HmsaError::document(format!(
                "Invalid data length: expected {} bytes for {} x {}, got {}",
                expected,
                count,
                dtype,
                bytes.len()
            )));
        }

        let mut cursor = Cursor::new(bytes);
        let shape = IxDyn(shape);
        let array = match dtype {
            DataType::UInt8 => NdArray::UInt8(ArrayD::from_shape_vec(shape, bytes.to_vec())?),
            DataType::Int16 => {
                let mut values = vec![0i16; count];
                cursor.read_i16_into::<LittleEndian>(&mut values)?;
                NdArray::Int16(ArrayD::from_shape_vec(shape, values)?)
            }
            DataType::UInt16 => {
                let mut values = vec![0u16; count];
                cursor.read_u16_into::<LittleEndian>(&mut values)?;
                NdArray::UInt16(ArrayD::from_shape_vec(shape, values)?)
            }
            DataType::Int32 => {
                let mut values = vec![0i32; count];
                cursor.read_i32_into::<LittleEndian>(&mut values)?;
                NdArray::Int32(ArrayD::from_shape_vec(shape, values)?)
            }
            DataType::UInt32 => {
                let mut values = vec![0u32; count];
                cursor.read_u32_into::<LittleEndian>(&mut values)?;
                NdArray::UInt32(ArrayD::from_shape_vec(shape, values)?)
            }
            DataType::Int64 => {
                let mut values = vec![0i64; count];
                cursor.read_i64_into::<LittleEndian>(&mut values)?;
                NdArray::Int64(ArrayD::from_shape_vec(shape, values)?)
            }
            DataType::Float32 => {
                let mut values = vec![0f32; count];
                cursor.read_f32_into::<LittleEndian>(&mut values)?;
                NdArray::Float32(ArrayD::from_shape_vec(shape, values)?)
            }
            DataType::Float64 => {
                let mut values = vec![0f64; count];
                cursor.read_f64_into::<LittleEndian>(&mut values)?;
                NdArray::Float64(ArrayD::from_shape_vec(shape, values)?)
            }
        };
        Ok(array)
    }

    /// Build a 1-D array of the given type from parsed scalars.
    pub fn from_scalars(dtype: DataType, values: &[Scalar]) -> Result<Self> {
        let mismatch = |v: &Scalar| {
            HmsaError::document(format!("Element {} is not of type {}", v, dtype))
        };
        macro_rules! collect {
            ($variant:ident) => {{
                let items = values
                    .iter()
                    .map(|v| match v {
                        Scalar::$variant(x) => Ok(*x),
                        other => Err(mismatch(other)),
                    })
                    .collect::<Result<Vec<_>>>()?;
                NdArray::from(items)
            }};
        }
        Ok(match dtype {
            DataType::UInt8 => collect!(UInt8),
            DataType::Int16 => collect!(Int16),
            DataType::UInt16 => collect!(UInt16),
            DataType::Int32 => collect!(Int32),
            DataType::UInt32 => collect!(UInt32),
            DataType::Int64 => collect!(Int64),
            DataType::Float32 => collect!(Float32),
            DataType::Float64 => collect!(Float64),
        })
    }
}

/// Numeric payload of a [`Numerical`]: a scalar or a 1-D array.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericValue {
    /// Single value
    Scalar(Scalar),
    /// Ordered list of values of one type
    Array(NdArray),
}

impl NumericValue {
    /// Element type.
    pub fn dtype(&self) -> DataType {
        match self {
            NumericValue::Scalar(s) => s.dtype(),
            NumericValue::Array(a) => a.dtype(),
        }
    }
}

/// A number or list of numbers with an optional unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Numerical {
    value: NumericValue,
    unit: Option<String>,
}

impl Numerical {
    /// Create a numerical value, validating and normalizing the unit.
    pub fn new(value: impl Into<Scalar>, unit: Option<&str>) -> Result<Self> {
        Self::from_value(NumericValue::Scalar(value.into()), unit)
    }

    /// Create a numerical array, validating and normalizing the unit.
    pub fn array(values: impl Into<NdArray>, unit: Option<&str>) -> Result<Self> {
        let array = values.into();
        if array.ndim() != 1 {
            return Err(HmsaError::validation("Numerical arrays must be 1-dimensional"));
        }
        Self::from_value(NumericValue::Array(array), unit)
    }

    /// Create from an already built payload.
    pub fn from_value(value: NumericValue, unit: Option<&str>) -> Result<Self> {
        let unit = unit.map(validate_unit).transpose()?;
        Ok(Self { value, unit })
    }

    /// Unitless value, unit to be filled by [`Numerical::with_default_unit`].
    pub fn unitless(value: impl Into<Scalar>) -> Self {
        Self {
            value: NumericValue::Scalar(value.into()),
            unit: None,
        }
    }

    /// Apply `default` when no unit is set.
    pub fn with_default_unit(mut self, default: Option<&str>) -> Result<Self> {
        if self.unit.is_none() {
            self.unit = default.map(validate_unit).transpose()?;
        }
        Ok(self)
    }

    /// Numeric payload.
    pub fn value(&self) -> &NumericValue {
        &self.value
    }

    /// Unit, if any.
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Element type.
    pub fn dtype(&self) -> DataType {
        self.value.dtype()
    }

    /// Scalar value widened to `f64`, or the first element of an array.
    pub fn as_f64(&self) -> f64 {
        match &self.value {
            NumericValue::Scalar(s) => s.to_f64(),
            NumericValue::Array(a) => a.to_f64_vec().first().copied().unwrap_or(f64::NAN),
        }
    }

    /// All values widened to `f64`.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match &self.value {
            NumericValue::Scalar(s) => vec![s.to_f64()],
            NumericValue::Array(a) => a.to_f64_vec(),
        }
    }

    /// Number of values (1 for scalars).
    pub fn len(&self) -> usize {
        match &self.value {
            NumericValue::Scalar(_) => 1,
            NumericValue::Array(a) => a.len(),
        }
    }

    /// Whether this is an empty array.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value expressed in `unit`.
    pub fn to_unit(&self, unit: &str) -> Result<f64> {
        match &self.unit {
            Some(own) => super::unit::convert_unit(unit, self.as_f64(), own),
            None => Err(HmsaError::InvalidUnit(format!(
                "value has no unit to convert into {}",
                unit
            ))),
        }
    }
}

impl From<f64> for Numerical {
    fn from(value: f64) -> Self {
        Numerical::unitless(value)
    }
}

impl From<i32> for Numerical {
    fn from(value: i32) -> Self {
        Numerical::unitless(value)
    }
}

impl From<u32> for Numerical {
    fn from(value: u32) -> Self {
        Numerical::unitless(value)
    }
}

impl fmt::Display for Numerical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            NumericValue::Scalar(s) => write!(f, "{}", s)?,
            NumericValue::Array(a) => {
                let items: Vec<String> = a.scalars().iter().map(|s| s.to_string()).collect();
                write!(f, "[{}]", items.join(", "))?
            }
        }
        if let Some(unit) = &self.unit {
            write!(f, " {}", unit)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_names() {
        for dtype in DataType::ALL {
            assert_eq!(DataType::from_xml_name(dtype.xml_name()), Some(dtype));
        }
        assert_eq!(DataType::from_xml_name("uint64"), None);
        assert_eq!(DataType::Int64.size_bytes(), 8);
        assert!(DataType::Float32.is_float());
    }

    #[test]
    fn test_le_bytes_layout() {
        let array = NdArray::from(vec![0i32, 1, 2, 3]);
        assert_eq!(
            array.to_le_bytes(),
            vec![0, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0]
        );
    }

    #[test]
    fn test_le_bytes_row_major() {
        let array = NdArray::from_shape_vec(&[2, 2], vec![1u16, 2, 3, 4]).unwrap();
        let bytes = array.to_le_bytes();
        assert_eq!(bytes, vec![1, 0, 2, 0, 3, 0, 4, 0]);

        let decoded = NdArray::from_le_bytes(DataType::UInt16, &[2, 2], &bytes).unwrap();
        assert_eq!(decoded, array);
        assert_eq!(decoded.get(&[1, 0]), Some(Scalar::UInt16(3)));
    }

    #[test]
    fn test_from_le_bytes_rejects_wrong_length() {
        let result = NdArray::from_le_bytes(DataType::Float64, &[3], &[0u8; 16]);
        assert!(matches!(result, Err(HmsaError::InvalidDocument(_))));
    }

    #[test]
    fn test_subview() {
        let array = NdArray::from_shape_vec(&[2, 3, 2], (0..12).collect::<Vec<i64>>()).unwrap();
        let pixel = array.subview(&[1, 2]).unwrap();
        assert_eq!(pixel.shape(), &[2]);
        assert_eq!(pixel.to_f64_vec(), vec![10.0, 11.0]);
        assert!(array.subview(&[2, 0]).is_err());
    }

    #[test]
    fn test_zero_dimensional_array() {
        let zero_d = NdArray::from_scalar(Scalar::Float64(1.5));
        assert_eq!(zero_d.ndim(), 0);
        assert_eq!(zero_d.len(), 1);
        assert_eq!(zero_d.get_f64(&[]), Some(1.5));
        assert_eq!(zero_d.to_le_bytes(), 1.5f64.to_le_bytes().to_vec());
    }

    #[test]
    fn test_numerical_unit_normalized() {
        let value = Numerical::new(15.0, Some("kV")).unwrap();
        assert_eq!(value.unit(), Some("kV"));
        assert_eq!(value.to_unit("V").unwrap(), 15000.0);

        assert!(Numerical::new(1.0, Some("parsec")).is_err());

        let defaulted = Numerical::from(2.0).with_default_unit(Some("nA")).unwrap();
        assert_eq!(defaulted.unit(), Some("nA"));
    }

    #[test]
    fn test_numerical_array() {
        let value = Numerical::array(vec![1.0f64, 2.0, 3.0], None).unwrap();
        assert_eq!(value.len(), 3);
        assert_eq!(value.to_f64_vec(), vec![1.0, 2.0, 3.0]);
        assert_eq!(value.dtype(), DataType::Float64);
    }
}
