//! Declarative macros generating parameter types and text enumerations.

/// Declare a parameter type.
///
/// ```text
/// parameter! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub struct ProbeEm ["Probe", "EM"] {
///         /// Beam voltage
///         beam_voltage, set_beam_voltage: Numerical => "BeamVoltage" ("kV"), required;
///         gun_type, set_gun_type: GunType => "GunType";
///     }
///     extra {
///         /// Fields outside the attribute table, serialized by hand
///         layers: Vec<Layer>,
///     }
/// }
/// ```
///
/// Every attribute is stored as an `Option`. Setters run
/// [`AttributeType::normalize`](crate::parameter::AttributeType::normalize)
/// with the attribute's default unit.
macro_rules! parameter {
    (@unit) => { None };
    (@unit $unit:literal) => { Some($unit) };
    (@required) => { false };
    (@required required) => { true };
    (@class) => { None };
    (@class $class:literal) => { Some($class) };

    (
        $(#[$meta:meta])*
        pub struct $name:ident [$tag:literal $(, $class:literal)?] {
            $(
                $(#[$fmeta:meta])*
                $field:ident, $setter:ident : $ty:ty => $xml:literal $( ($unit:literal) )? $(, $req:ident)? ;
            )*
        }
        $(
            extra {
                $( $(#[$xmeta:meta])* $xfield:ident : $xty:ty ),* $(,)?
            }
        )?
    ) => {
        $(#[$meta])*
        pub struct $name {
            $( $field: Option<$ty>, )*
            $( $( $(#[$xmeta])* $xfield: $xty, )* )?
        }

        impl $name {
            const SPECS: &'static [$crate::parameter::AttributeSpec] = &[
                $(
                    $crate::parameter::AttributeSpec {
                        name: stringify!($field),
                        xml_name: $xml,
                        kind: <$ty as $crate::parameter::AttributeType>::KIND,
                        required: parameter!(@required $($req)?),
                        default_unit: parameter!(@unit $($unit)?),
                    },
                )*
            ];

            $(
                $(#[$fmeta])*
                pub fn $field(&self) -> Option<&$ty> {
                    self.$field.as_ref()
                }

                #[doc = concat!("Set `", stringify!($field), "`.")]
                pub fn $setter(&mut self, value: impl Into<$ty>) -> $crate::error::Result<()> {
                    let value = $crate::parameter::AttributeType::normalize(
                        value.into(),
                        parameter!(@unit $($unit)?),
                    )?;
                    self.$field = Some(value);
                    Ok(())
                }
            )*
        }

        impl $crate::parameter::Parameter for $name {
            fn tag(&self) -> &'static str {
                $tag
            }

            fn class(&self) -> Option<&'static str> {
                parameter!(@class $($class)?)
            }

            fn attribute_specs(&self) -> &'static [$crate::parameter::AttributeSpec] {
                Self::SPECS
            }

            fn attribute(&self, name: &str) -> Option<$crate::parameter::AttributeValue> {
                match name {
                    $(
                        stringify!($field) => self
                            .$field
                            .clone()
                            .map($crate::parameter::AttributeType::into_value),
                    )*
                    _ => None,
                }
            }

            fn set_attribute(
                &mut self,
                name: &str,
                value: Option<$crate::parameter::AttributeValue>,
            ) -> $crate::error::Result<()> {
                match (name, value) {
                    $(
                        (stringify!($field), Some(value)) => {
                            let value = <$ty as $crate::parameter::AttributeType>::from_value(value)?;
                            self.$setter(value)
                        }
                        (stringify!($field), None) => {
                            if parameter!(@required $($req)?) {
                                return Err($crate::error::HmsaError::ValidationError(format!(
                                    "{}: required attribute {} cannot be cleared",
                                    $tag,
                                    stringify!($field)
                                )));
                            }
                            self.$field = None;
                            Ok(())
                        }
                    )*
                    (other, _) => Err($crate::error::HmsaError::ValidationError(format!(
                        "{} has no attribute {}",
                        $tag, other
                    ))),
                }
            }
        }

        impl $crate::parameter::ParameterType for $name {
            const TAG: &'static str = $tag;
            const CLASS: Option<&'static str> = parameter!(@class $($class)?);

            fn empty() -> Self {
                Self {
                    $( $field: None, )*
                    $( $( $xfield: Default::default(), )* )?
                }
            }
        }
    };
}

/// Declare an enumeration serialized as text.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// All values, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Document string.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text, )+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::HmsaError;

            fn from_str(s: &str) -> $crate::error::Result<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| {
                        $crate::error::HmsaError::ValidationError(format!(
                            "Invalid {}: {:?}",
                            stringify!($name),
                            s
                        ))
                    })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $crate::parameter::AttributeType for $name {
            const KIND: $crate::parameter::AttributeKind = $crate::parameter::AttributeKind::Enum;

            fn into_value(self) -> $crate::parameter::AttributeValue {
                $crate::parameter::AttributeValue::Enum(self.as_str().to_string())
            }

            fn from_value(value: $crate::parameter::AttributeValue) -> $crate::error::Result<Self> {
                match value {
                    $crate::parameter::AttributeValue::Enum(text) => text.parse(),
                    other => Err($crate::error::HmsaError::TypeMismatch(format!(
                        "expected {} value, got {:?}",
                        stringify!($name),
                        other.kind()
                    ))),
                }
            }
        }
    };
}
