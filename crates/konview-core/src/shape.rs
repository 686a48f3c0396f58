//! # Shapes
//!
//! Typed form of the runtime support layer's composite answers.
//!
//! The composite shape query answers with one delimited string so that a
//! single round trip carries everything needed to build a provider:
//!
//! ```text
//! 1|<buffer address>|<byte length>                 string
//! 2|<element count>                                array
//! <other>|<count>|<names>|<kind tags>|<addresses>  object
//! ```
//!
//! List-valued arguments are comma-joined. Arrays omit per-element data,
//! which is fetched later with a second query answered as
//! `<kind tags>|<addresses>`.
//!
//! Parsing is strict. A missing step, an unparsable number or a list whose
//! length disagrees with the reported count is a protocol mismatch and
//! aborts the render.

use std::fmt;

use crate::error::{KonviewError, KonviewResult};
use crate::types::Address;

/// Discriminator of a string answer.
pub const STRING_DISCRIMINATOR: &str = "1";
/// Discriminator of an array answer.
pub const ARRAY_DISCRIMINATOR: &str = "2";

/// How a field's raw bytes are reinterpreted into a native value.
///
/// The discriminants are the tags the runtime support layer emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind
{
    /// Untyped pointer; the field address itself is the value.
    PointerToVoid = 0,
    /// Reference to another managed object.
    SelfType = 1,
    /// Signed 8-bit integer.
    Int8 = 2,
    /// Signed 16-bit integer.
    Int16 = 3,
    /// Signed 32-bit integer.
    Int32 = 4,
    /// Signed 64-bit integer.
    Int64 = 5,
    /// IEEE single precision.
    Float32 = 6,
    /// IEEE double precision.
    Float64 = 7,
    /// Pointer the runtime does not describe further.
    OpaquePointer = 8,
    /// Boolean.
    Bool = 9,
    /// Storage with no native rendering.
    Unrepresentable = 10,
}

impl PrimitiveKind
{
    /// Decode a runtime kind tag.
    ///
    /// ## Errors
    ///
    /// - `UnknownPrimitiveKind`: the tag is outside `0..=10`
    pub fn from_tag(tag: i64) -> KonviewResult<Self>
    {
        Ok(match tag {
            0 => Self::PointerToVoid,
            1 => Self::SelfType,
            2 => Self::Int8,
            3 => Self::Int16,
            4 => Self::Int32,
            5 => Self::Int64,
            6 => Self::Float32,
            7 => Self::Float64,
            8 => Self::OpaquePointer,
            9 => Self::Bool,
            10 => Self::Unrepresentable,
            other => return Err(KonviewError::UnknownPrimitiveKind(other)),
        })
    }

    /// The runtime tag of this kind.
    pub fn tag(self) -> i64
    {
        self as i64
    }

    /// Whether a value of this kind is itself a managed reference.
    pub fn is_reference(self) -> bool
    {
        matches!(self, Self::SelfType | Self::OpaquePointer)
    }

    /// Expression reading a field of this kind stored at `address`.
    ///
    /// `None` for [`PrimitiveKind::Unrepresentable`].
    pub fn load_expression(self, address: Address) -> Option<String>
    {
        let pointer_type = match self {
            Self::PointerToVoid => return Some(format!("(void *){address}")),
            Self::SelfType => "ObjHeader **",
            Self::Int8 => "int8_t *",
            Self::Int16 => "int16_t *",
            Self::Int32 => "int32_t *",
            Self::Int64 => "int64_t *",
            Self::Float32 => "float *",
            Self::Float64 => "double *",
            Self::OpaquePointer => "void **",
            Self::Bool => "bool *",
            Self::Unrepresentable => return None,
        };
        Some(format!("*({pointer_type}){address}"))
    }
}

impl fmt::Display for PrimitiveKind
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let label = match self {
            Self::PointerToVoid => "void*",
            Self::SelfType => "object",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::OpaquePointer => "pointer",
            Self::Bool => "bool",
            Self::Unrepresentable => "unrepresentable",
        };
        write!(f, "{label}")
    }
}

/// Names, kinds and addresses of an object's fields, index-aligned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectLayout
{
    /// Field names in declaration order
    pub names: Vec<String>,
    /// Per-field primitive kinds
    pub kinds: Vec<PrimitiveKind>,
    /// Per-field storage addresses
    pub addresses: Vec<Address>,
}

impl ObjectLayout
{
    /// Number of fields.
    pub fn len(&self) -> usize
    {
        self.names.len()
    }

    /// Whether the object has no fields.
    pub fn is_empty(&self) -> bool
    {
        self.names.is_empty()
    }
}

/// Structure of a typed reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape
{
    /// A string whose bytes live at `buffer`.
    ///
    /// A zero `length` means the backing storage is not committed yet.
    String
    {
        /// Buffer holding the encoded text
        buffer: Address,
        /// Byte length of the buffer
        length: u32,
    },
    /// An array; element metadata is fetched lazily.
    Array
    {
        /// Number of elements
        count: usize,
    },
    /// A general object with eagerly described fields.
    Object(ObjectLayout),
}

impl Shape
{
    /// Parse a composite shape answer.
    ///
    /// ## Errors
    ///
    /// - `MalformedShape`: missing steps, bad numbers or mismatched list lengths
    /// - `UnknownPrimitiveKind`: a field kind tag is out of range
    ///
    /// ## Example
    ///
    /// ```rust
    /// use konview_core::shape::{PrimitiveKind, Shape};
    ///
    /// let shape = Shape::parse("3|2|f0,f1|4,4|0x100,0x104").unwrap();
    /// let Shape::Object(layout) = shape else { panic!() };
    /// assert_eq!(layout.names, ["f0", "f1"]);
    /// assert_eq!(layout.kinds, [PrimitiveKind::Int32, PrimitiveKind::Int32]);
    /// ```
    pub fn parse(response: &str) -> KonviewResult<Self>
    {
        let steps = Steps::split(response);
        match steps.get(0, "discriminator")?.trim() {
            STRING_DISCRIMINATOR => {
                let buffer = steps.address(1, "string buffer")?;
                let length = steps.number(2, "string length")?;
                let length = u32::try_from(length)
                    .map_err(|_| KonviewError::malformed(response, format!("string length {length} too large")))?;
                Ok(Shape::String { buffer, length })
            }
            ARRAY_DISCRIMINATOR => Ok(Shape::Array {
                count: steps.count(1, "element count")?,
            }),
            _ => {
                let count = steps.count(1, "field count")?;
                let names: Vec<String> = steps.list(2, "field names", count)?.map(str::to_string).collect();
                let kinds = parse_kinds(response, steps.list(3, "field kinds", count)?)?;
                let addresses = parse_addresses(response, steps.list(4, "field addresses", count)?)?;
                Ok(Shape::Object(ObjectLayout { names, kinds, addresses }))
            }
        }
    }
}

/// Element metadata of an array, index-aligned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArrayElements
{
    /// Per-element primitive kinds
    pub kinds: Vec<PrimitiveKind>,
    /// Per-element storage addresses
    pub addresses: Vec<Address>,
}

impl ArrayElements
{
    /// Parse a deferred element answer for an array of `count` elements.
    ///
    /// ## Errors
    ///
    /// - `MalformedShape`: missing steps or list lengths other than `count`
    /// - `UnknownPrimitiveKind`: an element kind tag is out of range
    pub fn parse(response: &str, count: usize) -> KonviewResult<Self>
    {
        let steps = Steps::split(response);
        let kinds = parse_kinds(response, steps.list(0, "element kinds", count)?)?;
        let addresses = parse_addresses(response, steps.list(1, "element addresses", count)?)?;
        Ok(Self { kinds, addresses })
    }
}

/// Top-level `|` steps of a response, with typed accessors.
struct Steps<'a>
{
    response: &'a str,
    steps: Vec<&'a str>,
}

impl<'a> Steps<'a>
{
    fn split(response: &'a str) -> Self
    {
        Self {
            response,
            steps: response.split('|').collect(),
        }
    }

    fn get(&self, index: usize, what: &str) -> KonviewResult<&'a str>
    {
        self.steps
            .get(index)
            .copied()
            .ok_or_else(|| KonviewError::malformed(self.response, format!("missing {what}")))
    }

    fn number(&self, index: usize, what: &str) -> KonviewResult<u64>
    {
        let text = self.get(index, what)?.trim();
        text.parse()
            .map_err(|_| KonviewError::malformed(self.response, format!("{what} `{text}` is not a number")))
    }

    fn count(&self, index: usize, what: &str) -> KonviewResult<usize>
    {
        let text = self.get(index, what)?.trim();
        text.parse()
            .map_err(|_| KonviewError::malformed(self.response, format!("{what} `{text}` is not a count")))
    }

    fn address(&self, index: usize, what: &str) -> KonviewResult<Address>
    {
        let text = self.get(index, what)?;
        Address::parse(text)
            .ok_or_else(|| KonviewError::malformed(self.response, format!("{what} `{text}` is not an address")))
    }

    /// Comma-separated list at `index`, which must hold exactly `expected` items.
    fn list(&self, index: usize, what: &str, expected: usize) -> KonviewResult<impl Iterator<Item = &'a str>>
    {
        let text = self.get(index, what)?;
        let items: Vec<&'a str> = if text.is_empty() {
            Vec::new()
        } else {
            text.split(',').map(str::trim).collect()
        };
        if items.len() != expected {
            return Err(KonviewError::malformed(
                self.response,
                format!("{what} has {} entries, expected {expected}", items.len()),
            ));
        }
        Ok(items.into_iter())
    }
}

fn parse_kinds<'a>(response: &str, items: impl Iterator<Item = &'a str>) -> KonviewResult<Vec<PrimitiveKind>>
{
    items
        .map(|item| {
            let tag = item
                .parse::<i64>()
                .map_err(|_| KonviewError::malformed(response, format!("kind tag `{item}` is not a number")))?;
            PrimitiveKind::from_tag(tag)
        })
        .collect()
}

fn parse_addresses<'a>(response: &str, items: impl Iterator<Item = &'a str>) -> KonviewResult<Vec<Address>>
{
    items
        .map(|item| {
            Address::parse(item)
                .ok_or_else(|| KonviewError::malformed(response, format!("`{item}` is not an address")))
        })
        .collect()
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_parse_string_shape()
    {
        assert_eq!(
            Shape::parse("1|4096|12").unwrap(),
            Shape::String {
                buffer: Address::new(4096),
                length: 12
            }
        );
    }

    #[test]
    fn test_parse_array_shape()
    {
        assert_eq!(Shape::parse("2|7").unwrap(), Shape::Array { count: 7 });
    }

    #[test]
    fn test_parse_object_shape()
    {
        let Shape::Object(layout) = Shape::parse("3|2|f0,f1|4,1|0x100,260").unwrap() else {
            panic!("expected object shape");
        };
        assert_eq!(layout.len(), 2);
        assert_eq!(layout.names, ["f0", "f1"]);
        assert_eq!(layout.kinds, [PrimitiveKind::Int32, PrimitiveKind::SelfType]);
        assert_eq!(layout.addresses, [Address::new(0x100), Address::new(0x104)]);
    }

    #[test]
    fn test_parse_empty_object()
    {
        let Shape::Object(layout) = Shape::parse("0|0|||").unwrap() else {
            panic!("expected object shape");
        };
        assert!(layout.is_empty());
    }

    #[test]
    fn test_field_count_mismatch_is_malformed()
    {
        let err = Shape::parse("3|3|f0,f1|4,4|0x100,0x104").unwrap_err();
        assert!(matches!(err, KonviewError::MalformedShape { .. }));
    }

    #[test]
    fn test_missing_steps_are_malformed()
    {
        assert!(matches!(Shape::parse("1|4096"), Err(KonviewError::MalformedShape { .. })));
        assert!(matches!(Shape::parse("3|1|f0|4"), Err(KonviewError::MalformedShape { .. })));
        assert!(matches!(Shape::parse("2|many"), Err(KonviewError::MalformedShape { .. })));
    }

    #[test]
    fn test_unknown_kind_tag()
    {
        assert!(matches!(
            Shape::parse("3|1|f0|42|0x100"),
            Err(KonviewError::UnknownPrimitiveKind(42))
        ));
    }

    #[test]
    fn test_parse_array_elements()
    {
        let elements = ArrayElements::parse("1,1,9|0x10,0x18,0x20", 3).unwrap();
        assert_eq!(elements.kinds[2], PrimitiveKind::Bool);
        assert_eq!(elements.addresses[1], Address::new(0x18));
        assert!(ArrayElements::parse("1,1|0x10,0x18", 3).is_err());
    }

    #[test]
    fn test_load_expressions()
    {
        let at = Address::new(0x100);
        assert_eq!(PrimitiveKind::Int32.load_expression(at).unwrap(), "*(int32_t *)0x100");
        assert_eq!(PrimitiveKind::SelfType.load_expression(at).unwrap(), "*(ObjHeader **)0x100");
        assert_eq!(PrimitiveKind::PointerToVoid.load_expression(at).unwrap(), "(void *)0x100");
        assert!(PrimitiveKind::Unrepresentable.load_expression(at).is_none());
    }
}
