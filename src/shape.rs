//! Type shapes - the describable view of a type that models are built from.
//!
//! Rust has no runtime reflection, so every type that can appear in a read or
//! write sample describes itself through [`Describe`]. The description is a
//! [`TypeShape`] tree over four variants: primitive, sequence, optional and
//! record. Record fields are produced lazily, which lets a record refer to
//! itself (directly or through other records) without building an infinite
//! tree.
//!
//! # Example
//!
//! ```
//! use swagger_decl::shape::{Describe, TypeShape};
//!
//! struct Book {
//!     title: String,
//!     sequel: Option<Box<Book>>,
//! }
//!
//! impl Describe for Book {
//!     fn shape() -> TypeShape {
//!         TypeShape::record::<Self>()
//!             .field::<String>("title")
//!             .field::<Option<Box<Book>>>("sequel")
//!             .build()
//!     }
//! }
//!
//! assert_eq!(TypeShape::of::<Vec<Book>>().to_string(), "array[Book]");
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Primitive types and how they are named in a declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    String,
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    F32,
    F64,
    Bool,
    Char,
    /// A type nothing is known about; it is named after itself
    Opaque(String),
}

impl PrimitiveType {
    /// Parse a Rust primitive type name
    pub fn parse(type_name: &str) -> Option<PrimitiveType> {
        match type_name {
            "String" | "str" => Some(PrimitiveType::String),
            "i8" => Some(PrimitiveType::I8),
            "i16" => Some(PrimitiveType::I16),
            "i32" => Some(PrimitiveType::I32),
            "i64" => Some(PrimitiveType::I64),
            "i128" => Some(PrimitiveType::I128),
            "isize" => Some(PrimitiveType::Isize),
            "u8" => Some(PrimitiveType::U8),
            "u16" => Some(PrimitiveType::U16),
            "u32" => Some(PrimitiveType::U32),
            "u64" => Some(PrimitiveType::U64),
            "u128" => Some(PrimitiveType::U128),
            "usize" => Some(PrimitiveType::Usize),
            "f32" => Some(PrimitiveType::F32),
            "f64" => Some(PrimitiveType::F64),
            "bool" => Some(PrimitiveType::Bool),
            "char" => Some(PrimitiveType::Char),
            _ => None,
        }
    }

    /// The Swagger data type name
    pub fn swagger_type(&self) -> &str {
        match self {
            PrimitiveType::String | PrimitiveType::Char => "string",
            PrimitiveType::I8
            | PrimitiveType::I16
            | PrimitiveType::I32
            | PrimitiveType::I64
            | PrimitiveType::I128
            | PrimitiveType::Isize
            | PrimitiveType::U8
            | PrimitiveType::U16
            | PrimitiveType::U32
            | PrimitiveType::U64
            | PrimitiveType::U128
            | PrimitiveType::Usize => "integer",
            PrimitiveType::F32 | PrimitiveType::F64 => "number",
            PrimitiveType::Bool => "boolean",
            PrimitiveType::Opaque(name) => name,
        }
    }

    /// The Swagger format qualifier, if the type has one
    pub fn swagger_format(&self) -> Option<&'static str> {
        match self {
            PrimitiveType::I8
            | PrimitiveType::I16
            | PrimitiveType::I32
            | PrimitiveType::U8
            | PrimitiveType::U16
            | PrimitiveType::U32 => Some("int32"),
            PrimitiveType::I64
            | PrimitiveType::I128
            | PrimitiveType::Isize
            | PrimitiveType::U64
            | PrimitiveType::U128
            | PrimitiveType::Usize => Some("int64"),
            PrimitiveType::F32 => Some("float"),
            PrimitiveType::F64 => Some("double"),
            _ => None,
        }
    }
}

/// Produces the shape of a field on demand
pub type ShapeThunk = Arc<dyn Fn() -> TypeShape + Send + Sync>;

/// A named field of a record
#[derive(Clone)]
pub struct FieldShape {
    /// Property name as it appears in the model
    pub name: String,
    shape: ShapeThunk,
}

impl FieldShape {
    pub fn new(name: impl Into<String>, shape: ShapeThunk) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }

    /// Materialize the shape of this field
    pub fn shape(&self) -> TypeShape {
        (self.shape)()
    }
}

impl fmt::Debug for FieldShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldShape")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A structured record with named fields
#[derive(Debug, Clone)]
pub struct RecordShape {
    /// Model name the record is registered under
    pub name: String,
    /// Stable identifier of the underlying type, used to tell apart two
    /// different types that share a model name
    pub identity: String,
    pub fields: Vec<FieldShape>,
}

/// Shape of a type as far as declarations are concerned
#[derive(Debug, Clone)]
pub enum TypeShape {
    Primitive(PrimitiveType),
    Sequence(Box<TypeShape>),
    Optional(Box<TypeShape>),
    Record(RecordShape),
}

impl TypeShape {
    /// Shape of a `Describe` type
    pub fn of<T: Describe + ?Sized>() -> TypeShape {
        T::shape()
    }

    /// Shape of the type of a sample value
    pub fn of_sample<T: Describe + ?Sized>(_sample: &T) -> TypeShape {
        T::shape()
    }

    /// Start describing a record named after `T` with module paths stripped
    pub fn record<T: ?Sized>() -> RecordBuilder {
        let identity = std::any::type_name::<T>();
        RecordBuilder::new(short_type_name(identity), identity)
    }

    /// Start describing a record of `T` under an explicit model name
    pub fn record_named<T: ?Sized>(name: impl Into<String>) -> RecordBuilder {
        RecordBuilder::new(name, std::any::type_name::<T>())
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, TypeShape::Sequence(_))
    }
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeShape::Primitive(primitive) => f.write_str(primitive.swagger_type()),
            TypeShape::Sequence(inner) => write!(f, "array[{}]", inner),
            TypeShape::Optional(inner) => write!(f, "{}", inner),
            TypeShape::Record(record) => f.write_str(&record.name),
        }
    }
}

/// Builder for record shapes
#[derive(Debug)]
pub struct RecordBuilder {
    record: RecordShape,
}

impl RecordBuilder {
    pub fn new(name: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            record: RecordShape {
                name: name.into(),
                identity: identity.into(),
                fields: Vec::new(),
            },
        }
    }

    /// Add a field whose type is described by `T`
    pub fn field<T: Describe + ?Sized + 'static>(self, name: &str) -> Self {
        self.field_with(name, T::shape)
    }

    /// Add a field whose shape is produced by `shape`
    pub fn field_with<F>(mut self, name: &str, shape: F) -> Self
    where
        F: Fn() -> TypeShape + Send + Sync + 'static,
    {
        self.record.fields.push(FieldShape::new(name, Arc::new(shape)));
        self
    }

    pub fn build(self) -> TypeShape {
        TypeShape::Record(self.record)
    }
}

/// Types that can describe their own shape
pub trait Describe {
    fn shape() -> TypeShape;
}

macro_rules! describe_primitive {
    ($($ty:ty => $primitive:ident),* $(,)?) => {
        $(
            impl Describe for $ty {
                fn shape() -> TypeShape {
                    TypeShape::Primitive(PrimitiveType::$primitive)
                }
            }
        )*
    };
}

describe_primitive! {
    String => String,
    str => String,
    char => Char,
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    usize => Usize,
    f32 => F32,
    f64 => F64,
}

impl<T: Describe> Describe for Vec<T> {
    fn shape() -> TypeShape {
        TypeShape::Sequence(Box::new(T::shape()))
    }
}

impl<T: Describe> Describe for VecDeque<T> {
    fn shape() -> TypeShape {
        TypeShape::Sequence(Box::new(T::shape()))
    }
}

impl<T: Describe> Describe for [T] {
    fn shape() -> TypeShape {
        TypeShape::Sequence(Box::new(T::shape()))
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn shape() -> TypeShape {
        TypeShape::Sequence(Box::new(T::shape()))
    }
}

impl<T: Describe> Describe for Option<T> {
    fn shape() -> TypeShape {
        TypeShape::Optional(Box::new(T::shape()))
    }
}

impl<T: Describe + ?Sized> Describe for Box<T> {
    fn shape() -> TypeShape {
        T::shape()
    }
}

impl<T: Describe + ?Sized> Describe for Rc<T> {
    fn shape() -> TypeShape {
        T::shape()
    }
}

impl<T: Describe + ?Sized> Describe for Arc<T> {
    fn shape() -> TypeShape {
        T::shape()
    }
}

impl<T: Describe + ?Sized> Describe for &T {
    fn shape() -> TypeShape {
        T::shape()
    }
}

/// Strip module paths from a type name, keeping generic arguments.
///
/// `app::books::Page<app::books::Book>` becomes `Page<Book>`.
pub fn short_type_name(full: &str) -> String {
    let mut short = String::with_capacity(full.len());
    let mut segment = String::new();
    for c in full.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            segment.push(c);
        } else {
            short.push_str(last_path_segment(&segment));
            segment.clear();
            short.push(c);
        }
    }
    short.push_str(last_path_segment(&segment));
    short
}

fn last_path_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Node {
        _children: Vec<Node>,
    }

    impl Describe for Node {
        fn shape() -> TypeShape {
            TypeShape::record::<Self>()
                .field::<Vec<Node>>("children")
                .build()
        }
    }

    #[test]
    fn test_short_type_name_strips_modules() {
        assert_eq!(short_type_name("app::books::Book"), "Book");
        assert_eq!(short_type_name("Book"), "Book");
        assert_eq!(
            short_type_name("app::Page<app::books::Book>"),
            "Page<Book>"
        );
        assert_eq!(
            short_type_name("std::collections::HashMap<alloc::string::String, u8>"),
            "HashMap<String, u8>"
        );
    }

    #[test]
    fn test_record_named_after_type() {
        match TypeShape::of::<Node>() {
            TypeShape::Record(record) => {
                assert_eq!(record.name, "Node");
                assert!(record.identity.ends_with("Node"));
                assert_eq!(record.fields.len(), 1);
                assert_eq!(record.fields[0].name, "children");
            }
            other => panic!("Expected record, got {:?}", other),
        }
    }

    #[test]
    fn test_self_referential_field_is_lazy() {
        let shape = TypeShape::of::<Node>();
        let TypeShape::Record(record) = shape else {
            panic!("Expected record");
        };
        let field = record.fields[0].shape();
        assert_eq!(field.to_string(), "array[Node]");
    }

    #[test]
    fn test_smart_pointers_are_transparent() {
        assert_eq!(TypeShape::of::<Box<u32>>().to_string(), "integer");
        assert_eq!(TypeShape::of::<Arc<Node>>().to_string(), "Node");
        assert_eq!(TypeShape::of::<&str>().to_string(), "string");
    }

    #[test]
    fn test_collections_and_options() {
        assert!(TypeShape::of::<Vec<bool>>().is_sequence());
        assert!(TypeShape::of::<[u8; 4]>().is_sequence());
        assert!(matches!(
            TypeShape::of::<Option<Vec<bool>>>(),
            TypeShape::Optional(_)
        ));
        assert_eq!(TypeShape::of_sample(&vec![1.5f64]).to_string(), "array[number]");
    }

    #[test]
    fn test_primitive_formats() {
        assert_eq!(PrimitiveType::I32.swagger_format(), Some("int32"));
        assert_eq!(PrimitiveType::U64.swagger_format(), Some("int64"));
        assert_eq!(PrimitiveType::F64.swagger_format(), Some("double"));
        assert_eq!(PrimitiveType::String.swagger_format(), None);
        assert_eq!(PrimitiveType::Opaque("Uuid".into()).swagger_type(), "Uuid");
        assert_eq!(PrimitiveType::parse("usize"), Some(PrimitiveType::Usize));
        assert_eq!(PrimitiveType::parse("Book"), None);
    }
}
