//! Boxed runtime values
//!
//! Every value crossing the runtime boundary is a [`BoxedValue`]: a
//! reference-counted handle to an immutable [`Object`] carrying a type tag
//! and a payload.
//!
//! ## Layout
//!
//! `Object` is `#[repr(C)]` and starts with a fixed header readable from
//! compiled code:
//!
//! ```text
//! offset 0: magic (u32)  = OBJECT_MAGIC
//! offset 4: tag   (u32)  = TypeTag as u32
//! ```
//!
//! The tag is always equal to the payload's own kind; [`crate::sanity`]
//! checks both header words before any operation touches the payload.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Marks a live runtime object.
pub const OBJECT_MAGIC: u32 = 0xB215_C0DE;

/// Runtime type tag
///
/// Raw values are stable: compiled code stores and compares them.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeTag {
    Null = 0,
    Bool = 1,
    Byte = 2,
    Char = 3,
    Int = 4,
    Real = 5,
    Str = 6,
    List = 7,
    Record = 8,
}

impl TypeTag {
    pub const ALL: [TypeTag; 9] = [
        TypeTag::Null,
        TypeTag::Bool,
        TypeTag::Byte,
        TypeTag::Char,
        TypeTag::Int,
        TypeTag::Real,
        TypeTag::Str,
        TypeTag::List,
        TypeTag::Record,
    ];

    /// Decode a raw tag from an untrusted producer.
    pub fn from_raw(raw: u32) -> Option<TypeTag> {
        TypeTag::ALL.get(raw as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Null => "null",
            TypeTag::Bool => "bool",
            TypeTag::Byte => "byte",
            TypeTag::Char => "char",
            TypeTag::Int => "int",
            TypeTag::Real => "real",
            TypeTag::Str => "string",
            TypeTag::List => "list",
            TypeTag::Record => "record",
        }
    }

    pub fn from_name(name: &str) -> Option<TypeTag> {
        TypeTag::ALL.iter().copied().find(|tag| tag.name() == name)
    }

    /// Tags whose payload is a single integer-like scalar.
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            TypeTag::Null | TypeTag::Bool | TypeTag::Byte | TypeTag::Char | TypeTag::Int
        )
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload of a boxed value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Byte(u8),
    Char(char),
    Int(i64),
    Real(f64),
    Str(String),
    List(Vec<BoxedValue>),
    Record(BTreeMap<String, BoxedValue>),
}

impl Value {
    pub fn tag(&self) -> TypeTag {
        match self {
            Value::Null => TypeTag::Null,
            Value::Bool(_) => TypeTag::Bool,
            Value::Byte(_) => TypeTag::Byte,
            Value::Char(_) => TypeTag::Char,
            Value::Int(_) => TypeTag::Int,
            Value::Real(_) => TypeTag::Real,
            Value::Str(_) => TypeTag::Str,
            Value::List(_) => TypeTag::List,
            Value::Record(_) => TypeTag::Record,
        }
    }

    /// The payload as the machine's native integer, for scalar tags.
    pub fn as_scalar(&self) -> Option<i64> {
        match *self {
            Value::Null => Some(0),
            Value::Bool(b) => Some(b as i64),
            Value::Byte(b) => Some(b as i64),
            Value::Char(c) => Some(c as i64),
            Value::Int(i) => Some(i),
            Value::Real(_) | Value::Str(_) | Value::List(_) | Value::Record(_) => None,
        }
    }
}

/// Heap object behind a [`BoxedValue`]
#[repr(C)]
#[derive(Debug)]
pub struct Object {
    magic: u32,
    tag: TypeTag,
    value: Value,
}

impl Object {
    pub(crate) fn new(value: Value) -> Self {
        Object {
            magic: OBJECT_MAGIC,
            tag: value.tag(),
            value,
        }
    }

    pub fn magic(&self) -> u32 {
        self.magic
    }

    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Header words of an [`Object`], as seen through a raw pointer.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawHeader {
    pub magic: u32,
    pub tag: u32,
}

/// Uniform handle for every runtime value
///
/// Cloning shares the immutable object; it never copies the payload.
#[derive(Clone)]
pub struct BoxedValue(Arc<Object>);

impl BoxedValue {
    /// Box a payload. Range preconditions live in [`crate::factory`].
    pub(crate) fn from_value(value: Value) -> Self {
        BoxedValue(Arc::new(Object::new(value)))
    }

    pub fn tag(&self) -> TypeTag {
        self.0.tag
    }

    pub fn value(&self) -> &Value {
        &self.0.value
    }

    pub fn object(&self) -> &Object {
        &self.0
    }

    pub fn as_scalar(&self) -> Option<i64> {
        self.0.value.as_scalar()
    }

    pub fn ptr_eq(&self, other: &BoxedValue) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Hand ownership to compiled code.
    pub fn into_raw(self) -> *const Object {
        Arc::into_raw(self.0)
    }

    /// Take back ownership of a handle produced by [`BoxedValue::into_raw`].
    ///
    /// # Safety
    /// `ptr` must come from `into_raw` and must not be used afterwards.
    pub unsafe fn from_raw(ptr: *const Object) -> Self {
        BoxedValue(Arc::from_raw(ptr))
    }

    /// Borrow a raw handle as a new owned handle without consuming it.
    ///
    /// # Safety
    /// `ptr` must come from `into_raw` and still be live.
    pub unsafe fn clone_from_raw(ptr: *const Object) -> Self {
        Arc::increment_strong_count(ptr);
        BoxedValue(Arc::from_raw(ptr))
    }
}

impl PartialEq for BoxedValue {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0.value == other.0.value
    }
}

impl fmt::Debug for BoxedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.tag(), self)
    }
}

impl fmt::Display for BoxedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Byte(b) => write!(f, "{:08b}b", b),
            Value::Char(c) => write!(f, "'{}'", c.escape_default()),
            Value::Int(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{:?}", r),
            Value::Str(s) => write!(f, "\"{}\"", s.escape_default()),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Record(fields) => {
                write!(f, "{{")?;
                for (i, (name, field)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}:{}", name, field)?;
                }
                write!(f, "}}")
            }
        }
    }
}
