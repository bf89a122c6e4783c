// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Container values and their wire type tags.

use super::{Bundle, PersistableBundle};
use crate::binder::IBinder;
use crate::parcel::FileDescriptor;
use std::fmt;
use std::sync::Arc;

/// Wire type tag written ahead of every value payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ValueTag {
    Null = -1,
    String = 0,
    Int = 1,
    Bundle = 3,
    Short = 5,
    Long = 6,
    Float = 7,
    Double = 8,
    Bool = 9,
    List = 11,
    ByteArray = 13,
    StringArray = 14,
    Binder = 15,
    BundleArray = 16,
    IntArray = 18,
    LongArray = 19,
    Byte = 20,
    BoolArray = 23,
    PersistableBundle = 25,
    DoubleArray = 28,
    Char = 29,
    ShortArray = 30,
    CharArray = 31,
    FloatArray = 32,
    FileDescriptor = 33,
}

impl ValueTag {
    pub fn from_i32(value: i32) -> Option<Self> {
        let tag = match value {
            -1 => Self::Null,
            0 => Self::String,
            1 => Self::Int,
            3 => Self::Bundle,
            5 => Self::Short,
            6 => Self::Long,
            7 => Self::Float,
            8 => Self::Double,
            9 => Self::Bool,
            11 => Self::List,
            13 => Self::ByteArray,
            14 => Self::StringArray,
            15 => Self::Binder,
            16 => Self::BundleArray,
            18 => Self::IntArray,
            19 => Self::LongArray,
            20 => Self::Byte,
            23 => Self::BoolArray,
            25 => Self::PersistableBundle,
            28 => Self::DoubleArray,
            29 => Self::Char,
            30 => Self::ShortArray,
            31 => Self::CharArray,
            32 => Self::FloatArray,
            33 => Self::FileDescriptor,
            _ => return None,
        };
        Some(tag)
    }

    pub fn as_i32(self) -> i32 {
        self as i32 // SAFETY: #[repr(i32)] on enum declaration ensures all variants fit in i32
    }

    /// Type name used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::String => "String",
            Self::Int => "Integer",
            Self::Bundle => "Bundle",
            Self::Short => "Short",
            Self::Long => "Long",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::Bool => "Boolean",
            Self::List => "List",
            Self::ByteArray => "byte[]",
            Self::StringArray => "String[]",
            Self::Binder => "IBinder",
            Self::BundleArray => "Bundle[]",
            Self::IntArray => "int[]",
            Self::LongArray => "long[]",
            Self::Byte => "Byte",
            Self::BoolArray => "boolean[]",
            Self::PersistableBundle => "PersistableBundle",
            Self::DoubleArray => "double[]",
            Self::Char => "Character",
            Self::ShortArray => "short[]",
            Self::CharArray => "char[]",
            Self::FloatArray => "float[]",
            Self::FileDescriptor => "FileDescriptor",
        }
    }
}

/// A single container value.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Char(u16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Bundle(Arc<Bundle>),
    PersistableBundle(Arc<PersistableBundle>),
    FileDescriptor(Arc<FileDescriptor>),
    Binder(Arc<dyn IBinder>),
    BoolArray(Vec<bool>),
    ByteArray(Vec<u8>),
    ShortArray(Vec<i16>),
    CharArray(Vec<u16>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
    FloatArray(Vec<f32>),
    DoubleArray(Vec<f64>),
    StringArray(Vec<Option<String>>),
    BundleArray(Vec<Option<Arc<Bundle>>>),
    List(Vec<Value>),
}

impl Value {
    pub fn tag(&self) -> ValueTag {
        match self {
            Value::Null => ValueTag::Null,
            Value::Bool(_) => ValueTag::Bool,
            Value::Byte(_) => ValueTag::Byte,
            Value::Short(_) => ValueTag::Short,
            Value::Char(_) => ValueTag::Char,
            Value::Int(_) => ValueTag::Int,
            Value::Long(_) => ValueTag::Long,
            Value::Float(_) => ValueTag::Float,
            Value::Double(_) => ValueTag::Double,
            Value::String(_) => ValueTag::String,
            Value::Bundle(_) => ValueTag::Bundle,
            Value::PersistableBundle(_) => ValueTag::PersistableBundle,
            Value::FileDescriptor(_) => ValueTag::FileDescriptor,
            Value::Binder(_) => ValueTag::Binder,
            Value::BoolArray(_) => ValueTag::BoolArray,
            Value::ByteArray(_) => ValueTag::ByteArray,
            Value::ShortArray(_) => ValueTag::ShortArray,
            Value::CharArray(_) => ValueTag::CharArray,
            Value::IntArray(_) => ValueTag::IntArray,
            Value::LongArray(_) => ValueTag::LongArray,
            Value::FloatArray(_) => ValueTag::FloatArray,
            Value::DoubleArray(_) => ValueTag::DoubleArray,
            Value::StringArray(_) => ValueTag::StringArray,
            Value::BundleArray(_) => ValueTag::BundleArray,
            Value::List(_) => ValueTag::List,
        }
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.tag().name()
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Values that may hide file descriptors. Storing one invalidates the
    /// container's cached fd answer.
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            Value::Bundle(_)
                | Value::PersistableBundle(_)
                | Value::FileDescriptor(_)
                | Value::Binder(_)
                | Value::BundleArray(_)
                | Value::List(_)
        )
    }

    /// Allowed inside a [`PersistableBundle`].
    pub fn is_persistable(&self) -> bool {
        matches!(
            self,
            Value::Null
                | Value::Bool(_)
                | Value::Int(_)
                | Value::Long(_)
                | Value::Double(_)
                | Value::String(_)
                | Value::BoolArray(_)
                | Value::IntArray(_)
                | Value::LongArray(_)
                | Value::DoubleArray(_)
                | Value::StringArray(_)
                | Value::PersistableBundle(_)
        )
    }

    /// Recursive file descriptor scan.
    pub fn has_file_descriptors(&self) -> bool {
        match self {
            Value::FileDescriptor(_) => true,
            Value::Bundle(b) => b.has_file_descriptors(),
            Value::BundleArray(items) => items.iter().flatten().any(|b| b.has_file_descriptors()),
            Value::List(items) => items.iter().any(Value::has_file_descriptors),
            _ => false,
        }
    }

    /// Copy with nested containers duplicated. Handles stay shared.
    pub fn deep_copy(&self) -> Value {
        match self {
            Value::Bundle(b) => Value::Bundle(Arc::new(b.deep_copy())),
            Value::PersistableBundle(b) => Value::PersistableBundle(Arc::new(b.deep_copy())),
            Value::BundleArray(items) => Value::BundleArray(
                items
                    .iter()
                    .map(|b| b.as_ref().map(|b| Arc::new(b.deep_copy())))
                    .collect(),
            ),
            Value::List(items) => Value::List(items.iter().map(Value::deep_copy).collect()),
            other => other.clone(),
        }
    }
}

fn float_slice_eq(a: &[f32], b: &[f32]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
}

fn double_slice_eq(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
}

/// Floats compare bitwise (NaN equals itself). Handles compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bundle(a), Value::Bundle(b)) => a == b,
            (Value::PersistableBundle(a), Value::PersistableBundle(b)) => a == b,
            (Value::FileDescriptor(a), Value::FileDescriptor(b)) => Arc::ptr_eq(a, b),
            (Value::Binder(a), Value::Binder(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            (Value::BoolArray(a), Value::BoolArray(b)) => a == b,
            (Value::ByteArray(a), Value::ByteArray(b)) => a == b,
            (Value::ShortArray(a), Value::ShortArray(b)) => a == b,
            (Value::CharArray(a), Value::CharArray(b)) => a == b,
            (Value::IntArray(a), Value::IntArray(b)) => a == b,
            (Value::LongArray(a), Value::LongArray(b)) => a == b,
            (Value::FloatArray(a), Value::FloatArray(b)) => float_slice_eq(a, b),
            (Value::DoubleArray(a), Value::DoubleArray(b)) => double_slice_eq(a, b),
            (Value::StringArray(a), Value::StringArray(b)) => a == b,
            (Value::BundleArray(a), Value::BundleArray(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            _ => false,
        }
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    f.write_str("]")
}

fn write_nullable_list<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: &[Option<T>],
) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        match item {
            Some(item) => write!(f, "{}", item)?,
            None => f.write_str("null")?,
        }
    }
    f.write_str("]")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Byte(v) => write!(f, "{}", v),
            Value::Short(v) => write!(f, "{}", v),
            Value::Char(v) => match char::from_u32(u32::from(*v)) {
                Some(c) => write!(f, "{}", c),
                None => write!(f, "\\u{:04x}", v),
            },
            Value::Int(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::String(v) => f.write_str(v),
            Value::Bundle(b) => write!(f, "{}", b),
            Value::PersistableBundle(b) => write!(f, "{}", b),
            Value::FileDescriptor(fd) => write!(f, "{:?}", fd),
            Value::Binder(b) => write!(f, "{:?}", b),
            Value::BoolArray(v) => write_list(f, v),
            Value::ByteArray(v) => write_list(f, v),
            Value::ShortArray(v) => write_list(f, v),
            Value::CharArray(v) => write_list(f, v),
            Value::IntArray(v) => write_list(f, v),
            Value::LongArray(v) => write_list(f, v),
            Value::FloatArray(v) => write_list(f, v),
            Value::DoubleArray(v) => write_list(f, v),
            Value::StringArray(v) => write_nullable_list(f, v),
            Value::BundleArray(v) => write_nullable_list(f, v),
            Value::List(v) => write_list(f, v),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Null => f.write_str("Null"),
            other => write!(f, "{}({})", other.type_name(), other),
        }
    }
}

// =======================================================================
// Typed extraction
// =======================================================================

/// Typed view of a [`Value`]. No numeric promotion: an `Int` is never read
/// back as a `Long`.
pub trait FromValue: Sized {
    /// Expected type, for mismatch diagnostics.
    const TYPE_NAME: &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! impl_value_conversions {
    ($variant:ident, $type:ty, $tag:ident) => {
        impl FromValue for $type {
            const TYPE_NAME: &'static str = ValueTag::$tag.name();

            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }

        impl From<$type> for Value {
            fn from(v: $type) -> Self {
                Value::$variant(v)
            }
        }
    };
}

impl_value_conversions!(Bool, bool, Bool);
impl_value_conversions!(Byte, i8, Byte);
impl_value_conversions!(Short, i16, Short);
impl_value_conversions!(Char, u16, Char);
impl_value_conversions!(Int, i32, Int);
impl_value_conversions!(Long, i64, Long);
impl_value_conversions!(Float, f32, Float);
impl_value_conversions!(Double, f64, Double);
impl_value_conversions!(String, String, String);
impl_value_conversions!(Bundle, Arc<Bundle>, Bundle);
impl_value_conversions!(PersistableBundle, Arc<PersistableBundle>, PersistableBundle);
impl_value_conversions!(FileDescriptor, Arc<FileDescriptor>, FileDescriptor);
impl_value_conversions!(Binder, Arc<dyn IBinder>, Binder);
impl_value_conversions!(BoolArray, Vec<bool>, BoolArray);
impl_value_conversions!(ByteArray, Vec<u8>, ByteArray);
impl_value_conversions!(ShortArray, Vec<i16>, ShortArray);
impl_value_conversions!(CharArray, Vec<u16>, CharArray);
impl_value_conversions!(IntArray, Vec<i32>, IntArray);
impl_value_conversions!(LongArray, Vec<i64>, LongArray);
impl_value_conversions!(FloatArray, Vec<f32>, FloatArray);
impl_value_conversions!(DoubleArray, Vec<f64>, DoubleArray);
impl_value_conversions!(StringArray, Vec<Option<String>>, StringArray);
impl_value_conversions!(BundleArray, Vec<Option<Arc<Bundle>>>, BundleArray);
impl_value_conversions!(List, Vec<Value>, List);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<Bundle> for Value {
    fn from(v: Bundle) -> Self {
        Value::Bundle(Arc::new(v))
    }
}

impl From<PersistableBundle> for Value {
    fn from(v: PersistableBundle) -> Self {
        Value::PersistableBundle(Arc::new(v))
    }
}

impl From<FileDescriptor> for Value {
    fn from(v: FileDescriptor) -> Self {
        Value::FileDescriptor(Arc::new(v))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
