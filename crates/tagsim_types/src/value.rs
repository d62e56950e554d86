//! Variant value type carried by every item
//!
//! [`VariantValue`] is a closed tagged union over the primitive item types and
//! homogeneous arrays of them. Arrays are stored as one typed vector per element
//! type so a mixed array cannot be represented.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{VariantKind, VariantType};

// ─────────────────────────────────────────────────────────────────────────────
// Variant Value
// ─────────────────────────────────────────────────────────────────────────────

/// Value of an item or property
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum VariantValue {
    /// No value (unsupported type during sample generation)
    #[default]
    Null,
    Bool(bool),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    DateTime(DateTime<Utc>),
    /// Homogeneous array of one primitive type
    Array(VariantArray),
}

/// Homogeneous array payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "element", content = "items")]
pub enum VariantArray {
    Bool(Vec<bool>),
    I8(Vec<i8>),
    U8(Vec<u8>),
    I16(Vec<i16>),
    U16(Vec<u16>),
    I32(Vec<i32>),
    U32(Vec<u32>),
    I64(Vec<i64>),
    U64(Vec<u64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    String(Vec<String>),
    DateTime(Vec<DateTime<Utc>>),
}

// ─────────────────────────────────────────────────────────────────────────────
// Value Accessors
// ─────────────────────────────────────────────────────────────────────────────

impl VariantValue {
    /// Canonical kind of this value, `None` for [`VariantValue::Null`]
    pub fn kind(&self) -> Option<VariantKind> {
        let ty = match self {
            VariantValue::Null => return None,
            VariantValue::Array(arr) => return Some(VariantKind::array(arr.element_type())),
            VariantValue::Bool(_) => VariantType::Boolean,
            VariantValue::I8(_) => VariantType::Character,
            VariantValue::U8(_) => VariantType::Byte,
            VariantValue::I16(_) => VariantType::Short,
            VariantValue::U16(_) => VariantType::Word,
            VariantValue::I32(_) => VariantType::Integer,
            VariantValue::U32(_) => VariantType::DoubleWord,
            VariantValue::I64(_) => VariantType::Int64,
            VariantValue::U64(_) => VariantType::UInt64,
            VariantValue::F32(_) => VariantType::SingleFloat,
            VariantValue::F64(_) => VariantType::DoubleFloat,
            VariantValue::String(_) => VariantType::String,
            VariantValue::DateTime(_) => VariantType::DateTime,
        };
        Some(VariantKind::scalar(ty))
    }

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, VariantValue::Null)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, VariantValue::Array(_))
    }

    /// Get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            VariantValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 (any integer variant that fits)
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            VariantValue::I8(v) => Some(i64::from(*v)),
            VariantValue::U8(v) => Some(i64::from(*v)),
            VariantValue::I16(v) => Some(i64::from(*v)),
            VariantValue::U16(v) => Some(i64::from(*v)),
            VariantValue::I32(v) => Some(i64::from(*v)),
            VariantValue::U32(v) => Some(i64::from(*v)),
            VariantValue::I64(v) => Some(*v),
            VariantValue::U64(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Get as f64 (also converts from integers)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            VariantValue::F32(v) => Some(f64::from(*v)),
            VariantValue::F64(v) => Some(*v),
            VariantValue::U64(v) => Some(*v as f64),
            other => other.as_i64().map(|i| i as f64),
        }
    }

    /// Get as string reference
    pub fn as_str(&self) -> Option<&str> {
        match self {
            VariantValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            VariantValue::DateTime(t) => Some(*t),
            _ => None,
        }
    }

    /// Get as array reference
    pub fn as_array(&self) -> Option<&VariantArray> {
        match self {
            VariantValue::Array(arr) => Some(arr),
            _ => None,
        }
    }
}

impl VariantArray {
    /// Primitive type of the elements
    pub fn element_type(&self) -> VariantType {
        match self {
            VariantArray::Bool(_) => VariantType::Boolean,
            VariantArray::I8(_) => VariantType::Character,
            VariantArray::U8(_) => VariantType::Byte,
            VariantArray::I16(_) => VariantType::Short,
            VariantArray::U16(_) => VariantType::Word,
            VariantArray::I32(_) => VariantType::Integer,
            VariantArray::U32(_) => VariantType::DoubleWord,
            VariantArray::I64(_) => VariantType::Int64,
            VariantArray::U64(_) => VariantType::UInt64,
            VariantArray::F32(_) => VariantType::SingleFloat,
            VariantArray::F64(_) => VariantType::DoubleFloat,
            VariantArray::String(_) => VariantType::String,
            VariantArray::DateTime(_) => VariantType::DateTime,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            VariantArray::Bool(v) => v.len(),
            VariantArray::I8(v) => v.len(),
            VariantArray::U8(v) => v.len(),
            VariantArray::I16(v) => v.len(),
            VariantArray::U16(v) => v.len(),
            VariantArray::I32(v) => v.len(),
            VariantArray::U32(v) => v.len(),
            VariantArray::I64(v) => v.len(),
            VariantArray::U64(v) => v.len(),
            VariantArray::F32(v) => v.len(),
            VariantArray::F64(v) => v.len(),
            VariantArray::String(v) => v.len(),
            VariantArray::DateTime(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get an element as a scalar value
    pub fn get(&self, index: usize) -> Option<VariantValue> {
        match self {
            VariantArray::Bool(v) => v.get(index).copied().map(VariantValue::Bool),
            VariantArray::I8(v) => v.get(index).copied().map(VariantValue::I8),
            VariantArray::U8(v) => v.get(index).copied().map(VariantValue::U8),
            VariantArray::I16(v) => v.get(index).copied().map(VariantValue::I16),
            VariantArray::U16(v) => v.get(index).copied().map(VariantValue::U16),
            VariantArray::I32(v) => v.get(index).copied().map(VariantValue::I32),
            VariantArray::U32(v) => v.get(index).copied().map(VariantValue::U32),
            VariantArray::I64(v) => v.get(index).copied().map(VariantValue::I64),
            VariantArray::U64(v) => v.get(index).copied().map(VariantValue::U64),
            VariantArray::F32(v) => v.get(index).copied().map(VariantValue::F32),
            VariantArray::F64(v) => v.get(index).copied().map(VariantValue::F64),
            VariantArray::String(v) => v.get(index).cloned().map(VariantValue::String),
            VariantArray::DateTime(v) => v.get(index).copied().map(VariantValue::DateTime),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// From Implementations
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! impl_variant_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for VariantValue {
                fn from(v: $ty) -> Self {
                    VariantValue::$variant(v)
                }
            }

            impl From<Vec<$ty>> for VariantArray {
                fn from(v: Vec<$ty>) -> Self {
                    VariantArray::$variant(v)
                }
            }

            impl From<Vec<$ty>> for VariantValue {
                fn from(v: Vec<$ty>) -> Self {
                    VariantValue::Array(VariantArray::$variant(v))
                }
            }
        )*
    };
}

impl_variant_from! {
    bool => Bool,
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => String,
    DateTime<Utc> => DateTime,
}

impl From<&str> for VariantValue {
    fn from(v: &str) -> Self {
        VariantValue::String(v.to_string())
    }
}

impl From<VariantArray> for VariantValue {
    fn from(arr: VariantArray) -> Self {
        VariantValue::Array(arr)
    }
}

impl<T: Into<VariantValue>> From<Option<T>> for VariantValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => VariantValue::Null,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_scalar_kinds() {
        assert_eq!(VariantValue::from(345i16).kind(), Some(VariantType::Short.scalar()));
        assert_eq!(VariantValue::from(23u8).kind(), Some(VariantType::Byte.scalar()));
        assert_eq!(VariantValue::from(76i8).kind(), Some(VariantType::Character.scalar()));
        assert_eq!(VariantValue::from("x").kind(), Some(VariantType::String.scalar()));
        assert_eq!(VariantValue::Null.kind(), None);
    }

    #[test]
    fn test_array_kind_and_access() {
        let v = VariantValue::from(vec![1u16, 2, 3, 4]);
        assert_eq!(v.kind(), Some(VariantType::Word.array()));

        let arr = v.as_array().unwrap();
        assert_eq!(arr.len(), 4);
        assert_eq!(arr.get(2), Some(VariantValue::U16(3)));
        assert_eq!(arr.get(4), None);
    }

    #[test]
    fn test_numeric_accessors() {
        assert_eq!(VariantValue::from(39874u16).as_i64(), Some(39874));
        assert_eq!(VariantValue::from(u64::MAX).as_i64(), None);
        assert_eq!(VariantValue::from(20196).as_f64(), Some(20196.0));
        assert_eq!(VariantValue::from(8.5f32).as_f64(), Some(8.5));
        assert_eq!(VariantValue::from("CBM").as_f64(), None);
    }

    #[test]
    fn test_option_conversion() {
        assert!(VariantValue::from(None::<f64>).is_null());
        assert_eq!(VariantValue::from(Some(1.5)), VariantValue::F64(1.5));
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(VariantValue::from(25.45)).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "F64", "value": 25.45 }));

        let stamp = Utc.with_ymd_and_hms(1900, 1, 1, 12, 0, 0).unwrap();
        let original = VariantValue::from(vec![stamp, stamp]);
        let text = serde_json::to_string(&original).unwrap();
        let back: VariantValue = serde_json::from_str(&text).unwrap();
        assert_eq!(back, original);
    }
}
