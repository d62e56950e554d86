// Tagsim Types - Type tags and item metadata
//
// These types describe items without carrying their live value: the primitive
// type tags, quality flags, access rights and the opaque identifiers handed out
// to the protocol shell.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Variant Type Tags
// ─────────────────────────────────────────────────────────────────────────────

/// Primitive type of an item value
///
/// The variant order matches the order in which the sample catalog creates
/// its items, see [`VariantType::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariantType {
    /// 16-bit signed integer
    Short,
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    Int64,
    /// 64-bit unsigned integer
    UInt64,
    /// 32-bit floating point
    SingleFloat,
    /// 64-bit floating point
    DoubleFloat,
    /// UTF-8 string
    String,
    /// 8-bit unsigned integer
    Byte,
    /// 8-bit signed integer
    Character,
    /// 16-bit unsigned integer
    Word,
    /// 32-bit unsigned integer
    DoubleWord,
    /// Boolean
    Boolean,
    /// UTC timestamp
    DateTime,
}

impl VariantType {
    /// Every supported type, in catalog order
    pub const ALL: [VariantType; 13] = [
        VariantType::Short,
        VariantType::Integer,
        VariantType::Int64,
        VariantType::UInt64,
        VariantType::SingleFloat,
        VariantType::DoubleFloat,
        VariantType::String,
        VariantType::Byte,
        VariantType::Character,
        VariantType::Word,
        VariantType::DoubleWord,
        VariantType::Boolean,
        VariantType::DateTime,
    ];

    /// Name used as the last segment of catalog item names
    pub fn name(self) -> &'static str {
        match self {
            VariantType::Short => "Short",
            VariantType::Integer => "Integer",
            VariantType::Int64 => "Int64",
            VariantType::UInt64 => "UInt64",
            VariantType::SingleFloat => "SingleFloat",
            VariantType::DoubleFloat => "DoubleFloat",
            VariantType::String => "String",
            VariantType::Byte => "Byte",
            VariantType::Character => "Character",
            VariantType::Word => "Word",
            VariantType::DoubleWord => "DoubleWord",
            VariantType::Boolean => "Boolean",
            VariantType::DateTime => "DateTime",
        }
    }

    /// Scalar kind of this type
    pub fn scalar(self) -> VariantKind {
        VariantKind::scalar(self)
    }

    /// Array kind of this type
    pub fn array(self) -> VariantKind {
        VariantKind::array(self)
    }
}

impl fmt::Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a type name does not match any [`VariantType`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown variant type: {0}")]
pub struct ParseTypeError(pub String);

impl FromStr for VariantType {
    type Err = ParseTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VariantType::ALL
            .into_iter()
            .find(|ty| ty.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseTypeError(s.to_string()))
    }
}

/// Canonical kind of an item value: a type tag plus the array flag
///
/// An item's kind is fixed when it is created; only the payload changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantKind {
    pub ty: VariantType,
    pub is_array: bool,
}

impl VariantKind {
    pub const fn scalar(ty: VariantType) -> Self {
        Self { ty, is_array: false }
    }

    pub const fn array(ty: VariantType) -> Self {
        Self { ty, is_array: true }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_array {
            write!(f, "{}[]", self.ty)
        } else {
            write!(f, "{}", self.ty)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Item Metadata
// ─────────────────────────────────────────────────────────────────────────────

/// Item quality indicator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quality {
    #[default]
    Good,
    Bad,
    Uncertain,
}

impl Quality {
    /// Wire-level quality code (the status bits of a DA quality word)
    pub fn code(self) -> u16 {
        match self {
            Quality::Good => 0xC0,
            Quality::Uncertain => 0x40,
            Quality::Bad => 0x00,
        }
    }

    /// Decode a wire-level quality word, ignoring sub-status and limit bits
    pub fn from_code(code: u16) -> Self {
        match code & 0xC0 {
            0xC0 => Quality::Good,
            0x40 => Quality::Uncertain,
            _ => Quality::Bad,
        }
    }

    pub fn is_good(self) -> bool {
        matches!(self, Quality::Good)
    }
}

/// Access rights of an item as seen by clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessRights {
    Readable,
    Writable,
    ReadWritable,
}

impl AccessRights {
    pub fn is_readable(self) -> bool {
        matches!(self, AccessRights::Readable | AccessRights::ReadWritable)
    }

    pub fn is_writable(self) -> bool {
        matches!(self, AccessRights::Writable | AccessRights::ReadWritable)
    }
}

/// Opaque, stable identifier of an item
///
/// Handles are allocated from a monotonically increasing counter and are never
/// reused for the lifetime of a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemHandle(pub u64);

impl fmt::Display for ItemHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of an item property
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PropertyId(pub u32);

impl PropertyId {
    /// Upper bound of the engineering-unit range
    pub const HIGH_EU: PropertyId = PropertyId(102);
    /// Lower bound of the engineering-unit range
    pub const LOW_EU: PropertyId = PropertyId(103);
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Engineering-unit range of an analog item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EuRange {
    pub low: f64,
    pub high: f64,
}

impl EuRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}
