//! Items: named, typed data points
//!
//! An [`Item`] splits into an immutable part (handle, name, kind, access rights,
//! properties) and a mutable [`ItemState`] triple of value, quality and
//! timestamp. The triple sits behind a single per-item lock so readers always
//! see the three fields from the same update.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tagsim_types::{AccessRights, EuRange, ItemHandle, PropertyId, Quality, VariantKind, VariantValue};

use crate::property::PropertyEntry;
use crate::types::{Error, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Item State
// ─────────────────────────────────────────────────────────────────────────────

/// Current value, quality and timestamp of an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemState {
    pub value: VariantValue,
    pub quality: Quality,
    pub timestamp: DateTime<Utc>,
}

/// Partial write request for one item
///
/// Absent fields leave the corresponding part of the item unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemWrite {
    pub handle: ItemHandle,
    pub value: Option<VariantValue>,
    pub quality: Option<Quality>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl ItemWrite {
    pub fn new(handle: ItemHandle) -> Self {
        Self {
            handle,
            value: None,
            quality: None,
            timestamp: None,
        }
    }

    pub fn value(mut self, value: impl Into<VariantValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn quality(mut self, quality: Quality) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Item Specification
// ─────────────────────────────────────────────────────────────────────────────

/// Everything needed to create an item
#[derive(Debug, Clone)]
pub struct ItemSpec {
    pub name: String,
    pub value: VariantValue,
    pub access: AccessRights,
    pub properties: Vec<PropertyEntry>,
    pub eu_range: Option<EuRange>,
}

impl ItemSpec {
    pub fn new(name: impl Into<String>, value: impl Into<VariantValue>, access: AccessRights) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            access,
            properties: Vec::new(),
            eu_range: None,
        }
    }

    /// Attach a property value
    pub fn property(mut self, id: PropertyId, value: impl Into<VariantValue>) -> Self {
        self.properties.push(PropertyEntry::new(id, value));
        self
    }

    /// Make this an analog item with an engineering-unit range
    ///
    /// Also attaches the LowEU and HighEU properties, in that order.
    pub fn analog(mut self, range: EuRange) -> Self {
        self.eu_range = Some(range);
        self.property(PropertyId::LOW_EU, range.low)
            .property(PropertyId::HIGH_EU, range.high)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Item
// ─────────────────────────────────────────────────────────────────────────────

/// A registered data point
#[derive(Debug)]
pub struct Item {
    handle: ItemHandle,
    name: String,
    kind: VariantKind,
    access: AccessRights,
    eu_range: Option<EuRange>,
    properties: Vec<PropertyEntry>,
    state: RwLock<ItemState>,
}

/// Static description of an item, for diagnostics and the protocol shell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInfo {
    pub handle: ItemHandle,
    pub name: String,
    pub kind: VariantKind,
    pub access: AccessRights,
    pub eu_range: Option<EuRange>,
    pub property_ids: Vec<PropertyId>,
}

impl Item {
    /// Build an item from its spec. `kind` is the kind of `spec.value`.
    pub(crate) fn new(handle: ItemHandle, spec: ItemSpec, kind: VariantKind, now: DateTime<Utc>) -> Self {
        Self {
            handle,
            name: spec.name,
            kind,
            access: spec.access,
            eu_range: spec.eu_range,
            properties: spec.properties,
            state: RwLock::new(ItemState {
                value: spec.value,
                quality: Quality::Good,
                timestamp: now,
            }),
        }
    }

    pub fn handle(&self) -> ItemHandle {
        self.handle
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> VariantKind {
        self.kind
    }

    pub fn access(&self) -> AccessRights {
        self.access
    }

    pub fn eu_range(&self) -> Option<EuRange> {
        self.eu_range
    }

    /// Attached properties, in creation order
    pub fn properties(&self) -> &[PropertyEntry] {
        &self.properties
    }

    /// Look up a property value by id
    pub fn property(&self, id: PropertyId) -> Option<&VariantValue> {
        self.properties.iter().find(|p| p.id == id).map(|p| &p.value)
    }

    /// Consistent copy of value, quality and timestamp
    pub fn state(&self) -> ItemState {
        self.state.read().clone()
    }

    pub fn value(&self) -> VariantValue {
        self.state.read().value.clone()
    }

    pub fn info(&self) -> ItemInfo {
        ItemInfo {
            handle: self.handle,
            name: self.name.clone(),
            kind: self.kind,
            access: self.access,
            eu_range: self.eu_range,
            property_ids: self.properties.iter().map(|p| p.id).collect(),
        }
    }

    /// Replace value, quality and timestamp as one unit
    pub(crate) fn update(&self, value: VariantValue, quality: Quality, timestamp: DateTime<Utc>) -> Result<()> {
        self.check_kind(&value)?;
        *self.state.write() = ItemState {
            value,
            quality,
            timestamp,
        };
        Ok(())
    }

    /// Set quality and timestamp, keeping whatever value is current
    pub(crate) fn refresh(&self, quality: Quality, timestamp: DateTime<Utc>) {
        let mut state = self.state.write();
        state.quality = quality;
        state.timestamp = timestamp;
    }

    /// Apply whichever fields of a write are present, under one lock
    pub(crate) fn apply(&self, write: &ItemWrite) -> Result<()> {
        if let Some(value) = &write.value {
            self.check_kind(value)?;
        }

        let mut state = self.state.write();
        if let Some(value) = &write.value {
            state.value = value.clone();
        }
        if let Some(quality) = write.quality {
            state.quality = quality;
        }
        if let Some(timestamp) = write.timestamp {
            state.timestamp = timestamp;
        }
        Ok(())
    }

    fn check_kind(&self, value: &VariantValue) -> Result<()> {
        match value.kind() {
            Some(kind) if kind == self.kind => Ok(()),
            other => Err(Error::TypeMismatch {
                handle: self.handle,
                expected: self.kind,
                actual: other.map_or_else(|| "null".to_string(), |k| k.to_string()),
            }),
        }
    }
}
