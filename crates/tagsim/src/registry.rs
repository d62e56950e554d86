//! Item Registry
//!
//! Concurrent keyed collection of items, addressed by [`ItemHandle`].
//!
//! Handles come from a monotonically increasing counter and are never reused;
//! items are never removed, so a handle resolves to the same [`Item`] for the
//! life of the registry. Each item guards its value/quality/timestamp triple with
//! its own lock, which makes [`Registry::update_value`] atomic with respect to
//! [`Registry::read`] without serializing unrelated items.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tagsim_types::{ItemHandle, Quality, VariantValue};

use crate::item::{Item, ItemInfo, ItemSpec, ItemState, ItemWrite};
use crate::types::{Error, Result};

/// Central store for all items
pub struct Registry {
    /// Items indexed by handle
    items: DashMap<ItemHandle, Arc<Item>>,

    /// Name index, used for duplicate detection and item-id resolution
    names: DashMap<String, ItemHandle>,

    /// Next handle to hand out
    next_handle: AtomicU64,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create an empty registry. The first handle issued is 1.
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
            names: DashMap::new(),
            next_handle: AtomicU64::new(1),
        }
    }

    /// Create a new registry wrapped in an Arc
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Create and insert an item, returning its new handle
    ///
    /// Fails with [`Error::DuplicateName`] if an item with the same name exists,
    /// and with [`Error::UnsupportedType`] if the initial value is null. A failed
    /// add does not consume a handle.
    pub fn add(&self, spec: ItemSpec) -> Result<ItemHandle> {
        match self.names.entry(spec.name.clone()) {
            Entry::Occupied(_) => Err(Error::DuplicateName(spec.name)),
            Entry::Vacant(slot) => {
                // Null values have no kind; reject before a handle is allocated
                let Some(kind) = spec.value.kind() else {
                    return Err(Error::UnsupportedType(format!(
                        "null initial value for {}",
                        spec.name
                    )));
                };
                let handle = ItemHandle(self.next_handle.fetch_add(1, Ordering::SeqCst));
                let item = Item::new(handle, spec, kind, Utc::now());

                tracing::trace!(%handle, item = %item.name(), kind = %item.kind(), "Added item");
                slot.insert(handle);
                self.items.insert(handle, Arc::new(item));
                Ok(handle)
            }
        }
    }

    /// Get an item by handle
    pub fn get(&self, handle: ItemHandle) -> Result<Arc<Item>> {
        self.items
            .get(&handle)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(Error::NotFound(handle))
    }

    /// Resolve an item name to its handle
    pub fn lookup(&self, name: &str) -> Option<ItemHandle> {
        self.names.get(name).map(|entry| *entry.value())
    }

    /// Read value, quality and timestamp of an item as one unit
    pub fn read(&self, handle: ItemHandle) -> Result<ItemState> {
        Ok(self.get(handle)?.state())
    }

    /// Static description of an item
    pub fn info(&self, handle: ItemHandle) -> Result<ItemInfo> {
        Ok(self.get(handle)?.info())
    }

    /// Atomically replace value, quality and timestamp of an item
    ///
    /// The value must keep the item's kind; a different kind fails with
    /// [`Error::TypeMismatch`] and leaves the item untouched.
    pub fn update_value(
        &self,
        handle: ItemHandle,
        value: VariantValue,
        quality: Quality,
        timestamp: DateTime<Utc>,
    ) -> Result<()> {
        self.get(handle)?.update(value, quality, timestamp)
    }

    /// Refresh quality and timestamp of an item without touching its value
    ///
    /// Unlike reading the value and writing it back through
    /// [`Registry::update_value`], this cannot revert a concurrent write.
    pub fn touch(&self, handle: ItemHandle, quality: Quality, timestamp: DateTime<Utc>) -> Result<()> {
        self.get(handle)?.refresh(quality, timestamp);
        Ok(())
    }

    /// Apply a partial write to an item
    pub fn apply_write(&self, write: &ItemWrite) -> Result<()> {
        self.get(write.handle)?.apply(write)
    }

    /// Snapshot of all items, in handle order
    pub fn iter(&self) -> Vec<Arc<Item>> {
        let mut items: Vec<_> = self
            .items
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        items.sort_by_key(|item| item.handle());
        items
    }

    /// Get the number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if there are no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
