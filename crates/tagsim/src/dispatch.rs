//! Request dispatch
//!
//! The operations the protocol shell calls on behalf of clients: property
//! enumeration, property reads, bulk writes and value reads. Bulk writes never
//! fail as a whole; every entry gets its own status.

use std::sync::Arc;

use tagsim_types::{ItemHandle, PropertyId, VariantValue};

use crate::item::{ItemState, ItemWrite};
use crate::registry::Registry;
use crate::types::{Error, Result, StatusCode};

/// Dispatches client requests against a registry
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Ids of the properties attached to an item, in attachment order
    ///
    /// Fails with [`Error::NoProperties`] when the item has none.
    pub fn query_properties(&self, handle: ItemHandle) -> Result<Vec<PropertyId>> {
        let item = self.registry.get(handle)?;
        if item.properties().is_empty() {
            return Err(Error::NoProperties(handle));
        }
        Ok(item.properties().iter().map(|p| p.id).collect())
    }

    /// Value of one property of an item
    pub fn get_property_value(&self, handle: ItemHandle, property_id: PropertyId) -> Result<VariantValue> {
        let item = self.registry.get(handle)?;
        item.property(property_id)
            .cloned()
            .ok_or(Error::InvalidPropertyId {
                handle,
                property_id,
            })
    }

    /// Apply a batch of partial writes
    ///
    /// Returns one status per input entry, in input order. Entries are applied
    /// independently; a failing entry does not affect the others.
    pub fn write_items(&self, writes: &[ItemWrite]) -> Vec<StatusCode> {
        writes
            .iter()
            .map(|write| match self.registry.apply_write(write) {
                Ok(()) => {
                    tracing::debug!(handle = %write.handle, "Item written");
                    StatusCode::Good
                }
                Err(e) => {
                    tracing::debug!(handle = %write.handle, error = %e, "Write rejected");
                    e.status_code().unwrap_or(StatusCode::BadTypeMismatch)
                }
            })
            .collect()
    }

    /// Current value, quality and timestamp of an item
    pub fn read_value(&self, handle: ItemHandle) -> Result<ItemState> {
        self.registry.read(handle)
    }
}
