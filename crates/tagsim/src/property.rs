//! Item properties and the server-wide property catalog
//!
//! Items carry their property values by value in an ordered list of
//! [`PropertyEntry`]. The [`PropertyCatalog`] is a separate table of property
//! definitions (display name and default value) that the protocol shell uses
//! to describe properties to clients. Both are filled during startup and are
//! read-only afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tagsim_types::{PropertyId, VariantValue};

use crate::types::{Error, Result};

/// A property value attached to an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyEntry {
    pub id: PropertyId,
    pub value: VariantValue,
}

impl PropertyEntry {
    pub fn new(id: PropertyId, value: impl Into<VariantValue>) -> Self {
        Self {
            id,
            value: value.into(),
        }
    }
}

/// Catalog definition of a property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub id: PropertyId,
    pub display_name: String,
    pub default_value: VariantValue,
}

/// Server-wide table of property definitions, keyed by id
#[derive(Debug, Clone, Default)]
pub struct PropertyCatalog {
    definitions: BTreeMap<PropertyId, PropertyDefinition>,
}

impl PropertyCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a property definition
    ///
    /// Defining the same id twice is a construction error.
    pub fn define(
        &mut self,
        id: PropertyId,
        display_name: impl Into<String>,
        default_value: impl Into<VariantValue>,
    ) -> Result<()> {
        if self.definitions.contains_key(&id) {
            return Err(Error::CatalogConflict(id));
        }

        let definition = PropertyDefinition {
            id,
            display_name: display_name.into(),
            default_value: default_value.into(),
        };
        tracing::debug!(property_id = %id, name = %definition.display_name, "Defined property");
        self.definitions.insert(id, definition);

        Ok(())
    }

    /// Get a definition by id
    pub fn get(&self, id: PropertyId) -> Option<&PropertyDefinition> {
        self.definitions.get(&id)
    }

    pub fn contains(&self, id: PropertyId) -> bool {
        self.definitions.contains_key(&id)
    }

    /// Definitions in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &PropertyDefinition> {
        self.definitions.values()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_get() {
        let mut catalog = PropertyCatalog::new();
        catalog.define(PropertyId::HIGH_EU, "High EU", 45.86).unwrap();
        catalog.define(PropertyId::LOW_EU, "Low EU", 35.86).unwrap();

        let high = catalog.get(PropertyId::HIGH_EU).unwrap();
        assert_eq!(high.display_name, "High EU");
        assert_eq!(high.default_value, VariantValue::F64(45.86));
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get(PropertyId(1)).is_none());
    }

    #[test]
    fn test_duplicate_definition_rejected() {
        let mut catalog = PropertyCatalog::new();
        catalog.define(PropertyId(5650), "Casing Material", "Aluminum").unwrap();

        let result = catalog.define(PropertyId(5650), "Other", "Steel");
        assert!(matches!(result, Err(Error::CatalogConflict(PropertyId(5650)))));
        assert_eq!(
            catalog.get(PropertyId(5650)).unwrap().default_value,
            VariantValue::from("Aluminum")
        );
    }

    #[test]
    fn test_iteration_order() {
        let mut catalog = PropertyCatalog::new();
        catalog.define(PropertyId(5651), "Casing Height", 25.34).unwrap();
        catalog.define(PropertyId::HIGH_EU, "High EU", 45.86).unwrap();

        let ids: Vec<_> = catalog.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![PropertyId::HIGH_EU, PropertyId(5651)]);
    }
}
