//! Address Space Builder
//!
//! Populates a [`Registry`] and [`PropertyCatalog`] with the fixed sample
//! catalog served by the simulator:
//!
//! - `CTT.SimpleTypes.<Direction>.<Type>` scalars for every type and direction
//! - `CTT.ArrayTypes.<Direction>.<Type>[]` four-element arrays of the same
//! - `SimulatedData.Ramp`, `SimulatedData.Sine`, `SimulatedData.Random`
//! - two analog items with engineering-unit ranges
//! - one item with vendor-specific properties
//!
//! Building runs once, single-threaded, before the simulation starts and before
//! any request is dispatched. Any error here is fatal to startup.

use std::sync::Arc;

use tagsim_types::{AccessRights, EuRange, ItemHandle, PropertyId, VariantType};

use crate::item::ItemSpec;
use crate::property::PropertyCatalog;
use crate::registry::Registry;
use crate::sample::generate_sample;
use crate::types::Result;

pub const RAMP_ITEM: &str = "SimulatedData.Ramp";
pub const SINE_ITEM: &str = "SimulatedData.Sine";
pub const RANDOM_ITEM: &str = "SimulatedData.Random";
pub const ANALOG_ITEM: &str = "SpecialItems.WithAnalogEUInfo";
pub const ANALOG_ITEM_2: &str = "SpecialItems.WithAnalogEUInfo2";
pub const VENDOR_ITEM: &str = "SpecialItems.WithVendorSpecificProperties";

/// Vendor-specific property ids
pub const CASING_MATERIAL: PropertyId = PropertyId(5650);
pub const CASING_HEIGHT: PropertyId = PropertyId(5651);
pub const CASING_MANUFACTURER: PropertyId = PropertyId(5652);

/// I/O direction branch of the sample catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoDirection {
    In,
    Out,
    InOut,
}

impl IoDirection {
    pub const ALL: [IoDirection; 3] = [IoDirection::In, IoDirection::Out, IoDirection::InOut];

    pub fn branch(self) -> &'static str {
        match self {
            IoDirection::In => "In",
            IoDirection::Out => "Out",
            IoDirection::InOut => "InOut",
        }
    }

    pub fn access(self) -> AccessRights {
        match self {
            IoDirection::In => AccessRights::Readable,
            IoDirection::Out => AccessRights::Writable,
            IoDirection::InOut => AccessRights::ReadWritable,
        }
    }
}

/// Handles of the items driven by the simulation loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedItems {
    pub ramp: ItemHandle,
    pub sine: ItemHandle,
    pub random: ItemHandle,
}

/// A fully built address space
pub struct AddressSpace {
    pub registry: Arc<Registry>,
    pub catalog: Arc<PropertyCatalog>,
    pub simulated: SimulatedItems,
}

impl AddressSpace {
    /// Build the sample catalog into fresh collections
    pub fn build() -> Result<Self> {
        let registry = Registry::new_shared();
        let mut catalog = PropertyCatalog::new();
        let simulated = AddressSpaceBuilder::new(&registry, &mut catalog).build()?;

        Ok(Self {
            registry,
            catalog: Arc::new(catalog),
            simulated,
        })
    }
}

/// Builds the sample catalog into an existing registry and property catalog
pub struct AddressSpaceBuilder<'a> {
    registry: &'a Registry,
    catalog: &'a mut PropertyCatalog,
}

impl<'a> AddressSpaceBuilder<'a> {
    pub fn new(registry: &'a Registry, catalog: &'a mut PropertyCatalog) -> Self {
        Self { registry, catalog }
    }

    /// Run every construction step in order
    pub fn build(mut self) -> Result<SimulatedItems> {
        self.add_typed_items(false)?;
        self.add_typed_items(true)?;
        let simulated = self.add_simulated_items()?;
        self.add_analog_items()?;
        self.define_properties()?;
        self.add_vendor_item()?;

        tracing::info!(
            items = self.registry.len(),
            properties = self.catalog.len(),
            "Address space created"
        );
        Ok(simulated)
    }

    /// One item per type and direction, scalar or array
    fn add_typed_items(&self, is_array: bool) -> Result<()> {
        let (root, suffix) = if is_array {
            ("CTT.ArrayTypes", "[]")
        } else {
            ("CTT.SimpleTypes", "")
        };

        for direction in IoDirection::ALL {
            for ty in VariantType::ALL {
                let name = format!("{root}.{}.{}{suffix}", direction.branch(), ty.name());
                let value = generate_sample(ty, is_array);
                self.registry.add(ItemSpec::new(name, value, direction.access()))?;
            }
        }
        Ok(())
    }

    fn add_simulated_items(&self) -> Result<SimulatedItems> {
        let ramp = self
            .registry
            .add(ItemSpec::new(RAMP_ITEM, 0i32, AccessRights::Readable))?;
        let sine = self
            .registry
            .add(ItemSpec::new(SINE_ITEM, 0.0f64, AccessRights::Readable))?;
        let random = self
            .registry
            .add(ItemSpec::new(RANDOM_ITEM, 0i32, AccessRights::Readable))?;

        Ok(SimulatedItems { ramp, sine, random })
    }

    fn add_analog_items(&self) -> Result<()> {
        self.registry.add(
            ItemSpec::new(ANALOG_ITEM, 20.56, AccessRights::ReadWritable)
                .analog(EuRange::new(40.86, 92.67)),
        )?;
        self.registry.add(
            ItemSpec::new(ANALOG_ITEM_2, 21.00, AccessRights::ReadWritable)
                .analog(EuRange::new(12.50, 27.90)),
        )?;
        Ok(())
    }

    fn define_properties(&mut self) -> Result<()> {
        self.catalog.define(CASING_HEIGHT, "Casing Height", 25.34)?;
        self.catalog.define(CASING_MATERIAL, "Casing Material", "Aluminum")?;
        self.catalog.define(CASING_MANUFACTURER, "Casing Manufacturer", "CBM")?;
        self.catalog.define(PropertyId::HIGH_EU, "High EU", 45.86)?;
        self.catalog.define(PropertyId::LOW_EU, "Low EU", 35.86)?;
        Ok(())
    }

    fn add_vendor_item(&self) -> Result<()> {
        self.registry.add(
            ItemSpec::new(VENDOR_ITEM, 1111i32, AccessRights::ReadWritable)
                .property(CASING_HEIGHT, 25.45)
                .property(CASING_MATERIAL, "Aluminum")
                .property(CASING_MANUFACTURER, "CBM"),
        )?;
        Ok(())
    }
}
