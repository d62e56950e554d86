//! Data Server
//!
//! The surface the protocol shell talks to: build the address space, start the
//! simulation, answer client requests, shut down.

use std::sync::Arc;

use parking_lot::Mutex;
use tagsim_types::{ItemHandle, PropertyId, VariantValue};

use crate::address_space::{AddressSpace, SimulatedItems};
use crate::config::{DaParameters, ServerConfig, ServerDefinition};
use crate::dispatch::Dispatcher;
use crate::item::{ItemState, ItemWrite};
use crate::property::PropertyCatalog;
use crate::registry::Registry;
use crate::simulation::SimulationLoop;
use crate::types::{Result, SimulationState, StatusCode};

/// Running tag server core
pub struct DataServer {
    config: ServerConfig,
    registry: Arc<Registry>,
    catalog: Arc<PropertyCatalog>,
    simulated: SimulatedItems,
    dispatcher: Dispatcher,
    simulation: Mutex<Option<SimulationLoop>>,
}

impl DataServer {
    /// Build the address space and start the simulation loop
    ///
    /// Must be called from within a tokio runtime. Construction errors are
    /// returned before anything is spawned.
    pub fn initialize(config: ServerConfig) -> Result<Self> {
        config.validate()?;

        let AddressSpace {
            registry,
            catalog,
            simulated,
        } = AddressSpace::build()?;

        let simulation = if config.simulation.enabled {
            Some(SimulationLoop::spawn(
                Arc::clone(&registry),
                simulated,
                &config.simulation,
            ))
        } else {
            tracing::info!("Simulation disabled");
            None
        };

        tracing::info!(
            server = %config.server.current_server_name,
            items = registry.len(),
            "Data server initialized"
        );

        Ok(Self {
            dispatcher: Dispatcher::new(Arc::clone(&registry)),
            config,
            registry,
            catalog,
            simulated,
            simulation: Mutex::new(simulation),
        })
    }

    /// Stop the simulation loop, waiting a bounded time for it to finish
    ///
    /// Shutdown is best-effort: a loop that does not stop in time is logged
    /// and abandoned.
    pub async fn shutdown(&self) {
        let simulation = self.simulation.lock().take();
        let Some(mut simulation) = simulation else {
            return;
        };

        tracing::info!("Shutting down data server");
        if let Err(e) = simulation.shutdown().await {
            tracing::warn!(error = %e, "Simulation did not shut down cleanly");
        }
    }

    /// State of the simulation loop, `None` when it is disabled or shut down
    pub fn simulation_state(&self) -> Option<SimulationState> {
        self.simulation.lock().as_ref().map(|s| s.state())
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn catalog(&self) -> &Arc<PropertyCatalog> {
        &self.catalog
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn simulated_items(&self) -> SimulatedItems {
        self.simulated
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Registration identity for the protocol shell
    pub fn definition(&self) -> &ServerDefinition {
        &self.config.server
    }

    /// Data-access parameters for the protocol shell
    pub fn parameters(&self) -> &DaParameters {
        &self.config.parameters
    }

    pub fn query_properties(&self, handle: ItemHandle) -> Result<Vec<PropertyId>> {
        self.dispatcher.query_properties(handle)
    }

    pub fn get_property_value(&self, handle: ItemHandle, property_id: PropertyId) -> Result<VariantValue> {
        self.dispatcher.get_property_value(handle, property_id)
    }

    pub fn write_items(&self, writes: &[ItemWrite]) -> Vec<StatusCode> {
        self.dispatcher.write_items(writes)
    }

    pub fn read_value(&self, handle: ItemHandle) -> Result<ItemState> {
        self.dispatcher.read_value(handle)
    }
}
