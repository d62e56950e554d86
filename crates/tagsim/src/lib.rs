//! Tagsim - In-memory item registry and simulated live-update engine
//!
//! This crate provides the core of a tag-oriented data server:
//! - A concurrent item registry keyed by opaque handles
//! - The fixed sample address space built at startup
//! - A background simulation loop driving ramp, sine and random items
//! - Dispatch operations for property queries and bulk writes
//!
//! The client-facing protocol is owned by an external shell that calls into
//! [`DataServer`].

// Re-export shared types
pub use tagsim_types;

pub mod address_space;
pub mod config;
pub mod dispatch;
pub mod item;
pub mod logging;
pub mod property;
pub mod registry;
pub mod sample;
pub mod server;
pub mod simulation;
pub mod types;

pub use address_space::{AddressSpace, AddressSpaceBuilder, SimulatedItems};
pub use config::ServerConfig;
pub use dispatch::Dispatcher;
pub use item::{Item, ItemInfo, ItemSpec, ItemState, ItemWrite};
pub use property::{PropertyCatalog, PropertyDefinition, PropertyEntry};
pub use registry::Registry;
pub use server::DataServer;
pub use simulation::{SimulationLoop, Simulator};
pub use types::{Error, Result, SimulationState, StatusCode};
