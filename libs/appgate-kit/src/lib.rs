//! Route group assembly kit.
//!
//! This crate turns a manifest of independently authored route-group
//! constructors into one servable API surface:
//!
//! - [`ModuleManifest`] - ordered registry of route-group constructors
//! - [`loader`] - isolated construction of each module's [`RouteGroup`]
//! - [`conflicts`] - global duplicate-route / duplicate-handler detection
//! - [`policy`] - per-group and per-endpoint authentication policy
//! - [`assembler`] - mounts everything into an axum `Router` and produces
//!   the startup report
//!
//! Assembly runs once, synchronously, at process startup. Its outputs
//! (the router, the mounted-route table and the report) are immutable
//! afterwards and can be read from any number of request workers.

pub mod assembler;
pub mod conflicts;
pub mod group;
pub mod loader;
pub mod manifest;
pub mod policy;
pub mod ready;
pub mod report;

pub use assembler::{AssembledService, AssemblerOptions, MountedRoute, assemble};
pub use group::{EndpointDef, RouteGroup, RouteGroupBuilder, WsEndpointDef};
pub use loader::{LoadOutcome, load_route_groups};
pub use manifest::ModuleManifest;
pub use policy::ResolvedGroup;
pub use ready::ReadySignal;
pub use report::{
    EndpointDescriptor, ImportErrorModel, ModuleImportResult, StartupReport, WsEndpointDescriptor,
};
