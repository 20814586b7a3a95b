//! Domain layer - Pure assembly logic.

// Physical naming (always available)
pub mod naming;

// Typed declarations and binding value objects
pub mod resources;

// Declaration registry + configuration propagation
pub mod registry;

// Cross-resource bindings and route registration
pub mod bindings;
pub mod routes;

// The assembled hand-off unit
pub mod graph;
