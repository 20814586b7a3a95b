//! Application layer - Orchestration over the domain and ports.

// Builds the declaration graph for one revision of the stack
pub mod assembler;

// Assembles then hands the graph to a provisioning port
pub mod deploy;
