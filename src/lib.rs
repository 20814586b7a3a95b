//! Trimstack - Video Pipeline Stack Assembly
//!
//! Hexagonal Architecture:
//! - domain/: Pure assembly logic (naming, registry, bindings, routes)
//! - ports/: Trait definitions
//! - adapters/: Concrete implementations
//! - application/: Generic services
//! - config: Environment configuration
//!
//! Declares the resource graph of a cloud video-processing pipeline (an
//! object bucket for job artifacts, a job-creation handler, a queue-fed
//! preprocessing handler and a REST API) and hands it to an external
//! provisioning engine. Assembly is synchronous and in-memory; only the
//! hand-off is async.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;

// Re-exports for convenience
pub use application::assembler::StackAssembler;
pub use application::deploy::DeployService;
pub use config::StackConfig;
pub use domain::graph::ResourceGraph;
pub use error::AssemblyError;
