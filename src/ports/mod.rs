//! Ports - Trait definitions.

pub mod provisioning;
