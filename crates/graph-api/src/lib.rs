//! graphwalk HTTP service: stateless algorithm endpoints plus a saved-graph repository.

pub mod config;
pub mod repository;
pub mod server;
