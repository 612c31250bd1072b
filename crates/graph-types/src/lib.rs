//! Core types and collaborator traits for graphwalk.
//!
//! Payload DTOs keep the field names of the graph loader/persistence snapshot
//! (`connection_count`, `relation_type`, `relation_degree`) for JSON compatibility.

mod dto;
mod traits;

pub use dto::*;
pub use traits::*;
