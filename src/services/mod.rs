//! Services layer (ports + adapters).
//!
//! - `ports`: collaborator contracts and wire/data types.
//! - `adapters`: the search broker, workspace relay, bridge and local implementations.

pub mod adapters;
pub mod ports;
