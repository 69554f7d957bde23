//! Python bindings for fasttrack.

pub mod bindings;
pub mod numpy_bridge;
