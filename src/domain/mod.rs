// Domain layer: content models and the ports the backend adapters implement.

pub mod model;
pub mod ports;
