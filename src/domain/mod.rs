// Domain layer: registry records and the ports the store loads them through.

pub mod model;
pub mod ports;
