// Domain layer: dataset model and ports (interfaces).

pub mod model;
pub mod ports;
