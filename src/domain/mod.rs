// Domain layer: wire models and the port the jobs talk through.

pub mod model;
pub mod ports;
