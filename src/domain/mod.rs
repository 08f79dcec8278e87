// Domain layer: value types and the ports the core talks to.

pub mod model;
pub mod ports;
pub mod response;
