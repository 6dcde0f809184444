// Domain layer: value objects and ports (interfaces). No transport or storage code.

pub mod model;
pub mod ports;
