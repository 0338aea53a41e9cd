// Domain layer: price list models, ports (interfaces) and the pure pricing/naming rules.

pub mod model;
pub mod naming;
pub mod ports;
pub mod pricing;
