// Domain layer: canonical recipe model and ports (interfaces).

pub mod model;
pub mod ports;
