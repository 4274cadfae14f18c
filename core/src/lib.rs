use serde::{Deserialize, Serialize};

pub mod enums;
pub mod host;

pub use enums::{cast_enum, CastEnum, CastType, Enum, EnumError, Lookup, Operand, Scalar, Value};

/// Load snapshot an agent reports about its host.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SystemInfo {
    /// Average load across all cpus, `0.0..=1.0`.
    pub cpu: f64,
    /// Fraction of physical memory in use, `0.0..=1.0`.
    pub mem: f64,
}
