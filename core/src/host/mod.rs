//! Facts about the machine the current process runs on.

pub mod cpu;
pub mod system;

use derive_more::IsVariant;
use thiserror::Error;

pub use system::{
    current_operating_system, is_linux, is_mac, is_posix, is_windows, operating_system, os,
    platform,
};

#[derive(Debug, Error, IsVariant)]
pub enum HostError {
    #[error("{0} is not available on this platform")]
    Unsupported(&'static str),
    #[error("failed to read kernel statistics: {0}")]
    Kernel(#[source] Box<dyn std::error::Error + Send + Sync>),
}
