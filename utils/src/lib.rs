#[cfg(feature = "files")]
pub mod files;

#[cfg(feature = "logger")]
pub mod logger;

pub mod process;
