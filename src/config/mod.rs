pub mod disk_config;

pub use disk_config::{DiskConfig, DiskConfigError, DiskOverrides};
