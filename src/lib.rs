// Allow uppercase acronyms for industry-standard terms like ATA, NVMe, SAT
#![allow(clippy::upper_case_acronyms)]

pub mod collector;
pub mod config;
pub mod drives;
pub mod metrics;
pub mod smartctl;

// Re-export the collection entry points for convenience
pub use collector::{collect_disks_smart_metrics, Collector};
pub use config::Settings;
pub use drives::{Device, DeviceScanner};
pub use metrics::{Labels, Metric, MetricValue};
pub use smartctl::{smartctl_version, SmartctlRunner, SystemSmartctl};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while talking to smartctl or interpreting its output
#[derive(Error, Debug)]
pub enum SmartmonError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("smartctl {command} exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Unreadable smartctl output: {0}")]
    InvalidOutput(String),

    #[error("Malformed line: {0}")]
    MalformedLine(String),

    #[error("Invalid metric value: {0}")]
    InvalidValue(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
}

pub type SmartmonResult<T> = Result<T, SmartmonError>;

/// Device family as announced by the `-d` selector of `smartctl --scan-open`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeviceType {
    /// ATA drives behind a SCSI/ATA translation layer (`sat`, `sat+N`, ...)
    ATA,
    NVMe,
    /// SCSI, USB bridges, RAID controllers and anything without a selector
    Other,
}

impl DeviceType {
    /// Classify a selector string once, at discovery time
    pub fn from_selector(selector: Option<&str>) -> Self {
        match selector {
            Some("nvme") => DeviceType::NVMe,
            Some(s) if s.starts_with("sat") => DeviceType::ATA,
            _ => DeviceType::Other,
        }
    }

    /// NVMe devices always expose SMART data
    pub fn always_smart_capable(&self) -> bool {
        matches!(self, DeviceType::NVMe)
    }
}
