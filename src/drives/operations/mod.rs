// Per-dialect smartctl output parsers
//
// Each parser only sees captured text, never a process:
// - info.rs: `--info` key/value block, device identity and SMART capabilities
// - smart.rs: ATA attribute table, ATA error log and health self-assessment
// - nvme.rs: NVMe SMART/Health key/value block

pub mod info;
pub mod nvme;
pub mod smart;

// Re-exports for convenience
pub use info::{DeviceInfo, SmartCapabilities};
pub use nvme::NvmeSmart;
pub use smart::{AtaSmart, AttributeTable, SmartAttribute};
