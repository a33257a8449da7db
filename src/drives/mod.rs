// Device discovery and per-device smartctl parsing
//
// Organized structure:
// - detection.rs: `smartctl --scan-open` parsing into Device records
// - operations/: parsers for the info, ATA and NVMe output dialects

// Core functionality
pub mod detection;


// Output dialect parsers
pub mod operations;

// Re-exports for convenience
pub use detection::{Device, DeviceScanner};

pub use operations::{AtaSmart, DeviceInfo, NvmeSmart, SmartAttribute, SmartCapabilities};
