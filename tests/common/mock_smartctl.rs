/// Mock smartctl execution for integration tests
///
/// Answers invocations from recorded transcripts instead of running the
/// real binary, and records every invocation for later assertions.

use smartmon::{SmartctlRunner, SmartmonError, SmartmonResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Recorded smartctl output
#[derive(Clone, Debug)]
pub struct MockCommandOutput {
    pub stdout: String,
    pub success: bool,
}

impl MockCommandOutput {
    pub fn success(stdout: &str) -> Self {
        Self {
            stdout: stdout.to_string(),
            success: true,
        }
    }

    pub fn failure(stdout: &str) -> Self {
        Self {
            stdout: stdout.to_string(),
            success: false,
        }
    }
}

/// smartctl stand-in keyed by the space-joined argument list
#[derive(Clone, Default)]
pub struct MockSmartctl {
    commands: Arc<Mutex<HashMap<String, MockCommandOutput>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockSmartctl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mock response
    pub fn register(&self, args: &str, output: MockCommandOutput) -> &Self {
        self.commands
            .lock()
            .unwrap()
            .insert(args.to_string(), output);
        self
    }

    /// Every invocation so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn was_called(&self, args: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|call| call == args)
    }
}

impl SmartctlRunner for MockSmartctl {
    fn run(&self, args: &[&str], tolerate_failure: bool) -> SmartmonResult<String> {
        let key = args.join(" ");
        self.calls.lock().unwrap().push(key.clone());

        match self.commands.lock().unwrap().get(&key) {
            Some(output) if output.success || tolerate_failure => Ok(output.stdout.clone()),
            Some(_) => Err(SmartmonError::CommandFailed {
                command: key,
                status: "exit status: 2".to_string(),
                stderr: String::new(),
            }),
            None => Err(SmartmonError::CommandFailed {
                command: key,
                status: "exit status: 1".to_string(),
                stderr: "unscripted invocation".to_string(),
            }),
        }
    }
}

/// Recorded transcripts of a small mixed host
pub struct MockSmartctlData;

impl MockSmartctlData {
    pub const VERSION: &'static str = include_str!("../fixtures/version.txt");
    pub const ATA_INFO: &'static str = include_str!("../fixtures/ata_info.txt");
    pub const ATA_ATTRIBUTES: &'static str = include_str!("../fixtures/ata_attributes.txt");
    pub const ATA_HEALTH: &'static str = include_str!("../fixtures/ata_health_passed.txt");
    pub const ATA_XERROR: &'static str = include_str!("../fixtures/ata_xerror.txt");
    pub const NVME_INFO: &'static str = include_str!("../fixtures/nvme_info.txt");
    pub const NVME_ATTRIBUTES: &'static str = include_str!("../fixtures/nvme_attributes.txt");
    pub const NVME_HEALTH: &'static str = include_str!("../fixtures/nvme_health.txt");
    pub const SCSI_INFO: &'static str = include_str!("../fixtures/scsi_info.txt");
    pub const SCSI_HEALTH: &'static str = include_str!("../fixtures/scsi_health.txt");

    /// One SATA SSD and one NVMe drive, both awake
    pub fn ata_and_nvme_host() -> MockSmartctl {
        let smartctl = MockSmartctl::new();
        smartctl
            .register("-V", MockCommandOutput::success(Self::VERSION))
            .register(
                "-d by-id --scan-open",
                MockCommandOutput::success(
                    "/dev/sda -d sat # /dev/sda [SAT], ATA device\n\
                     /dev/nvme0 -d nvme # /dev/nvme0, NVMe device\n",
                ),
            )
            .register("--nocheck standby --device sat /dev/sda", MockCommandOutput::success(""))
            .register("--info --device sat /dev/sda", MockCommandOutput::success(Self::ATA_INFO))
            .register("--health --device sat /dev/sda", MockCommandOutput::success(Self::ATA_HEALTH))
            .register(
                "--attributes --device sat /dev/sda",
                MockCommandOutput::success(Self::ATA_ATTRIBUTES),
            )
            .register(
                "-l xerror,1 --device sat /dev/sda",
                MockCommandOutput::failure(Self::ATA_XERROR),
            )
            .register("--nocheck standby --device nvme /dev/nvme0", MockCommandOutput::success(""))
            .register("--info --device nvme /dev/nvme0", MockCommandOutput::success(Self::NVME_INFO))
            .register(
                "--health --device nvme /dev/nvme0",
                MockCommandOutput::success(Self::NVME_HEALTH),
            )
            .register(
                "--attributes --device nvme /dev/nvme0",
                MockCommandOutput::success(Self::NVME_ATTRIBUTES),
            );
        smartctl
    }
}
