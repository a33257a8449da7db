// Collector - drives smartctl over every discovered device
//
// Discovery, then per device: liveness marker, standby check, identity,
// SMART capabilities, health and the dialect specific attribute parser.
// All metrics of the run are buffered, stably sorted by name and handed to
// the exposition writer.

use crate::drives::operations::smart::health_metric;
use crate::drives::{AtaSmart, Device, DeviceInfo, DeviceScanner, NvmeSmart};
use crate::metrics::{Labels, Metric};
use crate::smartctl::{smartctl_version, SmartctlRunner};
use crate::{DeviceType, Settings, SmartmonResult};
use std::collections::HashSet;

/// How far collection got for one device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStage {
    /// Drive is in standby and waking it up was not requested
    Standby,
    /// Identity collected, but SMART is not available
    SmartUnavailable,
    /// Health and dialect attributes collected
    Complete,
}

pub struct Collector<R: SmartctlRunner> {
    runner: R,
    wakeup_disks: bool,
    scan_args: Vec<String>,
    timestamp: i64,
}

impl<R: SmartctlRunner> Collector<R> {
    pub fn new(runner: R, wakeup_disks: bool) -> Self {
        Self {
            runner,
            wakeup_disks,
            scan_args: Settings::default().scan_args,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    pub fn with_scan_args(mut self, scan_args: Vec<String>) -> Self {
        self.scan_args = scan_args;
        self
    }

    /// Override the `smartctl_run` timestamp (seconds since the epoch, UTC)
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// `smartctl_version{version="..."} 1`
    pub fn version_metric(&self) -> SmartmonResult<Metric> {
        let version = smartctl_version(&self.runner)?;
        Ok(Metric::new(
            "smartctl_version",
            Labels::new().with("version", version),
            true,
        ))
    }

    /// Collect every device, sorted by metric name.
    ///
    /// Only a failing scan or a failing non-tolerant query aborts the run.
    pub fn collect(&self) -> SmartmonResult<Vec<Metric>> {
        let scan_args: Vec<&str> = self.scan_args.iter().map(String::as_str).collect();
        let devices = DeviceScanner::find_devices(&self.runner, &scan_args)?;

        let mut metrics = Vec::new();
        for device in &devices {
            let stage = self.collect_device(device, &mut metrics)?;
            tracing::info!(device = %device.path, stage = ?stage, "Collected device");
        }

        Ok(sort_and_dedup(metrics))
    }

    /// Append the metrics of one device to `metrics`
    pub fn collect_device(
        &self,
        device: &Device,
        metrics: &mut Vec<Metric>,
    ) -> SmartmonResult<CollectionStage> {
        let labels = device.base_labels();

        metrics.push(Metric::new("smartctl_run", labels.clone(), self.timestamp));

        let active = self.is_active(device);
        metrics.push(Metric::new("device_active", labels.clone(), active));

        // Leave sleeping drives alone unless asked to spin them up
        if !active && !self.wakeup_disks {
            return Ok(CollectionStage::Standby);
        }

        let info = self.runner.run(&device.args(&["--info"]), false)?;
        metrics.push(DeviceInfo::metric(device, &info));

        let caps = DeviceInfo::smart_capabilities(device, &info);
        metrics.push(Metric::new("device_smart_available", labels.clone(), caps.available));
        metrics.push(Metric::new("device_smart_enabled", labels, caps.enabled));

        // Further queries would fail without SMART support
        if !caps.available {
            return Ok(CollectionStage::SmartUnavailable);
        }

        let health = self.runner.run(&device.args(&["--health"]), true)?;
        metrics.push(health_metric(device, &health));

        match device.device_type {
            DeviceType::ATA => {
                let attributes = self.runner.run(&device.args(&["--attributes"]), false)?;
                metrics.extend(AtaSmart::attribute_metrics(device, &attributes));

                let error_log = self.runner.run(&device.args(&["-l", "xerror,1"]), true)?;
                metrics.push(AtaSmart::error_count_metric(device, &error_log));
            }
            DeviceType::NVMe => {
                let attributes = self.runner.run(&device.args(&["--attributes"]), false)?;
                for result in NvmeSmart::attribute_metrics(device, &attributes) {
                    match result {
                        Ok(metric) => metrics.push(metric),
                        Err(e) => {
                            tracing::warn!(device = %device.path, error = %e, "Skipping NVMe line")
                        }
                    }
                }
            }
            DeviceType::Other => {}
        }

        Ok(CollectionStage::Complete)
    }

    /// Check without waking the drive; any failure counts as standby
    fn is_active(&self, device: &Device) -> bool {
        match self.runner.run(&device.args(&["--nocheck", "standby"]), false) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(device = %device.path, error = %e, "Device is not active");
                false
            }
        }
    }
}

/// Collect SMART metrics of all devices with a fresh collector
pub fn collect_disks_smart_metrics<R: SmartctlRunner>(
    runner: R,
    wakeup_disks: bool,
) -> SmartmonResult<Vec<Metric>> {
    Collector::new(runner, wakeup_disks).collect()
}

/// Stable sort by name, then drop repeated series keeping the first one
pub(crate) fn sort_and_dedup(mut metrics: Vec<Metric>) -> Vec<Metric> {
    metrics.sort_by(|a, b| a.name.cmp(&b.name));

    let mut seen: HashSet<(String, Labels)> = HashSet::new();
    metrics.retain(|metric| {
        let fresh = seen.insert((metric.name.clone(), metric.labels.clone()));
        if !fresh {
            tracing::warn!(metric = %metric.name, "Dropping duplicate series");
        }
        fresh
    });

    metrics
}
