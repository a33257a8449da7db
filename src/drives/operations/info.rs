use crate::drives::Device;
use crate::metrics::Metric;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

lazy_static! {
    /// `Key: value` or `Key is: value`, with the shortest key that fits
    static ref DEVICE_INFO_RE: Regex =
        Regex::new(r"^(?P<k>[^:]+?)(?:(?:\sis|):)\s*(?P<v>.*)$").unwrap();
}

/// `smartctl --info` keys exported as `device_info` labels, in label order
pub const DEVICE_INFO_LABELS: &[(&str, &str)] = &[
    ("Vendor", "vendor"),
    ("Product", "product"),
    ("Revision", "revision"),
    ("Logical Unit id", "lun_id"),
    ("Model Family", "model_family"),
    ("Device Model", "device_model"),
    ("Serial Number", "serial_number"),
    ("Firmware Version", "firmware_version"),
];

/// Lines of banner and copyright printed before the information section
const INFO_PREAMBLE_LINES: usize = 3;

/// SMART availability as reported by the information section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SmartCapabilities {
    pub available: bool,
    pub enabled: bool,
}

pub struct DeviceInfo;

impl DeviceInfo {
    /// Key/value pairs of a `smartctl --info` transcript.
    ///
    /// Lines that do not fit the key/value grammar (section headers, blank
    /// lines) are skipped.
    pub fn parse(output: &str) -> impl Iterator<Item = (&str, &str)> + '_ {
        output
            .trim()
            .split('\n')
            .skip(INFO_PREAMBLE_LINES)
            .filter_map(|line| {
                let caps = DEVICE_INFO_RE.captures(line)?;
                let key = caps.name("k")?.as_str();
                let value = caps.name("v")?.as_str().trim_end();
                Some((key, value))
            })
    }

    /// The `device_info` metric: base labels plus the known identity fields
    pub fn metric(device: &Device, output: &str) -> Metric {
        let values: HashMap<&str, &str> = Self::parse(output).collect();

        let mut labels = device.base_labels();
        for (key, label) in DEVICE_INFO_LABELS {
            if let Some(value) = values.get(key) {
                labels.insert(*label, *value);
            }
        }

        Metric::new("device_info", labels, true)
    }

    /// SMART capabilities of `device`.
    ///
    /// NVMe devices always have SMART data. Everything else is judged by the
    /// first word of each `SMART support is:` line of `info_output`.
    pub fn smart_capabilities(device: &Device, info_output: &str) -> SmartCapabilities {
        if device.device_type.always_smart_capable() {
            return SmartCapabilities {
                available: true,
                enabled: true,
            };
        }

        let mut caps = SmartCapabilities::default();
        for (key, value) in Self::parse(info_output) {
            if key != "SMART support" {
                continue;
            }
            match value.split(' ').next() {
                Some("Available") => caps.available = true,
                Some("Enabled") => caps.enabled = true,
                _ => {}
            }
        }
        caps
    }
}
