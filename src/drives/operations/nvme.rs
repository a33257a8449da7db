use crate::drives::Device;
use crate::metrics::Metric;
use crate::{SmartmonError, SmartmonResult};

/// Banner plus the SMART/Health section header above the first key/value line
const NVME_PREAMBLE_LINES: usize = 6;

/// How a captured NVMe value is cleaned up before it becomes a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTransform {
    /// `100%` -> `100`
    Percent,
    /// `32 Celsius` -> `32`
    Celsius,
    /// `1,234` -> `1234`
    Counter,
}

impl ValueTransform {
    pub fn apply(self, value: &str) -> String {
        let value = value.trim();
        match self {
            ValueTransform::Percent => value.strip_suffix('%').unwrap_or(value).trim().to_string(),
            ValueTransform::Celsius => value
                .strip_suffix("Celsius")
                .unwrap_or(value)
                .trim()
                .to_string(),
            ValueTransform::Counter => value.replace(',', ""),
        }
    }
}

/// smartctl label -> (metric name, transform)
pub const NVME_METRICS: &[(&str, &str, ValueTransform)] = &[
    ("Available Spare", "available_spare_ratio", ValueTransform::Percent),
    ("Available Spare Threshold", "available_spare_threshold_ratio", ValueTransform::Percent),
    ("Percentage Used", "percentage_used_ratio", ValueTransform::Percent),
    ("Power Cycle", "power_cycles_total", ValueTransform::Counter),
    ("Power Cycles", "power_cycles_total", ValueTransform::Counter),
    ("Power On Hours", "power_on_hours_total", ValueTransform::Counter),
    ("Temperature", "temperature_celcius", ValueTransform::Celsius),
    ("Unsafe Shutdowns", "unsafe_shutdowns_total", ValueTransform::Counter),
    ("Media and Data Integrity Errors", "media_errors_total", ValueTransform::Counter),
    ("Error Information Log Entries", "num_err_log_entries_total", ValueTransform::Counter),
    ("Warning Comp. Temperature Time", "warning_temperature_time_total", ValueTransform::Counter),
    ("Critical Comp. Temperature Time", "critical_temperature_time_total", ValueTransform::Counter),
];

pub struct NvmeSmart;

impl NvmeSmart {
    /// Metrics of an NVMe `--attributes` transcript.
    ///
    /// Unknown labels yield nothing. A line without a colon, or a known label
    /// whose value is not a number, yields an error item for that line only.
    pub fn attribute_metrics<'a>(
        device: &'a Device,
        output: &'a str,
    ) -> impl Iterator<Item = SmartmonResult<Metric>> + 'a {
        output
            .trim()
            .split('\n')
            .skip(NVME_PREAMBLE_LINES)
            .filter_map(move |line| Self::parse_line(device, line).transpose())
    }

    /// Parse one `Label: value` line
    pub(crate) fn parse_line(device: &Device, line: &str) -> SmartmonResult<Option<Metric>> {
        let line = collapse_whitespace(line);
        if line.is_empty() {
            return Ok(None);
        }

        let (label, value) = line
            .split_once(':')
            .ok_or_else(|| SmartmonError::MalformedLine(format!("no ':' in NVMe line {:?}", line)))?;

        let (name, transform) = match Self::lookup(label) {
            Some(entry) => entry,
            None => return Ok(None),
        };

        Metric::parsed(name, device.base_labels(), &transform.apply(value)).map(Some)
    }

    pub fn lookup(label: &str) -> Option<(&'static str, ValueTransform)> {
        NVME_METRICS
            .iter()
            .find(|(l, _, _)| *l == label)
            .map(|(_, name, transform)| (*name, *transform))
    }
}

/// Trim and squeeze runs of spaces and tabs, so `Warning  Comp. Temperature Time`
/// matches its table entry
fn collapse_whitespace(line: &str) -> String {
    line.split([' ', '\t'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
