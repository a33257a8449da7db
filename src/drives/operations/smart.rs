use crate::drives::Device;
use crate::metrics::{Labels, Metric, MetricValue};
use crate::SmartmonResult;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref LEADING_DIGITS_RE: Regex = Regex::new(r"^([0-9]+)").unwrap();

    static ref ATA_ERROR_COUNT_RE: Regex =
        Regex::new(r"(?m)^Error (\d+) \[\d+\] occurred").unwrap();

    static ref SELF_TEST_RE: Regex = Regex::new(r"(?m)^SMART.*(PASSED|OK)$").unwrap();

    /// ATA attributes (lower-cased) worth exporting
    pub static ref SMART_ATTRIBUTES_WHITELIST: HashSet<&'static str> = [
        "airflow_temperature_cel",
        "command_timeout",
        "current_pending_sector",
        "end_to_end_error",
        "erase_fail_count_total",
        "g_sense_error_rate",
        "hardware_ecc_recovered",
        "host_reads_mib",
        "host_reads_32mib",
        "host_writes_mib",
        "host_writes_32mib",
        "load_cycle_count",
        "lifetime_writes_gib",
        "media_wearout_indicator",
        "wear_leveling_count",
        "nand_writes_1gib",
        "offline_uncorrectable",
        "power_cycle_count",
        "power_on_hours",
        "program_fail_count",
        "raw_read_error_rate",
        "reallocated_event_count",
        "reallocated_sector_ct",
        "reported_uncorrect",
        "sata_downshift_count",
        "seek_error_rate",
        "spin_retry_count",
        "spin_up_time",
        "start_stop_count",
        "temperature_case",
        "temperature_celsius",
        "temperature_internal",
        "total_bad_block",
        "total_lbas_read",
        "total_lbas_written",
        "total_writes_gib",
        "total_reads_gib",
        "udma_crc_error_count",
        "unsafe_shutdown_count",
        "unexpect_power_loss_ct",
        "workld_host_reads_perc",
        "workld_media_wear_indic",
        "workload_minutes",
    ]
    .into_iter()
    .collect();
}

/// Banner, section header and column titles above the first attribute row
const ATTRIBUTE_PREAMBLE_LINES: usize = 7;

/// One row of the vendor attribute table, after normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmartAttribute {
    pub id: u16,
    /// Lower-cased ATTRIBUTE_NAME
    pub name: String,
    pub flag: String,
    pub value: String,
    pub worst: String,
    /// `---` already replaced by `0`
    pub threshold: String,
    pub attr_type: String,
    pub updated: String,
    pub when_failed: String,
    /// Leading digit run of the RAW_VALUE column
    pub raw_value: String,
}

impl SmartAttribute {
    /// Parse one table row, applying the whitelist, raw value and threshold rules
    pub(crate) fn from_row(line: &str) -> Option<Self> {
        let mut fields = line.trim().split([' ', '\t']).filter(|f| !f.is_empty());

        let id = fields.next()?;
        let name = fields.next()?.to_lowercase();
        let flag = fields.next()?;
        let value = fields.next()?;
        let worst = fields.next()?;
        let threshold = fields.next()?;
        let attr_type = fields.next()?;
        let updated = fields.next()?;
        let when_failed = fields.next()?;
        // RAW_VALUE may contain spaces, e.g. "36 (Min/Max 24/40)"
        let raw: Vec<&str> = fields.collect();
        if raw.is_empty() {
            return None;
        }

        if !SMART_ATTRIBUTES_WHITELIST.contains(name.as_str()) {
            return None;
        }

        let raw_joined = raw.join(" ");
        let raw_value = match LEADING_DIGITS_RE.captures(&raw_joined) {
            Some(caps) => caps[1].to_string(),
            None => {
                tracing::debug!(attribute = %name, raw = %raw_joined, "Dropping attribute without numeric raw value");
                return None;
            }
        };

        let threshold = if threshold == "---" { "0" } else { threshold };

        let id = match id.parse::<u16>() {
            Ok(id) => id,
            Err(_) => {
                tracing::debug!(attribute = %name, id = %id, "Dropping attribute with non-numeric id");
                return None;
            }
        };

        if let Some(bad) = [value, worst, threshold]
            .into_iter()
            .find(|column| MetricValue::parse(column).is_err())
        {
            tracing::debug!(attribute = %name, column = %bad, "Dropping attribute with non-numeric column");
            return None;
        }

        Some(SmartAttribute {
            id,
            name,
            flag: flag.to_string(),
            value: value.to_string(),
            worst: worst.to_string(),
            threshold: threshold.to_string(),
            attr_type: attr_type.to_string(),
            updated: updated.to_string(),
            when_failed: when_failed.to_string(),
            raw_value,
        })
    }

    /// `attr_value`, `attr_worst`, `attr_threshold` and `attr_raw_value` for `device`
    pub fn metrics(&self, device: &Device) -> SmartmonResult<[Metric; 4]> {
        let mut labels = Labels::new().with("name", self.name.as_str());
        labels.extend(&device.base_labels());

        Ok([
            Metric::parsed("attr_value", labels.clone(), &self.value)?,
            Metric::parsed("attr_worst", labels.clone(), &self.worst)?,
            Metric::parsed("attr_threshold", labels.clone(), &self.threshold)?,
            Metric::parsed("attr_raw_value", labels, &self.raw_value)?,
        ])
    }
}

/// Whitelisted rows of a `smartctl --attributes` table, first occurrence of each name only
pub struct AttributeTable<'a> {
    rows: std::iter::Skip<std::str::Split<'a, char>>,
    seen: HashSet<String>,
}

impl<'a> AttributeTable<'a> {
    pub fn parse(output: &'a str) -> Self {
        Self {
            rows: output.trim().split('\n').skip(ATTRIBUTE_PREAMBLE_LINES),
            seen: HashSet::new(),
        }
    }
}

impl Iterator for AttributeTable<'_> {
    type Item = SmartAttribute;

    fn next(&mut self) -> Option<SmartAttribute> {
        for row in self.rows.by_ref() {
            let attribute = match SmartAttribute::from_row(row) {
                Some(attribute) => attribute,
                None => continue,
            };

            // Some attributes are reported under several IDs with the same name
            if !self.seen.insert(attribute.name.clone()) {
                tracing::debug!(attribute = %attribute.name, id = attribute.id, "Skipping duplicate attribute");
                continue;
            }

            return Some(attribute);
        }
        None
    }
}

pub struct AtaSmart;

impl AtaSmart {
    /// Metrics for every exported attribute of an `--attributes` transcript
    pub fn attribute_metrics<'a>(
        device: &'a Device,
        output: &'a str,
    ) -> impl Iterator<Item = Metric> + 'a {
        AttributeTable::parse(output)
            .filter_map(move |attribute| attribute.metrics(device).ok())
            .flatten()
    }

    /// `device_errors` from an `-l xerror,1` transcript; zero when no error is logged
    pub fn error_count_metric(device: &Device, error_log: &str) -> Metric {
        let count = ATA_ERROR_COUNT_RE
            .captures(error_log)
            .and_then(|caps| MetricValue::parse(&caps[1]).ok())
            .unwrap_or(MetricValue::Integer(0));

        Metric::new("device_errors", device.base_labels(), count)
    }
}

/// True when the `--health` transcript reports a passed self-assessment
pub fn self_assessment_passed(health_output: &str) -> bool {
    SELF_TEST_RE.is_match(health_output)
}

/// `device_smart_healthy` from a `--health` transcript
pub fn health_metric(device: &Device, health_output: &str) -> Metric {
    Metric::new(
        "device_smart_healthy",
        device.base_labels(),
        self_assessment_passed(health_output),
    )
}
