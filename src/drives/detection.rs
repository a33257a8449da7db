use crate::metrics::Labels;
use crate::smartctl::SmartctlRunner;
use crate::{DeviceType, SmartmonResult};

/// A device as listed by `smartctl --scan-open`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub path: String,
    /// Value of the `-d`/`--device` flag, e.g. `sat`, `nvme` or `sat+megaraid,2`
    pub selector: Option<String>,
    pub device_type: DeviceType,
}

impl Device {
    pub fn new(path: impl Into<String>, selector: Option<String>) -> Self {
        let device_type = DeviceType::from_selector(selector.as_deref());
        Self {
            path: path.into(),
            selector,
            device_type,
        }
    }

    /// Disk index behind an enclosure, taken from the selector suffix after `+`
    pub fn disk_index(&self) -> &str {
        self.selector
            .as_deref()
            .and_then(|s| s.split_once('+'))
            .map(|(_, index)| index)
            .filter(|index| !index.is_empty())
            .unwrap_or("0")
    }

    /// `{device, disk}`, attached to every metric of this device
    pub fn base_labels(&self) -> Labels {
        Labels::new()
            .with("device", self.path.as_str())
            .with("disk", self.disk_index())
    }

    /// Arguments selecting this device in a smartctl invocation
    pub fn smartctl_select(&self) -> Vec<&str> {
        match &self.selector {
            Some(selector) => vec!["--device", selector.as_str(), self.path.as_str()],
            None => vec![self.path.as_str()],
        }
    }

    /// Full argument list: `leading` followed by the device selection
    pub fn args<'a>(&'a self, leading: &[&'a str]) -> Vec<&'a str> {
        let mut args = leading.to_vec();
        args.extend(self.smartctl_select());
        args
    }
}

pub struct DeviceScanner;

impl DeviceScanner {
    /// Run the scan and parse its listing.
    ///
    /// A failing scan aborts the whole collection run.
    pub fn find_devices<R: SmartctlRunner + ?Sized>(
        runner: &R,
        scan_args: &[&str],
    ) -> SmartmonResult<Vec<Device>> {
        let listing = runner.run(scan_args, false)?;
        let devices: Vec<Device> = Self::parse_scan(&listing).collect();
        tracing::info!(count = devices.len(), "Discovered devices");
        Ok(devices)
    }

    /// Parse `smartctl --scan-open` output, one device per non-comment line
    pub fn parse_scan(listing: &str) -> impl Iterator<Item = Device> + '_ {
        listing.lines().filter_map(Self::parse_scan_line)
    }

    pub(crate) fn parse_scan_line(line: &str) -> Option<Device> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        // Unquoted words starting with '#' open a comment; quoted ones are data
        let tokens = match shlex::split(line) {
            Some(tokens) => tokens,
            None => {
                tracing::warn!(line = %line, "Skipping scan line with unbalanced quotes");
                return None;
            }
        };

        let mut tokens = tokens.into_iter();
        let path = tokens.next()?;
        let selector = Self::parse_device_flag(tokens);

        Some(Device::new(path, selector))
    }

    /// Pick the `-d`/`--device` value out of the option tokens, ignoring
    /// every other flag. The last occurrence wins.
    pub(crate) fn parse_device_flag<I>(tokens: I) -> Option<String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut selector = None;
        let mut tokens = tokens.into_iter();

        while let Some(token) = tokens.next() {
            if token == "-d" || token == "--device" {
                if let Some(value) = tokens.next() {
                    selector = Some(value);
                }
            } else if let Some(value) = token.strip_prefix("--device=") {
                selector = Some(value.to_string());
            } else if let Some(value) = token.strip_prefix("-d").filter(|v| !v.is_empty()) {
                selector = Some(value.to_string());
            }
        }

        selector
    }
}
