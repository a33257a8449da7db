use super::{Labels, Metric};
use std::io::{self, Write};

/// Streams metrics in the Prometheus text exposition format.
///
/// HELP/TYPE lines are printed whenever the metric name changes, so callers
/// must feed metrics grouped by name (sorted) to get one preamble per name.
pub struct ExpositionWriter<W: Write> {
    out: W,
    prefix: String,
    previous_name: Option<String>,
}

impl<W: Write> ExpositionWriter<W> {
    pub fn new(out: W, prefix: impl Into<String>) -> Self {
        Self {
            out,
            prefix: prefix.into(),
            previous_name: None,
        }
    }

    pub fn write_metric(&mut self, metric: &Metric) -> io::Result<()> {
        if self.previous_name.as_deref() != Some(metric.name.as_str()) {
            self.write_meta(metric)?;
            self.previous_name = Some(metric.name.clone());
        }

        writeln!(
            self.out,
            "{}{}{{{}}} {}",
            self.prefix,
            metric.name,
            format_labels(&metric.labels),
            metric.value
        )
    }

    fn write_meta(&mut self, metric: &Metric) -> io::Result<()> {
        writeln!(
            self.out,
            "# HELP {}{} SMART metric {}",
            self.prefix, metric.name, metric.name
        )?;
        writeln!(self.out, "# TYPE {}{} gauge", self.prefix, metric.name)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Write the version metric followed by `metrics`, which must already be sorted by name
pub fn write_exposition<W: Write>(
    out: W,
    prefix: &str,
    version: &Metric,
    metrics: &[Metric],
) -> io::Result<W> {
    let mut writer = ExpositionWriter::new(out, prefix);

    writer.write_metric(version)?;
    for metric in metrics {
        writer.write_metric(metric)?;
    }

    let mut out = writer.into_inner();
    out.flush()?;
    Ok(out)
}

pub(crate) fn format_labels(labels: &Labels) -> String {
    labels
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label_value(v)))
        .collect::<Vec<_>>()
        .join(",")
}

pub(crate) fn escape_label_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}
