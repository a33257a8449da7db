/// Tests for the metric model and the text exposition writer
use super::exposition::{escape_label_value, format_labels};
use super::*;
use test_case::test_case;

fn base_labels() -> Labels {
    Labels::new().with("device", "/dev/sda").with("disk", "0")
}

// ============================================================================
// Labels
// ============================================================================

#[test]
fn test_labels_keep_insertion_order() {
    let labels = Labels::new().with("name", "power_on_hours").with("device", "/dev/sda");
    let keys: Vec<&str> = labels.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["name", "device"]);
}

#[test]
fn test_labels_reinsert_replaces_in_place() {
    let mut labels = base_labels();
    labels.insert("device", "/dev/sdb");

    assert_eq!(labels.iter().count(), 2);
    assert_eq!(labels.get("device"), Some("/dev/sdb"));
    assert_eq!(labels.iter().next(), Some(("device", "/dev/sdb")));
}

#[test]
fn test_labels_extend() {
    let mut labels = Labels::new().with("name", "spin_up_time");
    labels.extend(&base_labels());
    assert_eq!(format_labels(&labels), r#"name="spin_up_time",device="/dev/sda",disk="0""#);
}

// ============================================================================
// MetricValue
// ============================================================================

#[test_case("36", "36" ; "plain integer")]
#[test_case("000", "0" ; "zero padded threshold")]
#[test_case("007", "7" ; "leading zeros")]
#[test_case(" 32", "32" ; "surrounding whitespace")]
#[test_case("-4", "-4" ; "negative")]
#[test_case("1.50", "1.50" ; "fraction kept exactly")]
#[test_case("00.25", "0.25" ; "fraction with padded integer part")]
#[test_case("18446744073709551616", "18446744073709551616" ; "beyond u64")]
fn test_metric_value_parse_and_render(input: &str, rendered: &str) {
    let value = MetricValue::parse(input).unwrap();
    assert_eq!(value.to_string(), rendered);
}

#[test_case("" ; "empty")]
#[test_case("-" ; "sign only")]
#[test_case("." ; "dot only")]
#[test_case("36 (Min/Max 24/40)" ; "vendor suffix")]
#[test_case("0x0f" ; "hex")]
#[test_case("1,234" ; "thousands separator")]
fn test_metric_value_rejects(input: &str) {
    assert!(matches!(
        MetricValue::parse(input),
        Err(SmartmonError::InvalidValue(_))
    ));
}

#[test]
fn test_bool_values_render_as_digits() {
    assert_eq!(MetricValue::from(true).to_string(), "1");
    assert_eq!(MetricValue::from(false).to_string(), "0");
}

// ============================================================================
// Exposition
// ============================================================================

#[test]
fn test_escape_label_value() {
    assert_eq!(escape_label_value(r#"WDC "Blue""#), r#"WDC \"Blue\""#);
    assert_eq!(escape_label_value(r"a\b"), r"a\\b");
    assert_eq!(escape_label_value("a\nb"), r"a\nb");
}

#[test]
fn test_exposition_prints_preamble_once_per_name() {
    let version = Metric::new(
        "smartctl_version",
        Labels::new().with("version", "7.2"),
        true,
    );
    let metrics = vec![
        Metric::new("device_active", base_labels(), true),
        Metric::new(
            "device_active",
            Labels::new().with("device", "/dev/sdb").with("disk", "0"),
            false,
        ),
        Metric::new("device_errors", base_labels(), 0i64),
    ];

    let out = write_exposition(Vec::new(), "smartmon_", &version, &metrics).unwrap();
    let text = String::from_utf8(out).unwrap();

    let expected = "\
# HELP smartmon_smartctl_version SMART metric smartctl_version
# TYPE smartmon_smartctl_version gauge
smartmon_smartctl_version{version=\"7.2\"} 1
# HELP smartmon_device_active SMART metric device_active
# TYPE smartmon_device_active gauge
smartmon_device_active{device=\"/dev/sda\",disk=\"0\"} 1
smartmon_device_active{device=\"/dev/sdb\",disk=\"0\"} 0
# HELP smartmon_device_errors SMART metric device_errors
# TYPE smartmon_device_errors gauge
smartmon_device_errors{device=\"/dev/sda\",disk=\"0\"} 0
";
    assert_eq!(text, expected);
    assert_eq!(text.matches("# TYPE smartmon_device_active").count(), 1);
}

#[test]
fn test_exposition_custom_prefix() {
    let mut writer = ExpositionWriter::new(Vec::new(), "node_smart_");
    writer
        .write_metric(&Metric::new("device_smart_healthy", base_labels(), true))
        .unwrap();

    let text = String::from_utf8(writer.into_inner()).unwrap();
    assert!(text.contains("# TYPE node_smart_device_smart_healthy gauge"));
    assert!(text.ends_with("node_smart_device_smart_healthy{device=\"/dev/sda\",disk=\"0\"} 1\n"));
}
