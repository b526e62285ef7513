use std::fmt::Debug;

use chrono::NaiveDateTime;
use colonnade_common::value::DataValue;

use crate::format_num::NumberFormat;

/// Value-to-display-string service consumed by the converter for tooltip
/// and label text. The converter never formats inline; hosts may swap in
/// their own locale-aware implementation.
pub trait ValueFormatter: Debug {
    fn format_number(&self, value: f64, format_str: Option<&str>) -> String;

    fn format_timestamp(&self, value: &NaiveDateTime, format_str: Option<&str>) -> String;

    /// Format any scalar, routing numbers and timestamps through the
    /// dedicated paths and everything else through the placeholder rule.
    fn format_value(&self, value: &DataValue, format_str: Option<&str>) -> String {
        match value {
            DataValue::Number(v) => self.format_number(*v, format_str),
            DataValue::Timestamp(t) => self.format_timestamp(t, format_str),
            other => other.label(),
        }
    }
}

/// Formatter backed by the d3-style numeric mini-language and chrono
/// strftime patterns.
#[derive(Debug, Clone, Default)]
pub struct DefaultFormatter;

impl ValueFormatter for DefaultFormatter {
    fn format_number(&self, value: f64, format_str: Option<&str>) -> String {
        match format_str {
            Some(pattern) => NumberFormat::new().format(pattern, value),
            None => format!("{}", value),
        }
    }

    fn format_timestamp(&self, value: &NaiveDateTime, format_str: Option<&str>) -> String {
        match format_str {
            Some(pattern) => value.format(pattern).to_string(),
            None => value.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}
