use serde::Serialize;

use crate::data::aggregate::Bin;

// ---------------------------------------------------------------------------
// Declarative chart specs – what the core hands to the renderer
// ---------------------------------------------------------------------------

/// Rendering hint for a prepared chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartKind {
    Line,
    Bar,
    /// Horizontal bars, category per row.
    BarH,
    Scatter,
    Histogram,
}

/// How numeric values of a chart should be written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValueFormat {
    Plain,
    /// Whole dollars with thousands separators.
    Dollars,
    /// ROI-style multiplier, e.g. `2.31x`.
    Multiplier,
    Count,
}

impl ValueFormat {
    pub fn format(&self, value: f64) -> String {
        match self {
            ValueFormat::Plain => format!("{value:.2}"),
            ValueFormat::Dollars => format!("${}", group_thousands(value.round() as i64)),
            ValueFormat::Multiplier => format!("{value:.2}x"),
            ValueFormat::Count => group_thousands(value.round() as i64),
        }
    }
}

/// The data behind a chart, already reduced by the aggregation layer.
#[derive(Debug, Clone, Serialize)]
pub enum ChartData {
    /// `(x, y)` pairs with a numeric x axis (years, decades).
    Series(Vec<[f64; 2]>),
    /// One value per named category, in display order.
    Categories(Vec<(String, f64)>),
    /// Point groups sharing a label (scatter colored by genre).
    Groups(Vec<ScatterGroup>),
    /// Equal-width histogram bins.
    Bins(Vec<Bin>),
}

#[derive(Debug, Clone, Serialize)]
pub struct ScatterGroup {
    pub label: String,
    pub points: Vec<[f64; 2]>,
}

/// A fully prepared chart: data plus labels plus a kind hint.  The core
/// never renders; the egui layer turns these into plots.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub kind: ChartKind,
    pub x_label: String,
    pub y_label: String,
    pub value_format: ValueFormat,
    pub data: ChartData,
}

// ---------------------------------------------------------------------------
// KPI scalars
// ---------------------------------------------------------------------------

/// Sentinel shown where a KPI could not be computed.
pub const UNAVAILABLE: &str = "—";

/// One summary number with its label, already formatted for display.
#[derive(Debug, Clone, Serialize)]
pub struct Kpi {
    pub label: String,
    pub value: String,
}

impl Kpi {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Kpi {
            label: label.into(),
            value: value.into(),
        }
    }

    /// A KPI from an optional scalar; `None` renders the sentinel.
    pub fn numeric(label: impl Into<String>, value: Option<f64>, format: ValueFormat) -> Self {
        let value = match value {
            Some(v) => format.format(v),
            None => UNAVAILABLE.to_string(),
        };
        Kpi::new(label, value)
    }
}

/// Whole-number formatting with `,` thousands separators.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    let first = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - first) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(187_000_000), "187,000,000");
        assert_eq!(group_thousands(-1_234_567), "-1,234,567");
    }

    #[test]
    fn value_formats() {
        assert_eq!(ValueFormat::Dollars.format(1234567.8), "$1,234,568");
        assert_eq!(ValueFormat::Multiplier.format(2.0), "2.00x");
        assert_eq!(ValueFormat::Count.format(4321.0), "4,321");
        assert_eq!(ValueFormat::Plain.format(6.5), "6.50");
    }

    #[test]
    fn unavailable_kpi_uses_sentinel() {
        let kpi = Kpi::numeric("mean ROI", None, ValueFormat::Multiplier);
        assert_eq!(kpi.value, UNAVAILABLE);
        let kpi = Kpi::numeric("mean ROI", Some(2.345), ValueFormat::Multiplier);
        assert_eq!(kpi.value, "2.35x");
    }
}
