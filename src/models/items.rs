use serde::{Deserialize, Serialize};

use super::lenient;
use super::vocab::{deserialize_impact, ChartType, Icon, Impact, MetricVariant, Severity};

/// The four keyed collections of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Metric,
    Chart,
    Insight,
    Recommendation,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Metric => "metric",
            ItemKind::Chart => "chart",
            ItemKind::Insight => "insight",
            ItemKind::Recommendation => "recommendation",
        }
    }
}

/// Shared behaviour of report items: a string key that identifies the item
/// within its collection, and the "new in the latest refinement" flag.
pub trait ReportItem: Clone {
    const KIND: ItemKind;

    /// Metrics key on `label`, every other kind on `title`.
    fn key(&self) -> &str;

    fn is_new(&self) -> bool;

    fn set_new(&mut self, is_new: bool);

    /// Hook run on every incoming item before it enters a merged report.
    fn normalize(&mut self) {}
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    #[serde(default, deserialize_with = "lenient::text")]
    pub label: String,
    /// Display text; numeric values from the model are kept in their JSON spelling.
    #[serde(default, deserialize_with = "lenient::text")]
    pub value: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default)]
    pub icon: Icon,
    #[serde(default)]
    pub variant: MetricVariant,
    #[serde(default)]
    pub is_new: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataPoint {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub value: f64,
    #[serde(
        default,
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub x: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub y: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    #[serde(default, deserialize_with = "lenient::text")]
    pub x_key: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub y_key: String,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chart {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default)]
    pub chart_type: ChartType,
    #[serde(default, deserialize_with = "lenient::items")]
    pub data: Vec<DataPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ChartConfig>,
    #[serde(default)]
    pub is_new: bool,
}

impl Chart {
    /// Largest absolute point value, used to scale bars when rendering.
    pub fn max_value(&self) -> f64 {
        self.data
            .iter()
            .map(|p| p.value.abs())
            .fold(0.0_f64, f64::max)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default)]
    pub is_new: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub action: String,
    #[serde(
        default,
        deserialize_with = "deserialize_impact",
        skip_serializing_if = "Option::is_none"
    )]
    pub impact: Option<Impact>,
    #[serde(default)]
    pub is_new: bool,
}

/// A removal directive: drop the item of `kind` whose key equals `title`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Removal {
    #[serde(rename = "type")]
    pub kind: ItemKind,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
}

impl Removal {
    pub fn new(kind: ItemKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
        }
    }
}

/// One line of the optional data-cleaning log.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataCleaningStep {
    #[serde(default, deserialize_with = "lenient::text")]
    pub step: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub details: String,
}

impl ReportItem for Metric {
    const KIND: ItemKind = ItemKind::Metric;

    fn key(&self) -> &str {
        &self.label
    }

    fn is_new(&self) -> bool {
        self.is_new
    }

    fn set_new(&mut self, is_new: bool) {
        self.is_new = is_new;
    }
}

impl ReportItem for Chart {
    const KIND: ItemKind = ItemKind::Chart;

    fn key(&self) -> &str {
        &self.title
    }

    fn is_new(&self) -> bool {
        self.is_new
    }

    fn set_new(&mut self, is_new: bool) {
        self.is_new = is_new;
    }

    fn normalize(&mut self) {
        self.chart_type = ChartType::from_label(self.chart_type.as_str());
        for point in &mut self.data {
            if !point.value.is_finite() {
                point.value = 0.0;
            }
        }
    }
}

impl ReportItem for Insight {
    const KIND: ItemKind = ItemKind::Insight;

    fn key(&self) -> &str {
        &self.title
    }

    fn is_new(&self) -> bool {
        self.is_new
    }

    fn set_new(&mut self, is_new: bool) {
        self.is_new = is_new;
    }
}

impl ReportItem for Recommendation {
    const KIND: ItemKind = ItemKind::Recommendation;

    fn key(&self) -> &str {
        &self.title
    }

    fn is_new(&self) -> bool {
        self.is_new
    }

    fn set_new(&mut self, is_new: bool) {
        self.is_new = is_new;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metric_value_number_becomes_text() {
        let metric: Metric = serde_json::from_value(json!({
            "label": "Total Shipments",
            "value": 1250,
            "description": "All rows",
            "icon": "Truck"
        }))
        .unwrap();
        assert_eq!(metric.value, "1250");
        assert_eq!(metric.icon, Icon::Activity);
        assert_eq!(metric.variant, MetricVariant::Default);
        assert!(!metric.is_new);
    }

    #[test]
    fn test_data_point_string_value_is_coerced() {
        let point: DataPoint =
            serde_json::from_value(json!({"name": 2023, "value": "$4,500"})).unwrap();
        assert_eq!(point.name, "2023");
        assert_eq!(point.value, 4500.0);
    }

    #[test]
    fn test_data_point_garbage_value_is_zero() {
        let point: DataPoint =
            serde_json::from_value(json!({"name": "Air", "value": "unknown"})).unwrap();
        assert_eq!(point.value, 0.0);
    }

    #[test]
    fn test_recommendation_unknown_impact_is_dropped() {
        let rec: Recommendation = serde_json::from_value(json!({
            "title": "Consolidate loads",
            "action": "Merge LTL shipments on the Dallas lane",
            "impact": "enormous"
        }))
        .unwrap();
        assert_eq!(rec.impact, None);
        let out = serde_json::to_value(&rec).unwrap();
        assert!(out.get("impact").is_none());
    }

    #[test]
    fn test_removal_with_unknown_kind_is_rejected() {
        let parsed = serde_json::from_value::<Removal>(json!({"type": "table", "title": "x"}));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_chart_normalize_lowercases_type() {
        let mut chart: Chart = serde_json::from_value(json!({
            "id": "c1",
            "title": "Volume",
            "chartType": "LINE",
            "data": []
        }))
        .unwrap();
        chart.normalize();
        assert_eq!(chart.chart_type, ChartType::Line);
        assert_eq!(serde_json::to_value(&chart).unwrap()["chartType"], "line");
    }
}
