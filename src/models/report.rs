use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::items::{
    Chart, DataCleaningStep, Insight, ItemKind, Metric, Recommendation, Removal, ReportItem,
};
use super::lenient;
use crate::errors::ShiplensError;

/// The analytics report shown to the user.
///
/// The same type carries a model response before it is merged (a "partial"
/// report, where any collection may be empty and `removals` may be present)
/// and the merged live report.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(default, deserialize_with = "lenient::text")]
    pub analysis_title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub analysis_description: String,
    #[serde(default, deserialize_with = "lenient::items")]
    pub key_metrics: Vec<Metric>,
    #[serde(default, deserialize_with = "lenient::items")]
    pub dynamic_charts: Vec<Chart>,
    #[serde(default, deserialize_with = "lenient::items")]
    pub key_insights: Vec<Insight>,
    #[serde(default, deserialize_with = "lenient::items")]
    pub recommendations: Vec<Recommendation>,
    #[serde(
        default,
        deserialize_with = "lenient::items",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub data_cleaning_report: Vec<DataCleaningStep>,
    #[serde(
        default,
        deserialize_with = "lenient::items",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub removals: Vec<Removal>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub record_count: Option<usize>,
}

impl Report {
    /// Admit a model payload as a report.
    ///
    /// Non-object payloads are rejected. Unreadable elements are skipped,
    /// duplicate keys inside a collection keep the first occurrence and charts
    /// without a usable id get a generated one.
    pub fn from_payload(payload: Value) -> Result<Self, ShiplensError> {
        if !payload.is_object() {
            return Err(ShiplensError::ResponseShape {
                message: "expected a JSON object at the top level".into(),
                raw: payload.to_string(),
            });
        }

        let raw = payload.to_string();
        let mut report: Report =
            serde_json::from_value(payload).map_err(|e| ShiplensError::ResponseShape {
                message: e.to_string(),
                raw,
            })?;
        report.sanitize();
        Ok(report)
    }

    fn sanitize(&mut self) {
        dedupe_by_key(&mut self.key_metrics);
        dedupe_by_key(&mut self.dynamic_charts);
        dedupe_by_key(&mut self.key_insights);
        dedupe_by_key(&mut self.recommendations);
        assign_chart_ids(&mut self.dynamic_charts);
        self.removals.retain(|r| !r.title.trim().is_empty());
    }

    /// Keys of one collection, in display order.
    pub fn titles(&self, kind: ItemKind) -> Vec<&str> {
        match kind {
            ItemKind::Metric => self.key_metrics.iter().map(ReportItem::key).collect(),
            ItemKind::Chart => self.dynamic_charts.iter().map(ReportItem::key).collect(),
            ItemKind::Insight => self.key_insights.iter().map(ReportItem::key).collect(),
            ItemKind::Recommendation => {
                self.recommendations.iter().map(ReportItem::key).collect()
            }
        }
    }

    pub fn item_count(&self) -> usize {
        self.key_metrics.len()
            + self.dynamic_charts.len()
            + self.key_insights.len()
            + self.recommendations.len()
    }

    /// Number of items flagged as added by the latest refinement.
    pub fn new_item_count(&self) -> usize {
        self.key_metrics.iter().filter(|i| i.is_new()).count()
            + self.dynamic_charts.iter().filter(|i| i.is_new()).count()
            + self.key_insights.iter().filter(|i| i.is_new()).count()
            + self.recommendations.iter().filter(|i| i.is_new()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0 && self.analysis_title.trim().is_empty()
    }
}

fn dedupe_by_key<T: ReportItem>(items: &mut Vec<T>) {
    let mut seen = HashSet::new();
    items.retain(|item| {
        let fresh = seen.insert(item.key().to_string());
        if !fresh {
            debug!(kind = T::KIND.as_str(), key = item.key(), "Dropping duplicate item");
        }
        fresh
    });
}

/// Give every chart a non-blank id unique within `charts`. Earlier charts
/// keep theirs; later collisions get a fresh one.
pub(crate) fn assign_chart_ids(charts: &mut [Chart]) {
    let mut ids = HashSet::new();
    for chart in charts.iter_mut() {
        if chart.id.trim().is_empty() || ids.contains(&chart.id) {
            chart.id = format!("chart-{}", uuid::Uuid::new_v4());
        }
        ids.insert(chart.id.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vocab::{ChartType, Severity};
    use serde_json::json;

    #[test]
    fn test_from_payload_rejects_non_object() {
        let err = Report::from_payload(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, ShiplensError::ResponseShape { .. }));
    }

    #[test]
    fn test_missing_collections_are_empty() {
        let report = Report::from_payload(json!({"analysisTitle": "Freight Review"})).unwrap();
        assert_eq!(report.analysis_title, "Freight Review");
        assert!(report.key_metrics.is_empty());
        assert!(report.dynamic_charts.is_empty());
        assert!(report.removals.is_empty());
        assert_eq!(report.record_count, None);
    }

    #[test]
    fn test_unreadable_elements_are_skipped() {
        let report = Report::from_payload(json!({
            "keyInsights": [
                "just a string",
                {"title": "Late deliveries cluster on Mondays", "severity": "warning", "description": "d"},
                42
            ],
            "removals": [
                {"type": "chart", "title": "Old"},
                {"type": "widget", "title": "Nope"},
                {"type": "metric"}
            ]
        }))
        .unwrap();
        assert_eq!(report.key_insights.len(), 1);
        assert_eq!(report.key_insights[0].severity, Severity::Warning);
        assert_eq!(report.removals, vec![Removal::new(ItemKind::Chart, "Old")]);
    }

    #[test]
    fn test_duplicate_keys_keep_first() {
        let report = Report::from_payload(json!({
            "keyMetrics": [
                {"label": "On-Time Rate", "value": "91%"},
                {"label": "On-Time Rate", "value": "12%"},
                {"label": "Avg Transit", "value": "3.2 days"}
            ]
        }))
        .unwrap();
        assert_eq!(report.titles(ItemKind::Metric), vec!["On-Time Rate", "Avg Transit"]);
        assert_eq!(report.key_metrics[0].value, "91%");
    }

    #[test]
    fn test_chart_ids_are_made_unique() {
        let report = Report::from_payload(json!({
            "dynamicCharts": [
                {"id": "", "title": "By Carrier", "chartType": "bar", "data": []},
                {"id": "c1", "title": "By Mode", "chartType": "pie", "data": []},
                {"id": "c1", "title": "By Month", "chartType": "Sankey", "data": []}
            ]
        }))
        .unwrap();
        let ids: HashSet<_> = report.dynamic_charts.iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids.len(), 3);
        assert!(report.dynamic_charts[0].id.starts_with("chart-"));
        assert_eq!(report.dynamic_charts[1].id, "c1");
        assert_eq!(
            report.dynamic_charts[2].chart_type,
            ChartType::Unsupported("sankey".into())
        );
    }

    #[test]
    fn test_snapshot_round_trip_keeps_new_flags() {
        let mut report = Report::from_payload(json!({
            "analysisTitle": "Q3 Freight",
            "keyMetrics": [{"label": "Spend", "value": "$1.2M", "icon": "DollarSign"}]
        }))
        .unwrap();
        report.key_metrics[0].is_new = true;
        report.record_count = Some(120);

        let text = serde_json::to_string(&report).unwrap();
        assert!(text.contains("\"isNew\":true"));
        assert!(text.contains("\"recordCount\":120"));
        let back: Report = serde_json::from_str(&text).unwrap();
        assert_eq!(back, report);
    }
}
