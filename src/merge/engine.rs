use std::collections::HashSet;

use tracing::debug;

use crate::models::report::assign_chart_ids;
use crate::models::{Removal, Report, ReportItem};

/// Combine the live report with a freshly generated one.
///
/// With no previous report the incoming one is taken as a fresh load: every
/// item loses its "new" flag and removal directives do nothing. Otherwise each
/// collection is merged on its own: previous items named by a removal
/// directive are dropped, then incoming items whose key is not yet present
/// are appended and flagged new. On a key collision without a removal the
/// previous item stays. Title, description, record count, cleaning log and
/// removals are carried over from the previous report.
pub fn merge(previous: Option<&Report>, incoming: Report) -> Report {
    let Some(previous) = previous else {
        return initial_load(incoming);
    };

    let Report {
        key_metrics,
        dynamic_charts,
        key_insights,
        recommendations,
        removals,
        ..
    } = incoming;

    let mut dynamic_charts = merge_collection(&previous.dynamic_charts, dynamic_charts, &removals);
    // survivors come first, so only appended charts are re-identified
    assign_chart_ids(&mut dynamic_charts);

    let merged = Report {
        key_metrics: merge_collection(&previous.key_metrics, key_metrics, &removals),
        dynamic_charts,
        key_insights: merge_collection(&previous.key_insights, key_insights, &removals),
        recommendations: merge_collection(&previous.recommendations, recommendations, &removals),
        analysis_title: previous.analysis_title.clone(),
        analysis_description: previous.analysis_description.clone(),
        data_cleaning_report: previous.data_cleaning_report.clone(),
        removals: previous.removals.clone(),
        record_count: previous.record_count,
    };

    debug!(
        before = previous.item_count(),
        after = merged.item_count(),
        added = merged.new_item_count(),
        "Merged refinement into report"
    );
    merged
}

fn initial_load(mut report: Report) -> Report {
    clear_new(&mut report.key_metrics);
    clear_new(&mut report.dynamic_charts);
    clear_new(&mut report.key_insights);
    clear_new(&mut report.recommendations);
    report
}

fn clear_new<T: ReportItem>(items: &mut [T]) {
    for item in items {
        item.set_new(false);
    }
}

/// Survivors of `previous` in their original order, followed by the incoming
/// items that introduce a key not seen so far.
fn merge_collection<T: ReportItem>(previous: &[T], incoming: Vec<T>, removals: &[Removal]) -> Vec<T> {
    let removed: HashSet<&str> = removals
        .iter()
        .filter(|r| r.kind == T::KIND)
        .map(|r| r.title.as_str())
        .collect();

    let mut merged: Vec<T> = previous
        .iter()
        .filter(|item| !removed.contains(item.key()))
        .cloned()
        .collect();

    let mut keys: HashSet<String> = merged.iter().map(|item| item.key().to_string()).collect();

    for mut item in incoming {
        item.normalize();
        item.set_new(true);
        if keys.insert(item.key().to_string()) {
            merged.push(item);
        } else {
            debug!(kind = T::KIND.as_str(), key = item.key(), "Incoming item collides, keeping existing");
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Chart, ChartType, DataPoint, Insight, ItemKind, Metric, Recommendation,
    };
    use serde_json::json;

    fn metric(label: &str, value: &str) -> Metric {
        Metric {
            label: label.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    fn chart(title: &str, kind: ChartType) -> Chart {
        Chart {
            id: format!("id-{}", title),
            title: title.into(),
            chart_type: kind,
            data: vec![DataPoint {
                name: "A".into(),
                value: 1.0,
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn insight(title: &str) -> Insight {
        Insight {
            title: title.into(),
            ..Default::default()
        }
    }

    fn recommendation(title: &str) -> Recommendation {
        Recommendation {
            title: title.into(),
            action: "do it".into(),
            ..Default::default()
        }
    }

    fn previous_report() -> Report {
        Report {
            analysis_title: "Shipment Performance".into(),
            analysis_description: "Carrier and lane overview".into(),
            key_metrics: vec![metric("Total Shipments", "1,250"), metric("On-Time Rate", "91%")],
            dynamic_charts: vec![
                chart("Gender Split", ChartType::Pie),
                chart("Volume by Carrier", ChartType::Bar),
            ],
            key_insights: vec![insight("Monday backlog"), insight("Air is costly")],
            recommendations: vec![recommendation("Renegotiate LTL rates")],
            record_count: Some(1250),
            ..Default::default()
        }
    }

    #[test]
    fn test_initial_load_clears_new_flags_and_ignores_removals() {
        let mut incoming = previous_report();
        incoming.key_metrics[0].is_new = true;
        incoming.dynamic_charts[1].is_new = true;
        incoming.removals = vec![Removal::new(ItemKind::Metric, "Total Shipments")];

        let merged = merge(None, incoming.clone());

        let mut expected = incoming;
        expected.key_metrics[0].is_new = false;
        expected.dynamic_charts[1].is_new = false;
        assert_eq!(merged, expected);
        assert_eq!(merged.titles(ItemKind::Metric), vec!["Total Shipments", "On-Time Rate"]);
    }

    #[test]
    fn test_titles_are_union_without_duplicates() {
        let previous = previous_report();
        let incoming = Report {
            key_metrics: vec![
                metric("Avg Cost per Shipment", "$412"),
                metric("On-Time Rate", "50%"),
                metric("Avg Cost per Shipment", "$999"),
            ],
            key_insights: vec![insight("Air is costly"), insight("Peak in Q4")],
            removals: vec![Removal::new(ItemKind::Insight, "Monday backlog")],
            ..Default::default()
        };

        let merged = merge(Some(&previous), incoming);

        let metrics = merged.titles(ItemKind::Metric);
        let unique: HashSet<_> = metrics.iter().collect();
        assert_eq!(unique.len(), metrics.len());
        assert_eq!(metrics, vec!["Total Shipments", "On-Time Rate", "Avg Cost per Shipment"]);
        assert_eq!(merged.key_metrics[2].value, "$412");

        assert_eq!(merged.titles(ItemKind::Insight), vec!["Air is costly", "Peak in Q4"]);
    }

    #[test]
    fn test_removal_then_replace_swaps_chart_type() {
        let previous = previous_report();
        let incoming = Report {
            dynamic_charts: vec![chart("Gender Split", ChartType::Bar)],
            removals: vec![Removal::new(ItemKind::Chart, "Gender Split")],
            ..Default::default()
        };

        let merged = merge(Some(&previous), incoming);

        let matching: Vec<_> = merged
            .dynamic_charts
            .iter()
            .filter(|c| c.title == "Gender Split")
            .collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].chart_type, ChartType::Bar);
        assert!(matching[0].is_new);
        assert_eq!(merged.titles(ItemKind::Chart), vec!["Volume by Carrier", "Gender Split"]);
    }

    #[test]
    fn test_collision_without_removal_keeps_previous() {
        let previous = previous_report();
        let incoming = Report {
            key_metrics: vec![metric("Total Shipments", "9,999")],
            ..Default::default()
        };

        let merged = merge(Some(&previous), incoming);

        assert_eq!(merged.key_metrics.len(), 2);
        assert_eq!(merged.key_metrics[0].value, "1,250");
        assert!(!merged.key_metrics[0].is_new);
    }

    #[test]
    fn test_string_chart_values_are_numeric_before_merge() {
        let incoming = Report::from_payload(json!({
            "dynamicCharts": [{
                "id": "rev",
                "title": "Revenue by Quarter",
                "chartType": "bar",
                "data": [{"name": "Q1", "value": "$1,234.50"}]
            }]
        }))
        .unwrap();

        let merged = merge(Some(&previous_report()), incoming);

        let added = merged
            .dynamic_charts
            .iter()
            .find(|c| c.title == "Revenue by Quarter")
            .unwrap();
        assert_eq!(added.data[0].name, "Q1");
        assert_eq!(added.data[0].value, 1234.50);
    }

    #[test]
    fn test_order_is_survivors_then_new() {
        let previous = Report {
            recommendations: vec![
                recommendation("A"),
                recommendation("B"),
                recommendation("C"),
                recommendation("D"),
            ],
            ..Default::default()
        };
        let incoming = Report {
            recommendations: vec![recommendation("Z"), recommendation("B"), recommendation("Y")],
            removals: vec![Removal::new(ItemKind::Recommendation, "C")],
            ..Default::default()
        };

        let merged = merge(Some(&previous), incoming);

        assert_eq!(merged.titles(ItemKind::Recommendation), vec!["A", "B", "D", "Z", "Y"]);
        let flags: Vec<bool> = merged.recommendations.iter().map(|r| r.is_new).collect();
        assert_eq!(flags, vec![false, false, false, true, true]);
    }

    #[test]
    fn test_missing_collection_keeps_filtered_previous() {
        let previous = previous_report();
        let incoming = Report::from_payload(json!({
            "removals": [{"type": "chart", "title": "Volume by Carrier"}]
        }))
        .unwrap();

        let merged = merge(Some(&previous), incoming);

        assert_eq!(merged.dynamic_charts, vec![previous.dynamic_charts[0].clone()]);
        assert_eq!(merged.key_metrics, previous.key_metrics);
    }

    #[test]
    fn test_removals_only_apply_to_their_kind() {
        let previous = previous_report();
        let incoming = Report {
            removals: vec![Removal::new(ItemKind::Metric, "Gender Split")],
            ..Default::default()
        };

        let merged = merge(Some(&previous), incoming);

        assert_eq!(merged.dynamic_charts.len(), 2);
    }

    #[test]
    fn test_removal_matches_exact_title_only() {
        let previous = previous_report();
        let incoming = Report {
            removals: vec![Removal::new(ItemKind::Metric, "total shipments")],
            ..Default::default()
        };

        let merged = merge(Some(&previous), incoming);

        assert_eq!(merged.key_metrics.len(), 2);
    }

    #[test]
    fn test_top_level_fields_come_from_previous() {
        let previous = previous_report();
        let incoming = Report {
            analysis_title: "Something Else".into(),
            analysis_description: "other".into(),
            record_count: Some(3),
            ..Default::default()
        };

        let merged = merge(Some(&previous), incoming);

        assert_eq!(merged.analysis_title, "Shipment Performance");
        assert_eq!(merged.analysis_description, "Carrier and lane overview");
        assert_eq!(merged.record_count, Some(1250));
        assert!(merged.removals.is_empty());
    }

    #[test]
    fn test_unsupported_chart_type_survives_merge() {
        let previous = previous_report();
        let incoming = Report {
            dynamic_charts: vec![chart("Lane Flow", ChartType::from_label("Sankey"))],
            ..Default::default()
        };

        let merged = merge(Some(&previous), incoming);

        let added = merged.dynamic_charts.last().unwrap();
        assert_eq!(
            added.chart_type.unsupported_notice().as_deref(),
            Some("Unsupported chart type: sankey")
        );
    }

    #[test]
    fn test_appended_chart_reusing_an_id_gets_a_fresh_one() {
        let mut cost = chart("Cost by Carrier", ChartType::Bar);
        cost.id = "chart1".into();
        let previous = Report {
            dynamic_charts: vec![cost],
            ..Default::default()
        };
        let mut share = chart("Cost Share", ChartType::Pie);
        share.id = "chart1".into();
        let incoming = Report {
            dynamic_charts: vec![share],
            ..Default::default()
        };

        let merged = merge(Some(&previous), incoming);

        let ids: Vec<&str> = merged.dynamic_charts.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0], "chart1");
        assert_ne!(ids[1], "chart1");
        assert!(ids[1].starts_with("chart-"));
        assert_eq!(merged.dynamic_charts[1].title, "Cost Share");
    }
}
