use std::borrow::Cow;

use tracing::debug;

use super::templates::{
    ANALYSIS_TEMPLATE, CHART_RULES_NON_TEMPORAL, CHART_RULES_TEMPORAL, OUTPUT_SCHEMA,
    REFINEMENT_OBJECTIVES, REFINEMENT_REQUEST, STANDARD_OBJECTIVES, USER_INSTRUCTIONS_BLOCK,
};
use super::temporal::temporal_columns;
use crate::ingest::Dataset;
use crate::models::{Icon, ItemKind, Report};

/// Substring that switches the prompt into refinement objectives.
pub const ADDITIVE_MARKER: &str = "(ADDITIVE REQUEST)";

/// Rows of the dataset shown to the model.
pub const DEFAULT_SAMPLE_ROWS: usize = 35;

/// Values substituted into the prompt templates.
#[derive(Debug, Clone, Default)]
pub struct PromptVariables {
    pub source_name: String,
    pub total_records: usize,
    pub columns: String,
    pub sample_size: usize,
    pub sample_data: String,
    pub allowed_chart_types: String,
    pub temporal_columns: String,
    pub icons: String,
    pub custom_prompt: Option<String>,
}

/// Fill `{{NAME}}` placeholders in one left-to-right pass. Substituted text
/// is never scanned again, and names `lookup` does not know stay as written.
fn fill<'a>(template: &str, lookup: impl Fn(&str) -> Option<Cow<'a, str>>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        match after.find("}}") {
            Some(close) => {
                let name = &after[..close];
                match lookup(name) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push_str("{{");
                        out.push_str(name);
                        out.push_str("}}");
                    }
                }
                rest = &after[close + 2..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Replace `{{NAME}}` placeholders. Unset optional values become empty.
pub fn interpolate(template: &str, vars: &PromptVariables) -> String {
    fill(template, move |name| {
        let value: Cow<'_, str> = match name {
            "SOURCE_NAME" => Cow::Borrowed(vars.source_name.as_str()),
            "TOTAL_RECORDS" => Cow::Owned(vars.total_records.to_string()),
            "COLUMNS" => Cow::Borrowed(vars.columns.as_str()),
            "SAMPLE_SIZE" => Cow::Owned(vars.sample_size.to_string()),
            "SAMPLE_DATA" => Cow::Borrowed(vars.sample_data.as_str()),
            "ALLOWED_CHART_TYPES" => Cow::Borrowed(vars.allowed_chart_types.as_str()),
            "TEMPORAL_COLUMNS" => Cow::Borrowed(vars.temporal_columns.as_str()),
            "ICONS" => Cow::Borrowed(vars.icons.as_str()),
            "CUSTOM_PROMPT" => Cow::Borrowed(vars.custom_prompt.as_deref().unwrap_or("")),
            _ => return None,
        };
        Some(value)
    })
}

pub fn is_additive(custom_prompt: Option<&str>) -> bool {
    custom_prompt.is_some_and(|p| p.contains(ADDITIVE_MARKER))
}

/// Assemble the full generation prompt for a dataset.
pub fn build_analysis_prompt(dataset: &Dataset, custom_prompt: Option<&str>, sample_rows: usize) -> String {
    let custom_prompt = custom_prompt.map(str::trim).filter(|p| !p.is_empty());
    let sample = dataset.sample(sample_rows);
    let temporal = temporal_columns(dataset, sample_rows);

    let allowed: &[&str] = if temporal.is_empty() {
        &["bar", "pie", "scatter"]
    } else {
        &["bar", "pie", "line", "area", "scatter"]
    };

    let vars = PromptVariables {
        source_name: dataset.source_name.clone(),
        total_records: dataset.total_rows(),
        columns: dataset.columns.join(", "),
        sample_size: sample.len(),
        sample_data: serde_json::to_string(sample).unwrap_or_else(|_| "[]".into()),
        allowed_chart_types: allowed
            .iter()
            .map(|t| format!("'{}'", t))
            .collect::<Vec<_>>()
            .join(", "),
        temporal_columns: temporal.join(", "),
        icons: Icon::ALL.iter().map(Icon::as_str).collect::<Vec<_>>().join(", "),
        custom_prompt: custom_prompt.map(str::to_string),
    };

    let user_block = if custom_prompt.is_some() {
        USER_INSTRUCTIONS_BLOCK
    } else {
        ""
    };
    let objectives = if is_additive(custom_prompt) {
        REFINEMENT_OBJECTIVES
    } else {
        STANDARD_OBJECTIVES
    };
    let chart_rules = if temporal.is_empty() {
        CHART_RULES_NON_TEMPORAL
    } else {
        CHART_RULES_TEMPORAL
    };

    // Fixed sections first; dataset and user text go in last, in a single pass.
    let template = fill(ANALYSIS_TEMPLATE, move |name| match name {
        "USER_INSTRUCTIONS" => Some(Cow::Borrowed(user_block)),
        "OBJECTIVES" => Some(Cow::Borrowed(objectives)),
        "CHART_RULES" => Some(Cow::Borrowed(chart_rules)),
        "OUTPUT_SCHEMA" => Some(Cow::Borrowed(OUTPUT_SCHEMA)),
        _ => None,
    });
    let prompt = interpolate(&template, &vars);

    debug!(
        chars = prompt.len(),
        sample = vars.sample_size,
        additive = is_additive(custom_prompt),
        temporal = !temporal.is_empty(),
        "Built analysis prompt"
    );
    prompt
}

/// Wrap a user refinement in the additive instruction, listing what the
/// current report already contains.
pub fn build_refinement_request(user_prompt: &str, current: Option<&Report>) -> String {
    let digest = |kind: ItemKind| -> String {
        let titles = current.map(|r| r.titles(kind)).unwrap_or_default();
        if titles.is_empty() {
            "(none)".to_string()
        } else {
            titles.join(", ")
        }
    };

    let user_prompt = user_prompt.trim().trim_end_matches('.');
    fill(REFINEMENT_REQUEST, move |name| {
        let value = match name {
            "MARKER" => return Some(Cow::Borrowed(ADDITIVE_MARKER)),
            "USER_PROMPT" => return Some(Cow::Borrowed(user_prompt)),
            "METRICS" => digest(ItemKind::Metric),
            "CHARTS" => digest(ItemKind::Chart),
            "INSIGHTS" => digest(ItemKind::Insight),
            "RECOMMENDATIONS" => digest(ItemKind::Recommendation),
            _ => return None,
        };
        Some(Cow::Owned(value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::Row;
    use crate::models::Metric;
    use serde_json::json;

    fn dataset(columns: &[&str], rows: usize) -> Dataset {
        let rows = (0..rows)
            .map(|i| {
                let mut row = Row::new();
                for column in columns {
                    row.insert(column.to_string(), json!(format!("{}-{}", column, i)));
                }
                row
            })
            .collect();
        Dataset::new(
            "shipments.xlsx",
            columns.iter().map(|c| c.to_string()).collect(),
            rows,
        )
    }

    #[test]
    fn test_standard_prompt_sections() {
        let prompt = build_analysis_prompt(&dataset(&["Carrier", "Origin"], 3), None, 35);
        assert!(prompt.contains("Total Records: 3"));
        assert!(prompt.contains("Columns/Keys: Carrier, Origin"));
        assert!(prompt.contains("OBJECTIVES:"));
        assert!(!prompt.contains("REFINEMENT MODE"));
        assert!(!prompt.contains("USER SPECIAL INSTRUCTIONS"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_additive_marker_switches_objectives() {
        let request = build_refinement_request("add a chart of cost by mode", None);
        assert!(is_additive(Some(&request)));
        let prompt = build_analysis_prompt(&dataset(&["Mode"], 2), Some(&request), 35);
        assert!(prompt.contains("REFINEMENT MODE"));
        assert!(prompt.contains("USER SPECIAL INSTRUCTIONS: (ADDITIVE REQUEST): add a chart of cost by mode"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_non_temporal_data_forbids_line_charts() {
        let prompt = build_analysis_prompt(&dataset(&["Carrier", "Weight"], 2), None, 35);
        assert!(prompt.contains("DO NOT USE LINE/AREA CHARTS"));
        assert!(prompt.contains("'bar', 'pie', 'scatter'"));
        assert!(!prompt.contains("'line'"));
    }

    #[test]
    fn test_temporal_data_allows_line_charts() {
        let prompt = build_analysis_prompt(&dataset(&["Ship Date", "Carrier"], 2), None, 35);
        assert!(prompt.contains("'line', 'area'"));
        assert!(prompt.contains("(Ship Date)"));
    }

    #[test]
    fn test_sample_is_capped() {
        let prompt = build_analysis_prompt(&dataset(&["Lane"], 80), None, 35);
        assert!(prompt.contains("Total Records: 80"));
        assert!(prompt.contains("First 35 rows"));
        assert!(prompt.contains("Lane-34"));
        assert!(!prompt.contains("Lane-35"));
    }

    #[test]
    fn test_blank_custom_prompt_is_ignored() {
        let prompt = build_analysis_prompt(&dataset(&["Lane"], 1), Some("   "), 35);
        assert!(!prompt.contains("USER SPECIAL INSTRUCTIONS"));
    }

    #[test]
    fn test_refinement_request_digest() {
        let report = Report {
            key_metrics: vec![Metric {
                label: "Total Shipments".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let request = build_refinement_request("remove the total metric.", Some(&report));
        assert!(request.starts_with("(ADDITIVE REQUEST): remove the total metric."));
        assert!(request.contains("- Metrics: Total Shipments"));
        assert!(request.contains("- Charts: (none)"));
        assert!(request.contains("STRICT NO DUPLICATES RULE"));
    }

    #[test]
    fn test_placeholder_text_in_data_is_left_alone() {
        let mut row = Row::new();
        row.insert("Notes".into(), json!("see {{ICONS}}"));
        let data = Dataset::new("odd.csv", vec!["Notes".into(), "{{COLUMNS}}".into()], vec![row]);

        let prompt = build_analysis_prompt(&data, Some("compare {{SAMPLE_DATA}} lanes"), 35);

        assert!(prompt.contains("see {{ICONS}}"));
        assert!(prompt.contains("Columns/Keys: Notes, {{COLUMNS}}"));
        assert!(prompt.contains("USER SPECIAL INSTRUCTIONS: compare {{SAMPLE_DATA}} lanes"));
    }

    #[test]
    fn test_placeholder_text_in_refinement_is_left_alone() {
        let report = Report {
            key_metrics: vec![Metric {
                label: "{{INSIGHTS}} count".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let request = build_refinement_request("split {{CHARTS}} by mode", Some(&report));
        assert!(request.starts_with("(ADDITIVE REQUEST): split {{CHARTS}} by mode"));
        assert!(request.contains("- Metrics: {{INSIGHTS}} count"));
        assert!(request.contains("- Charts: (none)"));
    }

    #[test]
    fn test_fill_keeps_unknown_and_unclosed_placeholders() {
        let out = fill("a {{X}} b {{Y}} c {{open", |name| {
            (name == "X").then(|| Cow::Borrowed("1"))
        });
        assert_eq!(out, "a 1 b {{Y}} c {{open");
    }
}
