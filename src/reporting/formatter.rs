use crate::models::{Chart, Insight, Metric, Recommendation, Report};
use crate::utils::formatting::{format_count, format_value};

fn new_tag(is_new: bool) -> &'static str {
    if is_new { " _(new)_" } else { "" }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

pub fn format_metrics_markdown(metrics: &[Metric]) -> String {
    let mut out = String::from("## Key Metrics\n\n| Metric | Value | Notes |\n|---|---|---|\n");
    for m in metrics {
        out.push_str(&format!(
            "| {}{} | **{}** | {} |\n",
            escape_cell(&m.label),
            new_tag(m.is_new),
            escape_cell(&m.value),
            escape_cell(&m.description),
        ));
    }
    out
}

pub fn format_chart_markdown(chart: &Chart) -> String {
    let mut out = format!(
        "### {}{}\n\n*{} chart.* {}\n\n",
        chart.title,
        new_tag(chart.is_new),
        chart.chart_type.as_str(),
        chart.description,
    );
    if let Some(notice) = chart.chart_type.unsupported_notice() {
        out.push_str(&format!("> {}\n\n", notice));
    }
    if chart.data.is_empty() {
        out.push_str("_No data points._\n");
        return out;
    }
    out.push_str("| Name | Value |\n|---|---|\n");
    for point in &chart.data {
        out.push_str(&format!("| {} | {} |\n", escape_cell(&point.name), format_value(point.value)));
    }
    out
}

pub fn format_insight_markdown(insight: &Insight) -> String {
    format!(
        "- **[{}] {}**{}: {}\n",
        insight.severity.as_str().to_uppercase(),
        insight.title,
        new_tag(insight.is_new),
        insight.description,
    )
}

pub fn format_recommendation_markdown(rec: &Recommendation) -> String {
    let impact = rec
        .impact
        .map(|i| format!(" (impact: {})", i.as_str()))
        .unwrap_or_default();
    format!("- **{}**{}{}: {}\n", rec.title, impact, new_tag(rec.is_new), rec.action)
}

/// The whole report as a Markdown document.
pub fn format_report_markdown(report: &Report) -> String {
    let mut out = format!("# {}\n\n{}\n\n", report.analysis_title, report.analysis_description);
    if let Some(count) = report.record_count {
        out.push_str(&format!("_Based on {} records._\n\n", format_count(count)));
    }

    if !report.key_metrics.is_empty() {
        out.push_str(&format_metrics_markdown(&report.key_metrics));
        out.push('\n');
    }

    if !report.dynamic_charts.is_empty() {
        out.push_str("## Charts\n\n");
        for chart in &report.dynamic_charts {
            out.push_str(&format_chart_markdown(chart));
            out.push('\n');
        }
    }

    if !report.key_insights.is_empty() {
        out.push_str("## Insights\n\n");
        for insight in &report.key_insights {
            out.push_str(&format_insight_markdown(insight));
        }
        out.push('\n');
    }

    if !report.recommendations.is_empty() {
        out.push_str("## Recommendations\n\n");
        for rec in &report.recommendations {
            out.push_str(&format_recommendation_markdown(rec));
        }
        out.push('\n');
    }

    if !report.data_cleaning_report.is_empty() {
        out.push_str("## Data Cleaning\n\n");
        for step in &report.data_cleaning_report {
            out.push_str(&format!("- **{}**: {}\n", step.step, step.details));
        }
        out.push('\n');
    }

    out
}
