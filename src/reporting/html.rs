use crate::models::{Chart, Report};
use crate::utils::formatting::{format_count, format_value};

const STYLE: &str = "body{font-family:-apple-system,Segoe UI,Helvetica,Arial,sans-serif;margin:2rem auto;max-width:960px;color:#1f2933}\
h1{margin-bottom:.25rem}.muted{color:#616e7c}\
.metrics{display:grid;grid-template-columns:repeat(auto-fill,minmax(200px,1fr));gap:1rem}\
.card{border:1px solid #d9e2ec;border-radius:8px;padding:1rem;break-inside:avoid}\
.card.accent{border-color:#f0b429}.value{font-size:1.6rem;font-weight:600}\
.new{background:#3ebd93;color:#fff;border-radius:4px;padding:0 .4rem;font-size:.75rem;margin-left:.5rem}\
.bar{background:#486581;height:.8rem;border-radius:2px}\
table{border-collapse:collapse;width:100%}td{padding:.2rem .5rem;vertical-align:middle}\
.positive{border-left:4px solid #3ebd93}.warning{border-left:4px solid #f0b429}.info{border-left:4px solid #486581}\
@media print{.card{box-shadow:none}body{margin:0}}";

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn badge(is_new: bool) -> &'static str {
    if is_new { "<span class=\"new\">NEW</span>" } else { "" }
}

fn chart_html(chart: &Chart) -> String {
    let mut out = format!(
        "<div class=\"card\"><h3>{}{}</h3><p class=\"muted\">{}</p>",
        escape_html(&chart.title),
        badge(chart.is_new),
        escape_html(&chart.description),
    );
    match chart.chart_type.unsupported_notice() {
        Some(notice) => out.push_str(&format!("<p><em>{}</em></p>", escape_html(&notice))),
        None => {
            let max = chart.max_value();
            out.push_str("<table>");
            for point in &chart.data {
                let width = if max > 0.0 { (point.value.abs() / max * 100.0).round() } else { 0.0 };
                let color = point.color.as_deref().map(escape_html).unwrap_or_else(|| "#486581".into());
                out.push_str(&format!(
                    "<tr><td>{}</td><td style=\"width:60%\"><div class=\"bar\" style=\"width:{}%;background:{}\"></div></td><td>{}</td></tr>",
                    escape_html(&point.name),
                    width,
                    color,
                    format_value(point.value),
                ));
            }
            out.push_str("</table>");
        }
    }
    out.push_str("</div>");
    out
}

/// Self-contained printable HTML page.
pub fn format_report_html(report: &Report) -> String {
    let mut body = format!(
        "<h1>{}</h1><p class=\"muted\">{}</p>",
        escape_html(&report.analysis_title),
        escape_html(&report.analysis_description),
    );
    if let Some(count) = report.record_count {
        body.push_str(&format!("<p class=\"muted\">Based on {} records</p>", format_count(count)));
    }

    if !report.key_metrics.is_empty() {
        body.push_str("<h2>Key Metrics</h2><div class=\"metrics\">");
        for m in &report.key_metrics {
            body.push_str(&format!(
                "<div class=\"card {}\"><div class=\"muted\">{}{}</div><div class=\"value\">{}</div><div>{}</div></div>",
                m.variant.as_str(),
                escape_html(&m.label),
                badge(m.is_new),
                escape_html(&m.value),
                escape_html(&m.description),
            ));
        }
        body.push_str("</div>");
    }

    if !report.dynamic_charts.is_empty() {
        body.push_str("<h2>Charts</h2>");
        for chart in &report.dynamic_charts {
            body.push_str(&chart_html(chart));
        }
    }

    if !report.key_insights.is_empty() {
        body.push_str("<h2>Insights</h2>");
        for i in &report.key_insights {
            body.push_str(&format!(
                "<div class=\"card {}\"><strong>{}</strong>{}<p>{}</p></div>",
                i.severity.as_str(),
                escape_html(&i.title),
                badge(i.is_new),
                escape_html(&i.description),
            ));
        }
    }

    if !report.recommendations.is_empty() {
        body.push_str("<h2>Recommendations</h2><ol>");
        for r in &report.recommendations {
            let impact = r
                .impact
                .map(|i| format!(" <span class=\"muted\">({} impact)</span>", i.as_str()))
                .unwrap_or_default();
            body.push_str(&format!(
                "<li><strong>{}</strong>{}{}<br>{}</li>",
                escape_html(&r.title),
                impact,
                badge(r.is_new),
                escape_html(&r.action),
            ));
        }
        body.push_str("</ol>");
    }

    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title><style>{}</style></head><body>{}</body></html>\n",
        escape_html(&report.analysis_title),
        STYLE,
        body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChartType, DataPoint, Metric};

    #[test]
    fn test_html_escapes_model_text() {
        let report = Report {
            analysis_title: "<script>alert(1)</script>".into(),
            key_metrics: vec![Metric { label: "A & B".into(), value: "1".into(), is_new: true, ..Default::default() }],
            ..Default::default()
        };
        let html = format_report_html(&report);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("A &amp; B<span class=\"new\">NEW</span>"));
    }

    #[test]
    fn test_bar_widths_scale_to_max() {
        let chart = Chart {
            title: "Cost".into(),
            chart_type: ChartType::Bar,
            data: vec![
                DataPoint { name: "a".into(), value: 50.0, ..Default::default() },
                DataPoint { name: "b".into(), value: 100.0, ..Default::default() },
            ],
            ..Default::default()
        };
        let html = chart_html(&chart);
        assert!(html.contains("width:50%"));
        assert!(html.contains("width:100%"));
    }
}
