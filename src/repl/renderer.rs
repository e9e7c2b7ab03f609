use console::style;

use crate::models::{Chart, Impact, Insight, Metric, MetricVariant, Recommendation, Report, Severity};
use crate::repl::commands::{CommandHelp, COMMAND_HELP};
use crate::utils::formatting::{format_count, format_value};

const BAR_WIDTH: usize = 30;

/// Badge shown next to items added by the latest refinement.
pub fn render_new_badge(is_new: bool) -> String {
    if is_new {
        format!(" {}", style(" NEW ").on_green().black().bold())
    } else {
        String::new()
    }
}

pub fn render_severity_badge(severity: &Severity) -> String {
    match severity {
        Severity::Positive => style(" POSITIVE ").green().bold().to_string(),
        Severity::Warning => style(" WARNING ").yellow().bold().to_string(),
        Severity::Info => style(" INFO ").blue().to_string(),
    }
}

fn render_impact(impact: Option<Impact>) -> String {
    match impact {
        Some(Impact::High) => style("high impact").red().bold().to_string(),
        Some(Impact::Medium) => style("medium impact").yellow().to_string(),
        Some(Impact::Low) => style("low impact").dim().to_string(),
        None => String::new(),
    }
}

fn render_metric(metric: &Metric) -> String {
    let value = match metric.variant {
        MetricVariant::Accent => style(&metric.value).yellow().bold().to_string(),
        MetricVariant::Default => style(&metric.value).white().bold().to_string(),
    };
    let mut out = format!(
        "  {} {:<28} {}{}\n",
        metric.icon.glyph(),
        style(&metric.label).cyan(),
        value,
        render_new_badge(metric.is_new),
    );
    if !metric.description.is_empty() {
        out.push_str(&format!("     {}\n", style(&metric.description).dim()));
    }
    out
}

/// Horizontal bar rendering of a chart's data points.
pub fn render_chart(chart: &Chart) -> String {
    let mut out = format!(
        "\n  {} {}{}\n",
        style(&chart.title).white().bold(),
        style(format!("[{}]", chart.chart_type.as_str())).dim(),
        render_new_badge(chart.is_new),
    );
    if !chart.description.is_empty() {
        out.push_str(&format!("  {}\n", style(&chart.description).dim()));
    }

    if let Some(notice) = chart.chart_type.unsupported_notice() {
        out.push_str(&format!("  {}\n", style(notice).yellow()));
        return out;
    }
    if chart.data.is_empty() {
        out.push_str(&format!("  {}\n", style("No data points.").dim()));
        return out;
    }

    let max = chart.max_value();
    let name_width = chart
        .data
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(0)
        .min(24);
    for point in &chart.data {
        let filled = if max > 0.0 {
            ((point.value.abs() / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let name: String = point.name.chars().take(name_width).collect();
        out.push_str(&format!(
            "  {:<width$} {} {}\n",
            name,
            style("█".repeat(filled)).cyan(),
            format_value(point.value),
            width = name_width,
        ));
    }
    out
}

fn render_insight(insight: &Insight) -> String {
    format!(
        "  {} {}{}\n     {}\n",
        render_severity_badge(&insight.severity),
        style(&insight.title).white().bold(),
        render_new_badge(insight.is_new),
        insight.description,
    )
}

fn render_recommendation(index: usize, rec: &Recommendation) -> String {
    let impact = render_impact(rec.impact);
    format!(
        "  {}. {}{}{}\n     {}\n",
        index + 1,
        style(&rec.title).white().bold(),
        if impact.is_empty() { String::new() } else { format!(" ({})", impact) },
        render_new_badge(rec.is_new),
        rec.action,
    )
}

fn section_header(title: &str, count: usize) -> String {
    format!("\n{}\n", style(format!("{} ({})", title, count)).white().bold().underlined())
}

/// Full terminal rendering of a report.
pub fn render_report(report: &Report) -> String {
    let mut out = format!("\n{}\n", style(&report.analysis_title).cyan().bold());
    if !report.analysis_description.is_empty() {
        out.push_str(&format!("{}\n", report.analysis_description));
    }
    if let Some(count) = report.record_count {
        out.push_str(&format!("{}\n", style(format!("{} records", format_count(count))).dim()));
    }

    if !report.key_metrics.is_empty() {
        out.push_str(&section_header("Key Metrics", report.key_metrics.len()));
        for metric in &report.key_metrics {
            out.push_str(&render_metric(metric));
        }
    }
    if !report.dynamic_charts.is_empty() {
        out.push_str(&section_header("Charts", report.dynamic_charts.len()));
        for chart in &report.dynamic_charts {
            out.push_str(&render_chart(chart));
        }
    }
    if !report.key_insights.is_empty() {
        out.push_str(&section_header("Insights", report.key_insights.len()));
        for insight in &report.key_insights {
            out.push_str(&render_insight(insight));
        }
    }
    if !report.recommendations.is_empty() {
        out.push_str(&section_header("Recommendations", report.recommendations.len()));
        for (i, rec) in report.recommendations.iter().enumerate() {
            out.push_str(&render_recommendation(i, rec));
        }
    }
    if report.item_count() == 0 {
        out.push_str(&format!("\n  {}\n", style("The model returned no sections.").dim()));
    }
    out
}

/// One-line summary printed after a refinement.
pub fn render_merge_summary(report: &Report) -> String {
    let added = report.new_item_count();
    if added == 0 {
        format!(
            "{} {}",
            style("•").dim(),
            style("Nothing new was added (the requested items may already exist).").dim()
        )
    } else {
        render_success(&format!(
            "{} new item{} added ({} total)",
            added,
            if added == 1 { "" } else { "s" },
            report.item_count()
        ))
    }
}

/// Render the help listing for all commands.
pub fn render_help(specific_command: Option<&str>) -> String {
    if let Some(cmd_name) = specific_command {
        return match COMMAND_HELP.iter().find(|c| c.name == cmd_name) {
            Some(cmd) => format_command_detail(cmd),
            None => format!("{} Unknown command: /{}", style("✗").red(), cmd_name),
        };
    }

    let mut out = String::new();
    out.push_str(&format!("\n{}\n\n", style("Available commands:").white().bold()));
    for cmd in COMMAND_HELP {
        out.push_str(&format!(
            "  {:<16} {}\n",
            style(format!("/{}", cmd.name)).cyan().bold(),
            style(cmd.description).dim(),
        ));
    }
    out.push_str(&format!(
        "\n  {}\n",
        style("Anything typed without a leading / is sent as a refinement request.").dim()
    ));
    out
}

fn format_command_detail(cmd: &CommandHelp) -> String {
    format!(
        "\n{}\n  {}\n\n  {}\n",
        style(format!("/{}", cmd.name)).cyan().bold(),
        style(cmd.description).dim(),
        style(cmd.usage).white(),
    )
}

pub fn render_version() -> String {
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = option_env!("GIT_HASH").unwrap_or("dev");
    let build_ts = option_env!("BUILD_TIMESTAMP").unwrap_or("unknown");

    format!(
        "\n  {} {}\n  {} {}\n  {} {}\n",
        style("Version:").dim(),
        style(version).white().bold(),
        style("Commit:").dim(),
        style(git_hash).white(),
        style("Built:").dim(),
        style(build_ts).white(),
    )
}

pub fn render_error(msg: &str) -> String {
    format!("{} {}", style("✗").red(), style(msg).red())
}

pub fn render_success(msg: &str) -> String {
    format!("{} {}", style("✓").green(), msg)
}

pub fn render_info(msg: &str) -> String {
    format!("{}", style(msg).dim())
}
