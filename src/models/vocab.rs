use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::lenient;

/// Icon attached to a key metric. Unknown names fall back to `Activity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Icon {
    Users,
    TrendingUp,
    DollarSign,
    #[default]
    Activity,
    BarChart,
    PieChart,
    AlertCircle,
    CheckCircle,
    Zap,
    Target,
    MapPin,
    Trophy,
    Megaphone,
    Lightbulb,
    Sparkles,
}

impl Icon {
    pub const ALL: [Icon; 15] = [
        Icon::Users,
        Icon::TrendingUp,
        Icon::DollarSign,
        Icon::Activity,
        Icon::BarChart,
        Icon::PieChart,
        Icon::AlertCircle,
        Icon::CheckCircle,
        Icon::Zap,
        Icon::Target,
        Icon::MapPin,
        Icon::Trophy,
        Icon::Megaphone,
        Icon::Lightbulb,
        Icon::Sparkles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Icon::Users => "Users",
            Icon::TrendingUp => "TrendingUp",
            Icon::DollarSign => "DollarSign",
            Icon::Activity => "Activity",
            Icon::BarChart => "BarChart",
            Icon::PieChart => "PieChart",
            Icon::AlertCircle => "AlertCircle",
            Icon::CheckCircle => "CheckCircle",
            Icon::Zap => "Zap",
            Icon::Target => "Target",
            Icon::MapPin => "MapPin",
            Icon::Trophy => "Trophy",
            Icon::Megaphone => "Megaphone",
            Icon::Lightbulb => "Lightbulb",
            Icon::Sparkles => "Sparkles",
        }
    }

    /// Exact-name lookup with the `Activity` fallback.
    pub fn from_label(raw: &str) -> Self {
        let raw = raw.trim();
        Icon::ALL
            .into_iter()
            .find(|icon| icon.as_str() == raw)
            .unwrap_or_default()
    }

    /// Single glyph used by the terminal renderer.
    pub fn glyph(&self) -> &'static str {
        match self {
            Icon::Users => "\u{1F465}",
            Icon::TrendingUp => "\u{1F4C8}",
            Icon::DollarSign => "$",
            Icon::Activity => "\u{2248}",
            Icon::BarChart => "\u{1F4CA}",
            Icon::PieChart => "\u{25D4}",
            Icon::AlertCircle => "!",
            Icon::CheckCircle => "\u{2713}",
            Icon::Zap => "\u{26A1}",
            Icon::Target => "\u{25CE}",
            Icon::MapPin => "\u{1F4CD}",
            Icon::Trophy => "\u{1F3C6}",
            Icon::Megaphone => "\u{1F4E3}",
            Icon::Lightbulb => "\u{1F4A1}",
            Icon::Sparkles => "\u{2728}",
        }
    }
}

/// Visual weight of a metric card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetricVariant {
    #[default]
    Default,
    Accent,
}

impl MetricVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricVariant::Default => "default",
            MetricVariant::Accent => "accent",
        }
    }

    pub fn from_label(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("accent") {
            MetricVariant::Accent
        } else {
            MetricVariant::Default
        }
    }
}

/// Chart kind. Names are matched case-insensitively; anything outside the
/// supported set is kept as `Unsupported` so it can be reported instead of drawn.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChartType {
    Bar,
    Pie,
    Line,
    Area,
    Scatter,
    Unsupported(String),
}

impl Default for ChartType {
    fn default() -> Self {
        ChartType::Bar
    }
}

impl ChartType {
    pub fn from_label(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase();
        match normalized.as_str() {
            "bar" => ChartType::Bar,
            "pie" => ChartType::Pie,
            "line" => ChartType::Line,
            "area" => ChartType::Area,
            "scatter" => ChartType::Scatter,
            _ => ChartType::Unsupported(normalized),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Pie => "pie",
            ChartType::Line => "line",
            ChartType::Area => "area",
            ChartType::Scatter => "scatter",
            ChartType::Unsupported(raw) => raw,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, ChartType::Unsupported(_))
    }

    /// Placeholder text shown where an unsupported chart would be drawn.
    pub fn unsupported_notice(&self) -> Option<String> {
        match self {
            ChartType::Unsupported(raw) => Some(format!("Unsupported chart type: {}", raw)),
            _ => None,
        }
    }
}

/// Tone of an insight. Unknown values fall back to `Info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    Positive,
    Warning,
    #[default]
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Positive => "positive",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }

    pub fn from_label(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "positive" => Severity::Positive,
            "warning" => Severity::Warning,
            _ => Severity::Info,
        }
    }
}

/// Expected effect of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::High => "high",
            Impact::Medium => "medium",
            Impact::Low => "low",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "high" => Some(Impact::High),
            "medium" => Some(Impact::Medium),
            "low" => Some(Impact::Low),
            _ => None,
        }
    }
}

// Wire form is the lowercase / PascalCase name; reading never fails on an
// unknown label, the fallback variant is used instead.

impl Serialize for Icon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Icon {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(lenient::label(deserializer)?
            .map(|raw| Icon::from_label(&raw))
            .unwrap_or_default())
    }
}

impl Serialize for MetricVariant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MetricVariant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(lenient::label(deserializer)?
            .map(|raw| MetricVariant::from_label(&raw))
            .unwrap_or_default())
    }
}

impl Serialize for ChartType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ChartType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(lenient::label(deserializer)?
            .map(|raw| ChartType::from_label(&raw))
            .unwrap_or_default())
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(lenient::label(deserializer)?
            .map(|raw| Severity::from_label(&raw))
            .unwrap_or_default())
    }
}

impl Serialize for Impact {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Reads an optional impact; unknown labels become `None`.
pub fn deserialize_impact<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Impact>, D::Error> {
    Ok(lenient::label(deserializer)?.and_then(|raw| Impact::parse(&raw)))
}
