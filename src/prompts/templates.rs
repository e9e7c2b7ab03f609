//! Prompt text compiled into the binary. Placeholders use `{{NAME}}` and are
//! filled by [`super::builder::interpolate`].

pub const ANALYSIS_TEMPLATE: &str = r#"You are a Senior Strategic Consultant specialising in logistics and shipment operations.
Your goal is to analyze the provided dataset SAMPLE **accurately**, based ONLY on the data fields present.
{{USER_INSTRUCTIONS}}
DATASET CONTEXT:
- Source: {{SOURCE_NAME}}
- Total Records: {{TOTAL_RECORDS}}
- Columns/Keys: {{COLUMNS}} <--- ONLY USE THESE FIELDS.

SAMPLE DATA (First {{SAMPLE_SIZE}} rows):
{{SAMPLE_DATA}}

CRITICAL RULES (STRICT ADHERENCE REQUIRED):
1. **NO HALLUCINATIONS**: Do NOT invent columns.
2. **TITLE QUALITY**: Generate a clean, professional title.
3. **DATA GROUNDING**: Every metric and chart MUST be derivable from the provided sample keys. Calculate percentages and rates precisely based on the provided JSON sample.
4. **CONSISTENCY**: Use consistent precision for numbers (e.g., 2 decimal places for percentages).
5. **ADDITIVE REQUESTS**: If this is an additive request, DO NOT re-generate standard analysis sections unless explicitly asked.

{{OBJECTIVES}}

{{CHART_RULES}}

{{OUTPUT_SCHEMA}}
"#;

pub const USER_INSTRUCTIONS_BLOCK: &str = r#"
USER SPECIAL INSTRUCTIONS: {{CUSTOM_PROMPT}}
(IMPORTANT: Prioritize these instructions over default behavior.)
"#;

pub const REFINEMENT_OBJECTIVES: &str = r#"OBJECTIVES (REFINEMENT MODE - STRICT):
1. **EXECUTE USER REQUEST ONLY**: You are updating an existing dashboard. You must ONLY generate what the user specifically asked for.
2. **REMOVALS & REPLACEMENTS**:
   - If the user asks to **REMOVE** an item, add its exact Title/Label to the "removals" list with its type (metric, chart, insight or recommendation).
   - If the user asks to **REPLACE** an item (e.g., "Change the Carrier Bar Chart to a Pie Chart"), add the OLD item's Title to "removals" and generate the NEW item in its collection.
3. **ZERO UNREQUESTED CONTENT**:
   - Did the user ask for Metrics? If NO -> Return "keyMetrics": []
   - Did the user ask for Charts? If NO -> Return "dynamicCharts": []
   - Did the user ask for Insights? If NO -> Return "keyInsights": []
   - Did the user ask for Recommendations? If NO -> Return "recommendations": []
4. **PRESERVE CONTEXT**: Use the provided sample data to generate the *requested* items accurately."#;

pub const STANDARD_OBJECTIVES: &str = r#"OBJECTIVES:
1. **Infer Domain**: Figure out what this data represents.
2. **Key Metrics**: Calculate 4 vital high-level metrics.
3. **Dynamic Visualization**: Design 4-6 charts.
4. **Deep Strategic Insights**: Provide 5-6 comprehensive insights.
   - Contextualize "Why this matters".
5. **Actionable Recommendations**: Suggest 5-6 concrete actions."#;

pub const CHART_RULES_TEMPORAL: &str = r#"CHART TYPES:
- The data has time-based fields ({{TEMPORAL_COLUMNS}}). Use Line/Area charts for trends over time.
- Use Bar (distribution), Pie (composition) or Scatter (relationship) for everything else.
- Allowed chartType values: {{ALLOWED_CHART_TYPES}}."#;

pub const CHART_RULES_NON_TEMPORAL: &str = r#"CHART TYPES:
- The data has NO date or time fields. DO NOT USE LINE/AREA CHARTS.
- Use Bar (distribution), Pie (composition) or Scatter (relationship).
- Allowed chartType values: {{ALLOWED_CHART_TYPES}}."#;

pub const OUTPUT_SCHEMA: &str = r#"OUTPUT SCHEMA (Strict JSON):
{
  "analysisTitle": "String",
  "analysisDescription": "String",
  "keyMetrics": [
    { "label": "String", "value": "String", "description": "String", "icon": "String (One of: {{ICONS}})", "variant": "default" }
  ],
  "dynamicCharts": [
    {
      "id": "String (unique)",
      "title": "String",
      "description": "String",
      "chartType": "String (One of: {{ALLOWED_CHART_TYPES}})",
      "data": [ { "name": "String", "value": "Number", "x": "Number (Optional)", "y": "Number (Optional)" } ]
    }
  ],
  "keyInsights": [
    { "title": "String", "severity": "String (positive, warning, info)", "description": "String" }
  ],
  "recommendations": [
    { "title": "String", "action": "String", "impact": "String (high, medium, low)" }
  ],
  "removals": [
    { "type": "String (metric, chart, insight, recommendation)", "title": "String" }
  ]
}"#;

pub const REFINEMENT_REQUEST: &str = r#"{{MARKER}}: {{USER_PROMPT}}.
Generate ONLY the new requested metrics/charts/insights to append to the existing dashboard.
Do not regenerate existing data unless replacing.

CURRENT DASHBOARD ITEMS (DO NOT DUPLICATE THESE):
- Metrics: {{METRICS}}
- Charts: {{CHARTS}}
- Insights: {{INSIGHTS}}
- Recommendations: {{RECOMMENDATIONS}}

STRICT NO DUPLICATES RULE: Check the lists above. If a requested item matches an existing title, DO NOT generate it again unless it is listed in "removals". Choose a different metric or title."#;
