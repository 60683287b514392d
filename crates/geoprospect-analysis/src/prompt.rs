//! Prompt construction for every call an analysis run makes.
//!
//! Prompts are deterministic: the same target, label and focus always produce
//! byte-identical payload text.

use std::fmt::Write;

use geoprospect_core::models::Target;
use geoprospect_llm::{CallProfile, PromptPayload};
use serde_json::{json, Map, Value};

/// Semantic type of one output field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    StringArray,
}

impl FieldKind {
    fn label(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::StringArray => "array of strings",
        }
    }

    fn json_schema(self) -> Value {
        match self {
            FieldKind::String => json!({"type": "STRING"}),
            FieldKind::Number => json!({"type": "NUMBER"}),
            FieldKind::StringArray => json!({"type": "ARRAY", "items": {"type": "STRING"}}),
        }
    }
}

/// One named field of an output schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaField {
    pub name: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
    pub required: bool,
}

const fn field(
    name: &'static str,
    kind: FieldKind,
    description: &'static str,
    required: bool,
) -> SchemaField {
    SchemaField { name, kind, description, required }
}

/// Report fields the extractor validates against
pub const REPORT_FIELDS: &[SchemaField] = &[
    field("title", FieldKind::String, "short report title", true),
    field("location", FieldKind::String, "place name and coordinates of the target", true),
    field(
        "geologicalSummary",
        FieldKind::String,
        "regional and local geology, lithology, structures and alteration",
        true,
    ),
    field(
        "mineralPotential",
        FieldKind::StringArray,
        "one entry per commodity with a short justification",
        true,
    ),
    field(
        "nearbyProjects",
        FieldKind::StringArray,
        "known mines, deposits or exploration projects nearby",
        true,
    ),
    field("recommendations", FieldKind::String, "next exploration steps", true),
    field(
        "riskAssessment",
        FieldKind::String,
        "technical, permitting, environmental and social risks",
        true,
    ),
    field("sources", FieldKind::StringArray, "URLs of the sources you relied on", false),
    field("rawMarkdown", FieldKind::String, "the full report as a markdown document", false),
];

/// Fields of one geophysical depth sample
pub const CHART_FIELDS: &[SchemaField] = &[
    field("depth", FieldKind::Number, "depth below surface in meters, starting at 0", true),
    field("resistivity", FieldKind::Number, "apparent resistivity in ohm-meters", true),
    field(
        "magneticSusceptibility",
        FieldKind::Number,
        "magnetic susceptibility in SI units",
        true,
    ),
];

/// Shape of the output a prompt asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputSchema {
    /// A single JSON object
    Object(&'static [SchemaField]),
    /// A JSON array of exactly `count` objects
    ArrayOf { item: &'static [SchemaField], count: usize },
}

impl OutputSchema {
    /// Field-by-field description embedded in prompt text
    pub fn describe(&self) -> String {
        let (fields, mut text) = match self {
            OutputSchema::Object(fields) => {
                (*fields, "Respond with a single JSON object with these fields:\n".to_string())
            }
            OutputSchema::ArrayOf { item, count } => (
                *item,
                format!("Respond with a JSON array of exactly {} objects with these fields:\n", count),
            ),
        };

        for f in fields {
            let optional = if f.required { "" } else { ", optional" };
            let _ = writeln!(text, "- {} ({}{}): {}", f.name, f.kind.label(), optional, f.description);
        }
        text.push_str("Output only the JSON, without markdown code fences or commentary.");
        text
    }

    /// Schema for the structured-output profile
    pub fn to_json_schema(&self) -> Value {
        match self {
            OutputSchema::Object(fields) => object_schema(fields),
            OutputSchema::ArrayOf { item, count } => json!({
                "type": "ARRAY",
                "items": object_schema(item),
                "minItems": count,
                "maxItems": count,
            }),
        }
    }
}

fn object_schema(fields: &[SchemaField]) -> Value {
    let mut properties = Map::new();
    for f in fields {
        let mut schema = f.kind.json_schema();
        schema["description"] = Value::String(f.description.to_string());
        properties.insert(f.name.to_string(), schema);
    }
    let required: Vec<&str> = fields.iter().filter(|f| f.required).map(|f| f.name).collect();
    let ordering: Vec<&str> = fields.iter().map(|f| f.name).collect();

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required,
        "propertyOrdering": ordering,
    })
}

/// One model call of a run, in issue order
#[derive(Debug, Clone, PartialEq)]
pub struct CallPlan {
    pub name: &'static str,
    pub profile: CallProfile,
    pub payload: PromptPayload,
}

/// Builds prompt payloads for one resolved target
#[derive(Debug, Clone)]
pub struct PromptBuilder<'a> {
    target: &'a Target,
    location_label: Option<String>,
    mineral_focus: Option<String>,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(target: &'a Target) -> Self {
        Self { target, location_label: None, mineral_focus: None }
    }

    /// Place name shown alongside the coordinates; blank labels are ignored
    pub fn with_location_label(mut self, label: &str) -> Self {
        self.location_label = non_blank(label);
        self
    }

    /// Commodity to focus on; blank values are ignored
    pub fn with_mineral_focus(mut self, focus: &str) -> Self {
        self.mineral_focus = non_blank(focus);
        self
    }

    pub fn mineral_focus(&self) -> Option<&str> {
        self.mineral_focus.as_deref()
    }

    /// Description of the resolved point, prefixed by the label if any
    pub fn target_description(&self) -> String {
        match &self.location_label {
            Some(label) => format!("{} ({})", label, self.target.describe()),
            None => self.target.describe(),
        }
    }

    /// Target line, boundary clause and focus clause shared by every prompt
    fn context(&self) -> String {
        let mut text = format!("Target: {}.\n", self.target_description());

        if let Some(boundary) = self.target.boundary().filter(|b| b.is_enforceable()) {
            text.push_str(
                "Restrict the analysis strictly to the polygon defined by these vertices \
                 (latitude, longitude), in order:\n",
            );
            for (i, vertex) in boundary.points().iter().enumerate() {
                let _ = writeln!(text, "{}. {}", i + 1, vertex.format_for_prompt());
            }
            text.push_str(
                "Treat ground outside this polygon as regional context only and do not \
                 assess it.\n",
            );
        }

        if let Some(focus) = &self.mineral_focus {
            let _ = writeln!(text, "Focus the assessment on {} potential.", focus);
        }

        text
    }

    /// Full report, answered with web-search grounding
    pub fn report(&self) -> PromptPayload {
        let mut text = String::from(
            "You are a senior exploration geologist preparing a prospecting report.\n",
        );
        text.push_str(&self.context());
        text.push_str(
            "Use web search to find published geology, known deposits, active exploration \
             projects and tenure information for the area, and cite the URLs you relied on.\n",
        );
        text.push_str(&OutputSchema::Object(REPORT_FIELDS).describe());
        PromptPayload::plain(text)
    }

    /// Short low-latency overview shown while the report is generated
    pub fn quick_summary(&self) -> PromptPayload {
        let mut text = self.context();
        text.push_str(
            "In at most three sentences, summarise the regional geology and the commodities \
             most likely to occur here. Plain text only, no headings or lists.",
        );
        PromptPayload::plain(text)
    }

    /// Known sites near the target, one per line
    pub fn nearby(&self) -> PromptPayload {
        let mut text = self.context();
        text.push_str(
            "List up to 8 known mines, deposits or active exploration projects near the target. \
             Write one per line as `- [Name](URL)` when a source URL is available, otherwise \
             `- Name`. Do not add any other text.",
        );
        PromptPayload::plain(text)
    }

    /// Illustrative depth profile of exactly `points` samples
    pub fn chart(&self, points: usize) -> PromptPayload {
        let schema = OutputSchema::ArrayOf { item: CHART_FIELDS, count: points };
        let mut text = self.context();
        let _ = writeln!(
            text,
            "Generate an illustrative geophysical depth profile for the target with exactly {} \
             samples, ordered by increasing depth, consistent with the expected geology.",
            points
        );
        text.push_str(&schema.describe());
        PromptPayload::with_schema(text, schema.to_json_schema())
    }

    /// Extended reasoning on deposit models and targeting
    pub fn deep(&self) -> PromptPayload {
        let mut text = String::from(
            "You are a principal geologist reviewing an exploration target in depth.\n",
        );
        text.push_str(&self.context());
        text.push_str(
            "Reason step by step about the plausible deposit models, the geological controls \
             that would localise mineralisation, the evidence that would confirm or rule out \
             each model, and a prioritised targeting strategy. Answer in markdown.",
        );
        PromptPayload::plain(text)
    }

    /// Every call of a run, in issue order
    pub fn plan(&self, chart_points: usize, include_deep: bool) -> Vec<CallPlan> {
        let mut calls = vec![
            CallPlan { name: "quick summary", profile: CallProfile::Fast, payload: self.quick_summary() },
            CallPlan { name: "nearby sites", profile: CallProfile::Default, payload: self.nearby() },
            CallPlan { name: "report", profile: CallProfile::Default, payload: self.report() },
            CallPlan {
                name: "chart data",
                profile: CallProfile::Structured,
                payload: self.chart(chart_points),
            },
        ];
        if include_deep {
            calls.push(CallPlan { name: "deep analysis", profile: CallProfile::Deep, payload: self.deep() });
        }
        calls
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoprospect_core::models::{Boundary, Coordinate};

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    fn point_target() -> Target {
        Target::Point { coordinate: c(-8.123456, 115.654321) }
    }

    fn area_target() -> Target {
        let boundary = Boundary::new(vec![c(1.0, 1.0), c(1.0, 2.0), c(2.0, 1.5)]);
        Target::resolve(None, &boundary).unwrap()
    }

    #[test]
    fn test_prompts_are_deterministic() {
        let target = area_target();
        let a = PromptBuilder::new(&target).with_mineral_focus("gold").report();
        let b = PromptBuilder::new(&target).with_mineral_focus("gold").report();
        assert_eq!(a, b);
    }

    #[test]
    fn test_point_prompt_has_no_boundary_clause() {
        let target = point_target();
        let payload = PromptBuilder::new(&target).report();
        assert!(payload.text.contains("coordinates -8.12346, 115.65432"));
        assert!(!payload.text.contains("polygon"));
        assert!(payload.response_schema.is_none());
    }

    #[test]
    fn test_boundary_clause_lists_every_vertex() {
        let target = area_target();
        let payload = PromptBuilder::new(&target).report();
        assert!(payload.text.contains("1. 1.00000, 1.00000"));
        assert!(payload.text.contains("2. 1.00000, 2.00000"));
        assert!(payload.text.contains("3. 2.00000, 1.50000"));
        assert!(payload.text.contains("Restrict the analysis strictly to the polygon"));
    }

    #[test]
    fn test_blank_focus_is_ignored() {
        let target = point_target();
        let payload = PromptBuilder::new(&target).with_mineral_focus("   ").report();
        assert!(!payload.text.contains("Focus the assessment"));

        let payload = PromptBuilder::new(&target).with_mineral_focus("  copper ").report();
        assert!(payload.text.contains("Focus the assessment on copper potential."));
    }

    #[test]
    fn test_label_prefixes_description() {
        let target = point_target();
        let builder = PromptBuilder::new(&target).with_location_label("Batu Hijau");
        assert_eq!(
            builder.target_description(),
            "Batu Hijau (coordinates -8.12346, 115.65432)"
        );
    }

    #[test]
    fn test_report_prompt_describes_every_field() {
        let target = point_target();
        let payload = PromptBuilder::new(&target).report();
        for f in REPORT_FIELDS {
            assert!(payload.text.contains(&format!("- {} (", f.name)), "missing {}", f.name);
        }
        assert!(payload.text.contains("sources (array of strings, optional)"));
    }

    #[test]
    fn test_chart_prompt_carries_strict_schema() {
        let target = point_target();
        let payload = PromptBuilder::new(&target).chart(20);
        let schema = payload.response_schema.expect("chart schema");

        assert_eq!(schema["type"], "ARRAY");
        assert_eq!(schema["minItems"], 20);
        assert_eq!(schema["maxItems"], 20);
        assert_eq!(schema["items"]["properties"]["depth"]["type"], "NUMBER");
        assert_eq!(
            schema["items"]["required"],
            json!(["depth", "resistivity", "magneticSusceptibility"])
        );
        assert!(payload.text.contains("exactly 20 samples"));
    }

    #[test]
    fn test_plan_profiles() {
        let target = point_target();
        let builder = PromptBuilder::new(&target);

        let profiles: Vec<_> = builder.plan(20, false).iter().map(|c| c.profile).collect();
        assert_eq!(
            profiles,
            [CallProfile::Fast, CallProfile::Default, CallProfile::Default, CallProfile::Structured]
        );
        assert_eq!(builder.plan(20, true).last().map(|c| c.profile), Some(CallProfile::Deep));
    }
}
