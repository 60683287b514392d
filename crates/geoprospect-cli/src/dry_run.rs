use crate::output::OutputWriter;
use geoprospect_analysis::CallPlan;
use geoprospect_llm::CallProfile;
use serde::Serialize;

/// A model call that would be issued, shown in dry-run mode
#[derive(Debug, Clone, Serialize)]
pub struct PlannedCall {
    pub name: String,
    pub profile: CallProfile,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
}

impl From<CallPlan> for PlannedCall {
    fn from(plan: CallPlan) -> Self {
        Self {
            name: plan.name.to_string(),
            profile: plan.profile,
            prompt: plan.payload.text,
            response_schema: plan.payload.response_schema,
        }
    }
}

/// Display planned calls in dry-run mode
pub fn display_planned_calls(output: &OutputWriter, calls: &[PlannedCall]) {
    if output.is_json() {
        let _ = output.result(serde_json::json!({
            "dry_run": true,
            "planned_calls": calls,
        }));
        return;
    }

    output.section("Planned Model Calls (Dry Run)");
    for (i, call) in calls.iter().enumerate() {
        output.info(format!("{}. {} [{} profile]", i + 1, call.name, call.profile));
        if call.response_schema.is_some() {
            output.info("   Output constrained to a JSON schema");
        }
        output.text(indent(&call.prompt));
    }
    output.info("No model calls were made. Run without --dry-run to execute the analysis.");
}

fn indent(text: &str) -> String {
    text.lines().map(|line| format!("   | {}", line)).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoprospect_llm::PromptPayload;

    #[test]
    fn test_planned_call_from_plan() {
        let plan = CallPlan {
            name: "chart data",
            profile: CallProfile::Structured,
            payload: PromptPayload::with_schema("chart prompt", serde_json::json!({"type": "ARRAY"})),
        };
        let call = PlannedCall::from(plan);

        assert_eq!(call.name, "chart data");
        assert!(call.response_schema.is_some());
        let json = serde_json::to_string(&call).unwrap();
        assert!(json.contains("\"profile\":\"structured\""));
    }

    #[test]
    fn test_indent() {
        assert_eq!(indent("a\nb"), "   | a\n   | b");
    }
}
