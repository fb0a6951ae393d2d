use coachdesk_client::ClientError;
use serde_json::Value;

pub fn render_error(error: &ClientError) -> String {
    let mut lines = vec![
        "Something went wrong, but it's easy to fix.".to_string(),
        String::new(),
        format!("  Error:    {}", error.code),
        format!("  Details:  {}", error.message),
    ];
    lines.extend(render_partial_progress(error.data.as_ref()));
    lines.push(String::new());
    lines.push("What to do next:".to_string());

    if error.recovery_steps.is_empty() {
        lines.push("  1. Retry the command.".to_string());
    } else {
        for (index, step) in error.recovery_steps.iter().enumerate() {
            lines.push(format!("  {}. {step}", index + 1));
        }
    }

    lines.join("\n")
}

/// Counts written before an import halted, when the error carries them.
fn render_partial_progress(data: Option<&Value>) -> Vec<String> {
    let Some(summary) = data.and_then(|data| data.get("summary")) else {
        return Vec::new();
    };
    let added = summary.get("new_count").and_then(Value::as_i64).unwrap_or(0);
    let updated = summary
        .get("updated_count")
        .and_then(Value::as_i64)
        .unwrap_or(0);
    vec![format!(
        "  Written:  {added} added, {updated} updated before the failure"
    )]
}
