/// Strip a surrounding markdown code fence (with optional language tag) if present.
///
/// Some profiles wrap structured output in a fence despite instructions not to.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix("```") {
        // Skip optional language tag on the opening line
        let rest = match rest.find('\n') {
            Some(newline_pos) => &rest[newline_pos + 1..],
            None => rest,
        };
        if let Some(content) = rest.trim_end().strip_suffix("```") {
            return content.trim();
        }
    }
    trimmed
}
