// Cross-cutting prompt fragments.
// Each collaborator that needs LLM calls defines its own prompts alongside it.

/// Instruction appended to every prompt that reads CV content.
pub const FIDELITY_INSTRUCTION: &str = "\
    CRITICAL: Use ONLY information present in the CV text or structured CV provided. \
    Do NOT infer, interpolate, or invent details. \
    If something is not stated, leave it null or omit it.";

/// Fills `{key}` placeholders in one left-to-right pass. Substituted values are never
/// rescanned, so user text that happens to contain `{cv_json}` or `{jd_text}` stays literal.
/// Braces that do not name a known key are copied through unchanged.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let hit = vars
            .iter()
            .find(|(key, _)| tail.starts_with(key) && tail[key.len()..].starts_with('}'));
        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}
