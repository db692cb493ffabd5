//! Structuring collaborator: turns raw CV text into a sectioned JSON record.

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::analysis::prompts::{STRUCTURE_PROMPT_TEMPLATE, STRUCTURE_SYSTEM};
use crate::analysis::CollaboratorError;
use crate::llm_client::prompts::{render, FIDELITY_INSTRUCTION};
use crate::llm_client::{LlmClient, MODEL};

const LIST_SECTIONS: &[&str] = &[
    "education",
    "experience",
    "certifications",
    "projects",
    "leadership",
    "publications",
    "awards",
];

/// Anything that can structure a CV. Carried in the gateway as `Arc<dyn Structurer>`.
#[async_trait]
pub trait Structurer: Send + Sync {
    async fn structure(&self, raw_text: &str) -> Result<Value, CollaboratorError>;

    /// Recorded in each stored document's metadata.
    fn model_name(&self) -> &str;
}

pub struct LlmStructurer {
    llm: LlmClient,
}

impl LlmStructurer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Structurer for LlmStructurer {
    async fn structure(&self, raw_text: &str) -> Result<Value, CollaboratorError> {
        let prompt = render(
            STRUCTURE_PROMPT_TEMPLATE,
            &[
                ("fidelity_instruction", FIDELITY_INSTRUCTION),
                ("cv_text", raw_text),
            ],
        );
        let parsed: Value = self.llm.call_json(&prompt, STRUCTURE_SYSTEM).await?;
        normalize_sections(parsed)
    }

    fn model_name(&self) -> &str {
        MODEL
    }
}

/// Fills in every schema section the model left out (or returned with the wrong type) and
/// drops empty skill categories. The result always has the full top-level shape.
pub fn normalize_sections(parsed: Value) -> Result<Value, CollaboratorError> {
    let Value::Object(mut sections) = parsed else {
        return Err(CollaboratorError::Malformed(
            "structured CV must be a JSON object".to_string(),
        ));
    };

    for &key in LIST_SECTIONS {
        if !sections.get(key).is_some_and(Value::is_array) {
            sections.insert(key.to_string(), json!([]));
        }
    }
    for key in ["contact", "additional_sections"] {
        if !sections.get(key).is_some_and(Value::is_object) {
            sections.insert(key.to_string(), json!({}));
        }
    }
    if !sections.get("summary").is_some_and(Value::is_object) {
        sections.insert(
            "summary".to_string(),
            json!({"text": null, "key_highlights": []}),
        );
    }

    let skills = match sections.remove("skills") {
        Some(Value::Object(skills)) => skills
            .into_iter()
            .filter(|(_, v)| !is_empty_value(v))
            .collect(),
        _ => Map::new(),
    };
    sections.insert("skills".to_string(), Value::Object(skills));

    Ok(Value::Object(sections))
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}
