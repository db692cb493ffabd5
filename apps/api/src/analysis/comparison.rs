//! Comparison collaborator: keyword coverage and fit score of a structured CV against a JD.
//!
//! The trait mirrors `Structurer`: the gateway only sees `Arc<dyn Comparator>`, and the
//! LLM-backed implementation validates the model's reply into typed reports before it
//! reaches a caller.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::prompts::{COMPARE_SYSTEM, KEYWORDS_PROMPT_TEMPLATE, SCORE_PROMPT_TEMPLATE};
use crate::analysis::CollaboratorError;
use crate::llm_client::prompts::{render, FIDELITY_INSTRUCTION};
use crate::llm_client::LlmClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    Keywords,
    Score,
}

/// Keywords of one kind, split by CV coverage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordPartition {
    #[serde(default)]
    pub present: Vec<String>,
    #[serde(default)]
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordReport {
    #[serde(default)]
    pub technical: KeywordPartition,
    #[serde(default)]
    pub soft: KeywordPartition,
    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub score: f64,
    #[serde(default)]
    pub breakdown: Vec<CategoryScore>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub gaps: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisReport {
    Keywords(KeywordReport),
    Score(ScoreReport),
}

#[async_trait]
pub trait Comparator: Send + Sync {
    async fn compare(
        &self,
        structured: &Value,
        jd_text: &str,
        mode: AnalysisMode,
    ) -> Result<AnalysisReport, CollaboratorError>;
}

pub struct LlmComparator {
    llm: LlmClient,
}

impl LlmComparator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Comparator for LlmComparator {
    async fn compare(
        &self,
        structured: &Value,
        jd_text: &str,
        mode: AnalysisMode,
    ) -> Result<AnalysisReport, CollaboratorError> {
        let template = match mode {
            AnalysisMode::Keywords => KEYWORDS_PROMPT_TEMPLATE,
            AnalysisMode::Score => SCORE_PROMPT_TEMPLATE,
        };
        let cv_json = serde_json::to_string_pretty(structured)
            .map_err(|e| CollaboratorError::Malformed(format!("structured CV: {e}")))?;
        let prompt = render(
            template,
            &[
                ("fidelity_instruction", FIDELITY_INSTRUCTION),
                ("cv_json", cv_json.as_str()),
                ("jd_text", jd_text),
            ],
        );

        match mode {
            AnalysisMode::Keywords => {
                let report: KeywordReport = self.llm.call_json(&prompt, COMPARE_SYSTEM).await?;
                Ok(AnalysisReport::Keywords(report.normalized()))
            }
            AnalysisMode::Score => {
                let report: ScoreReport = self.llm.call_json(&prompt, COMPARE_SYSTEM).await?;
                report.validate()?;
                Ok(AnalysisReport::Score(report))
            }
        }
    }
}

impl KeywordPartition {
    /// Trims, drops blanks and case-insensitive duplicates, and removes from `missing`
    /// anything already `present`.
    fn normalized(self) -> Self {
        let present = dedup_keywords(self.present, &HashSet::new());
        let seen: HashSet<String> = present.iter().map(|k| k.to_lowercase()).collect();
        let missing = dedup_keywords(self.missing, &seen);
        Self { present, missing }
    }
}

impl KeywordReport {
    pub fn normalized(self) -> Self {
        Self {
            technical: self.technical.normalized(),
            soft: self.soft.normalized(),
            explanation: self.explanation.filter(|e| !e.trim().is_empty()),
        }
    }
}

impl ScoreReport {
    /// Rejects scores outside 0–100.
    pub fn validate(&self) -> Result<(), CollaboratorError> {
        check_score("score", self.score)?;
        for category in &self.breakdown {
            check_score(&category.category, category.score)?;
        }
        Ok(())
    }
}

fn check_score(label: &str, score: f64) -> Result<(), CollaboratorError> {
    if score.is_finite() && (0.0..=100.0).contains(&score) {
        Ok(())
    } else {
        Err(CollaboratorError::Malformed(format!(
            "{label} must be between 0 and 100, got {score}"
        )))
    }
}

fn dedup_keywords(keywords: Vec<String>, exclude: &HashSet<String>) -> Vec<String> {
    let mut seen = exclude.clone();
    keywords
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty() && seen.insert(k.to_lowercase()))
        .collect()
}
