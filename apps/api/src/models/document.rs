use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// A stored CV. `cv_id` is the SHA-256 of `raw_text` and doubles as the primary key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DocumentRow {
    pub cv_id: String,
    pub raw_text: String,
    pub structured: Value,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List view of a stored CV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DocumentSummaryRow {
    pub cv_id: String,
    pub filename: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&DocumentRow> for DocumentSummaryRow {
    fn from(row: &DocumentRow) -> Self {
        Self {
            cv_id: row.cv_id.clone(),
            filename: row
                .metadata
                .get("filename")
                .and_then(|v| v.as_str())
                .map(String::from),
            created_at: row.created_at,
        }
    }
}
