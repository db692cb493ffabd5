use std::time::Duration;

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF could not be read: {0}")]
    Unreadable(String),

    #[error("PDF contains no extractable text")]
    NoText,

    #[error("PDF extraction timed out after {0:?}")]
    Timeout(Duration),

    #[error("PDF extractor crashed on this file")]
    Panicked,
}

/// Text extraction from uploaded PDFs.
///
/// Parsing is CPU-bound and the parser may panic on hostile input, so it runs on the
/// blocking pool under a deadline. A panic becomes `ExtractionError::Panicked`.
#[derive(Debug, Clone)]
pub struct PdfExtractor {
    timeout: Duration,
}

impl PdfExtractor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Returns the document text with surrounding whitespace trimmed.
    pub async fn extract_text(&self, bytes: Bytes) -> Result<String, ExtractionError> {
        if !bytes.starts_with(PDF_MAGIC) {
            return Err(ExtractionError::Unreadable(
                "missing %PDF header".to_string(),
            ));
        }

        let size = bytes.len();
        let task = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes));

        let joined = tokio::time::timeout(self.timeout, task)
            .await
            .map_err(|_| ExtractionError::Timeout(self.timeout))?;

        let text = match joined {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => return Err(ExtractionError::Unreadable(e.to_string())),
            Err(e) if e.is_panic() => {
                warn!("PDF extractor panicked on a {size} byte upload");
                return Err(ExtractionError::Panicked);
            }
            Err(e) => return Err(ExtractionError::Unreadable(e.to_string())),
        };

        let text = text.trim();
        if text.is_empty() {
            return Err(ExtractionError::NoText);
        }

        debug!("Extracted {} chars from {size} byte PDF", text.len());
        Ok(text.to_string())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    /// A one-page PDF showing `text` in Helvetica. Offsets in the xref table are computed,
    /// so the file is well-formed for any ASCII `text` without parentheses or backslashes.
    pub fn single_page_pdf(text: &str) -> Vec<u8> {
        let content = format!("BT /F1 24 Tf 72 720 Td ({text}) Tj ET");
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >>"
                .to_string(),
            format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }

        let xref_at = pdf.len();
        let mut tail = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            tail.push_str(&format!("{offset:010} 00000 n \n"));
        }
        tail.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            objects.len() + 1
        ));
        pdf.extend_from_slice(tail.as_bytes());
        pdf
    }
}
