use sha2::{Digest, Sha256};

/// Length of a hex-encoded SHA-256 digest.
pub const CV_ID_LEN: usize = 64;

/// Computes the content identifier of a CV: lowercase hex SHA-256 of the UTF-8 bytes.
///
/// No normalization happens here. Callers that want trimmed input must trim before hashing,
/// because any byte difference yields a different identifier.
pub fn content_id(raw_text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Returns true if `candidate` has the shape of a content identifier.
/// Used to reject garbage path parameters before touching the store.
pub fn is_content_id(candidate: &str) -> bool {
    candidate.len() == CV_ID_LEN
        && candidate
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_id_known_vector() {
        assert_eq!(
            content_id("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_content_id_empty_string() {
        assert_eq!(
            content_id(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_content_id_is_deterministic() {
        let text = "Jane Doe, Software Engineer...";
        assert_eq!(content_id(text), content_id(text));
        assert_eq!(content_id(text).len(), CV_ID_LEN);
    }

    #[test]
    fn test_whitespace_changes_identity() {
        assert_ne!(content_id("Jane Doe"), content_id("Jane Doe "));
        assert_ne!(content_id("Jane Doe"), content_id("Jane  Doe"));
    }

    #[test]
    fn test_is_content_id() {
        assert!(is_content_id(&content_id("anything")));
        assert!(!is_content_id("abc"));
        assert!(!is_content_id(&"G".repeat(CV_ID_LEN)));
        assert!(!is_content_id(&content_id("x").to_uppercase()));
    }
}
