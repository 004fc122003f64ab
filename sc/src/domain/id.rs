//! Entity ID generation
//!
//! All IDs generated on this side use the format: `{6-char-hex}-{type}-{slug}`
//! Example: `019430-task-matematik-tekrar`
//!
//! IDs arriving from the client (`task-1717...`, `video-...-3`) are opaque
//! strings and are never parsed; only equality matters.

/// Generate an entity ID from type and title
pub fn generate_id(entity_type: &str, title: &str) -> String {
    let uuid = uuid::Uuid::now_v7();
    let hex_prefix = &uuid.to_string()[..6];
    let slug = slugify(title);
    format!("{}-{}-{}", hex_prefix, entity_type, slug)
}

/// Slugify a title for use in IDs
fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        // Strip apostrophes entirely, replace other non-alphanumeric with hyphens
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c == '\'' || c == '\u{2019}' || c == '\u{2018}' {
                None
            } else {
                Some('-')
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id() {
        let id = generate_id("task", "Limit ve Süreklilik Tekrarı");
        assert!(id.len() > 10);
        assert!(id.contains("-task-"));
        assert!(id.contains("limit-ve-süreklilik-tekrarı"));
    }

    #[test]
    fn test_generate_id_unique() {
        let a = generate_id("task", "same title");
        let b = generate_id("task", "same title");
        assert_ne!(a, b);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Soru Çözümü!"), "soru-çözümü");
        assert_eq!(slugify("Multiple   Spaces"), "multiple-spaces");
        // Apostrophes should be stripped, not converted to hyphens
        assert_eq!(slugify("it's working"), "its-working");
    }
}
