//! Canonical tag form.
//!
//! Tags are lowercase words joined by single hyphens. Leading `#` markers,
//! whitespace, underscores, and punctuation are folded into that shape.

/// Normalises one raw tag, returning `None` when nothing usable remains.
#[must_use]
pub fn normalize_tag(raw: &str) -> Option<String> {
    let mut tag = String::with_capacity(raw.len());
    let mut pending_hyphen = false;
    for ch in raw.trim().trim_start_matches('#').chars() {
        if ch.is_alphanumeric() {
            if pending_hyphen && !tag.is_empty() {
                tag.push('-');
            }
            pending_hyphen = false;
            tag.extend(ch.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    (!tag.is_empty()).then_some(tag)
}

/// Normalises, deduplicates, and caps a tag list, keeping first-seen order.
#[must_use]
pub fn normalize_tags<I, T>(raw: I, max_tags: usize) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.into_iter().filter_map(|tag| normalize_tag(tag.as_ref())) {
        if tags.len() == max_tags {
            break;
        }
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

/// Appends `incoming` tags not already present in `existing`.
#[must_use]
pub fn merge_tags(existing: &[String], incoming: &[String]) -> Vec<String> {
    let mut merged = existing.to_vec();
    for tag in incoming {
        if !merged.contains(tag) {
            merged.push(tag.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Machine Learning", Some("machine-learning"))]
    #[case("#Rust", Some("rust"))]
    #[case("  knowledge_management  ", Some("knowledge-management"))]
    #[case("AI/ML -- Ops!", Some("ai-ml-ops"))]
    #[case("---", None)]
    #[case("", None)]
    fn raw_tags_take_canonical_form(#[case] raw: &str, #[case] expected: Option<&str>) {
        assert_eq!(normalize_tag(raw).as_deref(), expected);
    }

    #[rstest]
    fn duplicates_collapse_and_the_list_is_capped() {
        let tags = normalize_tags(["Rust", "rust", "#RUST", "Async IO", "zettel", "notes"], 3);
        assert_eq!(tags, ["rust", "async-io", "zettel"]);
    }

    #[rstest]
    fn merge_keeps_existing_order() {
        let existing = vec!["b".to_owned(), "a".to_owned()];
        let merged = merge_tags(&existing, &["a".to_owned(), "c".to_owned()]);
        assert_eq!(merged, ["b", "a", "c"]);
    }
}
