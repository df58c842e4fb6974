//! Query entity extraction against a configured allow-list.

use std::collections::BTreeSet;

/// Extract allow-listed entities mentioned in a canonicalized query.
/// Single-token entries match tokens exactly; multi-word entries match on
/// word boundaries.
pub fn extract_query_entities(canonical_query: &str, allow_list: &[String]) -> BTreeSet<String> {
    if allow_list.is_empty() || canonical_query.is_empty() {
        return BTreeSet::new();
    }

    let tokens: BTreeSet<&str> = canonical_query.split_whitespace().collect();
    let padded = format!(" {canonical_query} ");

    allow_list
        .iter()
        .filter(|entry| {
            if entry.contains(' ') {
                padded.contains(&format!(" {entry} "))
            } else {
                tokens.contains(entry.as_str())
            }
        })
        .cloned()
        .collect()
}
