//! FTS5 lexical search over head || context_value.

use rusqlite::{params, Connection};

use engram_core::errors::EngramResult;

use crate::to_storage_err;

/// Search decisions by term match, BM25-ranked. Returns (decision_id, score)
/// with scores mapped to 0..1 (higher = more relevant); ties break
/// newest-first so equally-relevant newer decisions win.
pub fn lexical_search(
    conn: &Connection,
    text: &str,
    limit: usize,
) -> EngramResult<Vec<(String, f64)>> {
    let Some(match_query) = build_match_query(text) else {
        return Ok(Vec::new());
    };

    let mut stmt = conn
        .prepare(
            "SELECT d.id, bm25(decisions_fts) AS rank
             FROM decisions_fts
             JOIN decisions d ON d.rowid = decisions_fts.rowid
             WHERE decisions_fts MATCH ?1
             ORDER BY rank ASC, d.created_at DESC
             LIMIT ?2",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![match_query, limit as i64], |row| {
            let id: String = row.get(0)?;
            let rank: f64 = row.get(1)?;
            Ok((id, rank))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        let (id, rank) = row.map_err(|e| to_storage_err(e.to_string()))?;
        results.push((id, normalize_bm25(rank)));
    }
    Ok(results)
}

/// Build an OR query of sanitized terms. FTS5 syntax characters in user
/// text must not reach MATCH, so only alphanumeric tokens survive.
fn build_match_query(text: &str) -> Option<String> {
    let terms: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| format!("\"{t}\""))
        .collect();
    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" OR "))
    }
}

/// Every row FTS returned did match; its score must clear the lexical noise
/// floor even when bm25's IDF term collapses. In small corpora a term present
/// in half the rows or more gets IDF <= 0, so bm25() comes back zero or
/// positive for genuine matches.
const MATCH_BASELINE: f64 = 0.1;

/// SQLite bm25() is smaller-is-better and negative for well-discriminated
/// matches. Map onto [MATCH_BASELINE, 1): every match starts at the baseline
/// and stronger relevance pushes the score toward 1, preserving bm25 order.
fn normalize_bm25(rank: f64) -> f64 {
    let relevance = (-rank).max(0.0);
    MATCH_BASELINE + (1.0 - MATCH_BASELINE) * relevance / (1.0 + relevance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_query_strips_fts_syntax() {
        let q = build_match_query("what's the \"database\" (we use)?").unwrap();
        assert!(!q.contains('('));
        assert!(q.contains("\"database\""));
        assert!(q.contains(" OR "));
    }

    #[test]
    fn empty_text_yields_no_query() {
        assert!(build_match_query("  ... !?").is_none());
    }

    #[test]
    fn bm25_normalization_is_bounded_and_monotone() {
        // Collapsed-IDF matches (rank >= 0) still score at the baseline.
        assert_eq!(normalize_bm25(0.0), MATCH_BASELINE);
        assert_eq!(normalize_bm25(5.0), MATCH_BASELINE);
        let strong = normalize_bm25(-9.0);
        let weak = normalize_bm25(-0.5);
        assert!(weak > MATCH_BASELINE);
        assert!(strong > weak);
        assert!(strong < 1.0);
    }
}
