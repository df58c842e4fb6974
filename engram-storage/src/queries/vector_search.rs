//! Cosine similarity search over stored head embeddings.

use rusqlite::Connection;

use engram_core::errors::EngramResult;

use super::decision_crud::bytes_to_f32_vec;
use crate::to_storage_err;

/// Search decisions by vector similarity. Returns (decision_id, cosine)
/// ordered by similarity descending.
///
/// Brute-force scan over the embeddings table; the embedding count is the
/// decision count, which stays small enough that an ANN index is not worth
/// the extension dependency.
pub fn vector_search(
    conn: &Connection,
    query_embedding: &[f32],
    limit: usize,
) -> EngramResult<Vec<(String, f64)>> {
    // Pre-compute the query norm once for early-exit on zero-norm queries.
    let query_norm_sq: f64 = query_embedding
        .iter()
        .map(|x| (*x as f64) * (*x as f64))
        .sum();
    if query_norm_sq == 0.0 {
        return Ok(Vec::new());
    }
    let query_len = query_embedding.len();

    let mut stmt = conn
        .prepare(
            "SELECT l.decision_id, e.embedding, e.dimensions
             FROM decision_embedding_link l
             JOIN decision_embeddings e ON e.id = l.embedding_id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| {
            let decision_id: String = row.get(0)?;
            let blob: Vec<u8> = row.get(1)?;
            let dims: i32 = row.get(2)?;
            Ok((decision_id, blob, dims))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut scored: Vec<(String, f64)> = Vec::new();
    for row in rows {
        let (decision_id, blob, dims) = row.map_err(|e| to_storage_err(e.to_string()))?;
        // Skip dimension mismatches without deserializing the full vector.
        if dims as usize != query_len {
            continue;
        }
        let stored = bytes_to_f32_vec(&blob, dims as usize);
        let sim = cosine_similarity(query_embedding, &stored);
        if sim > 0.0 {
            scored.push((decision_id, sim));
        }
    }

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);
    Ok(scored)
}

/// Cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();
    let norm_a: f64 = a
        .iter()
        .map(|x| (*x as f64) * (*x as f64))
        .sum::<f64>()
        .sqrt();
    let norm_b: f64 = b
        .iter()
        .map(|x| (*x as f64) * (*x as f64))
        .sum::<f64>()
        .sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::cosine_similarity;

    #[test]
    fn identical_vectors_score_one() {
        let v = [0.5f32, 0.5, 0.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn orthogonal_vectors_score_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn zero_norm_is_guarded() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
