//! `superseded_by` chain walks. Chains are expected to be short (a decision
//! is replaced a handful of times at most); the depth bound exists to turn
//! a corrupted chain into a diagnosable error instead of a spin.

use engram_core::errors::{EngramError, EngramResult, SupersedenceError};
use engram_core::traits::IDecisionStore;

/// Follow `superseded_by` pointers from `id` until an open decision or a
/// dangling pointer is reached. Returns the visited ids, starting with `id`.
pub fn walk_chain(
    store: &dyn IDecisionStore,
    id: &str,
    max_depth: usize,
) -> EngramResult<Vec<String>> {
    let mut visited = vec![id.to_string()];
    let mut current = id.to_string();

    loop {
        if visited.len() > max_depth {
            return Err(EngramError::Supersedence(SupersedenceError::ChainTooDeep {
                id: id.to_string(),
                depth: visited.len(),
            }));
        }
        let next = match store.get(&current)? {
            Some(d) => d.superseded_by,
            None => None,
        };
        match next {
            Some(next_id) => {
                // A pointer back into the visited set means the stored chain
                // is already circular; surface it rather than looping.
                if visited.contains(&next_id) {
                    return Err(EngramError::Supersedence(SupersedenceError::CycleDetected {
                        old_id: current,
                        new_id: next_id,
                    }));
                }
                visited.push(next_id.clone());
                current = next_id;
            }
            None => return Ok(visited),
        }
    }
}

/// Would marking `old_id` as superseded-by-`new_id` close a loop? True when
/// the chain starting at `new_id` already passes through `old_id`.
pub fn would_create_cycle(
    store: &dyn IDecisionStore,
    old_id: &str,
    new_id: &str,
    max_depth: usize,
) -> EngramResult<bool> {
    if old_id == new_id {
        return Ok(true);
    }
    let chain = walk_chain(store, new_id, max_depth)?;
    Ok(chain.iter().any(|id| id == old_id))
}
