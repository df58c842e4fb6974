//! Gold-set loading and integrity checks.

use std::collections::BTreeSet;
use std::path::Path;

use engram_core::errors::{EngramError, EngramResult, EvalError};
use engram_core::models::EvaluationCase;
use engram_core::traits::IDecisionStore;

/// An immutable set of evaluation cases. Construction validates shape;
/// `assert_resolvable` validates it against a live store before a run.
#[derive(Debug, Clone)]
pub struct GoldSet {
    cases: Vec<EvaluationCase>,
}

impl GoldSet {
    pub fn from_cases(cases: Vec<EvaluationCase>) -> EngramResult<Self> {
        if cases.is_empty() {
            return Err(EngramError::Eval(EvalError::EmptyGoldSet));
        }
        for case in &cases {
            if case.query.trim().is_empty() {
                return Err(EngramError::validation("gold case has an empty query"));
            }
            if case.expected_decision_ids.is_empty() {
                return Err(EngramError::validation(format!(
                    "gold case '{}' expects no decisions",
                    case.query
                )));
            }
        }
        Ok(Self { cases })
    }

    /// Load a gold set from a JSON array of cases.
    pub fn load(path: &Path) -> EngramResult<Self> {
        let load_err = |reason: String| {
            EngramError::Eval(EvalError::GoldSetLoadFailed {
                path: path.display().to_string(),
                reason,
            })
        };
        let raw = std::fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
        let cases: Vec<EvaluationCase> =
            serde_json::from_str(&raw).map_err(|e| load_err(e.to_string()))?;
        Self::from_cases(cases)
    }

    pub fn cases(&self) -> &[EvaluationCase] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Every expected id must resolve in the store. A mismatched id scheme
    /// (stale export, wrong environment) would otherwise read as a uniform
    /// quality collapse instead of the configuration error it is.
    pub fn assert_resolvable(&self, store: &dyn IDecisionStore) -> EngramResult<()> {
        let expected: BTreeSet<&String> = self
            .cases
            .iter()
            .flat_map(|c| c.expected_decision_ids.iter())
            .collect();
        let ids: Vec<String> = expected.iter().map(|s| s.to_string()).collect();
        let found: BTreeSet<String> = store
            .get_bulk(&ids)?
            .into_iter()
            .map(|d| d.id)
            .collect();

        let missing: Vec<String> = expected
            .into_iter()
            .filter(|id| !found.contains(*id))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(EngramError::Eval(EvalError::UnknownExpectedIds { missing }));
        }
        Ok(())
    }
}
