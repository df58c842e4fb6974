//! The canonicalization rule table. Data, not code: extending the folds
//! never touches call sites, and deployments can load their own table from
//! TOML.

use serde::{Deserialize, Serialize};

use engram_core::errors::{EngramError, EngramResult};

/// Fold a multi-word phrase onto a canonical phrase ("migrate to" → "use").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoldRule {
    pub from: String,
    pub to: String,
}

/// Fold a single token onto its canonical spelling ("pg" → "postgresql").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasRule {
    pub from: String,
    pub to: String,
}

/// The full rule table applied by the canonicalizer.
///
/// Idempotence contract: no alias target may itself be an alias key, and no
/// token a rule emits (fold target or alias target) may occur inside a fold
/// source — otherwise a substitution can complete a fold phrase that only
/// becomes visible on the next pass. The built-in table satisfies this;
/// `from_toml_str` verifies loaded tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanonRules {
    pub phrase_folds: Vec<FoldRule>,
    pub aliases: Vec<AliasRule>,
}

impl Default for CanonRules {
    fn default() -> Self {
        let fold = |from: &str, to: &str| FoldRule {
            from: from.to_string(),
            to: to.to_string(),
        };
        let alias = |from: &str, to: &str| AliasRule {
            from: from.to_string(),
            to: to.to_string(),
        };
        Self {
            phrase_folds: vec![
                fold("switch to", "use"),
                fold("migrate to", "use"),
                fold("move to", "use"),
                fold("switch over to", "use"),
                fold("adopt", "use"),
                fold("standardize on", "use"),
                fold("settle on", "use"),
            ],
            aliases: vec![
                alias("postgres", "postgresql"),
                alias("pg", "postgresql"),
                alias("k8s", "kubernetes"),
                alias("js", "javascript"),
                alias("ts", "typescript"),
                alias("py", "python"),
                alias("mongo", "mongodb"),
                alias("es", "elasticsearch"),
            ],
        }
    }
}

impl CanonRules {
    /// Load a rule table from TOML, rejecting tables that would break the
    /// idempotence contract.
    pub fn from_toml_str(s: &str) -> EngramResult<Self> {
        let rules: Self = toml::from_str(s)
            .map_err(|e| EngramError::validation(format!("invalid canon rules: {e}")))?;
        rules.verify()?;
        Ok(rules)
    }

    fn verify(&self) -> EngramResult<()> {
        let source_tokens: std::collections::BTreeSet<&str> = self
            .phrase_folds
            .iter()
            .flat_map(|f| f.from.split_whitespace())
            .collect();

        // A rule output that reintroduces a fold-source token can assemble
        // a fold phrase across token boundaries, so canonical text would
        // keep changing on re-processing.
        for f in &self.phrase_folds {
            if let Some(tok) = f.to.split_whitespace().find(|t| source_tokens.contains(t)) {
                return Err(EngramError::validation(format!(
                    "fold target '{}' emits '{tok}', a fold source token",
                    f.to
                )));
            }
        }
        for a in &self.aliases {
            if self.aliases.iter().any(|b| b.from == a.to) {
                return Err(EngramError::validation(format!(
                    "alias target '{}' is itself an alias key",
                    a.to
                )));
            }
            if let Some(tok) = a.to.split_whitespace().find(|t| source_tokens.contains(t)) {
                return Err(EngramError::validation(format!(
                    "alias target '{}' emits '{tok}', a fold source token",
                    a.to
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_passes_its_own_verification() {
        CanonRules::default().verify().unwrap();
    }

    #[test]
    fn toml_round_trip() {
        let rules = CanonRules::from_toml_str(
            r#"
            phrase_folds = [{ from = "switch to", to = "use" }]
            aliases = [{ from = "pg", to = "postgresql" }]
            "#,
        )
        .unwrap();
        assert_eq!(rules.phrase_folds.len(), 1);
        assert_eq!(rules.aliases[0].to, "postgresql");
    }

    #[test]
    fn alias_completing_a_fold_phrase_is_rejected() {
        // "jump" → "switch" would turn "jump to x" into "switch to x",
        // which only folds to "use x" on a second pass.
        let err = CanonRules::from_toml_str(
            r#"
            phrase_folds = [{ from = "switch to", to = "use" }]
            aliases = [{ from = "jump", to = "switch" }]
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("fold source token"));
    }

    #[test]
    fn fold_target_rebuilding_a_fold_phrase_is_rejected() {
        let err = CanonRules::from_toml_str(
            r#"
            phrase_folds = [
                { from = "migrate onto", to = "move to" },
                { from = "move to", to = "use" },
            ]
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("fold source token"));
    }

    #[test]
    fn cyclic_alias_table_is_rejected() {
        let err = CanonRules::from_toml_str(
            r#"
            aliases = [{ from = "a", to = "b" }, { from = "b", to = "a" }]
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("alias target"));
    }
}
