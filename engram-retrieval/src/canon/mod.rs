//! Query/head canonicalization. A pure, deterministic function applied
//! identically at index time and query time — asymmetry between the two is
//! the bug class the property tests target.

mod rules;

pub use rules::{AliasRule, CanonRules, FoldRule};

/// Applies the rule table: lowercase → punctuation strip → whitespace
/// collapse → phrase folds → per-token alias folds.
///
/// Stateless after construction; safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct Canonicalizer {
    rules: CanonRules,
}

impl Canonicalizer {
    pub fn new(rules: CanonRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &CanonRules {
        &self.rules
    }

    /// Normalize free text to its canonical comparable form.
    pub fn canonicalize(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            if c.is_alphanumeric() {
                // Some lowercasings expand to letter + combining mark
                // (e.g. U+0130); keep only the alphanumeric chars so a
                // second pass sees identical input.
                for lc in c.to_lowercase().filter(|lc| lc.is_alphanumeric()) {
                    out.push(lc);
                }
            } else {
                out.push(' ');
            }
        }
        let collapsed = out.split_whitespace().collect::<Vec<_>>().join(" ");

        // Phrase folds operate on a space-padded copy so word boundaries
        // are uniform at the edges.
        let mut padded = format!(" {collapsed} ");
        for fold in &self.rules.phrase_folds {
            let from = format!(" {} ", fold.from);
            let to = format!(" {} ", fold.to);
            while padded.contains(&from) {
                padded = padded.replace(&from, &to);
            }
        }

        padded
            .split_whitespace()
            .map(|token| self.fold_alias(token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn fold_alias<'a>(&'a self, token: &'a str) -> &'a str {
        self.rules
            .aliases
            .iter()
            .find(|a| a.from == token)
            .map(|a| a.to.as_str())
            .unwrap_or(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canon(s: &str) -> String {
        Canonicalizer::default().canonicalize(s)
    }

    #[test]
    fn lowercases_and_strips_punctuation() {
        assert_eq!(canon("Use PostgreSQL, for storage!"), "use postgresql for storage");
    }

    #[test]
    fn folds_verb_phrases() {
        assert_eq!(canon("switch to postgres"), "use postgresql");
        assert_eq!(canon("Migrate to K8s"), "use kubernetes");
    }

    #[test]
    fn equivalent_phrasings_canonicalize_identically() {
        assert_eq!(canon("switch to postgres"), canon("use postgresql"));
        assert_eq!(canon("adopt pg"), canon("migrate to postgres"));
    }

    #[test]
    fn idempotent_on_examples() {
        for s in [
            "switch to postgres",
            "Use PostgreSQL for storage",
            "move to k8s for deploys",
            "",
            "   ",
        ] {
            let once = canon(s);
            assert_eq!(canon(&once), once);
        }
    }

    #[test]
    fn expanding_lowercase_mappings_stay_canonical() {
        // 'İ' lowercases to "i" plus a combining mark; the mark is
        // non-alphanumeric and must not survive, or re-processing would
        // change the text.
        let once = canon("İstanbul");
        assert_eq!(once, "istanbul");
        assert_eq!(canon(&once), once);
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(canon("  use   postgresql  "), "use postgresql");
    }
}
