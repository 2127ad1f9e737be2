//! Seam for validation and correction rules run over parsed records.
//!
//! Rules live outside this crate. A [`RuleSet`] applies them in order to a
//! copy of the record, so the parsed original is never touched. A rule that
//! corrects the record reports a [`Severity::Fix`](flatseq_core::Severity::Fix)
//! diagnostic.

use flatseq_core::Diagnostics;

use crate::record::Record;

/// A single validation or correction check.
pub trait Rule {
    /// Stable diagnostic code this rule reports under.
    fn code(&self) -> &'static str;

    /// Inspect `record`, correcting it in place where the rule knows how,
    /// and report what was found.
    fn check(&self, record: &mut Record, diagnostics: &mut Diagnostics);
}

/// An ordered collection of rules.
#[derive(Default)]
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, rule: impl Rule + 'static) -> Self {
        self.push(rule);
        self
    }

    pub fn push(&mut self, rule: impl Rule + 'static) {
        self.rules.push(Box::new(rule));
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Codes of the registered rules, in order.
    pub fn codes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.code())
    }

    /// Run every rule over a copy of `record` and return the copy.
    pub fn apply(&self, record: &Record, diagnostics: &mut Diagnostics) -> Record {
        let mut working = record.clone();
        for rule in &self.rules {
            log::trace!("applying rule {}", rule.code());
            rule.check(&mut working, diagnostics);
        }
        working
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.codes()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Text;
    use flatseq_core::{Dialect, Located, Severity};

    struct TrimDescription;

    impl Rule for TrimDescription {
        fn code(&self) -> &'static str {
            "DE.9"
        }

        fn check(&self, record: &mut Record, diagnostics: &mut Diagnostics) {
            if let Some(description) = record.description.as_mut() {
                let trimmed = description.text.trim_end_matches('.').to_string();
                if trimmed != description.text {
                    description.text = trimmed;
                    diagnostics.fix(self.code(), description.origin(), "Removed trailing period");
                }
            }
        }
    }

    struct RequireKeywords;

    impl Rule for RequireKeywords {
        fn code(&self) -> &'static str {
            "KW.9"
        }

        fn check(&self, record: &mut Record, diagnostics: &mut Diagnostics) {
            if record.keywords.is_none() {
                diagnostics.warning(self.code(), record.origin, "No keywords");
            }
        }
    }

    #[test]
    fn apply_works_on_a_copy() {
        let mut record = Record::new(Dialect::Embl);
        record.description = Some(Text::new("A gene."));

        let rules = RuleSet::new().with(TrimDescription).with(RequireKeywords);
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.codes().collect::<Vec<_>>(), ["DE.9", "KW.9"]);

        let mut diagnostics = Diagnostics::new();
        let fixed = rules.apply(&record, &mut diagnostics);

        assert_eq!(fixed.description_text(), Some("A gene"));
        assert_eq!(record.description_text(), Some("A gene."));
        assert_eq!(diagnostics.count(Severity::Fix), 1);
        assert_eq!(diagnostics.count(Severity::Warning), 1);
    }

    #[test]
    fn empty_set_is_identity() {
        let record = Record::new(Dialect::GenBank);
        let mut diagnostics = Diagnostics::new();
        assert_eq!(RuleSet::new().apply(&record, &mut diagnostics), record);
        assert!(diagnostics.is_empty());
    }
}
