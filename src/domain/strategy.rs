//! Strategy rule sets handed in by the template assembler.

use crate::domain::error::TranslateError;
use crate::domain::platform::{EmitOptions, Platform};
use crate::domain::translate::RuleSet;

#[derive(Debug, Clone)]
pub struct Strategy {
    pub name: String,
    pub symbol: String,
    pub entry_long: RuleSet,
    pub exit_long: RuleSet,
    pub entry_short: Option<RuleSet>,
    pub exit_short: Option<RuleSet>,
}

/// A named condition string for one rule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub label: &'static str,
    pub text: String,
}

impl Strategy {
    /// Labelled rule sets in fixed order; absent short sets are skipped.
    pub fn rule_sets(&self) -> Vec<(&'static str, &RuleSet)> {
        let mut sets = vec![
            ("entry_long", &self.entry_long),
            ("exit_long", &self.exit_long),
        ];
        if let Some(set) = &self.entry_short {
            sets.push(("entry_short", set));
        }
        if let Some(set) = &self.exit_short {
            sets.push(("exit_short", set));
        }
        sets
    }

    pub fn translate(
        &self,
        platform: Platform,
        opts: &EmitOptions,
    ) -> Result<Vec<Condition>, TranslateError> {
        self.rule_sets()
            .into_iter()
            .map(|(label, set)| {
                Ok(Condition {
                    label,
                    text: set.translate(platform, opts)?,
                })
            })
            .collect()
    }
}
