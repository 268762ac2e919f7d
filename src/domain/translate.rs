//! Translation pipeline: tokenize, parse, emit and combine.
//!
//! A rule set either translates completely or not at all. The first failing
//! rule aborts the whole set, because silently dropping a conjunct would change
//! what the strategy trades on.

use crate::domain::combiner::combine;
use crate::domain::emitter::emit_with;
use crate::domain::error::TranslateError;
use crate::domain::expr::Expr;
use crate::domain::platform::{EmitOptions, Platform};
use crate::domain::rule_parser::parse_rule;

/// Translate a single rule into one platform fragment.
pub fn translate_rule(
    rule: &str,
    platform: Platform,
    opts: &EmitOptions,
) -> Result<String, TranslateError> {
    let expr = parse_rule(rule)?;
    emit_rule(rule, &expr, platform, opts)
}

fn emit_rule(
    rule: &str,
    expr: &Expr,
    platform: Platform,
    opts: &EmitOptions,
) -> Result<String, TranslateError> {
    if !expr.is_comparison() {
        return Err(TranslateError::Emission {
            rule: rule.to_string(),
            reason: "rule root is not a comparison".to_string(),
        });
    }
    Ok(emit_with(expr, platform, opts))
}

/// An ordered list of rule strings as authored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<String>,
}

impl RuleSet {
    pub fn new<I, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rules: rules.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a comma-separated list, trimming entries and skipping blanks.
    pub fn from_list(text: &str) -> Self {
        Self::new(
            text.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty()),
        )
    }

    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Parse every rule, in order.
    pub fn parse_all(&self) -> Result<Vec<Expr>, TranslateError> {
        self.rules.iter().map(|r| parse_rule(r)).collect()
    }

    /// Emit every rule for `platform`, in order.
    pub fn fragments(
        &self,
        platform: Platform,
        opts: &EmitOptions,
    ) -> Result<Vec<String>, TranslateError> {
        self.rules
            .iter()
            .map(|r| translate_rule(r, platform, opts))
            .collect()
    }

    /// Emit and combine the whole set into one condition string.
    pub fn translate(&self, platform: Platform, opts: &EmitOptions) -> Result<String, TranslateError> {
        let fragments = self.fragments(platform, opts)?;
        combine(&fragments, platform)
    }
}

impl<S: Into<String>> FromIterator<S> for RuleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
