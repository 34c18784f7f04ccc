//! Compliance checks: literal set membership or case-insensitive pattern search with
//! an optional exception, combined with a keep/drop action.

use crate::config::{Action, CheckType, ComplianceTest};
use crate::error::TopError;
use ahash::AHashSet;
use regex::{Regex, RegexBuilder};

pub enum Check {
    Exact(AHashSet<String>),
    Pattern { pattern: Regex, exception: Option<Regex> },
}

impl Check {
    pub fn compile(check: &CheckType) -> Result<Self, TopError> {
        Ok(match check {
            CheckType::ExactMembership { items } => Check::Exact(items.iter().cloned().collect()),
            CheckType::PatternMatch { pattern, exception } => Check::Pattern {
                pattern: case_insensitive(pattern)?,
                exception: exception
                    .as_deref()
                    .filter(|ex| !ex.is_empty())
                    .map(case_insensitive)
                    .transpose()?,
            },
        })
    }

    pub fn matches(&self, item: &str) -> bool {
        match self {
            Check::Exact(set) => set.contains(item),
            Check::Pattern { pattern, exception } => {
                pattern.is_match(item) && !exception.as_ref().is_some_and(|ex| ex.is_match(item))
            }
        }
    }
}

pub struct Compliance {
    check: Check,
    action: Action,
}

impl Compliance {
    pub fn new(check: Check, action: Action) -> Self {
        Self { check, action }
    }

    pub fn compile(cfg: &ComplianceTest) -> Result<Self, TopError> {
        Ok(Self::new(Check::compile(&cfg.check)?, cfg.action))
    }

    /// `delete` keeps non-matching items, `save` keeps matching ones.
    pub fn keeps(&self, item: &str) -> bool {
        let hit = self.check.matches(item);
        match self.action {
            Action::Delete => !hit,
            Action::Save => hit,
        }
    }
}

/// No configured compliance test keeps everything.
#[inline]
pub fn passes(compliance: Option<&Compliance>, item: &str) -> bool {
    compliance.map_or(true, |c| c.keeps(item))
}

fn case_insensitive(pattern: &str) -> Result<Regex, TopError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| TopError::Config(format!("invalid pattern {pattern:?}: {e}")))
}
