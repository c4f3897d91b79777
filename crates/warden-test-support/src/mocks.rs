//! Scorers and rules with scripted behaviour.

use warden_config::LocaleCode;
use warden_health::{
    ConfigSnapshot, HealthMessage, HealthRecord, HealthRule, PasswordStrengthScorer, RuleError,
    RuleResult, ScoreError,
};

/// Scorer returning the same score for every password.
#[derive(Debug, Clone, Copy)]
pub struct FixedScorer(pub u8);

impl PasswordStrengthScorer for FixedScorer {
    fn score(&self, _password: Option<&str>) -> Result<u8, ScoreError> {
        Ok(self.0)
    }
}

/// Scorer that always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingScorer;

impl PasswordStrengthScorer for FailingScorer {
    fn score(&self, _password: Option<&str>) -> Result<u8, ScoreError> {
        Err(ScoreError::new("scorer unavailable"))
    }
}

/// Rule emitting one finding per configured message.
#[derive(Debug, Clone)]
pub struct StaticRule {
    name: &'static str,
    messages: Vec<HealthMessage>,
}

impl StaticRule {
    /// Rule named `name` emitting `messages` in order.
    #[must_use]
    pub const fn new(name: &'static str, messages: Vec<HealthMessage>) -> Self {
        Self { name, messages }
    }
}

impl HealthRule for StaticRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn audit(
        &self,
        _snapshot: &dyn ConfigSnapshot,
        locale: LocaleCode,
    ) -> RuleResult<Vec<HealthRecord>> {
        Ok(self
            .messages
            .iter()
            .map(|message| HealthRecord::for_message(*message, locale, [self.name]))
            .collect())
    }
}

/// Rule that always returns an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingRule;

impl HealthRule for FailingRule {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn audit(
        &self,
        _snapshot: &dyn ConfigSnapshot,
        _locale: LocaleCode,
    ) -> RuleResult<Vec<HealthRecord>> {
        Err(RuleError::InvalidValue {
            location: "Settings".to_string(),
            reason: "scripted failure".to_string(),
        })
    }
}

/// Rule that panics while auditing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanickingRule;

impl HealthRule for PanickingRule {
    fn name(&self) -> &'static str {
        "panicking"
    }

    fn audit(
        &self,
        _snapshot: &dyn ConfigSnapshot,
        _locale: LocaleCode,
    ) -> RuleResult<Vec<HealthRecord>> {
        panic!("scripted panic")
    }
}
