//! Ordered rule registry with per-rule fault isolation.
//!
//! # Design
//!
//! - Rules run sequentially in registration order; findings are appended without sorting.
//! - A rule that returns an error or panics is logged and skipped. The audit always completes.
//! - The engine holds no per-audit state, so one instance can serve concurrent callers.

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};
use warden_config::LocaleCode;

use crate::record::{HealthMessage, HealthRecord};
use crate::rules::{HealthRule, default_rules};
use crate::setting::Setting;
use crate::snapshot::ConfigSnapshot;
use crate::strength::PasswordStrengthScorer;

/// Mode the application is running in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationMode {
    /// Normal operation.
    #[default]
    Running,
    /// Open for configuration changes.
    Configuration,
}

/// Runs the registered health rules against a snapshot.
#[derive(Default)]
pub struct HealthEngine {
    rules: Vec<Box<dyn HealthRule>>,
}

impl fmt::Debug for HealthEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HealthEngine")
            .field(
                "rules",
                &self.rules.iter().map(|rule| rule.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl HealthEngine {
    /// Engine with no rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with the built-in rule set.
    #[must_use]
    pub fn with_default_rules(scorer: Arc<dyn PasswordStrengthScorer>) -> Self {
        Self {
            rules: default_rules(scorer),
        }
    }

    /// Append a rule; it runs after every rule registered before it.
    pub fn register(&mut self, rule: Box<dyn HealthRule>) -> &mut Self {
        self.rules.push(rule);
        self
    }

    /// Names of the registered rules, in audit order.
    #[must_use]
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Audit `snapshot`. A missing snapshot or a set suppression flag yields no findings.
    #[must_use]
    pub fn audit(
        &self,
        snapshot: Option<&dyn ConfigSnapshot>,
        locale: LocaleCode,
    ) -> Vec<HealthRecord> {
        let Some(snapshot) = snapshot else {
            debug!("no configuration snapshot available; skipping health audit");
            return Vec::new();
        };
        if warnings_suppressed(snapshot) {
            debug!("configuration health warnings are suppressed");
            return Vec::new();
        }

        let mut findings = Vec::new();
        for rule in &self.rules {
            match catch_unwind(AssertUnwindSafe(|| rule.audit(snapshot, locale))) {
                Ok(Ok(mut records)) => findings.append(&mut records),
                Ok(Err(err)) => error!(
                    rule = rule.name(),
                    error = %err,
                    "health rule failed"
                ),
                Err(payload) => error!(
                    rule = rule.name(),
                    error = %panic_message(payload.as_ref()),
                    "health rule panicked"
                ),
            }
        }
        findings
    }

    /// Audit as seen by a running application: configuration mode is always reported first,
    /// even when health warnings are suppressed.
    #[must_use]
    pub fn audit_running(
        &self,
        snapshot: Option<&dyn ConfigSnapshot>,
        mode: ApplicationMode,
        locale: LocaleCode,
    ) -> Vec<HealthRecord> {
        let mut findings = Vec::new();
        if mode == ApplicationMode::Configuration {
            findings.push(HealthRecord::for_message(
                HealthMessage::ConfigMode,
                locale,
                [""; 0],
            ));
        }
        findings.extend(self.audit(snapshot, locale));
        findings
    }
}

fn warnings_suppressed(snapshot: &dyn ConfigSnapshot) -> bool {
    snapshot
        .read_bool(Setting::HideConfigurationHealthWarnings, None)
        .unwrap_or_else(|err| {
            warn!(
                error = %err,
                "unable to read health warning suppression flag; auditing anyway"
            );
            false
        })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RuleError, RuleResult, SnapshotError};
    use crate::snapshot::MemorySnapshot;
    use crate::strength::CharacterClassScorer;

    struct Emit(HealthMessage);

    impl HealthRule for Emit {
        fn name(&self) -> &'static str {
            "emit"
        }

        fn audit(
            &self,
            _snapshot: &dyn ConfigSnapshot,
            locale: LocaleCode,
        ) -> RuleResult<Vec<HealthRecord>> {
            Ok(vec![HealthRecord::for_message(self.0, locale, [""; 0])])
        }
    }

    struct Broken;

    impl HealthRule for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn audit(
            &self,
            _snapshot: &dyn ConfigSnapshot,
            _locale: LocaleCode,
        ) -> RuleResult<Vec<HealthRecord>> {
            Err(RuleError::Snapshot(SnapshotError::Document {
                reason: "unreadable".to_string(),
            }))
        }
    }

    struct Panics;

    impl HealthRule for Panics {
        fn name(&self) -> &'static str {
            "panics"
        }

        fn audit(
            &self,
            _snapshot: &dyn ConfigSnapshot,
            _locale: LocaleCode,
        ) -> RuleResult<Vec<HealthRecord>> {
            panic!("rule exploded")
        }
    }

    fn keys(records: &[HealthRecord]) -> Vec<&str> {
        records
            .iter()
            .map(|record| record.message_key.as_str())
            .collect()
    }

    #[test]
    fn missing_snapshot_yields_nothing() {
        let engine = HealthEngine::with_default_rules(Arc::new(CharacterClassScorer));
        assert!(engine.audit(None, LocaleCode::En).is_empty());
    }

    #[test]
    fn failing_rules_do_not_stop_the_audit() {
        let mut engine = HealthEngine::new();
        engine
            .register(Box::new(Emit(HealthMessage::NoSiteUrl)))
            .register(Box::new(Broken))
            .register(Box::new(Panics))
            .register(Box::new(Emit(HealthMessage::MissingDb)));

        let snapshot = MemorySnapshot::default();
        let findings = engine.audit(Some(&snapshot), LocaleCode::En);
        assert_eq!(
            keys(&findings),
            vec![HealthMessage::NoSiteUrl.key(), HealthMessage::MissingDb.key()]
        );
    }

    #[test]
    fn suppression_flag_short_circuits() {
        let mut engine = HealthEngine::new();
        engine.register(Box::new(Emit(HealthMessage::NoSiteUrl)));
        let snapshot = MemorySnapshot::builder()
            .setting(Setting::HideConfigurationHealthWarnings, true)
            .build();
        assert!(engine.audit(Some(&snapshot), LocaleCode::En).is_empty());
    }

    #[test]
    fn unreadable_suppression_flag_is_ignored() {
        let mut engine = HealthEngine::new();
        engine.register(Box::new(Emit(HealthMessage::NoSiteUrl)));
        let snapshot = MemorySnapshot::builder()
            .setting(Setting::HideConfigurationHealthWarnings, "sometimes")
            .build();
        assert_eq!(engine.audit(Some(&snapshot), LocaleCode::En).len(), 1);
    }

    #[test]
    fn configuration_mode_is_reported_even_when_suppressed() {
        let engine = HealthEngine::with_default_rules(Arc::new(CharacterClassScorer));
        let snapshot = MemorySnapshot::builder()
            .setting(Setting::HideConfigurationHealthWarnings, true)
            .build();
        let findings =
            engine.audit_running(Some(&snapshot), ApplicationMode::Configuration, LocaleCode::En);
        assert_eq!(keys(&findings), vec![HealthMessage::ConfigMode.key()]);

        let running =
            engine.audit_running(Some(&snapshot), ApplicationMode::Running, LocaleCode::En);
        assert!(running.is_empty());
    }

    #[test]
    fn panic_payloads_are_described() {
        let text: Box<dyn Any + Send> = Box::new("boom");
        let owned: Box<dyn Any + Send> = Box::new(String::from("bang"));
        let other: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(text.as_ref()), "boom");
        assert_eq!(panic_message(owned.as_ref()), "bang");
        assert_eq!(panic_message(other.as_ref()), "non-string panic payload");
    }
}
