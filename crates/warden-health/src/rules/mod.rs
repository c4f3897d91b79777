//! Health rules and the default ordered registry.

mod config;
mod ldap;
mod password;
mod storage;

use std::sync::Arc;

use warden_config::LocaleCode;

use crate::error::RuleResult;
use crate::record::HealthRecord;
use crate::snapshot::ConfigSnapshot;
use crate::strength::PasswordStrengthScorer;

pub use config::{DetailedErrorsRule, PromiscuousLdapRule, SiteUrlRule, WireTraceRule};
pub use ldap::{LdapUrlSecurityRule, TestUserRule};
pub use password::{PasswordPolicyRule, WEAK_PASSWORD_THRESHOLD, WeakPasswordRule};
pub use storage::{DatabaseConfiguredRule, ResponseAttributeRule};

/// One stateless audit check.
pub trait HealthRule: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Inspect `snapshot` and return findings in `locale`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RuleError`] when the rule cannot complete; the engine logs it and moves on.
    fn audit(
        &self,
        snapshot: &dyn ConfigSnapshot,
        locale: LocaleCode,
    ) -> RuleResult<Vec<HealthRecord>>;
}

/// Built-in checks followed by the storage and policy rules, in audit order.
#[must_use]
pub fn default_rules(scorer: Arc<dyn PasswordStrengthScorer>) -> Vec<Box<dyn HealthRule>> {
    vec![
        Box::new(SiteUrlRule),
        Box::new(WireTraceRule),
        Box::new(PromiscuousLdapRule),
        Box::new(DetailedErrorsRule),
        Box::new(TestUserRule),
        Box::new(LdapUrlSecurityRule),
        Box::new(WeakPasswordRule::new(scorer)),
        Box::new(ResponseAttributeRule),
        Box::new(DatabaseConfiguredRule),
        Box::new(PasswordPolicyRule),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strength::CharacterClassScorer;

    #[test]
    fn default_registry_order_is_stable() {
        let names = default_rules(Arc::new(CharacterClassScorer))
            .iter()
            .map(|rule| rule.name())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![
                "site-url",
                "ldap-wire-trace",
                "ldap-promiscuous",
                "detailed-errors",
                "ldap-test-user",
                "ldap-url-security",
                "weak-password",
                "response-attribute",
                "database-configured",
                "password-policy",
            ]
        );
    }
}
