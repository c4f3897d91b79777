//! Password strength and password policy checks.

use std::sync::Arc;

use tracing::warn;
use warden_config::LocaleCode;

use super::HealthRule;
use crate::error::{RuleError, RuleResult};
use crate::record::{HealthMessage, HealthRecord};
use crate::setting::{ProfileCategory, Setting, SettingSyntax};
use crate::snapshot::ConfigSnapshot;
use crate::strength::PasswordStrengthScorer;

/// Scores below this value are reported as weak.
pub const WEAK_PASSWORD_THRESHOLD: u8 = 50;

/// Weak secrets in non-profiled password settings and directory proxy credentials.
pub struct WeakPasswordRule {
    scorer: Arc<dyn PasswordStrengthScorer>,
}

impl WeakPasswordRule {
    /// Rule scoring passwords with `scorer`.
    #[must_use]
    pub fn new(scorer: Arc<dyn PasswordStrengthScorer>) -> Self {
        Self { scorer }
    }

    fn check_global(
        &self,
        snapshot: &dyn ConfigSnapshot,
        setting: Setting,
        locale: LocaleCode,
    ) -> RuleResult<Option<HealthRecord>> {
        if snapshot.is_default(setting, None)? {
            return Ok(None);
        }
        self.check(snapshot, setting, None, locale)
    }

    /// Unset proxy credentials are scored too and report as 0.
    fn check(
        &self,
        snapshot: &dyn ConfigSnapshot,
        setting: Setting,
        profile: Option<&str>,
        locale: LocaleCode,
    ) -> RuleResult<Option<HealthRecord>> {
        let password = snapshot.read_password(setting, profile)?;
        let score = self
            .scorer
            .score(password.as_ref().map(|secret| secret.expose()))?;
        if score < WEAK_PASSWORD_THRESHOLD {
            return Ok(Some(HealthRecord::for_message(
                HealthMessage::WeakPassword,
                locale,
                [setting.menu_location(profile, locale), score.to_string()],
            )));
        }
        Ok(None)
    }
}

impl HealthRule for WeakPasswordRule {
    fn name(&self) -> &'static str {
        "weak-password"
    }

    fn audit(
        &self,
        snapshot: &dyn ConfigSnapshot,
        locale: LocaleCode,
    ) -> RuleResult<Vec<HealthRecord>> {
        let mut findings = Vec::new();
        let candidates = Setting::ALL.iter().copied().filter(|setting| {
            setting.syntax() == SettingSyntax::Password && setting.profile_category().is_none()
        });
        for setting in candidates {
            match self.check_global(snapshot, setting, locale) {
                Ok(Some(record)) => findings.push(record),
                Ok(None) => {}
                Err(err) => warn!(
                    setting = setting.key(),
                    error = %err,
                    "password strength check failed"
                ),
            }
        }

        let proxy = Setting::LdapProxyUserPassword;
        for profile in snapshot.profiles(ProfileCategory::Ldap) {
            match self.check(snapshot, proxy, Some(&profile), locale) {
                Ok(Some(record)) => findings.push(record),
                Ok(None) => {}
                Err(err) => warn!(
                    profile = %profile,
                    setting = proxy.key(),
                    error = %err,
                    "proxy password strength check failed"
                ),
            }
        }
        Ok(findings)
    }
}

/// Minimum/maximum pairs that must not contradict each other.
const POLICY_PAIRS: [(Setting, Setting); 6] = [
    (
        Setting::PasswordPolicyMinimumLength,
        Setting::PasswordPolicyMaximumLength,
    ),
    (
        Setting::PasswordPolicyMinimumAlpha,
        Setting::PasswordPolicyMaximumAlpha,
    ),
    (
        Setting::PasswordPolicyMinimumNumeric,
        Setting::PasswordPolicyMaximumNumeric,
    ),
    (
        Setting::PasswordPolicyMinimumSpecial,
        Setting::PasswordPolicyMaximumSpecial,
    ),
    (
        Setting::PasswordPolicyMinimumUpperCase,
        Setting::PasswordPolicyMaximumUpperCase,
    ),
    (
        Setting::PasswordPolicyMinimumLowerCase,
        Setting::PasswordPolicyMaximumLowerCase,
    ),
];

/// Password policy profiles whose maximum is set below the minimum.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordPolicyRule;

impl PasswordPolicyRule {
    fn check_profile(
        snapshot: &dyn ConfigSnapshot,
        profile: &str,
        locale: LocaleCode,
    ) -> RuleResult<Vec<HealthRecord>> {
        let mut findings = Vec::new();
        for (min_setting, max_setting) in POLICY_PAIRS {
            let minimum = read_count(snapshot, min_setting, profile, locale)?;
            let maximum = read_count(snapshot, max_setting, profile, locale)?;
            if maximum > 0 && maximum < minimum {
                let description = format!(
                    "{} ({maximum}) is less than {} ({minimum})",
                    max_setting.label(),
                    min_setting.label()
                );
                findings.push(HealthRecord::for_message(
                    HealthMessage::PasswordPolicyProblem,
                    locale,
                    [
                        ProfileCategory::PasswordPolicy.location(profile, locale),
                        description,
                    ],
                ));
            }
        }
        Ok(findings)
    }
}

fn read_count(
    snapshot: &dyn ConfigSnapshot,
    setting: Setting,
    profile: &str,
    locale: LocaleCode,
) -> RuleResult<u32> {
    let raw = snapshot.read_string(setting, Some(profile))?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<u32>()
        .map_err(|err| RuleError::InvalidValue {
            location: setting.menu_location(Some(profile), locale),
            reason: format!("'{trimmed}' is not a non-negative integer ({err})"),
        })
}

impl HealthRule for PasswordPolicyRule {
    fn name(&self) -> &'static str {
        "password-policy"
    }

    fn audit(
        &self,
        snapshot: &dyn ConfigSnapshot,
        locale: LocaleCode,
    ) -> RuleResult<Vec<HealthRecord>> {
        let mut findings = Vec::new();
        for profile in snapshot.profiles(ProfileCategory::PasswordPolicy) {
            match Self::check_profile(snapshot, &profile, locale) {
                Ok(mut profile_findings) => findings.append(&mut profile_findings),
                Err(err) => warn!(
                    profile = %profile,
                    error = %err,
                    "skipping password policy profile"
                ),
            }
        }
        Ok(findings)
    }
}
