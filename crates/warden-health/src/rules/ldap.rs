//! Directory profile checks.

use tracing::{debug, warn};
use url::Url;
use warden_config::LocaleCode;

use super::HealthRule;
use crate::error::RuleResult;
use crate::record::{HealthMessage, HealthRecord};
use crate::setting::{ProfileCategory, Setting};
use crate::snapshot::ConfigSnapshot;

const SECURE_SCHEME: &str = "ldaps";

/// Directory profile without a test user.
#[derive(Debug, Clone, Copy, Default)]
pub struct TestUserRule;

impl TestUserRule {
    fn check_profile(
        snapshot: &dyn ConfigSnapshot,
        profile: &str,
        locale: LocaleCode,
    ) -> RuleResult<Option<HealthRecord>> {
        let test_user = snapshot.read_string(Setting::LdapTestUserDn, Some(profile))?;
        if test_user.trim().is_empty() {
            return Ok(Some(HealthRecord::for_message(
                HealthMessage::AddTestUser,
                locale,
                [Setting::LdapTestUserDn.menu_location(Some(profile), locale)],
            )));
        }
        Ok(None)
    }
}

impl HealthRule for TestUserRule {
    fn name(&self) -> &'static str {
        "ldap-test-user"
    }

    fn audit(
        &self,
        snapshot: &dyn ConfigSnapshot,
        locale: LocaleCode,
    ) -> RuleResult<Vec<HealthRecord>> {
        let mut findings = Vec::new();
        for profile in snapshot.profiles(ProfileCategory::Ldap) {
            match Self::check_profile(snapshot, &profile, locale) {
                Ok(Some(record)) => findings.push(record),
                Ok(None) => {}
                Err(err) => warn!(
                    profile = %profile,
                    setting = Setting::LdapTestUserDn.key(),
                    error = %err,
                    "skipping directory profile test user check"
                ),
            }
        }
        Ok(findings)
    }
}

/// Directory server URLs that are not `ldaps://` or do not parse.
///
/// A bare host without a scheme does not parse and is reported as a parse error rather than as
/// an insecure URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct LdapUrlSecurityRule;

impl LdapUrlSecurityRule {
    fn check_profile(
        snapshot: &dyn ConfigSnapshot,
        profile: &str,
        locale: LocaleCode,
    ) -> RuleResult<Vec<HealthRecord>> {
        let location = Setting::LdapServerUrls.menu_location(Some(profile), locale);
        let mut findings = Vec::new();
        for raw in snapshot.read_string_list(Setting::LdapServerUrls, Some(profile))? {
            match Url::parse(&raw) {
                Ok(url) if url.scheme().eq_ignore_ascii_case(SECURE_SCHEME) => {}
                Ok(_) => findings.push(HealthRecord::for_message(
                    HealthMessage::LdapUnsecure,
                    locale,
                    [location.clone()],
                )),
                Err(err) => {
                    debug!(
                        setting = %location,
                        error = %err,
                        "directory server url does not parse"
                    );
                    findings.push(HealthRecord::for_message(
                        HealthMessage::ParseError,
                        locale,
                        [err.to_string(), location.clone(), raw],
                    ));
                }
            }
        }
        Ok(findings)
    }
}

impl HealthRule for LdapUrlSecurityRule {
    fn name(&self) -> &'static str {
        "ldap-url-security"
    }

    fn audit(
        &self,
        snapshot: &dyn ConfigSnapshot,
        locale: LocaleCode,
    ) -> RuleResult<Vec<HealthRecord>> {
        let mut findings = Vec::new();
        for profile in snapshot.profiles(ProfileCategory::Ldap) {
            match Self::check_profile(snapshot, &profile, locale) {
                Ok(mut profile_findings) => findings.append(&mut profile_findings),
                Err(err) => warn!(
                    profile = %profile,
                    setting = Setting::LdapServerUrls.key(),
                    error = %err,
                    "skipping directory profile url check"
                ),
            }
        }
        Ok(findings)
    }
}
